//! Snapshot logs: one JSON snapshot per line, so a host can record a run
//! frame by frame and replay or diff it later.

use std::io::Write;

use crate::world::Snapshot;

/// Append `snapshot` to a log as a single line.
pub fn write_snapshot_line<W: Write>(
    writer: &mut W,
    snapshot: &Snapshot,
) -> serde_json::Result<()> {
    serde_json::to_writer(&mut *writer, snapshot)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)
}

/// Read every snapshot of a log back, in recording order. Blank lines are
/// skipped.
pub fn read_snapshot_log(log: &str) -> serde_json::Result<Vec<Snapshot>> {
    log.lines()
        .filter(|line| !line.trim().is_empty())
        .map(serde_json::from_str)
        .collect()
}

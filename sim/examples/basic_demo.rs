//! Basic demonstration of the Cinder simulation.
//!
//! Run with: cargo run --example basic_demo
//! More detail with: RUST_LOG=cinder_sim=trace cargo run --example basic_demo

use cinder_sim::entity_factory::NAPALM_FIRE_SPRITE;
use cinder_sim::{
    read_snapshot_log, write_snapshot_line, CollisionService, ComponentHolder, Position,
    ReleaseStyle, SimConfig, SimWorld, SolidGroundMap,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level used by the demo. The floor under row 9 has a gap on the right.
const LEVEL: &[&str] = &[
    "..............................",
    "..............................",
    "..............................",
    "..............................",
    "..............................",
    "..............................",
    "..............................",
    "..............................",
    "..............................",
    "..............................",
    "####################.....#####",
];

/// Stand-in for a pickup the container releases.
#[derive(bevy_ecs::component::Component, Debug, Clone)]
struct HealthPickup {
    amount: i32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("cinder_sim=debug".parse()?))
        .init();

    println!("=== Cinder - Simulation Demo ===\n");

    let collision = CollisionService::new(SolidGroundMap::from_rows(LEVEL));
    let mut sim = SimWorld::with_collision(SimConfig::default(), collision);

    sim.spawn_player(2, 9);
    let crate_box = sim.spawn_item_container(
        6,
        9,
        ReleaseStyle::ItemBox,
        vec![ComponentHolder::new(HealthPickup { amount: 1 })],
        1,
    );
    let barrel = sim.spawn_item_container(
        10,
        9,
        ReleaseStyle::NuclearWasteBarrel,
        Vec::new(),
        1,
    );
    let bomb = sim.spawn_napalm_bomb(16, 9);

    // One shot per target, fired from the player's position
    sim.spawn_projectile(5, 9, 1, 1);
    sim.spawn_projectile(8, 9, 1, 1);
    sim.spawn_projectile(12, 9, 1, 1);

    let mut log = Vec::new();
    for _ in 0..20 {
        sim.advance_frame();
        print_frame(&mut sim);
        write_snapshot_line(&mut log, &sim.snapshot())?;
    }

    let frames = read_snapshot_log(std::str::from_utf8(&log)?)?;
    let total_killed: usize = frames.iter().map(|f| f.killed.len()).sum();
    println!("\nrecorded {} frames ({} bytes), {} kills", frames.len(), log.len(), total_killed);

    println!("\nbox open: {}", !sim.is_valid(crate_box));
    println!("barrel open: {}", !sim.is_valid(barrel));
    println!("bomb burned out: {}", !sim.is_valid(bomb));

    let mut pickups = sim.world_mut().query::<(&HealthPickup, &Position)>();
    for (pickup, pos) in pickups.iter(sim.world()) {
        println!("pickup (+{}) at ({}, {})", pickup.amount, pos.x, pos.y);
    }

    println!("\n=== Final State (JSON) ===\n");
    println!("{}", sim.snapshot().to_json_pretty()?);
    Ok(())
}

fn print_frame(sim: &mut SimWorld) {
    let sounds = sim.drain_sounds();
    let snapshot = sim.snapshot();
    let fires = snapshot
        .sprites
        .iter()
        .filter(|s| s.sprite_id == NAPALM_FIRE_SPRITE.0)
        .count();
    let player_health = snapshot.player.as_ref().map_or(0, |p| p.health);

    println!(
        "tick {:>3}: score={:<4} player_hp={} containers={} fires={} killed={} sounds={:?}",
        snapshot.tick,
        snapshot.score,
        player_health,
        snapshot.containers.len(),
        fires,
        snapshot.killed.len(),
        sounds,
    );
}

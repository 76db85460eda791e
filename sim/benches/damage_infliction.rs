//! Damage infliction throughput: contact hazards against a field of
//! shootables, with and without the `parallel` feature.

use cinder_sim::{Active, BoundingBox, DamageInflicting, Position, Shootable, SimWorld};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn make_world(n: usize) -> SimWorld {
    let mut sim = SimWorld::new();
    let world = sim.world_mut();
    for i in 0..n {
        let x = (i % 100) as i32 * 4;
        let y = (i / 100) as i32 * 4;
        world.spawn((
            Position::new(x, y),
            BoundingBox::sized(2, 2),
            Shootable::new(i32::MAX),
            Active,
        ));
        // Every other target has a hazard sitting on it
        if i % 2 == 0 {
            world.spawn((
                Position::new(x + 1, y),
                BoundingBox::sized(1, 1),
                DamageInflicting::new(1, false),
            ));
        }
    }
    sim
}

fn bench_damage_infliction(c: &mut Criterion) {
    let mut group = c.benchmark_group("damage_infliction");
    for &n in &[100usize, 1000, 5000, 10000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut sim = make_world(n);
            b.iter(|| {
                sim.advance_frame();
                sim.drain_sounds();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_damage_infliction);
criterion_main!(benches);

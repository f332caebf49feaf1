use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flux_animation::{AnimationScheduler, SpringConfig};

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler_tick");

    for count in [80usize, 1_000] {
        group.bench_function(format!("{count}_values"), |b| {
            let mut scheduler = AnimationScheduler::new();
            let ids: Vec<_> = (0..count)
                .map(|_| scheduler.create(0.0, SpringConfig::particle()))
                .collect();
            let mut flip = false;

            b.iter(|| {
                flip = !flip;
                let target = if flip { 100.0 } else { 0.0 };
                for id in &ids {
                    let _ = scheduler.set_target(*id, target);
                }
                black_box(scheduler.tick(16.0))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);

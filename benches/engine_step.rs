//! Benchmarks for the per-tick CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;

use stormwave::background::BackgroundMode;
use stormwave::canvas::Framebuffer;
use stormwave::config::EngineConfig;
use stormwave::effects::{ClickEffect, EffectKind};
use stormwave::engine::{ClickTarget, Engine};
use stormwave::spawn::SpawnContext;

fn bench_spawn(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn");

    for kind in EffectKind::ALL {
        group.bench_function(kind.name(), |b| {
            b.iter(|| {
                let mut ctx = SpawnContext::new(Vec2::new(400.0, 300.0), 10.0);
                black_box(kind.spawn(&mut ctx))
            })
        });
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for clicks in [0usize, 10, 50] {
        group.bench_with_input(BenchmarkId::new("explosions", clicks), &clicks, |b, &clicks| {
            let config = EngineConfig {
                click_effect: ClickEffect::Kind(EffectKind::Explosion),
                ..Default::default()
            };
            let mut engine = Engine::new(800, 600, config);
            let mut frame = Framebuffer::new(800, 600);
            b.iter(|| {
                if engine.particles().len() < clicks * 20 {
                    for i in 0..clicks {
                        engine.click(Vec2::new(i as f32 * 15.0, 300.0), ClickTarget::Canvas);
                    }
                }
                black_box(engine.tick(&mut frame))
            })
        });
    }

    group.finish();
}

fn bench_background(c: &mut Criterion) {
    let mut group = c.benchmark_group("background");

    for mode in BackgroundMode::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{mode:?}")), &mode, |b, &mode| {
            let config = EngineConfig {
                background_mode: mode,
                ..Default::default()
            };
            let mut engine = Engine::new(800, 600, config);
            let mut frame = Framebuffer::new(800, 600);
            b.iter(|| black_box(engine.tick(&mut frame)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_spawn, bench_tick, bench_background);
criterion_main!(benches);

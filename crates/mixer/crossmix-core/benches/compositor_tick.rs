use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use crossmix_core::{Clip, ClipEvent, Config, LayerCompositor, PlayRequest};

fn bench_tick(c: &mut Criterion) {
    let walk = Clip::new(
        "walk",
        2.0,
        true,
        vec![ClipEvent::new(0.5, "footstep_l"), ClipEvent::new(1.5, "footstep_r")],
    );
    let wave = Clip::new("wave", 1.0, true, vec![]);

    let mut comp = LayerCompositor::new(Config::default());
    comp.initialize();
    comp.play(PlayRequest {
        fade_duration: 0.3,
        ..PlayRequest::new(walk)
    })
    .unwrap();
    comp.play(PlayRequest {
        fade_duration: 0.3,
        layer: 1,
        ..PlayRequest::new(wave)
    })
    .unwrap();

    c.bench_function("compositor_tick_2_layers", |b| {
        b.iter(|| {
            comp.tick(black_box(1.0 / 60.0));
        })
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);

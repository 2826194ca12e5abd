use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use timeline_viewport::api::{ViewportEngine, ViewportEngineConfig, measure_occlusion};
use timeline_viewport::core::{
    ContainerKey, PeriodKey, Rect, Span, UsableWindow, compute_delta, ease_out_cubic,
};
use timeline_viewport::interaction::ManualClock;
use timeline_viewport::layout::{MemoryLayoutTree, OverlayPanel};

fn bench_compute_delta_10k(c: &mut Criterion) {
    let window = UsableWindow::new(Span::new(0.0, 1_920.0), 12.0, 480.0);
    let targets: Vec<Span> = (0..10_000)
        .map(|i| {
            let start = (i as f64) * 37.0 - 150_000.0;
            Span::new(start, start + 180.0)
        })
        .collect();

    c.bench_function("compute_delta_10k", |b| {
        b.iter(|| {
            let total: f64 = black_box(&targets)
                .iter()
                .map(|target| compute_delta(*target, black_box(window)))
                .sum();
            black_box(total)
        })
    });
}

fn bench_easing_curve(c: &mut Criterion) {
    c.bench_function("ease_out_cubic_300_steps", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for step in 0..300 {
                acc += ease_out_cubic(black_box(f64::from(step) / 300.0));
            }
            black_box(acc)
        })
    });
}

fn bench_occlusion_measure_64_panels(c: &mut Criterion) {
    let container = Rect::new(0.0, 0.0, 1_920.0, 1_080.0);
    let panels: Vec<OverlayPanel> = (0..64)
        .map(|i| {
            let width = 40.0 + f64::from(i) * 9.0;
            OverlayPanel::new(format!("panel-{i}"), Rect::new(1_920.0 - width, 0.0, width, 1_080.0))
        })
        .collect();

    c.bench_function("occlusion_measure_64_panels", |b| {
        b.iter(|| black_box(measure_occlusion(black_box(container), black_box(&panels))))
    });
}

fn bench_keep_visible_round_trip(c: &mut Criterion) {
    let mut tree = MemoryLayoutTree::new(
        ContainerKey::new("timeline"),
        Rect::new(0.0, 0.0, 1_600.0, 900.0),
    )
    .with_header_height(40.0);
    for month in 1..=12 {
        let key = PeriodKey::month(2021, month).expect("valid month");
        tree.push_column(key, 220.0);
        for day in 1..=28 {
            let date = NaiveDate::from_ymd_opt(2021, month, day).expect("valid date");
            tree.push_item(key, format!("{month}-{day}"), date, 72.0)
                .expect("push item");
        }
    }
    let clock = ManualClock::new(0);
    let config = ViewportEngineConfig::default().with_animation_duration_ms(0);
    let mut engine =
        ViewportEngine::with_clock(tree, clock.clone(), config).expect("engine init");

    c.bench_function("keep_visible_round_trip", |b| {
        b.iter(|| {
            let _ = engine.scroll_to_keep_visible(black_box("11-27"));
            let _ = engine.scroll_to_keep_visible(black_box("1-2"));
            clock.advance(1_000);
            engine.tick();
        })
    });
}

criterion_group!(
    benches,
    bench_compute_delta_10k,
    bench_easing_curve,
    bench_occlusion_measure_64_panels,
    bench_keep_visible_round_trip
);
criterion_main!(benches);

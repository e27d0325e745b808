use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hrplatform_core::model::{default_eras, Event, EventType};
use hrplatform_core::timeline::layout::calculate_event_positions;
use hrplatform_core::timeline::scale::LinearScale;
use hrplatform_core::timeline::{build_continuous_view, TypeFilter};
use hrplatform_core::web::{ForceLayout, LayoutEdge, LayoutEngine, LayoutParams};

fn make_events(n: usize) -> Vec<Event> {
    (0..n)
        .map(|i| Event {
            id: format!("e{i}"),
            year: 1215 + (i as i32 * 7) % 810,
            title: format!("Event number {i}"),
            kind: EventType::ALL[i % EventType::ALL.len()],
            description: None,
            significance: None,
            system: None,
            highlight: i % 5 == 0,
            related_id: None,
        })
        .collect()
}

fn bench_event_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_positions");

    for n in [50, 200] {
        let mut events = make_events(n);
        events.sort_by_key(|e| e.year);
        let refs: Vec<&Event> = events.iter().collect();
        let scale = LinearScale::new((1185.0, 2055.0), (0.0, 3000f64.max(n as f64 * 120.0)));
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| calculate_event_positions(black_box(&refs), &scale, 400.0))
        });
    }

    group.finish();
}

fn bench_continuous_view(c: &mut Criterion) {
    let events = make_events(150);
    let eras = default_eras();
    c.bench_function("continuous_view/n=150", |b| {
        b.iter(|| build_continuous_view(black_box(&events), &eras, TypeFilter::All))
    });
}

fn bench_force_layout(c: &mut Criterion) {
    let nodes = 60;
    let edges: Vec<LayoutEdge> = (1..nodes)
        .map(|i| LayoutEdge {
            source: i,
            target: (i * 7) % i,
            strength: 0.5,
        })
        .collect();
    let params = LayoutParams::default();
    c.bench_function("force_layout/n=60", |b| {
        b.iter(|| ForceLayout.layout(black_box(nodes), &edges, &params))
    });
}

criterion_group!(
    benches,
    bench_event_positions,
    bench_continuous_view,
    bench_force_layout
);
criterion_main!(benches);

use analytics::{aggregate, AggregateConfig, ChartFormat, ScatterChart};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use records::Record;

const PHRASES: [(&str, &str); 3] = [
    ("Great food and friendly staff, will come back", "POSITIVE"),
    ("Cold fries, slow service, bad experience", "NEGATIVE"),
    ("Ordered the menu du jour, it was fine", "NEUTRAL"),
];

fn reviews(count: usize) -> Vec<Record> {
    (0..count)
        .map(|idx| {
            let (text, label) = PHRASES[idx % PHRASES.len()];
            Record::new()
                .with("review_id", format!("r-{idx}"))
                .with("text", text)
                .with("sentiment", label)
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for size in [100usize, 1_000, 10_000].iter() {
        let records = reviews(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("records_{size}"), |b| {
            b.iter(|| aggregate(black_box(&records)))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let stats = aggregate(&reviews(1_000));
    let chart = ScatterChart::from_stats(&stats, &AggregateConfig::default()).expect("chart");
    let mut group = c.benchmark_group("render_scatter");

    for format in [ChartFormat::Svg, ChartFormat::Png, ChartFormat::Json] {
        let renderer = format.renderer();
        group.bench_function(format.extension(), |b| {
            b.iter(|| renderer.render_scatter(black_box(&chart)).expect("render"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_render);
criterion_main!(benches);

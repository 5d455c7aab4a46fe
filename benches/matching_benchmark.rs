use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prompt_curation::classifier::classify;
use prompt_curation::geometry::calculate_iou;
use prompt_curation::labels::parse_label_line;
use prompt_curation::matching::match_boxes;
use prompt_curation::types::BoundingBox;
use prompt_curation::weights::synthesize_weights;
use std::collections::BTreeMap;

fn bench_iou_calculation(c: &mut Criterion) {
    let bbox1 = BoundingBox::new(0, 10, 10, 60, 60);
    let bbox2 = BoundingBox::new(0, 30, 30, 80, 80);

    c.bench_function("iou_single", |b| {
        b.iter(|| calculate_iou(black_box(&bbox1), black_box(&bbox2)));
    });
}

fn bench_match_boxes(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_boxes");

    for size in [10, 50, 100, 500].iter() {
        let ground_truth: Vec<BoundingBox> = (0..*size)
            .map(|i| {
                let offset = i * 12;
                BoundingBox::new(0, offset, offset, offset + 50, offset + 50)
            })
            .collect();
        // Reversed order is the worst case for first-fit scanning.
        let detections: Vec<BoundingBox> = ground_truth
            .iter()
            .rev()
            .map(|b| BoundingBox::new(b.class_id, b.x1 + 2, b.y1 + 2, b.x2 + 2, b.y2 + 2))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let result = match_boxes(black_box(&ground_truth), black_box(&detections), 0.4);
                black_box(classify(&result))
            });
        });
    }
    group.finish();
}

fn bench_parse_label_line(c: &mut Criterion) {
    c.bench_function("parse_label_line", |b| {
        b.iter(|| parse_label_line(black_box("3 0.512345 0.498765 0.250000 0.125000"), 1024, 768));
    });
}

fn bench_synthesize_weights(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize_weights");

    for prompts in [10, 100, 1000].iter() {
        let rates: BTreeMap<String, f64> = (0..*prompts)
            .map(|i| (format!("prompt_{i}"), (i % 10) as f64 / 10.0))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(prompts), prompts, |b, _| {
            b.iter(|| synthesize_weights(black_box(&rates)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_iou_calculation,
    bench_match_boxes,
    bench_parse_label_line,
    bench_synthesize_weights
);
criterion_main!(benches);

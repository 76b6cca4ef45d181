//! Benchmarks for active-section detection.
//!
//! Run with: cargo bench -p folio-spy

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use folio_core::geometry::{BoundingBox, GeometryProvider, SectionGeometry, Viewport};
use folio_core::id::{SectionId, TargetId};
use folio_spy::{ProbeRule, SectionRegistry, SectionSample, SectionTracker, compute_active};
use std::hint::black_box;

struct Stacked;

impl GeometryProvider for Stacked {
    fn section_geometry(&self, id: &SectionId) -> Option<SectionGeometry> {
        let index: f64 = id.as_str().rsplit('-').next()?.parse().ok()?;
        Some(SectionGeometry::new(index * 1000.0, 1000.0))
    }

    fn target_bounds(&self, _id: TargetId) -> Option<BoundingBox> {
        None
    }
}

fn bench_compute_active(c: &mut Criterion) {
    let mut group = c.benchmark_group("spy/compute_active");

    for n in [5, 20, 100] {
        let ids: Vec<SectionId> = (0..n).map(|i| SectionId::new(format!("s-{i}"))).collect();
        let samples: Vec<SectionSample<'_>> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| SectionSample::new(id, Some(SectionGeometry::new(i as f64 * 1000.0, 1000.0))))
            .collect();
        // Probe in the last section: worst case for the linear scan.
        let scroll_y = (n as f64 - 1.0) * 1000.0 + 200.0;
        group.bench_with_input(BenchmarkId::new("last_section", n), &samples, |b, samples| {
            b.iter(|| black_box(compute_active(scroll_y, 900.0, samples, ProbeRule::default(), None)))
        });
    }

    group.finish();
}

fn bench_tracker_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("spy/tracker_update");
    let registry = SectionRegistry::from_slugs((0..20).map(|i| format!("s-{i}")));

    group.bench_function("scroll_sweep", |b| {
        let mut tracker = SectionTracker::default();
        let mut y = 0.0;
        b.iter(|| {
            y = (y + 37.0) % 20_000.0;
            black_box(tracker.update(Viewport::new(y, 900.0), &registry, &Stacked))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_compute_active, bench_tracker_update);
criterion_main!(benches);

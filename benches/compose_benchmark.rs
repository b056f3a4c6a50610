//! Benchmarks for images2pdf.
//!
//! Run with: cargo bench
//!
//! Inputs are generated into a temporary folder so no fixtures are needed.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgb, RgbImage};
use images2pdf::compose::compose_with;
use images2pdf::{analyze_all, scan_folder, ConvertOptions, NoopObserver, PageGeometry};
use tempfile::TempDir;

/// Write `count` gradient PNGs with alternating orientation.
fn create_test_folder(count: usize, size: u32) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for i in 0..count {
        let (w, h) = if i % 2 == 0 { (size, size * 3 / 4) } else { (size * 3 / 4, size) };
        let img = RgbImage::from_fn(w, h, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, i as u8]));
        img.save(dir.path().join(format!("{:04}.png", i))).expect("save");
    }
    dir
}

fn bench_placement(c: &mut Criterion) {
    let aspects: Vec<f64> = (1..=200).map(|i| i as f64 / 50.0).collect();

    c.bench_function("place_200_aspects", |b| {
        b.iter(|| {
            let page = PageGeometry::from_aspect_ratio(black_box(4.0 / 3.0));
            for &aspect in &aspects {
                black_box(page.place(aspect));
            }
        })
    });
}

fn bench_analyze(c: &mut Criterion) {
    let dir = create_test_folder(20, 256);

    c.bench_function("analyze_20_images", |b| {
        b.iter(|| {
            let paths = scan_folder(dir.path()).unwrap();
            black_box(analyze_all(paths).unwrap())
        })
    });
}

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    group.sample_size(10);

    for count in [1usize, 10] {
        let dir = create_test_folder(count, 512);
        let records = analyze_all(scan_folder(dir.path()).unwrap()).unwrap();
        let output = dir.path().join("bench.pdf");
        let options = ConvertOptions::new().reproducible();

        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| compose_with(records, &output, &options, &mut NoopObserver).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_placement, bench_analyze, bench_compose);
criterion_main!(benches);

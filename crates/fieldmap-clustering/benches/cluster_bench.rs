//! Criterion benchmarks for the clustering pass.
//!
//! Run with: cargo bench -p fieldmap-clustering --bench cluster_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fieldmap_clustering::{ClusterEngine, MapViewport};
use fieldmap_core::{Legend, MapObject, ObjectGeometry, Vertex};

const TYPES: [&str; 4] = ["arbres", "bancs", "luminaires", "poubelles"];

/// Objects spread on a jittered grid around the viewport center.
fn facility(count: usize, viewport: &MapViewport) -> Vec<MapObject> {
    let side = (count as f64).sqrt().ceil() as usize;
    (0..count)
        .map(|i| {
            let (row, col) = (i / side, i % side);
            let x = 40.0 + col as f64 * 1200.0 / side as f64 + (i % 7) as f64;
            let y = 40.0 + row as f64 * 720.0 / side as f64 + (i % 5) as f64;
            MapObject {
                id: i as i64,
                object_type: TYPES[i % TYPES.len()].to_string(),
                display_name: format!("object {i}"),
                geometry: ObjectGeometry::Point(viewport.pixel_to_vertex(x, y)),
                center: None,
            }
        })
        .collect()
}

fn bench_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster");
    let engine = ClusterEngine::default();
    let legend = Legend::facility_defaults();

    for zoom in [12u8, 16] {
        let viewport = MapViewport::new(Vertex::new(48.8566, 2.3522), zoom, 1280.0, 800.0);
        for count in [100usize, 500, 2000] {
            let objects = facility(count, &viewport);
            group.bench_with_input(
                BenchmarkId::new(format!("zoom_{zoom}"), count),
                &objects,
                |b, objects| b.iter(|| black_box(engine.cluster(black_box(objects), &viewport, &legend))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_cluster);
criterion_main!(benches);

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use partialscan::geometry::{subset_geometry, Primitive};
use partialscan::sampling::{shoot_holes, HoleParams, SpatialIndex};
use partialscan::{remove_points, SoftwareUvRenderer};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_subset(c: &mut Criterion) {
    let mut group = c.benchmark_group("subset");

    for segments in [32, 128] {
        let mesh = Primitive::torus(2.0, 0.5, segments, segments / 2).to_mesh();
        let deletion: Vec<usize> = (0..mesh.vertex_count()).step_by(7).collect();

        group.bench_with_input(BenchmarkId::new("geometry", segments), &mesh, |b, mesh| {
            b.iter(|| subset_geometry(black_box(mesh), black_box(&deletion)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("with_texture", segments), &mesh, |b, mesh| {
            b.iter(|| {
                remove_points(black_box(mesh), black_box(&deletion), true, &SoftwareUvRenderer)
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");

    let mesh = Primitive::torus(2.0, 0.5, 256, 128).to_mesh();
    let params = HoleParams::default();

    group.bench_function("spatial_index_build", |b| {
        b.iter(|| SpatialIndex::build(black_box(&mesh.vertices)));
    });

    group.bench_function("shoot_holes", |b| {
        let mut rng = StdRng::seed_from_u64(11);
        b.iter(|| shoot_holes(black_box(&mesh.vertices), &params, None, None, &mut rng).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_subset, bench_sampling);
criterion_main!(benches);

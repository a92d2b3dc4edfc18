//! Benchmarks for mesh operations.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use trellis::algo::conway::truncate;
use trellis::algo::dual::dual;
use trellis::algo::solidify::{solidify, SolidifyOptions};
use trellis::algo::subdivide::{subdivide, SubdivideOptions};
use trellis::algo::weld::{weld, WeldOptions, WeldTolerance};
use trellis::prelude::*;

fn subdivided_cube(iterations: usize) -> Mesh {
    let mut mesh = Cube::default().produce();
    subdivide(&mut mesh, &SubdivideOptions::new(iterations));
    mesh
}

/// A grid whose faces each own their corners.
fn exploded_grid(n: usize) -> Mesh {
    let grid = Grid::new(n, n).produce();
    let mut out = Mesh::with_capacity(grid.num_faces() * 4, grid.num_faces());
    for face in grid.faces() {
        let corners: Vec<VertexId> = face
            .indices()
            .iter()
            .map(|&v| out.add_vertex(*grid.position(v)))
            .collect();
        out.add_face(corners).unwrap();
    }
    out
}

fn bench_adjacency(c: &mut Criterion) {
    let mesh = subdivided_cube(4);

    c.bench_function("adjacency_build_cube_s4", |b| {
        b.iter(|| AdjacencyIndex::build(&mesh).num_directed_edges());
    });

    let index = AdjacencyIndex::build(&mesh);
    c.bench_function("vertex_fans_all", |b| {
        b.iter(|| {
            let mut count = 0;
            for v in mesh.vertex_ids() {
                count += index.vertex_fan(v).unwrap().len();
            }
            count
        });
    });
}

fn bench_subdivide(c: &mut Criterion) {
    let mut group = c.benchmark_group("subdivide_cube");
    for iterations in [2usize, 4] {
        group.bench_with_input(BenchmarkId::new("parallel", iterations), &iterations, |b, &n| {
            b.iter(|| subdivided_cube(n));
        });
        group.bench_with_input(BenchmarkId::new("sequential", iterations), &iterations, |b, &n| {
            let options = SubdivideOptions::new(n).sequential();
            b.iter(|| {
                let mut mesh = Cube::default().produce();
                subdivide(&mut mesh, &options);
                mesh
            });
        });
    }
    group.finish();
}

fn bench_dual(c: &mut Criterion) {
    let mesh = subdivided_cube(3);
    c.bench_function("dual_cube_s3", |b| {
        b.iter(|| dual(&mesh).unwrap());
    });

    let ico = Icosahedron.produce();
    c.bench_function("truncate_icosahedron", |b| {
        b.iter(|| truncate(&ico, 1.0 / 3.0).unwrap());
    });
}

fn bench_weld(c: &mut Criterion) {
    let exploded = exploded_grid(64);

    c.bench_function("weld_exploded_grid_64", |b| {
        let options = WeldOptions::default();
        b.iter(|| {
            let mut mesh = exploded.clone();
            weld(&mut mesh, &options).unwrap()
        });
    });

    c.bench_function("weld_exploded_grid_64_distance", |b| {
        let options = WeldOptions::new(WeldTolerance::Distance(1e-6));
        b.iter(|| {
            let mut mesh = exploded.clone();
            weld(&mut mesh, &options).unwrap()
        });
    });
}

fn bench_solidify(c: &mut Criterion) {
    let grid = Grid::new(64, 64).produce();

    c.bench_function("solidify_grid_64", |b| {
        let options = SolidifyOptions::new(0.05);
        b.iter(|| {
            let mut mesh = grid.clone();
            solidify(&mut mesh, &options).unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_adjacency,
    bench_subdivide,
    bench_dual,
    bench_weld,
    bench_solidify
);
criterion_main!(benches);

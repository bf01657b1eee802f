use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fidlgen_cpp::render::render_all;
use fidlgen_cpp::{ir, CompileOptions, Compiler};

const ACME_WIDGETS: &str = include_str!("../tests/fixtures/acme.widgets.fidl.json");

fn compile_benchmark(c: &mut Criterion) {
    let ir = ir::Root::from_json(ACME_WIDGETS).unwrap();
    let compiler = Compiler::new(CompileOptions::default());

    c.bench_function("parse json ir", |b| {
        b.iter(|| ir::Root::from_json(black_box(ACME_WIDGETS)).unwrap())
    });

    c.bench_function("compile library", |b| {
        b.iter(|| compiler.compile(black_box(&ir)).unwrap())
    });
}

fn render_benchmark(c: &mut Criterion) {
    let root = Compiler::new(CompileOptions::default())
        .compile_json(ACME_WIDGETS)
        .unwrap();

    c.bench_function("render all flavors", |b| {
        b.iter(|| render_all(black_box(&root)).unwrap())
    });
}

criterion_group!(benches, compile_benchmark, render_benchmark);
criterion_main!(benches);

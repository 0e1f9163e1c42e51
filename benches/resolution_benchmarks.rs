//! Benchmarks for overload resolution and whole-program analysis.
//!
//! ```bash
//! cargo bench --bench resolution_benchmarks
//! ```

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use dflat::{
    BinaryOp, ClassDecl, ClassRegistry, Expr, MethodDef, Param, Program, Stmt, ValueType, analyze,
};
use std::hint::black_box;

/// A linear hierarchy `C0 <- C1 <- ... <- C{depth-1}` where every class adds a
/// field and an overload of `visit`, and the root declares `greet(C0)`.
fn hierarchy(depth: usize) -> Program {
    let mut classes = Vec::with_capacity(depth);
    for i in 0..depth {
        let name = format!("C{i}");
        let mut class = ClassDecl::new(name.as_str()).field(ValueType::Int, format!("f{i}"));
        if i > 0 {
            class = class.extends(format!("C{}", i - 1));
        }
        if i == 0 {
            class = class.method(MethodDef::new(
                ValueType::Int,
                "greet",
                vec![Param::new(ValueType::class("C0"), "other")],
                vec![Stmt::ret(Some(Expr::var("f0")))],
            ));
        }
        class = class.method(MethodDef::new(
            ValueType::Int,
            "visit",
            vec![Param::new(ValueType::Int, "n"), Param::new(ValueType::class(name.as_str()), "c")],
            vec![Stmt::ret(Some(Expr::binary(
                Expr::var("n"),
                BinaryOp::Add,
                Expr::var(format!("f{i}")),
            )))],
        ));
        classes.push(class);
    }
    Program::new(classes)
}

fn bench_resolve_method(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_method");

    for depth in [4usize, 16, 64] {
        let mut program = hierarchy(depth);
        let registry: ClassRegistry = analyze(&mut program).expect("hierarchy checks");
        let leaf = format!("C{}", depth - 1);
        let args = [ValueType::class(leaf.as_str())];

        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("inherited_widening_depth_{depth}"), |b| {
            b.iter(|| {
                dflat_compiler::resolve_method(
                    black_box(&registry),
                    black_box(&leaf),
                    "greet",
                    black_box(&args),
                )
            })
        });
    }

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for depth in [16usize, 128] {
        let program = hierarchy(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("hierarchy_{depth}"), |b| {
            b.iter(|| {
                let mut program = program.clone();
                black_box(analyze(&mut program))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve_method, bench_analyze);
criterion_main!(benches);

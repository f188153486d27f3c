//! Benchmarks for OpenQASM parsing.
//!
//! Run with: cargo bench -p benchpress-qasm

use benchpress_qasm::parse;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::fmt::Write;

/// QFT source in the style of the corpus files: controlled phases and final swaps.
fn qft_source(n: usize) -> String {
    let mut src = format!("OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[{n}];\ncreg c[{n}];\n");
    for j in 0..n {
        let _ = writeln!(src, "h q[{j}];");
        for k in (j + 1)..n {
            let _ = writeln!(src, "cu1(pi/{}) q[{k}], q[{j}];", 1u64 << (k - j).min(62));
        }
    }
    for j in 0..n / 2 {
        let _ = writeln!(src, "swap q[{j}], q[{}];", n - 1 - j);
    }
    src.push_str("measure q -> c;\n");
    src
}

fn bench_parse_qft(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_qft");
    for n in [10usize, 50, 100] {
        let source = qft_source(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &source, |b, src| {
            b.iter(|| parse(black_box(src)).unwrap());
        });
    }
    group.finish();
}

fn bench_parse_gate_definitions(c: &mut Criterion) {
    let mut src = String::from(
        "OPENQASM 2.0;\nqreg q[50];\ngate maj a, b, c { cx c, b; cx c, a; ccx a, b, c; }\n",
    );
    for i in 0..48 {
        let _ = writeln!(src, "maj q[{i}], q[{}], q[{}];", i + 1, i + 2);
    }
    c.bench_function("parse_inlined_definitions", |b| {
        b.iter(|| parse(black_box(&src)).unwrap());
    });
}

criterion_group!(benches, bench_parse_qft, bench_parse_gate_definitions);
criterion_main!(benches);

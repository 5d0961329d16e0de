//! Interpreter benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use sprout_runtime::Engine;
use std::hint::black_box;

fn bench_lex_parse(c: &mut Criterion) {
    let source = "\
def greet(name, punct):
    return 'Hello, ' + name + punct

print(greet('Ada', '!'))
";
    c.bench_function("check_small_snippet", |b| {
        let engine = Engine::new();
        b.iter(|| engine.check(black_box(source)))
    });
}

fn bench_run_loop(c: &mut Criterion) {
    let source = "\
total = 0
for n in range(1000):
    total = total + n
print(total)
";
    c.bench_function("run_counting_loop", |b| {
        let engine = Engine::new();
        b.iter(|| engine.run(black_box(source)))
    });
}

fn bench_run_functions(c: &mut Criterion) {
    let source = "\
def step(items, n):
    items.append(n * 2)
    return len(items)

sizes = []
log = []
for n in range(200):
    log.append(step(sizes, n))
print(len(log))
";
    c.bench_function("run_function_heavy", |b| {
        let engine = Engine::new();
        b.iter(|| engine.run(black_box(source)))
    });
}

criterion_group!(
    benches,
    bench_lex_parse,
    bench_run_loop,
    bench_run_functions
);
criterion_main!(benches);

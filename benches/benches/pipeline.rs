//! Benchmarks for the lex, parse, desugar and render stages.

use criterion::{Criterion, criterion_group, criterion_main};
use lu_syntax::{
    DesugarOptions, MINIFY_RENDERER, PRETTY_RENDERER, Renderer, desugar, parse, tokenize,
};
use std::hint::black_box;

const SOURCE: &str = r#"
import { encode, decode } from "json"
import Widget from "./widget"

local counter = 0

@watch
local state = { count = 0, items = {} }

@memo(16)
local function fib(n)
  if n < 2 then return n end
  return fib(n - 1) + fib(n - 2)
end

function state:push(item)
  self.items[#self.items + 1] = item
  self.count += 1
  return (counter += 1)
end

local view = |props| <Widget title={props.title}>
  <span class="count">{state.count}</span>
</Widget>

for i = 1, 100 do
  state:push({ id = i, name = "item" .. i })
end

print(encode(state), decode("[]"), view({ title = "x" }))
"#;

/// The source repeated to form a larger chunk.
fn large_source() -> String {
    SOURCE.repeat(50)
}

fn bench_lexer(c: &mut Criterion) {
    let large = large_source();
    c.bench_function("lex", |b| b.iter(|| tokenize(black_box(&large))));
}

fn bench_parser(c: &mut Criterion) {
    let tokens = tokenize(&large_source()).expect("tokenize");
    c.bench_function("parse", |b| {
        b.iter(|| parse(black_box(tokens.clone())))
    });
}

fn bench_desugar(c: &mut Criterion) {
    let chunk = parse(tokenize(&large_source()).expect("tokenize")).expect("parse");
    let options = DesugarOptions::default();
    c.bench_function("desugar", |b| {
        b.iter_batched(
            || chunk.clone(),
            |mut chunk| desugar(&mut chunk, &options).map(|_| chunk),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_render(c: &mut Criterion) {
    let mut chunk = parse(tokenize(&large_source()).expect("tokenize")).expect("parse");
    desugar(&mut chunk, &DesugarOptions::default()).expect("desugar");

    let mut group = c.benchmark_group("render");
    group.bench_function("pretty", |b| {
        b.iter(|| PRETTY_RENDERER.render_chunk(black_box(&chunk)))
    });
    group.bench_function("minify", |b| {
        b.iter(|| MINIFY_RENDERER.render_chunk(black_box(&chunk)))
    });
    group.finish();
}

criterion_group!(benches, bench_lexer, bench_parser, bench_desugar, bench_render);
criterion_main!(benches);

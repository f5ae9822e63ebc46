use compiler::{
    markup::parse_markup,
    script::{parse_script, ScriptParseOption},
};
use plats_benches::get_fixtures;
use sfc::{compile_sfc, parse_sfc, CompileOption};

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::{criterion_group, criterion_main};

fn parse_only(source: &str) {
    let sfc = parse_sfc(source).unwrap();
    parse_markup(sfc.pagina.text, sfc.pagina.start).unwrap();
    parse_script(sfc.script.text, sfc.script.start, &ScriptParseOption::default()).unwrap();
}

fn full_compile(source: &str) {
    compile_sfc(source, &CompileOption::default()).unwrap();
}

fn bench_fixtures(c: &mut Criterion) {
    for (name, content) in get_fixtures() {
        c.bench_with_input(BenchmarkId::new("parse", &name), &content, |b, c| {
            b.iter(|| parse_only(c));
        });
        c.bench_with_input(BenchmarkId::new("compile", &name), &content, |b, c| {
            b.iter(|| full_compile(c));
        });
    }
}

criterion_group!(benches, bench_fixtures);
criterion_main!(benches);

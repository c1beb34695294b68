//! Decoder benchmarks for coriolis-parser.

mod datagen;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use coriolis_parser::{parse_sigma_rule, parse_sigma_yaml};

fn bench_parse_single_rule(c: &mut Criterion) {
    let yaml = datagen::gen_rule(0);

    c.bench_function("parse_single_rule", |b| {
        b.iter(|| {
            let result = parse_sigma_rule(black_box(&yaml)).unwrap();
            black_box(result);
        });
    });
}

fn bench_parse_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_rules");

    for n in [10, 100, 1000] {
        let yaml = datagen::gen_n_rules(n);
        group.throughput(criterion::Throughput::Bytes(yaml.len() as u64));

        group.bench_with_input(BenchmarkId::new("count", n), &yaml, |b, yaml| {
            b.iter(|| {
                let result = parse_sigma_yaml(black_box(yaml)).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_single_rule, bench_parse_scaling);
criterion_main!(benches);

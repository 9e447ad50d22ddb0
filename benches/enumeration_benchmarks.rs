use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use join_enumerator::{
    generate_orders, generate_templates, instantiate, search_space_size, ConnectivityChecker,
    Topology,
};
use join_enumerator::core::join_enum::JoinConditionSet;
use std::hint::black_box;
use std::time::Duration;

fn bench_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("count");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for topology in Topology::ALL {
        for inputs in [4usize, 5, 6] {
            group.throughput(Throughput::Elements(search_space_size(inputs)));

            group.bench_with_input(
                BenchmarkId::new(topology.to_string(), inputs),
                &inputs,
                |b, &inputs| {
                    let enumerator = topology.build(inputs).unwrap();
                    b.iter(|| black_box(enumerator.count().unwrap()));
                },
            );
        }
    }

    group.finish();
}

fn bench_generators(c: &mut Criterion) {
    let mut group = c.benchmark_group("generators");

    for inputs in [5usize, 6, 7] {
        group.bench_with_input(BenchmarkId::new("templates", inputs), &inputs, |b, &inputs| {
            b.iter(|| black_box(generate_templates(inputs)));
        });

        group.bench_with_input(BenchmarkId::new("orders", inputs), &inputs, |b, &inputs| {
            b.iter(|| black_box(generate_orders(inputs)));
        });
    }

    group.finish();
}

fn bench_connectivity(c: &mut Criterion) {
    let mut group = c.benchmark_group("connectivity");

    let inputs = 6;
    let mut conditions = JoinConditionSet::new();
    for i in 1..inputs {
        conditions.insert(i - 1, i);
    }
    let templates = generate_templates(inputs);
    let orders = generate_orders(inputs);
    group.throughput(Throughput::Elements(templates.len() as u64));

    group.bench_function("instantiate_and_check_warm", |b| {
        let checker = ConnectivityChecker::new(&conditions);
        let order = &orders[orders.len() / 2];
        b.iter(|| {
            for template in &templates {
                let tree = instantiate(template, order).unwrap();
                black_box(checker.is_cross_product_free(&tree).unwrap());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_count, bench_generators, bench_connectivity);
criterion_main!(benches);

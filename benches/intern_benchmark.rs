use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use intern_cache::{Args, Factory, FactoryBuilder, InternKey, Interner, ParamKey};

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
struct BenchKey(u64);

impl InternKey for BenchKey {
	type Value = BenchValue;
}

#[derive(Clone, Debug)]
struct BenchValue {
	data: Vec<u8>,
}

fn bench_value() -> BenchValue {
	BenchValue {
		data: vec![0u8; 64],
	}
}

fn bench_obtain_hit(c: &mut Criterion) {
	let interner: Interner<BenchKey> = Interner::new();

	// Pre-populate and keep the instances alive so every lookup hits.
	let held: Vec<_> = (0..1000).map(|i| interner.obtain(BenchKey(i), bench_value)).collect();

	c.bench_function("obtain_hit", |b| {
		b.iter(|| {
			for i in 0..1000u64 {
				let _ = interner.obtain(BenchKey(black_box(i)), bench_value);
			}
		});
	});

	drop(held);
}

fn bench_obtain_miss(c: &mut Criterion) {
	let mut group = c.benchmark_group("obtain_miss");

	for size in [100u64, 1000, 10000] {
		group.throughput(Throughput::Elements(size));
		group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
			b.iter(|| {
				let interner: Interner<BenchKey> = Interner::new();
				let mut held = Vec::with_capacity(size as usize);
				for i in 0..size {
					held.push(interner.obtain(BenchKey(black_box(i)), bench_value));
				}
				held
			});
		});
	}

	group.finish();
}

fn bench_default_key_derivation(c: &mut Criterion) {
	let args = Args::new().arg(42_i64).arg("benchmark").named("scale", 2_i64);

	c.bench_function("derive_default_key", |b| {
		b.iter(|| ParamKey::derive(black_box(&args)).unwrap());
	});
}

fn bench_factory_obtain_hit(c: &mut Criterion) {
	let factory: Factory<(i64, i64)> = FactoryBuilder::new().build(|args| {
		(
			args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
			args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
		)
	});

	let held: Vec<_> =
		(0..100).map(|i| factory.obtain(Args::new().arg(i as i64).arg(0_i64)).unwrap()).collect();

	c.bench_function("factory_obtain_hit", |b| {
		b.iter(|| {
			for i in 0..100i64 {
				let _ = factory.obtain(Args::new().arg(black_box(i)).arg(0_i64)).unwrap();
			}
		});
	});

	drop(held);
}

criterion_group!(
	benches,
	bench_obtain_hit,
	bench_obtain_miss,
	bench_default_key_derivation,
	bench_factory_obtain_hit
);
criterion_main!(benches);

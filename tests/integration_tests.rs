use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use intern_cache::{
	Args, ConfigError, ConstructError, Factory, FactoryBuilder, Intern, InternError, KeyError,
	KeyPart, ParamKey,
};

#[derive(Debug, PartialEq)]
struct Point {
	x: i64,
	y: i64,
}

fn point_factory() -> Factory<Point> {
	FactoryBuilder::new().build(|args| Point {
		x: args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
		y: args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
	})
}

fn point_args(x: i64, y: i64) -> Args {
	Args::new().arg(x).arg(y)
}

#[test]
fn test_point_scenario() {
	let points = point_factory();

	let a = points.obtain(point_args(1, 2)).unwrap();
	let b = points.obtain(point_args(1, 2)).unwrap();
	assert!(Arc::ptr_eq(&a, &b));

	let c = points.obtain(point_args(1, 3)).unwrap();
	assert!(!Arc::ptr_eq(&a, &c));

	assert!(points.reset());
	let d = points.obtain(point_args(1, 2)).unwrap();
	assert!(!Arc::ptr_eq(&a, &d));
	assert_eq!(*a, *d);

	// Interning re-stabilizes after the reset.
	let e = points.obtain(point_args(1, 2)).unwrap();
	assert!(Arc::ptr_eq(&d, &e));
}

#[test]
fn test_construction_runs_once_per_key() {
	let built = Arc::new(AtomicUsize::new(0));
	let counter = built.clone();
	let points: Factory<Point> = FactoryBuilder::new().build(move |args| {
		counter.fetch_add(1, Ordering::SeqCst);
		Point {
			x: args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
			y: args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
		}
	});

	let held: Vec<_> = (0..10).map(|_| points.obtain(point_args(4, 5)).unwrap()).collect();
	assert_eq!(built.load(Ordering::SeqCst), 1);

	let _other = points.obtain(point_args(5, 4)).unwrap();
	assert_eq!(built.load(Ordering::SeqCst), 2);
	drop(held);
}

#[test]
fn test_interning_does_not_affect_value_equality() {
	let points = point_factory();

	let a = points.obtain(point_args(1, 2)).unwrap();
	let b = points.obtain(Args::new().arg(1_i64).arg(2_i64).named("tag", "x")).unwrap();

	// Distinct keys, distinct identities, but the values themselves still
	// compare by the type's own equality.
	assert!(!Arc::ptr_eq(&a, &b));
	assert_eq!(*a, *b);
}

#[test]
fn test_omitted_named_argument_diverges_from_explicit() {
	let points = point_factory();

	let omitted = points.obtain(point_args(1, 2)).unwrap();
	let explicit = points.obtain(point_args(1, 2).named("scale", 1_i64)).unwrap();
	assert!(!Arc::ptr_eq(&omitted, &explicit));
}

#[test]
fn test_custom_key_normalizes_omitted_named_argument() {
	let points: Factory<Point> = FactoryBuilder::new()
		.key_fn(|args| {
			let x = args.get(0).and_then(|v| v.as_i64()).unwrap_or(0);
			let y = args.get(1).and_then(|v| v.as_i64()).unwrap_or(0);
			// Fill in the conventional default for an omitted "scale".
			let scale = args.get_named("scale").and_then(|v| v.as_i64()).unwrap_or(1);
			Ok(ParamKey::from_parts([KeyPart::Int(x), KeyPart::Int(y), KeyPart::Int(scale)]))
		})
		.build(|args| Point {
			x: args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
			y: args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
		});

	let omitted = points.obtain(point_args(1, 2)).unwrap();
	let explicit = points.obtain(point_args(1, 2).named("scale", 1_i64)).unwrap();
	assert!(Arc::ptr_eq(&omitted, &explicit));

	let scaled = points.obtain(point_args(1, 2).named("scale", 2_i64)).unwrap();
	assert!(!Arc::ptr_eq(&omitted, &scaled));
}

#[test]
fn test_nan_without_custom_key_fails() {
	let readings: Factory<f64> =
		FactoryBuilder::new().build(|args| args.get(0).and_then(|v| v.as_f64()).unwrap_or(0.0));

	let err = readings.obtain(Args::new().arg(f64::NAN)).unwrap_err();
	match err {
		InternError::Key(KeyError::UncomparablePositional(0)) => {}
		other => panic!("expected a key error for position 0, got {other:?}"),
	}
	assert_eq!(readings.len(), 0);

	// Finite floats derive keys without help.
	let a = readings.obtain(Args::new().arg(1.5_f64)).unwrap();
	let b = readings.obtain(Args::new().arg(1.5_f64)).unwrap();
	assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_nan_with_total_float_key_interns() {
	let readings: Factory<f64> = FactoryBuilder::new()
		.key_fn(|args| {
			let value = args.get(0).and_then(|v| v.as_f64()).unwrap_or(0.0);
			Ok(ParamKey::from_parts([KeyPart::total_float(value)]))
		})
		.build(|args| args.get(0).and_then(|v| v.as_f64()).unwrap_or(0.0));

	let a = readings.obtain(Args::new().arg(f64::NAN)).unwrap();
	let b = readings.obtain(Args::new().arg(f64::NAN)).unwrap();
	assert!(Arc::ptr_eq(&a, &b));
	assert!(a.is_nan());

	let c = readings.obtain(Args::new().arg(1.0_f64)).unwrap();
	assert!(!Arc::ptr_eq(&a, &c));
}

#[test]
fn test_construction_error_propagates_without_poisoning() {
	let fail = Arc::new(AtomicBool::new(true));
	let gate = fail.clone();
	let points: Factory<Point> = FactoryBuilder::new().try_build(move |args| {
		if gate.load(Ordering::SeqCst) {
			return Err(ConstructError::msg("backing store unavailable"));
		}
		Ok(Point {
			x: args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
			y: args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
		})
	});

	let err = points.obtain(point_args(1, 2)).unwrap_err();
	assert!(matches!(err, InternError::Construct(_)));
	assert_eq!(err.to_string(), "backing store unavailable");
	assert_eq!(points.len(), 0);

	// The failed key is a clean miss afterwards.
	fail.store(false, Ordering::SeqCst);
	let recovered = points.obtain(point_args(1, 2)).unwrap();
	assert_eq!(*recovered, Point { x: 1, y: 2 });
	assert_eq!(points.len(), 1);
}

#[test]
fn test_dropping_all_owners_lapses_the_entry() {
	let built = Arc::new(AtomicUsize::new(0));
	let counter = built.clone();
	let points: Factory<Point> = FactoryBuilder::new().build(move |args| {
		counter.fetch_add(1, Ordering::SeqCst);
		Point {
			x: args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
			y: args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
		}
	});

	let held = points.obtain(point_args(1, 2)).unwrap();
	assert_eq!(points.len(), 1);

	drop(held);
	assert_eq!(points.len(), 0);
	assert!(points.get(&point_args(1, 2)).unwrap().is_none());

	let rebuilt = points.obtain(point_args(1, 2)).unwrap();
	assert_eq!(built.load(Ordering::SeqCst), 2);
	drop(rebuilt);
}

#[test]
fn test_reset_disabled_preserves_identity() {
	let points: Factory<Point> = FactoryBuilder::new().resettable(false).build(|args| Point {
		x: args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
		y: args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
	});

	let a = points.obtain(point_args(1, 2)).unwrap();
	assert!(!points.reset());
	let b = points.obtain(point_args(1, 2)).unwrap();
	assert!(Arc::ptr_eq(&a, &b));

	let policy = Intern::new();
	assert_eq!(
		policy.register("points", &points),
		Err(ConfigError::NotResettable("points".to_string()))
	);
}

#[test]
fn test_policy_bulk_reset() {
	let policy = Intern::new();
	let points = point_factory();
	let labels: Factory<String> = policy
		.factory::<String>()
		.build(|args| args.get(0).and_then(|v| v.as_str()).unwrap_or("").to_string());

	policy.register("points", &points).unwrap();
	policy.register("labels", &labels).unwrap();
	assert_eq!(
		policy.register("points", &points),
		Err(ConfigError::DuplicateName("points".to_string()))
	);

	let held_point = points.obtain(point_args(1, 2)).unwrap();
	let held_label = labels.obtain(Args::new().arg("x")).unwrap();
	assert_eq!(policy.reset_all(), 2);

	let new_point = points.obtain(point_args(1, 2)).unwrap();
	let new_label = labels.obtain(Args::new().arg("x")).unwrap();
	assert!(!Arc::ptr_eq(&held_point, &new_point));
	assert!(!Arc::ptr_eq(&held_label, &new_label));

	// A dropped factory falls out of the registry.
	drop(labels);
	drop(held_label);
	drop(new_label);
	assert_eq!(policy.reset_all(), 1);
}

#[test]
fn test_factory_shared_across_threads() {
	use std::thread;

	let built = Arc::new(AtomicUsize::new(0));
	let counter = built.clone();
	let points: Factory<Point> = FactoryBuilder::new().build(move |args| {
		counter.fetch_add(1, Ordering::SeqCst);
		Point {
			x: args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
			y: args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
		}
	});

	let mut handles = vec![];
	for _ in 0..4 {
		let points = points.clone();
		handles.push(thread::spawn(move || points.obtain(point_args(7, 7)).unwrap()));
	}

	let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
	assert_eq!(built.load(Ordering::SeqCst), 1);
	for instance in &instances[1..] {
		assert!(Arc::ptr_eq(&instances[0], instance));
	}
}

#[test]
fn test_metrics_snapshot() {
	let points = point_factory();

	let held = points.obtain(point_args(1, 2)).unwrap();
	let _hit = points.obtain(point_args(1, 2)).unwrap();
	let _miss = points.get(&point_args(9, 9)).unwrap();
	points.reset();

	let metrics = points.metrics();
	assert_eq!(metrics.hits, 1);
	assert_eq!(metrics.misses, 2);
	assert_eq!(metrics.constructions, 1);
	assert_eq!(metrics.resets, 1);
	assert_eq!(metrics.total_lookups(), 3);
	drop(held);
}

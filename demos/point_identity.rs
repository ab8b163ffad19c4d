use std::sync::Arc;

use intern_cache::{Args, FactoryBuilder, KeyPart, ParamKey};

/// Walkthrough of interned construction: shared identity for equal
/// parameters, the omitted-versus-explicit named-argument pitfall, and
/// reset.

#[derive(Debug, PartialEq)]
struct Point {
	x: i64,
	y: i64,
}

fn main() {
	let points = FactoryBuilder::new().build(|args: &Args| Point {
		x: args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
		y: args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
	});

	let a = points.obtain(Args::new().arg(1_i64).arg(2_i64)).unwrap();
	let b = points.obtain(Args::new().arg(1_i64).arg(2_i64)).unwrap();
	let c = points.obtain(Args::new().arg(1_i64).arg(3_i64)).unwrap();

	println!("Point(1, 2) twice:");
	if Arc::ptr_eq(&a, &b) {
		println!("  same instance, construction ran once");
	} else {
		println!("  distinct instances (unexpected)");
	}
	println!("Point(1, 3) is distinct: {}", !Arc::ptr_eq(&a, &c));

	// An omitted named argument and its explicit value derive different
	// keys under the default derivation.
	let omitted = points.obtain(Args::new().arg(5_i64).arg(5_i64)).unwrap();
	let explicit =
		points.obtain(Args::new().arg(5_i64).arg(5_i64).named("scale", 1_i64)).unwrap();
	println!(
		"omitted vs explicit named argument share an instance: {}",
		Arc::ptr_eq(&omitted, &explicit)
	);

	// A custom key fills in the conventional default, restoring sharing.
	let normalized = FactoryBuilder::new()
		.key_fn(|args: &Args| {
			let x = args.get(0).and_then(|v| v.as_i64()).unwrap_or(0);
			let y = args.get(1).and_then(|v| v.as_i64()).unwrap_or(0);
			let scale = args.get_named("scale").and_then(|v| v.as_i64()).unwrap_or(1);
			Ok(ParamKey::from_parts([KeyPart::Int(x), KeyPart::Int(y), KeyPart::Int(scale)]))
		})
		.build(|args: &Args| Point {
			x: args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
			y: args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
		});

	let n1 = normalized.obtain(Args::new().arg(5_i64).arg(5_i64)).unwrap();
	let n2 = normalized.obtain(Args::new().arg(5_i64).arg(5_i64).named("scale", 1_i64)).unwrap();
	println!("with a normalizing key they share an instance: {}", Arc::ptr_eq(&n1, &n2));

	// Reset invalidates the table without touching handed-out instances.
	points.reset();
	let d = points.obtain(Args::new().arg(1_i64).arg(2_i64)).unwrap();
	println!("after reset, Point(1, 2) is a new instance: {}", !Arc::ptr_eq(&a, &d));
	println!("old and new are still value-equal: {}", *a == *d);

	let metrics = points.metrics();
	println!("\nFactory stats:");
	println!("  lookups: {}", metrics.total_lookups());
	println!("  hit rate: {:.2}%", metrics.hit_rate() * 100.0);
	println!("  constructions: {}", metrics.constructions);
	println!("  resets: {}", metrics.resets);
}

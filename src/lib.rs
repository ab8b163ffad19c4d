//! # Intern Cache
//!
//! A weak-reference **interning cache**: a get-or-create factory that hands
//! out one shared instance per canonical key instead of allocating a fresh
//! instance per construction call.
//!
//! - **Identity sharing**: equal keys resolve to the same `Arc` instance
//!   for as long as any caller still holds it
//! - **Weak entry lifetime**: the cache never keeps an instance alive by
//!   itself; once the last external owner drops it, the entry lapses and
//!   the next lookup is a miss
//! - **One-time construction**: the construction closure runs exactly once
//!   per distinct live key, never on a hit
//! - **Explicit reset**: invalidate a table wholesale without touching
//!   instances already handed out
//! - **Thread-safe**: share an [`Interner`] or [`Factory`] across threads
//!   via `Arc`; concurrent requests for equal keys construct once
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use intern_cache::{Args, FactoryBuilder};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! let points = FactoryBuilder::new().build(|args| Point {
//!     x: args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
//!     y: args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
//! });
//!
//! let a = points.obtain(Args::new().arg(1_i64).arg(2_i64)).unwrap();
//! let b = points.obtain(Args::new().arg(1_i64).arg(2_i64)).unwrap();
//! assert!(Arc::ptr_eq(&a, &b)); // same instance, not just equal
//!
//! let c = points.obtain(Args::new().arg(1_i64).arg(3_i64)).unwrap();
//! assert!(!Arc::ptr_eq(&a, &c));
//!
//! points.reset();
//! let d = points.obtain(Args::new().arg(1_i64).arg(2_i64)).unwrap();
//! assert!(!Arc::ptr_eq(&a, &d)); // value-equal, new identity
//! assert_eq!(*a, *d);
//! ```
//!
//! ## Typed keys
//!
//! When the key shape is known at compile time, skip the dynamic argument
//! model and use [`Interner`] with your own key type:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use intern_cache::{InternKey, Interner};
//!
//! #[derive(Hash, Eq, PartialEq, Clone, Debug)]
//! struct SymbolName(String);
//!
//! impl InternKey for SymbolName {
//!     type Value = String;
//! }
//!
//! let symbols: Interner<SymbolName> = Interner::new();
//!
//! let a = symbols.obtain(SymbolName("main".into()), || "main".to_string());
//! let b = symbols.obtain(SymbolName("main".into()), || "main".to_string());
//! assert!(Arc::ptr_eq(&a, &b));
//! ```
//!
//! ## Key derivation
//!
//! The default key packs positional arguments in order and named arguments
//! sorted by name. Note one consequence: omitting a named argument and
//! passing the same value explicitly derive *different* keys, so those two
//! calls do not share an instance. A custom key function
//! ([`FactoryBuilder::key_fn`]) normalizes such distinctions away, and is
//! also the way to intern values the default derivation rejects (NaN floats
//! have no canonical equality; see [`KeyPart::total_float`]).

mod builder;
mod error;
mod factory;
mod interner;
mod key;
mod metrics;
mod params;
mod policy;
mod table;
mod traits;

pub use builder::FactoryBuilder;
pub use error::{ConfigError, ConstructError, InternError, KeyError};
pub use factory::{Factory, KeyFn};
pub use interner::Interner;
pub use key::{KeyPart, ParamKey};
pub use metrics::InternMetrics;
pub use params::{Args, ParamValue};
pub use policy::Intern;
pub use traits::InternKey;

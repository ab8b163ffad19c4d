use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use crate::error::{ConstructError, InternError, KeyError};
use crate::interner::{Interner, TableReset};
use crate::key::ParamKey;
use crate::metrics::InternMetrics;
use crate::params::Args;
use crate::traits::InternKey;

/// Key-deriving function: maps construction arguments to a canonical key.
///
/// Supplied per factory via [`FactoryBuilder::key_fn`](crate::FactoryBuilder::key_fn)
/// or per policy via [`Intern::with_default_key`](crate::Intern::with_default_key).
pub type KeyFn = Arc<dyn Fn(&Args) -> Result<ParamKey, KeyError> + Send + Sync>;

/// Construction closure stored by a factory.
pub(crate) type InitFn<T> = Arc<dyn Fn(&Args) -> Result<T, ConstructError> + Send + Sync>;

/// Table key for a factory: a canonical [`ParamKey`] tagged with the value
/// type, so each factory's key space maps to exactly one value type.
pub(crate) struct FactoryKey<T> {
	key: ParamKey,
	_marker: PhantomData<fn() -> T>,
}

impl<T> FactoryKey<T> {
	fn new(key: ParamKey) -> Self {
		Self {
			key,
			_marker: PhantomData,
		}
	}
}

impl<T> Clone for FactoryKey<T> {
	fn clone(&self) -> Self {
		Self::new(self.key.clone())
	}
}

impl<T> PartialEq for FactoryKey<T> {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl<T> Eq for FactoryKey<T> {}

impl<T> Hash for FactoryKey<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}

impl<T: Send + Sync + 'static> InternKey for FactoryKey<T> {
	type Value = T;
}

/// Get-or-create factory for one value type, keyed by construction
/// arguments.
///
/// The factory is the explicit stand-in for calling the type's constructor:
/// [`obtain`](Factory::obtain) derives a canonical key from the arguments,
/// returns the already-cached instance when one with an equal key is still
/// alive, and otherwise runs the construction closure once and caches the
/// result weakly.
///
/// Clones share the same table: interning behaves identically through every
/// clone.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use intern_cache::{Args, FactoryBuilder};
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// let points = FactoryBuilder::new().build(|args| Point {
///     x: args.get(0).and_then(|v| v.as_i64()).unwrap_or(0),
///     y: args.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
/// });
///
/// let a = points.obtain(Args::new().arg(1_i64).arg(2_i64)).unwrap();
/// let b = points.obtain(Args::new().arg(1_i64).arg(2_i64)).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct Factory<T: Send + Sync + 'static> {
	key_fn: Option<KeyFn>,
	init: InitFn<T>,
	interner: Arc<Interner<FactoryKey<T>>>,
	resettable: bool,
}

impl<T: Send + Sync + 'static> Factory<T> {
	pub(crate) fn new(key_fn: Option<KeyFn>, init: InitFn<T>, resettable: bool) -> Self {
		Self {
			key_fn,
			init,
			interner: Arc::new(Interner::new()),
			resettable,
		}
	}

	/// Return the instance interned under `args`, constructing it on a
	/// miss.
	///
	/// On a hit the construction closure is not run and the new call's
	/// arguments are discarded; they only contribute the key. On a miss the
	/// closure runs exactly once, and its failure propagates unchanged with
	/// no entry left under the key.
	///
	/// Under the default key an omitted named argument and the same value
	/// passed explicitly derive *different* keys, so the two calls will not
	/// share an instance even when the constructed values are equal. This
	/// silently defeats deduplication for callers who mix the two calling
	/// conventions; supply a [`key_fn`](crate::FactoryBuilder::key_fn) that
	/// fills in omitted values to normalize it away.
	pub fn obtain(&self, args: Args) -> Result<Arc<T>, InternError> {
		let key = self.derive(&args)?;
		self.interner
			.try_obtain(FactoryKey::new(key), || (self.init)(&args))
			.map_err(InternError::from)
	}

	/// Look up `args` without constructing anything.
	pub fn get(&self, args: &Args) -> Result<Option<Arc<T>>, KeyError> {
		let key = self.derive(args)?;
		Ok(self.interner.get(&FactoryKey::new(key)))
	}

	fn derive(&self, args: &Args) -> Result<ParamKey, KeyError> {
		match &self.key_fn {
			Some(key_fn) => key_fn(args),
			None => ParamKey::derive(args),
		}
	}

	/// Invalidate every cached entry.
	///
	/// Instances already handed out stay valid; the next `obtain` per key
	/// constructs a new, distinct instance. Returns `false` without
	/// touching the table when the factory was built with
	/// [`resettable(false)`](crate::FactoryBuilder::resettable).
	pub fn reset(&self) -> bool {
		if !self.resettable {
			return false;
		}
		self.interner.reset();
		true
	}

	/// Whether this factory supports reset.
	pub fn is_resettable(&self) -> bool {
		self.resettable
	}

	/// Number of entries whose instance is still alive.
	pub fn len(&self) -> usize {
		self.interner.len()
	}

	/// Whether no live entries exist.
	pub fn is_empty(&self) -> bool {
		self.interner.is_empty()
	}

	/// Snapshot of the factory's interning counters.
	pub fn metrics(&self) -> InternMetrics {
		self.interner.metrics()
	}

	/// Non-owning handle used by the bulk-reset registry.
	pub(crate) fn reset_handle(&self) -> Weak<dyn TableReset> {
		let strong: Arc<dyn TableReset> = self.interner.clone();
		Arc::downgrade(&strong)
	}
}

impl<T: Send + Sync + 'static> Clone for Factory<T> {
	fn clone(&self) -> Self {
		Self {
			key_fn: self.key_fn.clone(),
			init: self.init.clone(),
			interner: self.interner.clone(),
			resettable: self.resettable,
		}
	}
}

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{ConstructError, KeyError};
use crate::factory::{Factory, KeyFn};
use crate::key::ParamKey;
use crate::params::Args;

/// Builder for configuring a [`Factory`].
///
/// # Example
///
/// ```
/// use intern_cache::{Args, FactoryBuilder, KeyPart, ParamKey};
///
/// #[derive(Debug)]
/// struct Unit {
///     name: String,
/// }
///
/// let units = FactoryBuilder::new()
///     .key_fn(|args| {
///         // Case-insensitive identity.
///         let name = args.get(0).and_then(|v| v.as_str()).unwrap_or("");
///         Ok(ParamKey::from_parts([KeyPart::from(name.to_lowercase())]))
///     })
///     .resettable(false)
///     .build(|args| Unit {
///         name: args.get(0).and_then(|v| v.as_str()).unwrap_or("").to_string(),
///     });
///
/// let a = units.obtain(Args::new().arg("Meter")).unwrap();
/// let b = units.obtain(Args::new().arg("meter")).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// ```
pub struct FactoryBuilder<T: Send + Sync + 'static> {
	key_fn: Option<KeyFn>,
	resettable: bool,
	_marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> FactoryBuilder<T> {
	/// Create a builder with the default configuration: default key
	/// derivation, reset enabled.
	pub fn new() -> Self {
		Self {
			key_fn: None,
			resettable: true,
			_marker: PhantomData,
		}
	}

	/// Override the default key derivation.
	///
	/// The function receives the same arguments as the construction closure
	/// and may normalize away distinctions the default key preserves, or
	/// encode values the default derivation rejects.
	pub fn key_fn<F>(mut self, key_fn: F) -> Self
	where
		F: Fn(&Args) -> Result<ParamKey, KeyError> + Send + Sync + 'static,
	{
		self.key_fn = Some(Arc::new(key_fn));
		self
	}

	/// Seed an already-shared key function, keeping an explicit
	/// [`key_fn`](FactoryBuilder::key_fn) call free to override it.
	pub(crate) fn key_fn_shared(mut self, key_fn: KeyFn) -> Self {
		self.key_fn = Some(key_fn);
		self
	}

	/// Enable or disable reset support.
	///
	/// Default: enabled. A factory built with reset disabled ignores
	/// [`Factory::reset`] and is rejected by the bulk-reset registry at
	/// registration time.
	pub fn resettable(mut self, enabled: bool) -> Self {
		self.resettable = enabled;
		self
	}

	/// Build the factory with an infallible construction closure.
	pub fn build<F>(self, init: F) -> Factory<T>
	where
		F: Fn(&Args) -> T + Send + Sync + 'static,
	{
		self.try_build(move |args| Ok(init(args)))
	}

	/// Build the factory with a fallible construction closure.
	///
	/// Construction errors propagate unchanged out of
	/// [`Factory::obtain`] and leave nothing cached.
	pub fn try_build<F>(self, init: F) -> Factory<T>
	where
		F: Fn(&Args) -> Result<T, ConstructError> + Send + Sync + 'static,
	{
		Factory::new(self.key_fn, Arc::new(init), self.resettable)
	}
}

impl<T: Send + Sync + 'static> Default for FactoryBuilder<T> {
	fn default() -> Self {
		Self::new()
	}
}

use std::sync::Weak;

use parking_lot::Mutex;
use tracing::debug;

use crate::builder::FactoryBuilder;
use crate::error::{ConfigError, KeyError};
use crate::factory::{Factory, KeyFn};
use crate::interner::TableReset;
use crate::key::ParamKey;
use crate::params::Args;

/// Reusable interning policy.
///
/// A policy carries configuration shared by a family of factories: an
/// optional default key function applied to factories built through
/// [`factory`](Intern::factory), and a registry of named factories that
/// [`reset_all`](Intern::reset_all) invalidates in one call.
///
/// The registry holds only non-owning handles, so a policy never keeps a
/// dropped factory's table alive.
///
/// # Example
///
/// ```
/// use intern_cache::{Args, Intern};
///
/// let policy = Intern::new();
///
/// let ints = policy.factory::<i64>().build(|args| {
///     args.get(0).and_then(|v| v.as_i64()).unwrap_or(0)
/// });
/// policy.register("ints", &ints).unwrap();
///
/// let _held = ints.obtain(Args::new().arg(5_i64)).unwrap();
/// assert_eq!(policy.reset_all(), 1);
/// ```
pub struct Intern {
	default_key: Option<KeyFn>,
	registry: Mutex<Vec<(String, Weak<dyn TableReset>)>>,
}

impl Intern {
	/// Create a policy with no default key function.
	pub fn new() -> Self {
		Self {
			default_key: None,
			registry: Mutex::new(Vec::new()),
		}
	}

	/// Create a policy whose factories derive keys with `key_fn` unless
	/// they set their own.
	pub fn with_default_key<F>(key_fn: F) -> Self
	where
		F: Fn(&Args) -> Result<ParamKey, KeyError> + Send + Sync + 'static,
	{
		Self {
			default_key: Some(std::sync::Arc::new(key_fn)),
			registry: Mutex::new(Vec::new()),
		}
	}

	/// Start a factory builder seeded with this policy's default key.
	///
	/// An explicit [`key_fn`](FactoryBuilder::key_fn) call on the returned
	/// builder overrides the policy default.
	pub fn factory<T: Send + Sync + 'static>(&self) -> FactoryBuilder<T> {
		match &self.default_key {
			Some(key_fn) => FactoryBuilder::new().key_fn_shared(key_fn.clone()),
			None => FactoryBuilder::new(),
		}
	}

	/// Track a factory for bulk reset under a unique name.
	///
	/// Fails at setup time on an empty name, a name already in use, or a
	/// factory built without reset support.
	pub fn register<T: Send + Sync + 'static>(
		&self,
		name: impl Into<String>,
		factory: &Factory<T>,
	) -> Result<(), ConfigError> {
		let name = name.into();
		if name.is_empty() {
			return Err(ConfigError::EmptyName);
		}
		if !factory.is_resettable() {
			return Err(ConfigError::NotResettable(name));
		}

		let mut registry = self.registry.lock();
		if registry.iter().any(|(existing, _)| *existing == name) {
			return Err(ConfigError::DuplicateName(name));
		}
		registry.push((name, factory.reset_handle()));
		Ok(())
	}

	/// Reset every registered factory whose table is still alive.
	///
	/// Entries for dropped factories are removed along the way. Returns how
	/// many tables were reset.
	pub fn reset_all(&self) -> usize {
		let mut registry = self.registry.lock();
		registry.retain(|(_, handle)| handle.strong_count() > 0);

		let mut count = 0;
		for (_, handle) in registry.iter() {
			if let Some(table) = handle.upgrade() {
				table.reset_table();
				count += 1;
			}
		}
		debug!(count, "bulk interning reset");
		count
	}

	/// Number of registered factories whose table is still alive.
	pub fn tracked(&self) -> usize {
		let registry = self.registry.lock();
		registry.iter().filter(|(_, handle)| handle.strong_count() > 0).count()
	}
}

impl Default for Intern {
	fn default() -> Self {
		Self::new()
	}
}

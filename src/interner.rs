use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::metrics::InternMetrics;
use crate::table::{InternTable, Lookup};
use crate::traits::InternKey;

/// Thread-safe interning cache for one key/value pairing.
///
/// `obtain` is the get-or-create operation: equal keys resolve to one shared
/// `Arc` instance for as long as any caller still holds it. The table keeps
/// only weak references, so the interner never keeps an instance alive on
/// its own; once the last external `Arc` drops, the entry lapses and the
/// next `obtain` constructs a fresh instance.
///
/// Can be shared across threads via `Arc<Interner>`. One mutex per interner
/// covers lookup, construction on a miss, and insertion as a single critical
/// section, so two threads presenting equal keys cannot both construct.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use intern_cache::{InternKey, Interner};
///
/// #[derive(Hash, Eq, PartialEq, Clone, Debug)]
/// struct Chunk(u64);
///
/// impl InternKey for Chunk {
///     type Value = Vec<u8>;
/// }
///
/// let interner: Interner<Chunk> = Interner::new();
///
/// let a = interner.obtain(Chunk(7), || vec![0u8; 64]);
/// let b = interner.obtain(Chunk(7), || vec![0u8; 64]);
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct Interner<K: InternKey> {
	table: Mutex<InternTable<K>>,
	hits: AtomicU64,
	misses: AtomicU64,
	lapsed: AtomicU64,
	constructions: AtomicU64,
	resets: AtomicU64,
}

impl<K: InternKey> Interner<K> {
	/// Create an empty interner.
	pub fn new() -> Self {
		Self {
			table: Mutex::new(InternTable::new()),
			hits: AtomicU64::new(0),
			misses: AtomicU64::new(0),
			lapsed: AtomicU64::new(0),
			constructions: AtomicU64::new(0),
			resets: AtomicU64::new(0),
		}
	}

	/// Return the instance cached under `key`, constructing it on a miss.
	///
	/// On a hit `init` is not run: construction side effects happen exactly
	/// once per distinct key while its instance stays alive, no matter how
	/// many call sites resolve to it.
	pub fn obtain<F>(&self, key: K, init: F) -> Arc<K::Value>
	where
		F: FnOnce() -> K::Value,
	{
		match self.try_obtain::<_, std::convert::Infallible>(key, || Ok(init())) {
			Ok(value) => value,
			Err(never) => match never {},
		}
	}

	/// Fallible form of [`obtain`](Interner::obtain).
	///
	/// A construction error propagates unchanged and leaves no entry under
	/// the key, so a later call with an equal key constructs again.
	pub fn try_obtain<F, E>(&self, key: K, init: F) -> Result<Arc<K::Value>, E>
	where
		F: FnOnce() -> Result<K::Value, E>,
	{
		let mut table = self.table.lock();

		match table.lookup(&key) {
			Lookup::Hit(existing) => {
				self.hits.fetch_add(1, Ordering::Relaxed);
				trace!("intern hit");
				return Ok(existing);
			}
			Lookup::Lapsed => {
				self.lapsed.fetch_add(1, Ordering::Relaxed);
			}
			Lookup::Absent => {}
		}
		self.misses.fetch_add(1, Ordering::Relaxed);

		// Construction stays inside the critical section: a second caller
		// with an equal key blocks here instead of also observing a miss.
		let value = Arc::new(init()?);
		table.insert(key, &value);
		self.constructions.fetch_add(1, Ordering::Relaxed);
		trace!("interned new instance");
		Ok(value)
	}

	/// Look up `key` without constructing anything.
	pub fn get(&self, key: &K) -> Option<Arc<K::Value>> {
		let mut table = self.table.lock();
		match table.lookup(key) {
			Lookup::Hit(value) => {
				self.hits.fetch_add(1, Ordering::Relaxed);
				Some(value)
			}
			Lookup::Lapsed => {
				self.lapsed.fetch_add(1, Ordering::Relaxed);
				self.misses.fetch_add(1, Ordering::Relaxed);
				None
			}
			Lookup::Absent => {
				self.misses.fetch_add(1, Ordering::Relaxed);
				None
			}
		}
	}

	/// Whether a live instance is cached under `key`. Does not touch the
	/// hit/miss counters.
	pub fn contains(&self, key: &K) -> bool {
		matches!(self.table.lock().lookup(key), Lookup::Hit(_))
	}

	/// Replace the table with an empty one.
	///
	/// Instances already handed out stay valid and fully functional; they
	/// are just no longer reachable through the interner. Every key is a
	/// guaranteed miss on the next `obtain`, which constructs and caches a
	/// new, distinct instance.
	pub fn reset(&self) {
		let mut table = self.table.lock();
		*table = InternTable::new();
		self.resets.fetch_add(1, Ordering::Relaxed);
		debug!("interning table reset");
	}

	/// Drop every lapsed entry. Returns how many were removed.
	///
	/// Lapsed entries are also pruned lazily whenever a lookup lands on
	/// them, so calling this is optional.
	pub fn prune(&self) -> usize {
		self.table.lock().purge()
	}

	/// Number of entries whose instance is still alive.
	pub fn len(&self) -> usize {
		self.table.lock().live_len()
	}

	/// Whether no live entries exist.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Snapshot of the interner's counters.
	pub fn metrics(&self) -> InternMetrics {
		InternMetrics {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			lapsed: self.lapsed.load(Ordering::Relaxed),
			constructions: self.constructions.load(Ordering::Relaxed),
			resets: self.resets.load(Ordering::Relaxed),
			live_entries: self.len(),
		}
	}
}

impl<K: InternKey> Default for Interner<K> {
	fn default() -> Self {
		Self::new()
	}
}

/// Type-erased reset hook, used by the bulk-reset registry.
pub(crate) trait TableReset: Send + Sync {
	fn reset_table(&self);
}

impl<K: InternKey> TableReset for Interner<K> {
	fn reset_table(&self) {
		self.reset();
	}
}

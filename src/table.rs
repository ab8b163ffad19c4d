use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::traits::InternKey;

/// Outcome of a table lookup.
pub(crate) enum Lookup<V> {
	/// A live instance is cached under the key.
	Hit(Arc<V>),
	/// An entry existed but its instance has been dropped; the entry has
	/// been pruned.
	Lapsed,
	/// No entry under the key.
	Absent,
}

/// Key to weakly-held-instance mapping for one interner.
///
/// The table owns no strong references: an entry keeps its instance
/// reachable only while some caller still holds an `Arc` to it. The table is
/// not thread-safe on its own; the `Interner` wraps it in a Mutex.
pub(crate) struct InternTable<K: InternKey> {
	entries: HashMap<K, Weak<K::Value>, ahash::RandomState>,
}

impl<K: InternKey> InternTable<K> {
	pub fn new() -> Self {
		Self {
			entries: HashMap::default(),
		}
	}

	/// Resolve a key, pruning the entry when its instance has lapsed.
	pub fn lookup(&mut self, key: &K) -> Lookup<K::Value> {
		match self.entries.get(key) {
			Some(weak) => match weak.upgrade() {
				Some(value) => Lookup::Hit(value),
				None => {
					self.entries.remove(key);
					Lookup::Lapsed
				}
			},
			None => Lookup::Absent,
		}
	}

	/// Record a freshly constructed instance under its key.
	pub fn insert(&mut self, key: K, value: &Arc<K::Value>) {
		self.entries.insert(key, Arc::downgrade(value));
	}

	/// Drop every lapsed entry. Returns how many were removed.
	pub fn purge(&mut self) -> usize {
		let before = self.entries.len();
		self.entries.retain(|_, weak| weak.strong_count() > 0);
		before - self.entries.len()
	}

	/// Number of entries whose instance is still alive.
	pub fn live_len(&self) -> usize {
		self.entries.values().filter(|weak| weak.strong_count() > 0).count()
	}

	/// Raw entry count, lapsed entries included.
	#[cfg(test)]
	pub fn raw_len(&self) -> usize {
		self.entries.len()
	}
}

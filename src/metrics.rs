//! Interning statistics.

/// Point-in-time statistics for one interner.
///
/// # Example
///
/// ```
/// use intern_cache::{InternKey, Interner};
///
/// #[derive(Hash, Eq, PartialEq, Clone)]
/// struct Id(u64);
///
/// impl InternKey for Id {
///     type Value = String;
/// }
///
/// let interner: Interner<Id> = Interner::new();
/// let _a = interner.obtain(Id(1), || "one".to_string());
/// let _b = interner.obtain(Id(1), || "one".to_string());
///
/// let metrics = interner.metrics();
/// assert_eq!(metrics.hits, 1);
/// assert_eq!(metrics.misses, 1);
/// assert_eq!(metrics.constructions, 1);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct InternMetrics {
	/// Lookups that returned an already-cached live instance.
	pub hits: u64,
	/// Lookups that did not find a live instance (absent or lapsed).
	pub misses: u64,
	/// Subset of misses that landed on a lapsed entry.
	pub lapsed: u64,
	/// Instances constructed and cached.
	pub constructions: u64,
	/// Times the table was reset.
	pub resets: u64,
	/// Entries whose instance was still alive when the snapshot was taken.
	pub live_entries: usize,
}

impl InternMetrics {
	/// Hit rate as a ratio between 0.0 and 1.0.
	///
	/// Returns 0.0 when there have been no lookups.
	pub fn hit_rate(&self) -> f64 {
		let total = self.hits + self.misses;
		if total == 0 {
			0.0
		} else {
			self.hits as f64 / total as f64
		}
	}

	/// Total number of lookups (hits + misses).
	pub fn total_lookups(&self) -> u64 {
		self.hits + self.misses
	}
}

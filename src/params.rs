use std::collections::BTreeMap;

/// A single construction argument in canonical dynamic form.
///
/// Construction closures and custom key functions read these back out of
/// [`Args`]; the default key derivation encodes them into
/// [`KeyPart`](crate::KeyPart)s.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
	Unit,
	Bool(bool),
	Int(i64),
	Uint(u64),
	Float(f64),
	Str(String),
	Bytes(Vec<u8>),
	Seq(Vec<ParamValue>),
}

impl ParamValue {
	/// The contained integer, if this is an `Int`.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			ParamValue::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// The contained unsigned integer, if this is a `Uint`.
	pub fn as_u64(&self) -> Option<u64> {
		match self {
			ParamValue::Uint(v) => Some(*v),
			_ => None,
		}
	}

	/// The contained float, if this is a `Float`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			ParamValue::Float(v) => Some(*v),
			_ => None,
		}
	}

	/// The contained string, if this is a `Str`.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			ParamValue::Str(v) => Some(v),
			_ => None,
		}
	}

	/// The contained bool, if this is a `Bool`.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			ParamValue::Bool(v) => Some(*v),
			_ => None,
		}
	}
}

impl From<()> for ParamValue {
	fn from(_: ()) -> Self {
		ParamValue::Unit
	}
}

impl From<bool> for ParamValue {
	fn from(value: bool) -> Self {
		ParamValue::Bool(value)
	}
}

impl From<i32> for ParamValue {
	fn from(value: i32) -> Self {
		ParamValue::Int(value as i64)
	}
}

impl From<i64> for ParamValue {
	fn from(value: i64) -> Self {
		ParamValue::Int(value)
	}
}

impl From<u32> for ParamValue {
	fn from(value: u32) -> Self {
		ParamValue::Uint(value as u64)
	}
}

impl From<u64> for ParamValue {
	fn from(value: u64) -> Self {
		ParamValue::Uint(value)
	}
}

impl From<f32> for ParamValue {
	fn from(value: f32) -> Self {
		ParamValue::Float(value as f64)
	}
}

impl From<f64> for ParamValue {
	fn from(value: f64) -> Self {
		ParamValue::Float(value)
	}
}

impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		ParamValue::Str(value.to_string())
	}
}

impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		ParamValue::Str(value)
	}
}

impl From<Vec<u8>> for ParamValue {
	fn from(value: Vec<u8>) -> Self {
		ParamValue::Bytes(value)
	}
}

impl From<Vec<ParamValue>> for ParamValue {
	fn from(value: Vec<ParamValue>) -> Self {
		ParamValue::Seq(value)
	}
}

/// Ordered positional arguments plus named arguments, as supplied to one
/// construction call.
///
/// Named arguments are kept sorted by name, so two `Args` that differ only
/// in the order named arguments were added compare equal and derive equal
/// keys.
///
/// # Example
///
/// ```
/// use intern_cache::Args;
///
/// let args = Args::new().arg(1_i64).arg("label").named("scale", 2_i64);
/// assert_eq!(args.get(0).and_then(|v| v.as_i64()), Some(1));
/// assert_eq!(args.get_named("scale").and_then(|v| v.as_i64()), Some(2));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
	positional: Vec<ParamValue>,
	named: BTreeMap<String, ParamValue>,
}

impl Args {
	/// An empty argument list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a positional argument.
	pub fn arg(mut self, value: impl Into<ParamValue>) -> Self {
		self.positional.push(value.into());
		self
	}

	/// Set a named argument. Setting the same name twice keeps the last
	/// value.
	pub fn named(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
		self.named.insert(name.into(), value.into());
		self
	}

	/// All positional arguments in order.
	pub fn positional(&self) -> &[ParamValue] {
		&self.positional
	}

	/// Positional argument by zero-based index.
	pub fn get(&self, index: usize) -> Option<&ParamValue> {
		self.positional.get(index)
	}

	/// Named argument by name.
	pub fn get_named(&self, name: &str) -> Option<&ParamValue> {
		self.named.get(name)
	}

	/// Named arguments sorted by name.
	pub fn named_pairs(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
		self.named.iter().map(|(name, value)| (name.as_str(), value))
	}
}

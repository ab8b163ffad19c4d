use crate::error::KeyError;
use crate::params::{Args, ParamValue};

/// Canonical bit pattern used for NaN by [`KeyPart::total_float`].
const CANONICAL_NAN_BITS: u64 = 0x7ff8_0000_0000_0000;

/// One canonical component of an interning key.
///
/// Every variant is hashable and equality-comparable. Floats are carried by
/// bit pattern: the default derivation rejects NaN outright, and
/// [`total_float`](KeyPart::total_float) lets custom key functions map every
/// NaN to one canonical pattern instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyPart {
	Unit,
	Bool(bool),
	Int(i64),
	Uint(u64),
	FloatBits(u64),
	Str(String),
	Bytes(Vec<u8>),
	Seq(Vec<KeyPart>),
}

impl KeyPart {
	/// Total-order float encoding for custom key functions.
	///
	/// Every NaN maps to one canonical bit pattern and negative zero
	/// collapses into zero, so values the default derivation rejects can
	/// still be interned under a stable key.
	pub fn total_float(value: f64) -> Self {
		let bits = if value.is_nan() {
			CANONICAL_NAN_BITS
		} else if value == 0.0 {
			0
		} else {
			value.to_bits()
		};
		KeyPart::FloatBits(bits)
	}
}

impl From<bool> for KeyPart {
	fn from(value: bool) -> Self {
		KeyPart::Bool(value)
	}
}

impl From<i64> for KeyPart {
	fn from(value: i64) -> Self {
		KeyPart::Int(value)
	}
}

impl From<u64> for KeyPart {
	fn from(value: u64) -> Self {
		KeyPart::Uint(value)
	}
}

impl From<&str> for KeyPart {
	fn from(value: &str) -> Self {
		KeyPart::Str(value.to_string())
	}
}

impl From<String> for KeyPart {
	fn from(value: String) -> Self {
		KeyPart::Str(value)
	}
}

/// Canonicalize one parameter value. `None` means the value has no stable
/// equality and cannot serve as key material.
fn canonical(value: &ParamValue) -> Option<KeyPart> {
	match value {
		ParamValue::Unit => Some(KeyPart::Unit),
		ParamValue::Bool(v) => Some(KeyPart::Bool(*v)),
		ParamValue::Int(v) => Some(KeyPart::Int(*v)),
		ParamValue::Uint(v) => Some(KeyPart::Uint(*v)),
		ParamValue::Float(v) => {
			if v.is_nan() {
				None
			} else if *v == 0.0 {
				// 0.0 and -0.0 compare equal, so they must share a key.
				Some(KeyPart::FloatBits(0))
			} else {
				Some(KeyPart::FloatBits(v.to_bits()))
			}
		}
		ParamValue::Str(v) => Some(KeyPart::Str(v.clone())),
		ParamValue::Bytes(v) => Some(KeyPart::Bytes(v.clone())),
		ParamValue::Seq(items) => {
			let parts: Option<Vec<KeyPart>> = items.iter().map(canonical).collect();
			parts.map(KeyPart::Seq)
		}
	}
}

/// Canonical interning key: positional parts in order, then named parts
/// sorted by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamKey {
	positional: Vec<KeyPart>,
	named: Vec<(String, KeyPart)>,
}

impl ParamKey {
	/// Default key derivation.
	///
	/// Positional values are encoded in order and named values sorted by
	/// name. A named argument is part of the key exactly as supplied: a
	/// call that omits a named argument and a call that passes the same
	/// value explicitly derive *different* keys, and will not share an
	/// instance. Callers who mix the two conventions should supply a custom
	/// key function that fills in the omitted value.
	///
	/// Fails when a parameter has no canonical comparable form (a NaN
	/// float, including inside a `Seq`). The error names the offending
	/// position or name; nothing is cached on failure.
	pub fn derive(args: &Args) -> Result<Self, KeyError> {
		let mut positional = Vec::with_capacity(args.positional().len());
		for (index, value) in args.positional().iter().enumerate() {
			let part = canonical(value).ok_or(KeyError::UncomparablePositional(index))?;
			positional.push(part);
		}

		let mut named = Vec::new();
		for (name, value) in args.named_pairs() {
			let part = canonical(value).ok_or_else(|| KeyError::UncomparableNamed(name.to_string()))?;
			named.push((name.to_string(), part));
		}

		Ok(Self {
			positional,
			named,
		})
	}

	/// Assemble a key from explicit parts.
	///
	/// This is the entry point for custom key functions: encode whatever
	/// identity the parameters should have and return it as a flat
	/// sequence.
	pub fn from_parts(parts: impl IntoIterator<Item = KeyPart>) -> Self {
		Self {
			positional: parts.into_iter().collect(),
			named: Vec::new(),
		}
	}
}

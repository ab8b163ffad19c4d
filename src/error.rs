use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Key derivation failure: a construction parameter has no canonical
/// equality-comparable form.
///
/// Raised only by the default derivation. A custom key function decides for
/// itself how to encode such values, for example via
/// [`KeyPart::total_float`](crate::KeyPart::total_float).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
	/// A positional parameter (by zero-based index) cannot serve as key
	/// material. NaN is the usual culprit: it is never equal to itself, so
	/// no canonical key can represent it.
	#[error("positional parameter {0} has no canonical key form (NaN is never equal to itself)")]
	UncomparablePositional(usize),
	/// A named parameter cannot serve as key material.
	#[error("named parameter `{0}` has no canonical key form (NaN is never equal to itself)")]
	UncomparableNamed(String),
}

/// Failure raised by a construction closure on a cache miss.
///
/// The wrapper is transparent: `Display` and `source` delegate to the
/// underlying error, so callers observe the original failure.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ConstructError(Box<dyn StdError + Send + Sync + 'static>);

impl ConstructError {
	/// Wrap any error type.
	pub fn new(source: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
		Self(source.into())
	}

	/// Build from a plain message.
	pub fn msg(message: impl fmt::Display) -> Self {
		Self(message.to_string().into())
	}

	/// Recover the underlying error.
	pub fn into_source(self) -> Box<dyn StdError + Send + Sync + 'static> {
		self.0
	}
}

/// Any failure surfaced by [`Factory::obtain`](crate::Factory::obtain).
///
/// Neither variant mutates the table: a failed key derivation never reaches
/// the table, and a failed construction leaves no entry under its key.
#[derive(Debug, Error)]
pub enum InternError {
	/// The default key derivation rejected a parameter.
	#[error(transparent)]
	Key(#[from] KeyError),
	/// The construction closure failed on a genuine miss.
	#[error(transparent)]
	Construct(#[from] ConstructError),
}

/// Registration misuse, surfaced at setup time by
/// [`Intern::register`](crate::Intern::register).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	/// Another factory is already registered under this name.
	#[error("a factory is already registered under `{0}`")]
	DuplicateName(String),
	/// Registry names must be non-empty.
	#[error("factory names must be non-empty")]
	EmptyName,
	/// The factory was built with reset disabled and cannot take part in
	/// bulk resets.
	#[error("factory `{0}` was built without reset support")]
	NotResettable(String),
}

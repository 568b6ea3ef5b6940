// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret wrapper types.
//!
//! [`Secret<T>`] holds a sensitive value (password, session token, access
//! token, provider key) and renders as [`REDACTED`] through both `Debug` and
//! `Display`, so it can sit inside structs that are logged with `?` or `%`
//! without leaking. The inner value is zeroized on drop.
//!
//! Reading the value requires an explicit call to [`Secret::expose`], which
//! keeps every place a secret leaves its wrapper easy to grep for.
//!
//! `Serialize` is intentionally not implemented: response bodies that carry a
//! token must copy it out with `expose()`.

use std::fmt;

use zeroize::Zeroize;

/// Placeholder rendered instead of a secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never appear in logs.
pub struct Secret<T: Zeroize> {
	inner: T,
}

/// The common case: a secret string.
pub type SecretString = Secret<String>;

impl<T: Zeroize> Secret<T> {
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the underlying value.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

impl<T: Zeroize + Clone> Clone for Secret<T> {
	fn clone(&self) -> Self {
		Self::new(self.inner.clone())
	}
}

impl<T: Zeroize + PartialEq> PartialEq for Secret<T> {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T: Zeroize + Eq> Eq for Secret<T> {}

impl<T: Zeroize> fmt::Debug for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T: Zeroize> fmt::Display for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T: Zeroize> Drop for Secret<T> {
	fn drop(&mut self) {
		self.inner.zeroize();
	}
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Secret<T>
where
	T: Zeroize + serde::Deserialize<'de>,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		T::deserialize(deserializer).map(Secret::new)
	}
}

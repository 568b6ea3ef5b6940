// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Temporary credential generation for re-sent invitations.

use authgate_common_secret::SecretString;
use rand::seq::SliceRandom;
use rand::Rng;

pub const TEMPORARY_CREDENTIAL_LEN: usize = 16;

const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const DIGITS: &[u8] = b"23456789";
const SYMBOLS: &[u8] = b"!@#$%^&*-_=+";

/// Generates a fresh temporary credential from the thread-local CSPRNG.
///
/// The result always contains an upper-case letter, a lower-case letter, a
/// digit and a symbol so it satisfies common provider password policies.
pub fn generate_temporary_credential() -> SecretString {
	let mut rng = rand::thread_rng();
	let classes = [UPPER, LOWER, DIGITS, SYMBOLS];

	let mut chars: Vec<u8> = classes
		.iter()
		.map(|class| class[rng.gen_range(0..class.len())])
		.collect();

	let all: Vec<u8> = classes.concat();
	while chars.len() < TEMPORARY_CREDENTIAL_LEN {
		chars.push(all[rng.gen_range(0..all.len())]);
	}
	chars.shuffle(&mut rng);

	SecretString::new(chars.into_iter().map(char::from).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn covers_every_character_class() {
		for _ in 0..64 {
			let credential = generate_temporary_credential();
			let value = credential.expose();
			assert_eq!(value.len(), TEMPORARY_CREDENTIAL_LEN);
			assert!(value.bytes().any(|b| UPPER.contains(&b)));
			assert!(value.bytes().any(|b| LOWER.contains(&b)));
			assert!(value.bytes().any(|b| DIGITS.contains(&b)));
			assert!(value.bytes().any(|b| SYMBOLS.contains(&b)));
		}
	}

	#[test]
	fn is_not_constant() {
		let first = generate_temporary_credential();
		let second = generate_temporary_credential();
		assert_ne!(first.expose(), second.expose());
	}
}

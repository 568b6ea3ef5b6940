// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Common configuration primitives for authgate.
//!
//! - [`Secret<T>`]: re-exported from [`authgate_common_secret`]
//! - [`load_secret_env`]: loads a secret from `NAME` or from the file named
//!   by `NAME_FILE`

pub mod env;

pub use authgate_common_secret::{Secret, SecretString, REDACTED};

pub use env::{load_secret_env, SecretEnvError};

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! AWS Cognito user pool adapter.
//!
//! Speaks the Cognito Identity Provider JSON 1.1 API directly over reqwest.
//! Admin operations are signed with AWS Signature Version 4; the public
//! operations (`InitiateAuth`, `ForgotPassword`, `ConfirmForgotPassword`,
//! `GlobalSignOut`) are sent unsigned, as Cognito expects.

pub mod client;
pub mod config;
pub mod error;
pub mod sigv4;
mod wire;

pub use client::CognitoProvider;
pub use config::{AwsCredentials, CognitoConfig};
pub use error::CognitoError;

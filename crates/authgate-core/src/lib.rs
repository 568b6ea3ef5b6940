// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Stateless authentication gateway core.
//!
//! The gateway exposes a fixed set of account operations (signup, password
//! challenge, login, logout, password reset, user lookup) and delegates every
//! decision to an external identity provider reached through the
//! [`IdentityProvider`] port.
//!
//! ```text
//! raw JSON fields ─► validation ─► AuthGateway ─► IdentityProvider (adapter)
//!                                     ▲                  │
//!                                     └── GatewayError ◄─┴─ ErrorTranslator
//! ```
//!
//! - [`validation`] turns raw request fields into typed requests.
//! - [`AuthGateway`] maps typed requests onto one or two port calls and
//!   interprets challenges.
//! - [`ErrorTranslator`] is the only place provider error shapes are
//!   examined; adapters call it at the port boundary.
//!
//! Nothing is stored between requests. A pending password challenge is
//! carried by the caller as an opaque session token.

pub mod credential;
pub mod error;
pub mod gateway;
pub mod port;
pub mod translate;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use authgate_common_secret::SecretString;
pub use error::{ErrorKind, GatewayError, ValidationError, ValidationReason};
pub use gateway::{
	AuthGateway, GatewayConfig, NEW_PASSWORD_REQUIRED_MESSAGE, PASSWORD_SET_MESSAGE,
};
pub use port::IdentityProvider;
pub use translate::{ErrorTranslator, ProviderFault};
pub use types::{
	AttributeName, AuthChallenge, AuthFlow, AuthResult, AuthStatus, AuthTokens, ChallengeCompletion,
	ChallengeKind, CreateUserRequest, DeliveryChannel, InviteAction, LoginState, SessionToken,
	SignOutOutcome, UserIdentity, Username,
};

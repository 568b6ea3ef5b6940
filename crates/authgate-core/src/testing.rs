// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Test double for the [`IdentityProvider`] port.
//!
//! [`FakeProvider`] records every call it receives and behaves like a small
//! provider: accounts created with a temporary credential must answer a
//! new-password challenge, sessions are single use and signed-out tokens stay
//! revoked. Failures are reported as Cognito-style faults and go through
//! [`ErrorTranslator::cognito`], the same as a real adapter.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use authgate_common_secret::SecretString;

use crate::error::GatewayError;
use crate::port::IdentityProvider;
use crate::translate::{ErrorTranslator, ProviderFault};
use crate::types::{
	AttributeName, AuthChallenge, AuthFlow, AuthResult, AuthTokens, ChallengeKind,
	CreateUserRequest, DeliveryChannel, InviteAction, UserIdentity, Username,
};

/// Port operations, used to target failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	CreateUser,
	InitiateAuth,
	RespondToChallenge,
	UpdateAttributes,
	SignOut,
	RequestPasswordReset,
	ConfirmPasswordReset,
	GetUser,
}

/// One recorded port call. Secrets are reduced to presence flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
	CreateUser {
		username: String,
		attributes: Vec<(AttributeName, String)>,
		delivery: DeliveryChannel,
		action: InviteAction,
		has_temporary_credential: bool,
	},
	InitiateAuth {
		username: String,
		flow: AuthFlow,
	},
	RespondToChallenge {
		username: String,
	},
	UpdateAttributes {
		username: String,
		attributes: Vec<(AttributeName, String)>,
	},
	SignOut,
	RequestPasswordReset {
		username: String,
	},
	ConfirmPasswordReset {
		username: String,
	},
	GetUser {
		username: String,
	},
}

impl ProviderCall {
	pub fn operation(&self) -> Operation {
		match self {
			ProviderCall::CreateUser { .. } => Operation::CreateUser,
			ProviderCall::InitiateAuth { .. } => Operation::InitiateAuth,
			ProviderCall::RespondToChallenge { .. } => Operation::RespondToChallenge,
			ProviderCall::UpdateAttributes { .. } => Operation::UpdateAttributes,
			ProviderCall::SignOut => Operation::SignOut,
			ProviderCall::RequestPasswordReset { .. } => Operation::RequestPasswordReset,
			ProviderCall::ConfirmPasswordReset { .. } => Operation::ConfirmPasswordReset,
			ProviderCall::GetUser { .. } => Operation::GetUser,
		}
	}
}

#[derive(Debug, Clone)]
struct Account {
	credential: String,
	must_change_credential: bool,
	attributes: BTreeMap<String, String>,
	reset_code: Option<String>,
}

#[derive(Debug, Default)]
struct State {
	calls: Vec<ProviderCall>,
	accounts: HashMap<Username, Account>,
	sessions: HashMap<String, Username>,
	issued_tokens: HashSet<String>,
	revoked_tokens: HashSet<String>,
	failures: HashMap<Operation, ProviderFault>,
	challenge_override: Option<ChallengeKind>,
	follow_up_challenge: Option<ChallengeKind>,
	next_session_token: Option<String>,
	counter: u64,
}

/// Call-recording fake identity provider.
#[derive(Debug)]
pub struct FakeProvider {
	translator: ErrorTranslator,
	state: Mutex<State>,
}

impl Default for FakeProvider {
	fn default() -> Self {
		Self::new()
	}
}

impl FakeProvider {
	pub fn new() -> Self {
		Self {
			translator: ErrorTranslator::cognito(),
			state: Mutex::new(State::default()),
		}
	}

	/// Seeds an account. `must_change_credential` mirrors an account created
	/// from an invitation that has not set its own password yet.
	pub fn with_account(
		self,
		username: &str,
		credential: &str,
		must_change_credential: bool,
	) -> Self {
		let username = Username::parse(username).expect("valid fake username");
		let mut attributes = BTreeMap::new();
		attributes.insert(
			AttributeName::Email.as_str().to_string(),
			username.as_str().to_string(),
		);
		self.lock().accounts.insert(
			username,
			Account {
				credential: credential.to_string(),
				must_change_credential,
				attributes,
				reset_code: None,
			},
		);
		self
	}

	/// The next challenge issued uses this session token.
	pub fn with_session_token(self, token: &str) -> Self {
		self.lock().next_session_token = Some(token.to_string());
		self
	}

	/// Every login that would issue a challenge issues `kind` instead.
	pub fn with_challenge(self, kind: ChallengeKind) -> Self {
		self.lock().challenge_override = Some(kind);
		self
	}

	/// Answering a new-password challenge sets the password and then issues
	/// `kind` instead of tokens.
	pub fn with_follow_up_challenge(self, kind: ChallengeKind) -> Self {
		self.lock().follow_up_challenge = Some(kind);
		self
	}

	/// The next call to `operation` fails with `fault`.
	pub fn fail_next(&self, operation: Operation, fault: ProviderFault) {
		self.lock().failures.insert(operation, fault);
	}

	pub fn calls(&self) -> Vec<ProviderCall> {
		self.lock().calls.clone()
	}

	pub fn call_count(&self) -> usize {
		self.lock().calls.len()
	}

	pub fn calls_to(&self, operation: Operation) -> Vec<ProviderCall> {
		self.lock()
			.calls
			.iter()
			.filter(|call| call.operation() == operation)
			.cloned()
			.collect()
	}

	/// Reset code issued by the last password reset request for `username`.
	pub fn reset_code(&self, username: &str) -> Option<String> {
		let username = Username::parse(username).ok()?;
		self.lock().accounts.get(&username)?.reset_code.clone()
	}

	pub fn attributes(&self, username: &str) -> Option<BTreeMap<String, String>> {
		let username = Username::parse(username).ok()?;
		self.lock()
			.accounts
			.get(&username)
			.map(|a| a.attributes.clone())
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, State> {
		self.state.lock().expect("fake provider state poisoned")
	}

	fn begin(&self, call: ProviderCall) -> Result<std::sync::MutexGuard<'_, State>, GatewayError> {
		let operation = call.operation();
		let mut state = self.lock();
		state.calls.push(call);
		let failure = state.failures.remove(&operation);
		match failure {
			Some(fault) => Err(self.translator.translate(&fault)),
			None => Ok(state),
		}
	}

	fn reject(&self, code: &str, message: &str) -> GatewayError {
		self.translator
			.translate(&ProviderFault::rejected(code, message))
	}
}

impl State {
	fn next_id(&mut self, prefix: &str) -> String {
		self.counter += 1;
		format!("{prefix}-{}", self.counter)
	}

	fn issue_tokens(&mut self) -> AuthTokens {
		let access = self.next_id("access");
		self.issued_tokens.insert(access.clone());
		let mut tokens = AuthTokens::new(access);
		tokens.refresh_token = Some(self.next_id("refresh").into());
		tokens.id_token = Some(self.next_id("id").into());
		tokens.expires_in = Some(3600);
		tokens.token_type = Some("Bearer".to_string());
		tokens
	}

	fn issue_challenge(&mut self, username: &Username) -> AuthChallenge {
		let token = match self.next_session_token.take() {
			Some(token) => token,
			None => self.next_id("session"),
		};
		self.sessions.insert(token.clone(), username.clone());
		let kind = self
			.challenge_override
			.clone()
			.unwrap_or(ChallengeKind::NewPasswordRequired);
		AuthChallenge::new(kind, token.into())
	}
}

fn identity(username: &Username, account: &Account, status: &str) -> UserIdentity {
	let mut user = UserIdentity::new(username.as_str()).with_status(status);
	user.attributes = account.attributes.clone();
	user.enabled = Some(true);
	user
}

#[async_trait]
impl IdentityProvider for FakeProvider {
	fn name(&self) -> &'static str {
		"fake"
	}

	async fn create_user(&self, request: CreateUserRequest) -> Result<UserIdentity, GatewayError> {
		let mut state = self.begin(ProviderCall::CreateUser {
			username: request.username.as_str().to_string(),
			attributes: request.attributes.clone(),
			delivery: request.delivery,
			action: request.action,
			has_temporary_credential: request.temporary_credential.is_some(),
		})?;

		let credential = request
			.temporary_credential
			.as_ref()
			.map(|c| c.expose().clone())
			.unwrap_or_default();

		match request.action {
			InviteAction::Send => {
				if state.accounts.contains_key(&request.username) {
					return Err(self.reject("UsernameExistsException", "User account already exists"));
				}
				let attributes = request
					.attributes
					.iter()
					.map(|(name, value)| (name.as_str().to_string(), value.clone()))
					.collect();
				let account = Account {
					credential,
					must_change_credential: true,
					attributes,
					reset_code: None,
				};
				let user = identity(&request.username, &account, "FORCE_CHANGE_PASSWORD");
				state.accounts.insert(request.username, account);
				Ok(user)
			}
			InviteAction::Resend => {
				let Some(account) = state.accounts.get_mut(&request.username) else {
					return Err(self.reject("UserNotFoundException", "User does not exist."));
				};
				account.credential = credential;
				account.must_change_credential = true;
				Ok(identity(&request.username, account, "FORCE_CHANGE_PASSWORD"))
			}
		}
	}

	async fn initiate_auth(
		&self,
		flow: AuthFlow,
		username: &Username,
		credential: &SecretString,
	) -> Result<AuthResult, GatewayError> {
		let mut state = self.begin(ProviderCall::InitiateAuth {
			username: username.as_str().to_string(),
			flow,
		})?;

		let Some(account) = state.accounts.get(username) else {
			return Err(self.reject("UserNotFoundException", "User does not exist."));
		};
		if account.credential != *credential.expose() {
			return Err(self.reject("NotAuthorizedException", "Incorrect username or password."));
		}
		if account.must_change_credential || state.challenge_override.is_some() {
			let challenge = state.issue_challenge(username);
			return Ok(AuthResult::challenge_pending(challenge));
		}
		Ok(AuthResult::authenticated(state.issue_tokens()))
	}

	async fn respond_to_challenge(
		&self,
		username: &Username,
		challenge: &AuthChallenge,
		new_credential: &SecretString,
	) -> Result<AuthResult, GatewayError> {
		let mut state = self.begin(ProviderCall::RespondToChallenge {
			username: username.as_str().to_string(),
		})?;

		let owner = state.sessions.remove(challenge.session_token.expose());
		if owner.as_ref() != Some(username) {
			return Err(self.reject(
				"NotAuthorizedException",
				"Invalid session for the user, session is expired.",
			));
		}
		let Some(account) = state.accounts.get_mut(username) else {
			return Err(self.reject("UserNotFoundException", "User does not exist."));
		};
		account.credential = new_credential.expose().clone();
		account.must_change_credential = false;
		if let Some(kind) = state.follow_up_challenge.clone() {
			let token = state.next_id("session");
			state.sessions.insert(token.clone(), username.clone());
			return Ok(AuthResult::challenge_pending(AuthChallenge::new(kind, token.into())));
		}
		Ok(AuthResult::authenticated(state.issue_tokens()))
	}

	async fn update_attributes(
		&self,
		username: &Username,
		attributes: &[(AttributeName, String)],
	) -> Result<(), GatewayError> {
		let mut state = self.begin(ProviderCall::UpdateAttributes {
			username: username.as_str().to_string(),
			attributes: attributes.to_vec(),
		})?;

		let Some(account) = state.accounts.get_mut(username) else {
			return Err(self.reject("UserNotFoundException", "User does not exist."));
		};
		for (name, value) in attributes {
			account
				.attributes
				.insert(name.as_str().to_string(), value.clone());
		}
		Ok(())
	}

	async fn sign_out(&self, access_token: &SecretString) -> Result<(), GatewayError> {
		let mut state = self.begin(ProviderCall::SignOut)?;

		let token = access_token.expose();
		if state.revoked_tokens.contains(token) {
			return Err(self.reject("NotAuthorizedException", "Access Token has been revoked"));
		}
		if !state.issued_tokens.remove(token) {
			return Err(self.reject("NotAuthorizedException", "Invalid Access Token"));
		}
		state.revoked_tokens.insert(token.clone());
		Ok(())
	}

	async fn request_password_reset(&self, username: &Username) -> Result<(), GatewayError> {
		let mut state = self.begin(ProviderCall::RequestPasswordReset {
			username: username.as_str().to_string(),
		})?;

		let code = format!("{:06}", 100_000 + state.counter);
		state.counter += 1;
		let Some(account) = state.accounts.get_mut(username) else {
			return Err(self.reject("UserNotFoundException", "User does not exist."));
		};
		account.reset_code = Some(code);
		Ok(())
	}

	async fn confirm_password_reset(
		&self,
		username: &Username,
		code: &SecretString,
		new_credential: &SecretString,
	) -> Result<(), GatewayError> {
		let mut state = self.begin(ProviderCall::ConfirmPasswordReset {
			username: username.as_str().to_string(),
		})?;

		let Some(account) = state.accounts.get_mut(username) else {
			return Err(self.reject("UserNotFoundException", "User does not exist."));
		};
		if account.reset_code.as_deref() != Some(code.expose().as_str()) {
			return Err(self.reject(
				"CodeMismatchException",
				"Invalid verification code provided, please try again.",
			));
		}
		account.reset_code = None;
		account.credential = new_credential.expose().clone();
		account.must_change_credential = false;
		Ok(())
	}

	async fn get_user(&self, username: &Username) -> Result<UserIdentity, GatewayError> {
		let state = self.begin(ProviderCall::GetUser {
			username: username.as_str().to_string(),
		})?;

		let Some(account) = state.accounts.get(username) else {
			return Err(self.reject("UserNotFoundException", "User does not exist."));
		};
		let status = if account.must_change_credential {
			"FORCE_CHANGE_PASSWORD"
		} else {
			"CONFIRMED"
		};
		Ok(identity(username, account, status))
	}
}

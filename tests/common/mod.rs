//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use parking_lot::Mutex;
use time::macros::datetime;
use tokio::sync::Notify;
// self
use cognito_broker::{
	config::ClientConfig,
	error::{Error, ServiceError},
	identity::{
		Credentials, FederatedIdentity, IdentityId, IdentityListPage, TemporaryCredentials,
	},
	service::{
		CredentialsForIdentityRequest, DeveloperIdentityTokenRequest, IdentityService,
		ListIdentitiesRequest, ServiceFuture,
	},
};

pub const POOL_ID: &str = "us-east-1:11111111-2222-3333-4444-555555555555";
pub const DEVELOPER_PROVIDER: &str = "login.example.app";

/// Minimal valid configuration against the default regional endpoint.
pub fn config() -> ClientConfig {
	ClientConfig::builder()
		.identity_pool_id(POOL_ID)
		.developer_provider_name(DEVELOPER_PROVIDER)
		.region("us-east-1")
		.build()
		.expect("Fixture configuration should build.")
}

/// Valid configuration pointed at a local endpoint.
pub fn config_for(endpoint: &str) -> ClientConfig {
	ClientConfig::builder()
		.identity_pool_id(POOL_ID)
		.developer_provider_name(DEVELOPER_PROVIDER)
		.token_duration_seconds(3600)
		.region("us-east-1")
		.endpoint(endpoint)
		.build()
		.expect("Fixture configuration with endpoint override should build.")
}

pub fn identity_id(value: &str) -> IdentityId {
	IdentityId::new(value).expect("Fixture identity id should be valid.")
}

/// The `id1`/`tok1` identity used by the merge scenario.
pub fn federated_identity() -> FederatedIdentity {
	FederatedIdentity::new(identity_id("id1"), "tok1")
}

/// The `AK`/`SK`/`ST` credentials expiring at epoch second 1234567890.
pub fn temporary_credentials() -> TemporaryCredentials {
	TemporaryCredentials {
		identity_id: identity_id("id1"),
		credentials: Credentials {
			access_key_id: "AK".into(),
			secret_key: "SK".into(),
			session_token: "ST".into(),
			expiration: datetime!(2009-02-13 23:31:30 UTC),
		},
		extra: Default::default(),
	}
}

pub fn service_unavailable() -> Error {
	ServiceError::new("ServiceUnavailable")
		.with_message("Service is unavailable.")
		.with_status(503)
		.into()
}

/// Scripted [`IdentityService`] that records every request it receives.
///
/// Each operation pops its next scripted result; an empty script answers pings with `healthy`
/// and fails every other call with `StubExhausted`.
#[derive(Default)]
pub struct StubIdentityService {
	pings: Mutex<VecDeque<Result<String, Error>>>,
	tokens: Mutex<VecDeque<Result<FederatedIdentity, Error>>>,
	credentials: Mutex<VecDeque<Result<TemporaryCredentials, Error>>>,
	pages: Mutex<VecDeque<Result<IdentityListPage, Error>>>,
	ping_gate: Option<Arc<Notify>>,
	ping_calls: AtomicUsize,
	pub token_requests: Mutex<Vec<DeveloperIdentityTokenRequest>>,
	pub credential_requests: Mutex<Vec<CredentialsForIdentityRequest>>,
	pub list_requests: Mutex<Vec<ListIdentitiesRequest>>,
}
impl StubIdentityService {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_ping(self, result: Result<String, Error>) -> Self {
		self.pings.lock().push_back(result);

		self
	}

	pub fn with_token(self, result: Result<FederatedIdentity, Error>) -> Self {
		self.tokens.lock().push_back(result);

		self
	}

	pub fn with_credentials(self, result: Result<TemporaryCredentials, Error>) -> Self {
		self.credentials.lock().push_back(result);

		self
	}

	pub fn with_page(self, result: Result<IdentityListPage, Error>) -> Self {
		self.pages.lock().push_back(result);

		self
	}

	/// Holds every ping until the returned gate is notified.
	pub fn with_ping_gate(mut self) -> (Self, Arc<Notify>) {
		let gate = Arc::new(Notify::new());

		self.ping_gate = Some(gate.clone());

		(self, gate)
	}

	pub fn ping_calls(&self) -> usize {
		self.ping_calls.load(Ordering::SeqCst)
	}

	pub fn token_calls(&self) -> usize {
		self.token_requests.lock().len()
	}

	pub fn credential_calls(&self) -> usize {
		self.credential_requests.lock().len()
	}
}
impl IdentityService for StubIdentityService {
	fn ping(&self) -> ServiceFuture<'_, String> {
		self.ping_calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if let Some(gate) = &self.ping_gate {
				gate.notified().await;
			}

			self.pings.lock().pop_front().unwrap_or_else(|| Ok("healthy".into()))
		})
	}

	fn get_open_id_token_for_developer_identity(
		&self,
		request: DeveloperIdentityTokenRequest,
	) -> ServiceFuture<'_, FederatedIdentity> {
		self.token_requests.lock().push(request);

		let result = self.tokens.lock().pop_front().unwrap_or_else(|| Err(exhausted()));

		Box::pin(async move { result })
	}

	fn get_credentials_for_identity(
		&self,
		request: CredentialsForIdentityRequest,
	) -> ServiceFuture<'_, TemporaryCredentials> {
		self.credential_requests.lock().push(request);

		let result = self.credentials.lock().pop_front().unwrap_or_else(|| Err(exhausted()));

		Box::pin(async move { result })
	}

	fn list_identities(
		&self,
		request: ListIdentitiesRequest,
	) -> ServiceFuture<'_, IdentityListPage> {
		self.list_requests.lock().push(request);

		let result = self.pages.lock().pop_front().unwrap_or_else(|| Err(exhausted()));

		Box::pin(async move { result })
	}
}

fn exhausted() -> Error {
	ServiceError::new("StubExhausted").into()
}

//! Demonstrates plugging a caller-owned [`IdentityService`] into the authorizer, e.g. to route
//! calls through an existing SDK or an in-process fake.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use time::{Duration, OffsetDateTime};
// self
use cognito_broker::{
	authorizer::Authorizer,
	config::ClientConfig,
	error::ServiceError,
	identity::{
		Credentials, FederatedIdentity, IdentityId, IdentityListPage, TemporaryCredentials,
	},
	service::{
		CredentialsForIdentityRequest, DeveloperIdentityTokenRequest, IdentityService,
		ListIdentitiesRequest, ServiceFuture,
	},
};

/// Issues one identity per login and fresh credentials for every exchange.
struct InProcessService;
impl IdentityService for InProcessService {
	fn ping(&self) -> ServiceFuture<'_, String> {
		Box::pin(async { Ok("in-process".into()) })
	}

	fn get_open_id_token_for_developer_identity(
		&self,
		request: DeveloperIdentityTokenRequest,
	) -> ServiceFuture<'_, FederatedIdentity> {
		Box::pin(async move {
			let proof_len = request.logins.values().next().map_or(0, |proof| proof.expose().len());
			let raw_id = format!("{}:local-{proof_len}", request.identity_pool_id.region());
			let identity_id = IdentityId::new(raw_id).map_err(|e| {
				ServiceError::new("InvalidParameterException").with_message(e.to_string())
			})?;

			Ok(FederatedIdentity::new(identity_id, "local-open-id-token"))
		})
	}

	fn get_credentials_for_identity(
		&self,
		request: CredentialsForIdentityRequest,
	) -> ServiceFuture<'_, TemporaryCredentials> {
		Box::pin(async move {
			Ok(TemporaryCredentials {
				identity_id: request.identity_id,
				credentials: Credentials {
					access_key_id: "ASIALOCAL".into(),
					secret_key: "local-secret".into(),
					session_token: "local-session".into(),
					expiration: OffsetDateTime::now_utc() + Duration::hours(1),
				},
				extra: Default::default(),
			})
		})
	}

	fn list_identities(&self, _: ListIdentitiesRequest) -> ServiceFuture<'_, IdentityListPage> {
		Box::pin(async { Ok(IdentityListPage::default()) })
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::builder()
		.identity_pool_id("eu-west-1:00000000-0000-0000-0000-000000000000")
		.developer_provider_name("login.demo.app")
		.region("eu-west-1")
		.build()?;
	let authorizer = Authorizer::with_service(config, Arc::new(InProcessService));

	println!("Readiness: {}.", authorizer.settled().await);

	let authorization = authorizer.authorize("bob@example.com").await?;

	println!(
		"Identity {} expires: {}.",
		authorization.identity_id,
		authorization.credentials.is_expired_at(OffsetDateTime::now_utc())
	);

	Ok(())
}

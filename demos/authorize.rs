//! Demonstrates the full token → credential handshake with the default reqwest transport against
//! a local mock of the identity service.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use cognito_broker::{
	authorizer::{ListIdentitiesQuery, ReqwestAuthorizer},
	config::ClientConfig,
	service::ServiceAction,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/ping");
			then.status(200).body("healthy");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/")
				.header("x-amz-target", ServiceAction::GetOpenIdTokenForDeveloperIdentity.target());
			then.status(200).json_body(json!({
				"IdentityId": "us-east-1:5c1f7d2e-demo",
				"Token": "demo-open-id-token",
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/")
				.header("x-amz-target", ServiceAction::GetCredentialsForIdentity.target());
			then.status(200).json_body(json!({
				"IdentityId": "us-east-1:5c1f7d2e-demo",
				"Credentials": {
					"AccessKeyId": "ASIADEMO",
					"SecretKey": "demo-secret",
					"SessionToken": "demo-session",
					"Expiration": 1893456000,
				},
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/")
				.header("x-amz-target", ServiceAction::ListIdentities.target());
			then.status(200).json_body(json!({
				"Identities": [{
					"IdentityId": "us-east-1:5c1f7d2e-demo",
					"Logins": ["login.demo.app"],
				}],
			}));
		})
		.await;

	let config = ClientConfig::builder()
		.identity_pool_id("us-east-1:00000000-0000-0000-0000-000000000000")
		.developer_provider_name("login.demo.app")
		.region("us-east-1")
		.endpoint(format!("http://{}/", server.address()))
		.build()?;
	let authorizer = ReqwestAuthorizer::new(config)?;

	println!("Readiness: {}.", authorizer.settled().await);

	let authorization = authorizer.authorize("alice@example.com").await?;

	println!(
		"Identity {} received key {} valid until {}.",
		authorization.identity_id,
		authorization.credentials.access_key_id,
		authorization.credentials.expiration
	);

	let page = authorizer.list_identities(ListIdentitiesQuery::default()).await?;

	println!("Pool lists {} identities; more pages: {}.", page.identities.len(), page.has_more());

	Ok(())
}

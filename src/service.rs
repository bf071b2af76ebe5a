//! Identity-service collaborator contract and wire-level request types.
//!
//! [`IdentityService`] is the authorizer's only dependency on the remote federation service. The
//! crate ships [`ReqwestIdentityService`] (feature `reqwest`), which speaks the AWS JSON 1.1
//! protocol; tests and alternative SDKs plug in their own implementation. Implementations return
//! remote failures as [`Error::Service`] and must not retry or reclassify them.

#[cfg(feature = "reqwest")] pub mod http;
pub mod signer;

#[cfg(feature = "reqwest")] pub use http::*;
pub use signer::*;

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	identity::{
		AuthoritativeProperty, FederatedIdentity, IdentityId, IdentityListPage, IdentityPoolId,
		ProviderName, Secret, TemporaryCredentials,
	},
};

/// Boxed future returned by [`IdentityService`] calls.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Remote identity-federation operations the authorizer composes.
///
/// One instance is owned by one authorizer (behind `Arc`) and shared read-only by every
/// concurrent call, so implementations must be `Send + Sync + 'static` and must not keep
/// per-request mutable state.
pub trait IdentityService
where
	Self: 'static + Send + Sync,
{
	/// Issues an unauthenticated `GET <endpoint>/ping` and returns the raw body.
	fn ping(&self) -> ServiceFuture<'_, String>;

	/// Exchanges a developer-provider login for an identity id and OpenID token.
	fn get_open_id_token_for_developer_identity(
		&self,
		request: DeveloperIdentityTokenRequest,
	) -> ServiceFuture<'_, FederatedIdentity>;

	/// Exchanges an OpenID token for temporary credentials.
	fn get_credentials_for_identity(
		&self,
		request: CredentialsForIdentityRequest,
	) -> ServiceFuture<'_, TemporaryCredentials>;

	/// Lists one page of identities in the pool.
	fn list_identities(
		&self,
		request: ListIdentitiesRequest,
	) -> ServiceFuture<'_, IdentityListPage>;
}

/// Remote actions exposed by the identity service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServiceAction {
	/// `GetOpenIdTokenForDeveloperIdentity`.
	GetOpenIdTokenForDeveloperIdentity,
	/// `GetCredentialsForIdentity`.
	GetCredentialsForIdentity,
	/// `ListIdentities`.
	ListIdentities,
}
impl ServiceAction {
	/// Returns the action name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::GetOpenIdTokenForDeveloperIdentity => "GetOpenIdTokenForDeveloperIdentity",
			Self::GetCredentialsForIdentity => "GetCredentialsForIdentity",
			Self::ListIdentities => "ListIdentities",
		}
	}

	/// Returns the `x-amz-target` header value.
	pub const fn target(self) -> &'static str {
		match self {
			Self::GetOpenIdTokenForDeveloperIdentity =>
				"AWSCognitoIdentityService.GetOpenIdTokenForDeveloperIdentity",
			Self::GetCredentialsForIdentity =>
				"AWSCognitoIdentityService.GetCredentialsForIdentity",
			Self::ListIdentities => "AWSCognitoIdentityService.ListIdentities",
		}
	}

	/// Whether the action needs developer credentials.
	pub const fn requires_signing(self) -> bool {
		!matches!(self, Self::GetCredentialsForIdentity)
	}
}
impl Display for ServiceAction {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Login map with exactly one `provider → proof` entry.
pub type Logins = BTreeMap<String, Secret>;

/// Request body for [`IdentityService::get_open_id_token_for_developer_identity`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeveloperIdentityTokenRequest {
	/// Target identity pool.
	pub identity_pool_id: IdentityPoolId,
	/// `{developer_provider_name: authoritative_property}`.
	pub logins: Logins,
	/// Requested token lifetime in seconds.
	pub token_duration: i64,
}
impl DeveloperIdentityTokenRequest {
	/// Builds the request for `property` under the configured developer provider.
	pub fn new(config: &ClientConfig, property: &AuthoritativeProperty) -> Self {
		Self {
			identity_pool_id: config.identity_pool_id.clone(),
			logins: single_login(&config.developer_provider_name, Secret::new(property.expose())),
			token_duration: config.token_duration_seconds(),
		}
	}
}

/// Request body for [`IdentityService::get_credentials_for_identity`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CredentialsForIdentityRequest {
	/// Identity to issue credentials for.
	pub identity_id: IdentityId,
	/// Role to assume, omitted from the body when absent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub custom_role_arn: Option<String>,
	/// `{federation_provider_name: token}`, empty when the identity carries no token.
	pub logins: Logins,
}
impl CredentialsForIdentityRequest {
	/// Builds the request for `identity`; an explicit `custom_role_arn` wins over the identity's.
	pub fn new(
		config: &ClientConfig,
		identity: &FederatedIdentity,
		custom_role_arn: Option<&str>,
	) -> Self {
		let logins = match &identity.token {
			Some(token) => single_login(&config.federation_provider_name, token.clone()),
			None => Logins::new(),
		};

		Self {
			identity_id: identity.identity_id.clone(),
			custom_role_arn: custom_role_arn
				.map(ToOwned::to_owned)
				.or_else(|| identity.custom_role_arn.clone()),
			logins,
		}
	}
}

/// Request body for [`IdentityService::list_identities`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListIdentitiesRequest {
	/// Pool to list.
	pub identity_pool_id: IdentityPoolId,
	/// Page size.
	pub max_results: u32,
	/// Always `true`; disabled identities are never listed.
	pub hide_disabled: bool,
	/// Continuation token, omitted from the body when absent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub next_token: Option<String>,
}
impl ListIdentitiesRequest {
	/// Builds a page request; an empty continuation token counts as absent.
	pub fn new(config: &ClientConfig, max_results: u32, next_token: Option<&str>) -> Self {
		Self {
			identity_pool_id: config.identity_pool_id.clone(),
			max_results,
			hide_disabled: true,
			next_token: next_token.filter(|token| !token.is_empty()).map(ToOwned::to_owned),
		}
	}
}

fn single_login(provider: &ProviderName, proof: Secret) -> Logins {
	Logins::from([(provider.to_string(), proof)])
}

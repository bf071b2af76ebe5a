//! Validated, immutable configuration for an [`Authorizer`](crate::authorizer::Authorizer).
//!
//! Options arrive either through [`ClientConfigBuilder`] or as a raw JSON object via
//! [`ClientConfig::from_options`]. Both paths run the same required-field checks before any
//! service handle exists, and neither touches caller-owned data.

/// Builder API doubling as the raw options schema.
pub mod builder;
pub mod validator;

pub use builder::*;
pub use validator::{FieldSource, FieldState, first_empty, first_missing, validate};

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	identity::{IdentityPoolId, ProviderName, Secret},
};

/// Immutable configuration consumed by the authorizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Identity pool every call targets.
	pub identity_pool_id: IdentityPoolId,
	/// Login key used for the developer-identity token exchange.
	pub developer_provider_name: ProviderName,
	/// Requested OpenID token lifetime.
	pub token_duration: Duration,
	/// Login key used for the credential exchange.
	pub federation_provider_name: ProviderName,
	/// Settings forwarded to the identity-service client.
	pub service: ServiceSettings,
}
impl ClientConfig {
	/// Fields that must be present and non-empty, in reporting order.
	pub const REQUIRED_FIELDS: [&'static str; 3] =
		["identity_pool_id", "developer_provider_name", "region"];
	/// Default requested token lifetime (one day).
	pub const DEFAULT_TOKEN_DURATION: Duration = Duration::seconds(86_400);
	/// Default federation provider name.
	pub const DEFAULT_FEDERATION_PROVIDER: &'static str = "cognito-identity.amazonaws.com";

	/// Creates a new builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::new()
	}

	/// Validates and maps a raw options object.
	///
	/// Unlike the typed builder, a raw object can tell an explicit `null` or `false` apart from a
	/// missing key; both are reported as [`ConfigError::EmptyField`].
	pub fn from_options(options: &JsonMap<String, JsonValue>) -> Result<Self, ConfigError> {
		validator::validate(options, &Self::REQUIRED_FIELDS)?;

		let builder: ClientConfigBuilder =
			serde_json::from_value(JsonValue::Object(options.clone()))
				.map_err(ConfigError::Options)?;

		builder.build()
	}

	/// Token duration in whole seconds, as sent to the service.
	pub fn token_duration_seconds(&self) -> i64 {
		self.token_duration.whole_seconds()
	}
}
impl TryFrom<ClientConfigBuilder> for ClientConfig {
	type Error = ConfigError;

	fn try_from(builder: ClientConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

/// The subset of configuration the identity-service client needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceSettings {
	/// AWS region of the identity pool.
	pub region: String,
	/// Service endpoint, always ending in `/`.
	pub endpoint: Url,
	/// Credentials used to sign developer-authenticated calls.
	pub credentials: CredentialSource,
}
impl ServiceSettings {
	/// Signing name of the identity service.
	pub const SIGNING_NAME: &'static str = "cognito-identity";

	/// Regional endpoint for `region`.
	pub fn default_endpoint(region: &str) -> Result<Url, ConfigError> {
		let suffix = if region.starts_with("cn-") { "amazonaws.com.cn" } else { "amazonaws.com" };

		builder::parse_endpoint(&format!("https://{}.{region}.{suffix}/", Self::SIGNING_NAME))
	}

	/// Liveness path of the endpoint.
	pub fn ping_url(&self) -> Url {
		let mut url = self.endpoint.clone();
		let path = format!("{}ping", self.endpoint.path());

		url.set_path(&path);

		url
	}
}

/// Where developer-authenticated calls get their signing credentials from.
///
/// The broker never reads or signs with these itself; the value is handed to the configured
/// request signer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CredentialSource {
	/// Let the signer resolve credentials from its own environment.
	#[default]
	Ambient,
	/// Explicit key pair.
	Static {
		/// Access key identifier.
		access_key_id: String,
		/// Secret access key.
		secret_access_key: Secret,
		/// Optional session token.
		session_token: Option<Secret>,
	},
	/// Named local profile.
	Profile(String),
}

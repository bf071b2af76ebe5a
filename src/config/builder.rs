// self
use crate::{
	_prelude::*,
	config::{
		ClientConfig, CredentialSource, ServiceSettings,
		validator::{self, FieldSource, FieldState},
	},
	error::ConfigError,
	identity::{IdentityPoolId, ProviderName, Secret},
};

/// Builder for [`ClientConfig`] values.
///
/// Every field is optional here so the builder doubles as the raw options schema; [`build`]
/// applies the required-field checks and the documented defaults.
///
/// [`build`]: ClientConfigBuilder::build
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfigBuilder {
	/// Region-qualified identity pool identifier (required).
	pub identity_pool_id: Option<String>,
	/// Developer provider name the authoritative property is asserted under (required).
	pub developer_provider_name: Option<String>,
	/// Requested OpenID token lifetime in seconds (defaults to 86400).
	pub token_duration_seconds: Option<i64>,
	/// Provider name under which exchanged tokens are recognized.
	pub federation_provider_name: Option<String>,
	/// AWS region of the identity pool (required).
	pub region: Option<String>,
	/// Endpoint override; defaults to the regional Cognito Identity endpoint.
	pub endpoint: Option<String>,
	/// Static access key identifier.
	pub access_key_id: Option<String>,
	/// Static secret access key.
	pub secret_access_key: Option<String>,
	/// Session token paired with a static key.
	pub session_token: Option<String>,
	/// Named local profile.
	pub profile: Option<String>,
}
impl ClientConfigBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the identity pool identifier.
	pub fn identity_pool_id(mut self, value: impl Into<String>) -> Self {
		self.identity_pool_id = Some(value.into());

		self
	}

	/// Sets the developer provider name.
	pub fn developer_provider_name(mut self, value: impl Into<String>) -> Self {
		self.developer_provider_name = Some(value.into());

		self
	}

	/// Sets the requested token duration in seconds.
	pub fn token_duration_seconds(mut self, seconds: i64) -> Self {
		self.token_duration_seconds = Some(seconds);

		self
	}

	/// Overrides the federation provider name.
	pub fn federation_provider_name(mut self, value: impl Into<String>) -> Self {
		self.federation_provider_name = Some(value.into());

		self
	}

	/// Sets the AWS region.
	pub fn region(mut self, value: impl Into<String>) -> Self {
		self.region = Some(value.into());

		self
	}

	/// Overrides the service endpoint.
	pub fn endpoint(mut self, value: impl Into<String>) -> Self {
		self.endpoint = Some(value.into());

		self
	}

	/// Uses a static key pair for developer-authenticated calls.
	pub fn static_credentials(
		mut self,
		access_key_id: impl Into<String>,
		secret_access_key: impl Into<String>,
	) -> Self {
		self.access_key_id = Some(access_key_id.into());
		self.secret_access_key = Some(secret_access_key.into());

		self
	}

	/// Attaches a session token to the static key pair.
	pub fn session_token(mut self, value: impl Into<String>) -> Self {
		self.session_token = Some(value.into());

		self
	}

	/// Uses a named local profile for developer-authenticated calls.
	pub fn profile(mut self, value: impl Into<String>) -> Self {
		self.profile = Some(value.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		validator::validate(&self, &ClientConfig::REQUIRED_FIELDS)?;

		let identity_pool_id = required(self.identity_pool_id, "identity_pool_id")?;
		let identity_pool_id = IdentityPoolId::new(identity_pool_id).map_err(|source| {
			ConfigError::InvalidIdentifier { field: "identity_pool_id", source }
		})?;
		let developer_provider_name =
			required(self.developer_provider_name, "developer_provider_name")?;
		let developer_provider_name = ProviderName::new(developer_provider_name).map_err(|source| {
			ConfigError::InvalidIdentifier { field: "developer_provider_name", source }
		})?;
		let token_duration = match self.token_duration_seconds {
			None => ClientConfig::DEFAULT_TOKEN_DURATION,
			Some(seconds) if seconds > 0 => Duration::seconds(seconds),
			Some(_) => return Err(ConfigError::NonPositiveTokenDuration),
		};
		let federation_provider_name = ProviderName::new(
			non_empty(self.federation_provider_name)
				.as_deref()
				.unwrap_or(ClientConfig::DEFAULT_FEDERATION_PROVIDER),
		)
		.map_err(|source| ConfigError::InvalidIdentifier {
			field: "federation_provider_name",
			source,
		})?;
		let region = required(self.region, "region")?;
		let endpoint = match non_empty(self.endpoint) {
			Some(raw) => parse_endpoint(&raw)?,
			None => ServiceSettings::default_endpoint(&region)?,
		};
		let credentials = credential_source(
			non_empty(self.access_key_id),
			non_empty(self.secret_access_key),
			non_empty(self.session_token),
			non_empty(self.profile),
		)?;

		Ok(ClientConfig {
			identity_pool_id,
			developer_provider_name,
			token_duration,
			federation_provider_name,
			service: ServiceSettings { region, endpoint, credentials },
		})
	}
}
impl FieldSource for ClientConfigBuilder {
	fn field_state(&self, field: &str) -> FieldState {
		match field {
			"identity_pool_id" => FieldState::of_text(self.identity_pool_id.as_deref()),
			"developer_provider_name" =>
				FieldState::of_text(self.developer_provider_name.as_deref()),
			"token_duration_seconds" => FieldState::of_number(self.token_duration_seconds),
			"federation_provider_name" =>
				FieldState::of_text(self.federation_provider_name.as_deref()),
			"region" => FieldState::of_text(self.region.as_deref()),
			"endpoint" => FieldState::of_text(self.endpoint.as_deref()),
			"access_key_id" => FieldState::of_text(self.access_key_id.as_deref()),
			"secret_access_key" => FieldState::of_text(self.secret_access_key.as_deref()),
			"session_token" => FieldState::of_text(self.session_token.as_deref()),
			"profile" => FieldState::of_text(self.profile.as_deref()),
			_ => FieldState::Absent,
		}
	}
}

fn required(value: Option<String>, field: &str) -> Result<String, ConfigError> {
	match value {
		Some(value) if !value.is_empty() => Ok(value),
		Some(_) => Err(ConfigError::EmptyField { field: field.to_owned() }),
		None => Err(ConfigError::MissingField { field: field.to_owned() }),
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.is_empty())
}

pub(super) fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
	let mut url = Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { source })?;

	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::UnsupportedEndpointScheme { scheme: url.scheme().to_owned() });
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}

fn credential_source(
	access_key_id: Option<String>,
	secret_access_key: Option<String>,
	session_token: Option<String>,
	profile: Option<String>,
) -> Result<CredentialSource, ConfigError> {
	match (access_key_id, secret_access_key, profile) {
		(Some(_), Some(_), Some(_)) => Err(ConfigError::ConflictingCredentials),
		(Some(access_key_id), Some(secret_access_key), None) => Ok(CredentialSource::Static {
			access_key_id,
			secret_access_key: Secret::new(secret_access_key),
			session_token: session_token.map(Secret::new),
		}),
		(Some(_), None, _) | (None, Some(_), _) => Err(ConfigError::IncompleteKeyPair),
		(None, None, Some(profile)) => Ok(CredentialSource::Profile(profile)),
		(None, None, None) => Ok(CredentialSource::Ambient),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn minimal() -> ClientConfigBuilder {
		ClientConfigBuilder::new()
			.identity_pool_id("us-east-1:abc")
			.developer_provider_name("com.example.app")
			.region("us-east-1")
	}

	#[test]
	fn build_applies_documented_defaults() {
		let config = minimal().build().expect("Minimal configuration should build.");

		assert_eq!(config.token_duration, Duration::seconds(86_400));
		assert_eq!(config.federation_provider_name.as_ref(), "cognito-identity.amazonaws.com");
		assert_eq!(
			config.service.endpoint.as_str(),
			"https://cognito-identity.us-east-1.amazonaws.com/"
		);
		assert_eq!(config.service.credentials, CredentialSource::Ambient);
	}

	#[test]
	fn build_reports_first_missing_field() {
		let err = ClientConfigBuilder::new()
			.region("us-east-1")
			.build()
			.expect_err("Missing pool id should fail.");

		assert_eq!(err.field(), Some("identity_pool_id"));
		assert!(matches!(err, ConfigError::MissingField { .. }));

		let err = ClientConfigBuilder::new()
			.identity_pool_id("us-east-1:abc")
			.developer_provider_name("")
			.build()
			.expect_err("Missing region should win over the empty provider name.");

		assert!(matches!(err, ConfigError::MissingField { ref field } if field == "region"));
	}

	#[test]
	fn build_rejects_invalid_values() {
		let err = minimal().token_duration_seconds(-5).build().expect_err("Negative duration.");

		assert!(matches!(err, ConfigError::NonPositiveTokenDuration));

		let err = minimal().token_duration_seconds(0).build().expect_err("Zero duration.");

		assert!(matches!(err, ConfigError::NonPositiveTokenDuration));

		let err = minimal().identity_pool_id("abc").build().expect_err("Unqualified pool id.");

		assert!(matches!(err, ConfigError::InvalidIdentifier { field: "identity_pool_id", .. }));

		let err = minimal().endpoint("ftp://example.com").build().expect_err("Bad scheme.");

		assert!(matches!(err, ConfigError::UnsupportedEndpointScheme { .. }));
	}

	#[test]
	fn credential_selection_is_validated() {
		let config = minimal()
			.static_credentials("AKIDEXAMPLE", "secret")
			.session_token("session")
			.build()
			.expect("Static key pair should build.");

		assert!(matches!(config.service.credentials, CredentialSource::Static { .. }));

		let mut half = minimal();

		half.access_key_id = Some("AKIDEXAMPLE".into());

		assert!(matches!(half.build(), Err(ConfigError::IncompleteKeyPair)));
		assert!(matches!(
			minimal().static_credentials("AK", "SK").profile("dev").build(),
			Err(ConfigError::ConflictingCredentials)
		));
		assert_eq!(
			minimal().profile("dev").build().map(|config| config.service.credentials).ok(),
			Some(CredentialSource::Profile("dev".into()))
		);
	}

	#[test]
	fn endpoint_override_gains_trailing_slash() {
		let config = minimal()
			.endpoint("http://127.0.0.1:4566/cognito")
			.build()
			.expect("Endpoint override should build.");

		assert_eq!(config.service.endpoint.as_str(), "http://127.0.0.1:4566/cognito/");
		assert_eq!(config.service.ping_url().as_str(), "http://127.0.0.1:4566/cognito/ping");
	}
}

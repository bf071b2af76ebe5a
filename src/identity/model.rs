//! Handshake data model: proofs, federated identities, temporary credentials, and identity pages.
//!
//! Wire names follow the identity service (`IdentityId`, `Credentials`, `NextToken`, ...) so the
//! same types serialize back into the shape callers of the service already know. Unknown fields
//! returned by the service are kept in `extra` maps and survive the handshake merge.

// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError};
// self
use crate::{
	_prelude::*,
	error::ArgumentError,
	identity::{IdentityId, IdentityPoolId, Secret},
};

/// Caller-supplied proof of a user's identity under the developer provider
/// (a verified email, an account id, ...).
#[derive(Clone, PartialEq, Eq)]
pub struct AuthoritativeProperty(String);
impl AuthoritativeProperty {
	/// Wraps a proof value, rejecting empty input.
	pub fn new(value: impl Into<String>) -> Result<Self, ArgumentError> {
		let value = value.into();

		if value.is_empty() {
			return Err(ArgumentError::EmptyAuthoritativeProperty);
		}

		Ok(Self(value))
	}

	/// Returns the raw proof value.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl TryFrom<&str> for AuthoritativeProperty {
	type Error = ArgumentError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl TryFrom<&String> for AuthoritativeProperty {
	type Error = ArgumentError;

	fn try_from(value: &String) -> Result<Self, Self::Error> {
		Self::new(value.as_str())
	}
}
impl TryFrom<String> for AuthoritativeProperty {
	type Error = ArgumentError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl TryFrom<Option<&str>> for AuthoritativeProperty {
	type Error = ArgumentError;

	fn try_from(value: Option<&str>) -> Result<Self, Self::Error> {
		value.ok_or(ArgumentError::EmptyAuthoritativeProperty).and_then(Self::new)
	}
}
impl Debug for AuthoritativeProperty {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AuthoritativeProperty").field(&"<redacted>").finish()
	}
}

/// Identity handle plus short-lived OpenID token produced by the token exchange.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FederatedIdentity {
	/// Stable identity handle.
	pub identity_id: IdentityId,
	/// Short-lived OpenID token, redacted in logs.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token: Option<Secret>,
	/// Role to assume during the credential exchange.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub custom_role_arn: Option<String>,
	/// Passthrough fields returned by the service.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl FederatedIdentity {
	/// Creates an identity carrying the provided token.
	pub fn new(identity_id: IdentityId, token: impl Into<Secret>) -> Self {
		Self {
			identity_id,
			token: Some(token.into()),
			custom_role_arn: None,
			extra: JsonMap::new(),
		}
	}

	/// Sets the role requested during the credential exchange.
	pub fn with_custom_role_arn(mut self, arn: impl Into<String>) -> Self {
		self.custom_role_arn = Some(arn.into());

		self
	}
}

/// Temporary access key, secret key, and session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
	/// Access key identifier.
	pub access_key_id: String,
	/// Secret access key, redacted in logs.
	pub secret_key: Secret,
	/// Session token, redacted in logs.
	pub session_token: Secret,
	/// Instant after which the credentials stop working.
	#[serde(with = "epoch_seconds")]
	pub expiration: OffsetDateTime,
}
impl Credentials {
	/// Returns `true` once `instant` is at or past the expiration.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expiration
	}
}

/// Result of the credential exchange; the caller owns any caching or refresh policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemporaryCredentials {
	/// Identity the credentials were issued for.
	pub identity_id: IdentityId,
	/// Issued credentials.
	pub credentials: Credentials,
	/// Passthrough fields returned by the service.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

/// Both halves of the handshake merged into one value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Authorization {
	/// Identity handle (the credential exchange's value wins on mismatch).
	pub identity_id: IdentityId,
	/// OpenID token from the token exchange.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token: Option<Secret>,
	/// Role requested during the credential exchange, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub custom_role_arn: Option<String>,
	/// Temporary credentials.
	pub credentials: Credentials,
	/// Passthrough fields from both steps; the later step wins on key collision.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl Authorization {
	const TYPED_KEYS: [&'static str; 4] = ["IdentityId", "Token", "CustomRoleArn", "Credentials"];

	/// Merges the token-exchange result with the credential-exchange result.
	///
	/// Fields from the credential exchange overwrite fields from the token exchange, including a
	/// `Token` or `CustomRoleArn` echoed back by the credential exchange.
	pub fn merge(identity: FederatedIdentity, credentials: TemporaryCredentials) -> Self {
		let mut later = credentials.extra;
		let token = take_text(&mut later, "Token").map(Secret::new).or(identity.token);
		let custom_role_arn = take_text(&mut later, "CustomRoleArn").or(identity.custom_role_arn);
		let mut extra = identity.extra;

		extra.extend(later);

		for key in Self::TYPED_KEYS {
			extra.remove(key);
		}

		Self {
			identity_id: credentials.identity_id,
			token,
			custom_role_arn,
			credentials: credentials.credentials,
			extra,
		}
	}

	/// Splits the merged value back into the identity half.
	pub fn identity(&self) -> FederatedIdentity {
		FederatedIdentity {
			identity_id: self.identity_id.clone(),
			token: self.token.clone(),
			custom_role_arn: self.custom_role_arn.clone(),
			extra: JsonMap::new(),
		}
	}
}

fn take_text(map: &mut JsonMap<String, JsonValue>, key: &str) -> Option<String> {
	match map.remove(key) {
		Some(JsonValue::String(value)) if !value.is_empty() => Some(value),
		_ => None,
	}
}

/// One identity listed from the pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityDescription {
	/// Identity handle.
	pub identity_id: IdentityId,
	/// Provider names linked to the identity.
	#[serde(default)]
	pub logins: Vec<String>,
	/// Creation instant.
	#[serde(default, with = "epoch_seconds::option", skip_serializing_if = "Option::is_none")]
	pub creation_date: Option<OffsetDateTime>,
	/// Last modification instant.
	#[serde(default, with = "epoch_seconds::option", skip_serializing_if = "Option::is_none")]
	pub last_modified_date: Option<OffsetDateTime>,
}

/// One page of identities plus the continuation token, if more remain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityListPage {
	/// Pool the page was listed from.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub identity_pool_id: Option<IdentityPoolId>,
	/// Identities on this page.
	#[serde(default)]
	pub identities: Vec<IdentityDescription>,
	/// Continuation token for the next page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub next_token: Option<String>,
}
impl IdentityListPage {
	/// Returns `true` when the service reported more pages.
	pub fn has_more(&self) -> bool {
		self.next_token.as_deref().is_some_and(|token| !token.is_empty())
	}
}

/// Epoch-seconds timestamps; the service sends integers or fractional seconds.
mod epoch_seconds {
	// self
	use super::*;

	pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(value.unix_timestamp())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		from_seconds(f64::deserialize(deserializer)?).map_err(D::Error::custom)
	}

	fn from_seconds(secs: f64) -> Result<OffsetDateTime, String> {
		if !secs.is_finite() {
			return Err(format!("timestamp {secs} is not finite"));
		}

		let whole = secs.floor();
		let nanos = ((secs - whole) * 1_000_000_000_f64).round() as i64;

		OffsetDateTime::from_unix_timestamp(whole as i64)
			.map_err(|e| e.to_string())?
			.checked_add(Duration::nanoseconds(nanos))
			.ok_or_else(|| format!("timestamp {secs} is out of range"))
	}

	pub mod option {
		// self
		use super::*;

		pub fn serialize<S>(
			value: &Option<OffsetDateTime>,
			serializer: S,
		) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			match value {
				Some(instant) => serializer.serialize_some(&instant.unix_timestamp()),
				None => serializer.serialize_none(),
			}
		}

		pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
		where
			D: Deserializer<'de>,
		{
			Option::<f64>::deserialize(deserializer)?
				.map(from_seconds)
				.transpose()
				.map_err(D::Error::custom)
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn identity_id(value: &str) -> IdentityId {
		IdentityId::new(value).expect("Identity fixture should be valid.")
	}

	#[test]
	fn authoritative_property_rejects_empty_and_null() {
		assert_eq!(
			AuthoritativeProperty::try_from(""),
			Err(ArgumentError::EmptyAuthoritativeProperty)
		);
		assert_eq!(
			AuthoritativeProperty::try_from(None::<&str>),
			Err(ArgumentError::EmptyAuthoritativeProperty)
		);

		let property = AuthoritativeProperty::try_from(Some("user@example.com"))
			.expect("Non-empty property should be accepted.");

		assert_eq!(property.expose(), "user@example.com");
		assert_eq!(format!("{property:?}"), "AuthoritativeProperty(\"<redacted>\")");
	}

	#[test]
	fn credentials_accept_integer_and_fractional_expirations() {
		let whole: TemporaryCredentials = serde_json::from_str(
			r#"{"IdentityId":"id1","Credentials":{"AccessKeyId":"AK","SecretKey":"SK","SessionToken":"ST","Expiration":1234567890}}"#,
		)
		.expect("Integer expiration should decode.");
		let fractional: Credentials = serde_json::from_str(
			r#"{"AccessKeyId":"AK","SecretKey":"SK","SessionToken":"ST","Expiration":1.2345678905E9}"#,
		)
		.expect("Fractional expiration should decode.");

		assert_eq!(whole.credentials.expiration, datetime!(2009-02-13 23:31:30 UTC));
		assert_eq!(fractional.expiration, datetime!(2009-02-13 23:31:30.5 UTC));
		assert!(whole.credentials.is_expired_at(datetime!(2009-02-13 23:31:30 UTC)));
		assert!(!whole.credentials.is_expired_at(datetime!(2009-02-13 23:31:29 UTC)));
	}

	#[test]
	fn merge_prefers_credential_exchange_fields() {
		let mut identity = FederatedIdentity::new(identity_id("id-from-token"), "tok1");

		identity.extra.insert("Shared".into(), JsonValue::from("from-token"));
		identity.extra.insert("OnlyToken".into(), JsonValue::from(1));
		identity.extra.insert("Credentials".into(), JsonValue::from("shadow"));

		let mut credentials = TemporaryCredentials {
			identity_id: identity_id("id-from-credentials"),
			credentials: Credentials {
				access_key_id: "AK".into(),
				secret_key: Secret::new("SK"),
				session_token: Secret::new("ST"),
				expiration: datetime!(2009-02-13 23:31:30 UTC),
			},
			extra: JsonMap::new(),
		};

		credentials.extra.insert("Shared".into(), JsonValue::from("from-credentials"));

		let merged = Authorization::merge(identity, credentials);

		assert_eq!(merged.identity_id.as_ref(), "id-from-credentials");
		assert_eq!(merged.token.as_ref().map(Secret::expose), Some("tok1"));
		assert_eq!(merged.credentials.access_key_id, "AK");
		assert_eq!(merged.extra.get("Shared"), Some(&JsonValue::from("from-credentials")));
		assert_eq!(merged.extra.get("OnlyToken"), Some(&JsonValue::from(1)));
		assert!(!merged.extra.contains_key("Credentials"));

		let json = serde_json::to_value(&merged).expect("Merged value should serialize.");

		assert_eq!(json["Token"], "tok1");
		assert_eq!(json["Credentials"]["Expiration"], 1234567890);
		assert_eq!(json["Shared"], "from-credentials");
	}

	#[test]
	fn identity_page_reports_continuation() {
		let page: IdentityListPage = serde_json::from_str(
			r#"{"IdentityPoolId":"us-east-1:abc","Identities":[{"IdentityId":"us-east-1:id","Logins":["com.example.app"],"CreationDate":1.7E9}],"NextToken":"tok123"}"#,
		)
		.expect("Identity page should decode.");

		assert!(page.has_more());
		assert_eq!(page.identities.len(), 1);
		assert_eq!(page.identities[0].logins, vec!["com.example.app".to_owned()]);
		assert!(page.identities[0].creation_date.is_some());
		assert!(!IdentityListPage::default().has_more());
	}
}

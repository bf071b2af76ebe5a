//! Broker-level error types shared by the validator, the prober, and the orchestrator.

// self
use crate::{_prelude::*, identity::IdentifierError};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Construction-time configuration problem; no authorizer is produced.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Call-time argument problem raised before any network I/O.
	#[error(transparent)]
	Argument(#[from] ArgumentError),
	/// Failure reported by the identity-federation service, passed through unchanged.
	#[error(transparent)]
	Service(#[from] ServiceError),
	/// Successful response whose body does not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Transport failure (DNS, TCP, TLS, IO).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Caller-supplied request signer refused to sign a developer-authenticated call.
	#[error("Request signer failed to sign the {action} request.")]
	Signing {
		/// Service action that was being signed.
		action: &'static str,
		/// Underlying signer failure.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Wraps a signer failure for the provided service action.
	pub fn signing(action: &'static str, src: impl Into<BoxError>) -> Self {
		Self::Signing { action, source: src.into() }
	}

	/// Returns the remote error code when the failure came from the service.
	pub fn service_code(&self) -> Option<&str> {
		match self {
			Self::Service(err) => Some(err.code.as_str()),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while constructing an authorizer.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required field is absent from the supplied options.
	#[error("Missing or empty property: `{field}` is required.")]
	MissingField {
		/// Name of the first missing field, in declared order.
		field: String,
	},
	/// A required field is present but falsy (empty string, `0`, `null`, `false`).
	#[error("Missing or empty property: `{field}` must not be empty.")]
	EmptyField {
		/// Name of the first empty field, in declared order.
		field: String,
	},
	/// A field holds an identifier that fails format validation.
	#[error("Field `{field}` holds an invalid identifier.")]
	InvalidIdentifier {
		/// Offending field name.
		field: &'static str,
		/// Underlying identifier failure.
		#[source]
		source: IdentifierError,
	},
	/// Token duration must be a positive number of seconds.
	#[error("The token_duration_seconds value must be positive.")]
	NonPositiveTokenDuration,
	/// Only one half of a static key pair was supplied.
	#[error("Static credentials require both access_key_id and secret_access_key.")]
	IncompleteKeyPair,
	/// Static keys and a named profile were both supplied.
	#[error("Static credentials and a named profile cannot be combined.")]
	ConflictingCredentials,
	/// Endpoint override cannot be parsed.
	#[error("Endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint override uses a scheme other than http or https.
	#[error("Endpoint scheme `{scheme}` is not supported.")]
	UnsupportedEndpointScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// Raw options could not be mapped onto the configuration schema.
	#[error("Options do not match the configuration schema.")]
	Options(#[source] serde_json::Error),
	/// Outgoing request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody(#[source] serde_json::Error),
	/// HTTP client or request could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Returns the offending field name for field-level failures.
	pub fn field(&self) -> Option<&str> {
		match self {
			Self::MissingField { field } | Self::EmptyField { field } => Some(field),
			Self::InvalidIdentifier { field, .. } => Some(field),
			Self::NonPositiveTokenDuration => Some("token_duration_seconds"),
			_ => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Call-time argument failures.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ArgumentError {
	/// The authoritative property is missing or empty.
	#[error("An authoritative property is required.")]
	EmptyAuthoritativeProperty,
}

/// Error reported by the identity-federation service.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{code}: {}", message.as_deref().unwrap_or("no message"))]
pub struct ServiceError {
	/// Service error code (e.g. `NotAuthorizedException`, `ServiceUnavailable`).
	pub code: String,
	/// Human-readable message, when supplied.
	pub message: Option<String>,
	/// HTTP status code, when available.
	pub status: Option<u16>,
	/// Request identifier echoed by the service, when available.
	pub request_id: Option<String>,
}
impl ServiceError {
	/// Creates a new error with the provided code and no further metadata.
	pub fn new(code: impl Into<String>) -> Self {
		Self { code: code.into(), message: None, status: None, request_id: None }
	}

	/// Attaches a human-readable message.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());

		self
	}

	/// Attaches the HTTP status code.
	pub fn with_status(mut self, status: u16) -> Self {
		self.status = Some(status);

		self
	}

	/// Attaches the service request identifier.
	pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
		self.request_id = Some(request_id.into());

		self
	}
}

/// A successful response body could not be decoded.
#[derive(Debug, ThisError)]
#[error("The {action} response could not be decoded.")]
pub struct DecodeError {
	/// Service action whose response failed to decode.
	pub action: &'static str,
	/// Structured parsing failure with the offending JSON path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status code, when available.
	pub status: Option<u16>,
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the identity service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

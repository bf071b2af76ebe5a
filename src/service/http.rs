//! reqwest-backed [`IdentityService`] speaking the AWS JSON 1.1 protocol.
//!
//! Every action is a `POST` to the endpoint root carrying `x-amz-target` and an
//! `application/x-amz-json-1.1` body. Non-2xx responses are decoded into [`ServiceError`]
//! from the `x-amzn-errortype` header or the `__type` body field; successful bodies go through
//! `serde_path_to_error` so decode failures name the offending field.

// crates.io
use reqwest::{
	Request as ReqwestRequest, StatusCode,
	header::{CONTENT_TYPE, HeaderMap},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::ServiceSettings,
	error::{ConfigError, DecodeError, ServiceError, TransportError},
	identity::{FederatedIdentity, IdentityListPage, TemporaryCredentials},
	service::{
		CredentialsForIdentityRequest, DeveloperIdentityTokenRequest, IdentityService,
		ListIdentitiesRequest, RequestSigner, ServiceAction, ServiceFuture, SigningContext,
		UnsignedRequests,
	},
};

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const AMZ_TARGET: &str = "x-amz-target";
const AMZ_ERROR_TYPE: &str = "x-amzn-errortype";
const AMZ_REQUEST_ID: &str = "x-amzn-requestid";

/// Identity service client built on [`ReqwestClient`].
///
/// Cloning is cheap; clones share the connection pool and the signer.
#[derive(Clone)]
pub struct ReqwestIdentityService {
	client: ReqwestClient,
	settings: ServiceSettings,
	ping_url: Url,
	signer: Arc<dyn RequestSigner<ReqwestRequest>>,
}
impl ReqwestIdentityService {
	/// Builds a client with a fresh reqwest connection pool and no request signing.
	pub fn new(settings: ServiceSettings) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().build()?;

		Ok(Self::with_client(client, settings))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient, settings: ServiceSettings) -> Self {
		let ping_url = settings.ping_url();

		Self { client, settings, ping_url, signer: Arc::new(UnsignedRequests) }
	}

	/// Installs the signer used for developer-authenticated actions.
	pub fn with_signer(mut self, signer: impl 'static + RequestSigner<ReqwestRequest>) -> Self {
		self.signer = Arc::new(signer);

		self
	}

	/// Settings the client was built from.
	pub fn settings(&self) -> &ServiceSettings {
		&self.settings
	}

	async fn invoke<Req, Resp>(&self, action: ServiceAction, body: &Req) -> Result<Resp>
	where
		Req: Serialize,
		Resp: DeserializeOwned,
	{
		let payload = serde_json::to_vec(body).map_err(ConfigError::RequestBody)?;
		let mut request = self
			.client
			.post(self.settings.endpoint.clone())
			.header(CONTENT_TYPE, AMZ_JSON)
			.header(AMZ_TARGET, action.target())
			.body(payload)
			.build()
			.map_err(ConfigError::from)?;

		if action.requires_signing() {
			let context = SigningContext {
				action,
				region: &self.settings.region,
				service: ServiceSettings::SIGNING_NAME,
				credentials: &self.settings.credentials,
			};

			self.signer
				.sign(&mut request, &context)
				.map_err(|source| Error::signing(action.as_str(), source))?;
		}

		let response = self.client.execute(request).await.map_err(map_reqwest_error)?;
		let status = response.status();
		let headers = response.headers().to_owned();
		let bytes = response.bytes().await.map_err(TransportError::from)?;

		if !status.is_success() {
			return Err(service_error(status, &headers, &bytes).into());
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			DecodeError { action: action.as_str(), source, status: Some(status.as_u16()) }.into()
		})
	}
}
impl Debug for ReqwestIdentityService {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReqwestIdentityService")
			.field("endpoint", &self.settings.endpoint.as_str())
			.field("region", &self.settings.region)
			.finish()
	}
}
impl IdentityService for ReqwestIdentityService {
	fn ping(&self) -> ServiceFuture<'_, String> {
		Box::pin(async move {
			let response =
				self.client.get(self.ping_url.clone()).send().await.map_err(map_reqwest_error)?;

			response.text().await.map_err(|err| TransportError::from(err).into())
		})
	}

	fn get_open_id_token_for_developer_identity(
		&self,
		request: DeveloperIdentityTokenRequest,
	) -> ServiceFuture<'_, FederatedIdentity> {
		Box::pin(async move {
			self.invoke(ServiceAction::GetOpenIdTokenForDeveloperIdentity, &request).await
		})
	}

	fn get_credentials_for_identity(
		&self,
		request: CredentialsForIdentityRequest,
	) -> ServiceFuture<'_, TemporaryCredentials> {
		Box::pin(
			async move { self.invoke(ServiceAction::GetCredentialsForIdentity, &request).await },
		)
	}

	fn list_identities(
		&self,
		request: ListIdentitiesRequest,
	) -> ServiceFuture<'_, IdentityListPage> {
		Box::pin(async move { self.invoke(ServiceAction::ListIdentities, &request).await })
	}
}

#[derive(Debug, Default, Deserialize)]
struct WireError {
	#[serde(rename = "__type")]
	kind: Option<String>,
	#[serde(alias = "Message")]
	message: Option<String>,
}

fn service_error(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> ServiceError {
	let wire: WireError = serde_json::from_slice(body).unwrap_or_default();
	let code = header_str(headers, AMZ_ERROR_TYPE)
		.map(|value| value.split_once(':').map_or(value, |(code, _)| code).to_owned())
		.or_else(|| {
			let kind = wire.kind.as_deref()?;

			Some(kind.rsplit_once('#').map_or(kind, |(_, code)| code).to_owned())
		})
		.filter(|code| !code.is_empty())
		.unwrap_or_else(|| status_code_name(status));
	let mut err = ServiceError::new(code).with_status(status.as_u16());

	if let Some(message) = wire.message.filter(|message| !message.is_empty()) {
		err = err.with_message(message);
	}
	if let Some(request_id) = header_str(headers, AMZ_REQUEST_ID) {
		err = err.with_request_id(request_id);
	}

	err
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers.get(name).and_then(|value| value.to_str().ok()).map(str::trim)
}

fn status_code_name(status: StatusCode) -> String {
	match status.canonical_reason() {
		Some(reason) => reason.split_whitespace().collect(),
		None => format!("Http{}", status.as_u16()),
	}
}

fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}

	TransportError::from(err).into()
}

//! Credential-exchange orchestration bound to one validated configuration.
//!
//! An [`Authorizer`] owns an [`IdentityService`] handle, the immutable [`ClientConfig`], and a
//! [`ReadinessFlag`] written by a background liveness probe spawned at construction. Clones share
//! all three, so a single authorizer can serve any number of concurrent callers.

pub mod readiness;

mod exchange;

pub use exchange::*;
pub use readiness::*;

// self
use crate::{_prelude::*, config::ClientConfig, service::IdentityService};
#[cfg(feature = "reqwest")]
use crate::{config::ClientConfigBuilder, service::ReqwestIdentityService};

#[cfg(feature = "reqwest")]
/// Authorizer specialized for the crate's default reqwest transport.
pub type ReqwestAuthorizer = Authorizer<ReqwestIdentityService>;

/// Trades authoritative properties for temporary credentials against one identity pool.
///
/// Construction never performs I/O on the caller's path: the configuration is validated
/// synchronously and the endpoint probe runs on the ambient tokio runtime. Call
/// [`Authorizer::readiness`] or await [`Authorizer::settled`] to observe its result.
pub struct Authorizer<S>
where
	S: ?Sized + IdentityService,
{
	service: Arc<S>,
	config: Arc<ClientConfig>,
	readiness: ReadinessFlag,
}
impl<S> Authorizer<S>
where
	S: ?Sized + IdentityService,
{
	/// Creates an authorizer around a caller-provided service and starts the readiness probe.
	pub fn with_service(config: ClientConfig, service: Arc<S>) -> Self {
		let authorizer = Self {
			service,
			config: Arc::new(config),
			readiness: ReadinessFlag::default(),
		};

		authorizer.spawn_readiness_probe();

		authorizer
	}

	/// Validated configuration the authorizer was built from.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Shared identity-service handle.
	pub fn service(&self) -> &Arc<S> {
		&self.service
	}

	/// Current readiness; [`Readiness::Unknown`] until the probe settles.
	pub fn readiness(&self) -> Readiness {
		self.readiness.get()
	}

	/// Whether the probe has settled to [`Readiness::Ready`].
	pub fn is_ready(&self) -> bool {
		self.readiness().is_ready()
	}

	/// Waits for the probe to settle and returns the settled state.
	pub async fn settled(&self) -> Readiness {
		self.readiness.settled().await
	}
}
#[cfg(feature = "reqwest")]
impl Authorizer<ReqwestIdentityService> {
	/// Creates an authorizer with the default reqwest-backed service client.
	///
	/// Requests are left unsigned; build a [`ReqwestIdentityService`] with
	/// [`ReqwestIdentityService::with_signer`] and pass it to [`Authorizer::with_service`] when
	/// the endpoint checks signatures.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let service = ReqwestIdentityService::new(config.service.clone())?;

		Ok(Self::with_service(config, Arc::new(service)))
	}

	/// Validates `builder` and creates an authorizer from it.
	pub fn from_builder(builder: ClientConfigBuilder) -> Result<Self> {
		Self::new(builder.build()?)
	}

	/// Validates a raw options object and creates an authorizer from it.
	pub fn from_options(options: &JsonMap<String, JsonValue>) -> Result<Self> {
		Self::new(ClientConfig::from_options(options)?)
	}
}
impl<S> Clone for Authorizer<S>
where
	S: ?Sized + IdentityService,
{
	fn clone(&self) -> Self {
		Self {
			service: self.service.clone(),
			config: self.config.clone(),
			readiness: self.readiness.clone(),
		}
	}
}
impl<S> Debug for Authorizer<S>
where
	S: ?Sized + IdentityService,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authorizer")
			.field("identity_pool_id", &self.config.identity_pool_id)
			.field("developer_provider_name", &self.config.developer_provider_name)
			.field("readiness", &self.readiness())
			.finish()
	}
}

//! Request signing hook for developer-authenticated calls.

// self
use crate::{_prelude::*, config::CredentialSource, service::ServiceAction};

/// Error type signers report; surfaced to callers as [`Error::Signing`].
pub type SignerError = Box<dyn StdError + Send + Sync>;

/// Signs outbound developer-authenticated requests without tying the broker to a signing
/// implementation.
///
/// `GetOpenIdTokenForDeveloperIdentity` and `ListIdentities` require developer credentials;
/// the transport hands those requests to the signer right before dispatch. The trait is generic
/// over the request type so any client (reqwest, a vendor SDK, a test double) can implement it.
pub trait RequestSigner<Request>
where
	Self: Send + Sync,
{
	/// Adds authentication material (headers, query parameters) to `request`.
	fn sign(&self, request: &mut Request, context: &SigningContext<'_>) -> Result<(), SignerError>;
}

/// Everything a signer needs besides the request itself.
#[derive(Clone, Copy, Debug)]
pub struct SigningContext<'a> {
	/// Action being signed.
	pub action: ServiceAction,
	/// Region of the identity pool.
	pub region: &'a str,
	/// Signing name of the service.
	pub service: &'static str,
	/// Credential selection forwarded from configuration.
	pub credentials: &'a CredentialSource,
}

/// Signer that leaves requests untouched, for endpoints that do not check signatures
/// (local emulators, authenticating proxies).
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsignedRequests;
impl<Request> RequestSigner<Request> for UnsignedRequests {
	fn sign(&self, _: &mut Request, _: &SigningContext<'_>) -> Result<(), SignerError> {
		Ok(())
	}
}

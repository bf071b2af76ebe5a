//! Token exchange, credential exchange, their composition, and identity listing.

// self
use crate::{
	_prelude::*,
	authorizer::Authorizer,
	error::ArgumentError,
	identity::{
		AuthoritativeProperty, Authorization, FederatedIdentity, IdentityListPage,
		TemporaryCredentials,
	},
	obs::{self, Operation},
	service::{
		CredentialsForIdentityRequest, DeveloperIdentityTokenRequest, IdentityService,
		ListIdentitiesRequest, ServiceFuture,
	},
};

/// Paging parameters for [`Authorizer::list_identities`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListIdentitiesQuery {
	/// Page size.
	pub max_results: u32,
	/// Continuation token from a previous page; empty counts as absent.
	pub next_token: Option<String>,
}
impl ListIdentitiesQuery {
	/// Page size used when the caller does not pick one.
	pub const DEFAULT_MAX_RESULTS: u32 = 10;

	/// Creates a query for the first page with the default page size.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the page size.
	pub fn with_max_results(mut self, max_results: u32) -> Self {
		self.max_results = max_results;

		self
	}

	/// Continues from a previous page.
	pub fn with_next_token(mut self, next_token: impl Into<String>) -> Self {
		self.next_token = Some(next_token.into());

		self
	}
}
impl Default for ListIdentitiesQuery {
	fn default() -> Self {
		Self { max_results: Self::DEFAULT_MAX_RESULTS, next_token: None }
	}
}

impl<S> Authorizer<S>
where
	S: ?Sized + IdentityService,
{
	/// Exchanges an authoritative property for an identity id and OpenID token.
	///
	/// The property is checked before anything else: a missing or empty value returns
	/// [`ArgumentError::EmptyAuthoritativeProperty`] right away and the service is never called.
	/// Otherwise the returned future performs the exchange and resolves with the service's
	/// result unchanged.
	pub fn exchange_identity_token<P>(
		&self,
		authoritative_property: P,
	) -> Result<ServiceFuture<'_, FederatedIdentity>>
	where
		P: TryInto<AuthoritativeProperty, Error = ArgumentError>,
	{
		let property = authoritative_property.try_into()?;

		Ok(self.identity_token(&property))
	}

	/// Exchanges an identity's OpenID token for temporary credentials.
	///
	/// `custom_role_arn` overrides the role carried by `identity`. An identity without a token is
	/// sent with an empty login map and left for the service to reject.
	pub async fn exchange_credentials(
		&self,
		identity: &FederatedIdentity,
		custom_role_arn: Option<&str>,
	) -> Result<TemporaryCredentials> {
		let request = CredentialsForIdentityRequest::new(&self.config, identity, custom_role_arn);

		obs::observe(
			Operation::Credentials,
			"exchange_credentials",
			self.service.get_credentials_for_identity(request),
		)
		.await
	}

	/// Runs the token exchange followed by the credential exchange and merges both results.
	///
	/// A token-exchange failure is returned as is and the credential exchange is skipped.
	pub async fn authorize<P>(&self, authoritative_property: P) -> Result<Authorization>
	where
		P: TryInto<AuthoritativeProperty, Error = ArgumentError>,
	{
		self.authorize_inner(authoritative_property.try_into()?, None).await
	}

	/// Same as [`Authorizer::authorize`], assuming `custom_role_arn` during the credential
	/// exchange.
	pub async fn authorize_with_role<P>(
		&self,
		authoritative_property: P,
		custom_role_arn: &str,
	) -> Result<Authorization>
	where
		P: TryInto<AuthoritativeProperty, Error = ArgumentError>,
	{
		self.authorize_inner(authoritative_property.try_into()?, Some(custom_role_arn)).await
	}

	/// Lists one page of identities in the configured pool, disabled identities excluded.
	pub async fn list_identities(&self, query: ListIdentitiesQuery) -> Result<IdentityListPage> {
		let ListIdentitiesQuery { max_results, next_token } = query;
		let request = ListIdentitiesRequest::new(&self.config, max_results, next_token.as_deref());

		obs::observe(
			Operation::ListIdentities,
			"list_identities",
			self.service.list_identities(request),
		)
		.await
	}

	fn identity_token(
		&self,
		property: &AuthoritativeProperty,
	) -> ServiceFuture<'_, FederatedIdentity> {
		let request = DeveloperIdentityTokenRequest::new(&self.config, property);

		Box::pin(obs::observe(
			Operation::IdentityToken,
			"exchange_identity_token",
			self.service.get_open_id_token_for_developer_identity(request),
		))
	}

	async fn authorize_inner(
		&self,
		property: AuthoritativeProperty,
		custom_role_arn: Option<&str>,
	) -> Result<Authorization> {
		obs::observe(Operation::Authorize, "authorize", async move {
			let mut identity = self.identity_token(&property).await?;
			let credentials = self.exchange_credentials(&identity, custom_role_arn).await?;

			if let Some(arn) = custom_role_arn {
				identity.custom_role_arn = Some(arn.to_owned());
			}

			Ok(Authorization::merge(identity, credentials))
		})
		.await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_query_asks_for_ten_without_token() {
		let query = ListIdentitiesQuery::default();

		assert_eq!(query.max_results, 10);
		assert_eq!(query.next_token, None);
		assert_eq!(
			ListIdentitiesQuery::new().with_max_results(5).with_next_token("tok123"),
			ListIdentitiesQuery { max_results: 5, next_token: Some("tok123".into()) }
		);
	}
}

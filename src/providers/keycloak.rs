//! Keycloak OpenID Connect provider adapter.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::Method,
	profile::Profile,
	provider::{
		AdapterConfig, HookFuture, ProfileSource, ProviderDescriptor, ProviderHooks, ProviderId,
	},
	tree::TreeCursor,
};

/// Keycloak OpenID Connect provider adapter.
///
/// Keycloak is self-hosted, so the deployment `url` and `realm` settings are mandatory and the
/// endpoints are derived from them at configure time.
#[derive(Clone, Copy, Debug, Default)]
pub struct Keycloak;
impl ProviderHooks for Keycloak {
	fn configure(&self, config: &AdapterConfig) -> Result<ProviderDescriptor> {
		let url = config.require_setting("url")?;
		let realm = config.require_setting("realm")?;
		let base = Url::parse(&format!("{}/realms/{realm}/protocol/openid-connect/", url.trim_end_matches('/')))
			.map_err(|e| ConfigError::InvalidSetting { name: "url", reason: e.to_string() })?;
		let authorize = base
			.join("auth")
			.map_err(|e| ConfigError::InvalidSetting { name: "url", reason: e.to_string() })?;
		let token = base
			.join("token")
			.map_err(|e| ConfigError::InvalidSetting { name: "url", reason: e.to_string() })?;

		Ok(ProviderDescriptor::builder(ProviderId::new("keycloak")?)
			.authorize_endpoint(authorize)
			.token_endpoint(token)
			.api_base(base)
			.scope("openid profile email")
			.build()?)
	}

	fn fetch_profile<'a>(&'a self, api: &'a dyn ProfileSource) -> HookFuture<'a, Profile> {
		Box::pin(async move {
			let response = api.request("userinfo", Method::Get, &[]).await?;
			let data = TreeCursor::new(&response);
			let identifier = data
				.string("sub")
				.ok_or(Error::UnexpectedResponse { context: "user_profile" })?;
			let mut profile = Profile::new(identifier);

			profile.display_name = data.string("preferred_username");
			profile.email = data.string("email");
			profile.first_name = data.string("given_name");
			profile.last_name = data.string("family_name");

			if data.boolean("email_verified").unwrap_or(false) {
				profile.email_verified = profile.email.clone();
			}

			Ok(profile)
		})
	}
}

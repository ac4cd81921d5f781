//! Host-supplied adapter configuration.

// self
use crate::{_prelude::*, error::ConfigError};

/// Endpoint overrides applied on top of a provider's built-in defaults.
///
/// Useful for self-hosted instances (Mastodon-style deployments) and for pointing tests at mock
/// servers without touching provider code.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointOverrides {
	/// Replacement authorization endpoint.
	pub authorize: Option<Url>,
	/// Replacement token endpoint.
	pub token: Option<Url>,
	/// Replacement API base URL.
	pub api_base: Option<Url>,
}

/// Configuration the host application supplies for one adapter session.
///
/// Storage and transport are injected separately at construction; this struct carries only
/// declarative settings, so it can be deserialized from application configuration wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret; absent for public PKCE-only clients.
	pub client_secret: Option<String>,
	/// Redirect URI the provider sends the end-user back to.
	pub callback: Url,
	/// Scope override replacing the provider default.
	pub scope: Option<String>,
	/// Endpoint overrides replacing the provider defaults.
	pub endpoints: EndpointOverrides,
	/// Free-form provider-specific settings (tenant URL, realm, site, api key, …).
	pub settings: BTreeMap<String, String>,
}
impl AdapterConfig {
	/// Creates a configuration with the mandatory client identifier and callback.
	pub fn new(client_id: impl Into<String>, callback: Url) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: None,
			callback,
			scope: None,
			endpoints: EndpointOverrides::default(),
			settings: BTreeMap::new(),
		}
	}

	/// Sets or replaces the client secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Overrides the provider's default scope.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Replaces the endpoint overrides.
	pub fn with_endpoints(mut self, endpoints: EndpointOverrides) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Adds one provider-specific setting.
	pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.settings.insert(name.into(), value.into());

		self
	}

	/// Returns a provider-specific setting, if present.
	pub fn setting(&self, name: &str) -> Option<&str> {
		self.settings.get(name).map(String::as_str)
	}

	/// Returns a provider-specific setting or fails with [`ConfigError::MissingSetting`].
	pub fn require_setting(&self, name: &'static str) -> Result<&str, ConfigError> {
		self.setting(name).ok_or(ConfigError::MissingSetting { name })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn required_settings_fail_loudly() {
		let callback =
			Url::parse("https://app.example.com/callback").expect("Callback fixture should parse.");
		let config = AdapterConfig::new("client", callback).with_setting("realm", "main");

		assert_eq!(config.setting("realm"), Some("main"));
		assert_eq!(config.require_setting("realm").expect("Setting should be present."), "main");

		let err = config.require_setting("url").expect_err("Missing settings should fail.");

		assert!(matches!(err, ConfigError::MissingSetting { name: "url" }));
	}
}

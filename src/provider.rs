//! Provider adapter capability surface.
//!
//! Providers plug into the engine through data ([`ProviderDescriptor`]) wherever possible and
//! through [`ProviderHooks`] only where logic genuinely differs: profile extraction, derived
//! request decoration, and post-exchange bookkeeping. The surrounding flow engine is shared and
//! not overridable.

pub mod config;
pub mod descriptor;
pub mod id;

pub use config::*;
pub use descriptor::*;
pub use id::*;

// self
use crate::{_prelude::*, credential::Credential, http::Method, profile::Profile, tree::TreeCursor};

/// Boxed future returned by provider hook implementations.
pub type HookFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Extra request decoration derived from configuration and the stored credential.
///
/// Recomputed at construction and after every credential replacement, then merged into every
/// authorized API call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestDecor {
	/// Parameters merged into every authorized API call.
	pub api_params: Vec<(String, String)>,
	/// Headers merged into every authorized API call.
	pub api_headers: Vec<(String, String)>,
}

/// Capability surface every provider adapter implements.
///
/// Override only what you need—everything except [`configure`](Self::configure) has a default
/// implementation, and the defaults match the common case of a plain JSON REST provider.
pub trait ProviderHooks
where
	Self: Send + Sync,
{
	/// Validates provider-specific configuration and produces the immutable descriptor.
	///
	/// Missing or unusable required settings (a tenant URL, a realm) fail here, at
	/// construction, with a [`ConfigError`](crate::error::ConfigError).
	fn configure(&self, config: &AdapterConfig) -> Result<ProviderDescriptor>;

	/// Recomputes derived request decoration.
	///
	/// Runs at construction and again after every credential replacement, so parameters derived
	/// from configuration or the stored token stay consistent with it.
	fn initialize(&self, config: &AdapterConfig, credential: Option<&Credential>) -> RequestDecor {
		let _ = (config, credential);

		RequestDecor::default()
	}

	/// Mines provider-specific fields out of a successful token-exchange response.
	///
	/// Returned pairs are persisted under the provider namespace alongside the credential and
	/// surface in [`Credential::extras`].
	fn token_exchange_extras(&self, response: &TreeCursor<'_>) -> BTreeMap<String, String> {
		let _ = response;

		BTreeMap::new()
	}

	/// Fetches and normalizes the user profile through the adapter's API capability.
	///
	/// Implementations must fail with
	/// [`Error::UnexpectedResponse`](crate::error::Error::UnexpectedResponse) when the mandatory
	/// identifier is absent. The default declares the operation unsupported, matching
	/// OpenID-style providers without a profile surface.
	fn fetch_profile<'a>(&'a self, api: &'a dyn ProfileSource) -> HookFuture<'a, Profile> {
		let _ = api;

		Box::pin(async { Err(Error::NotSupported { operation: "user_profile" }) })
	}
}

/// API capability handed to [`ProviderHooks::fetch_profile`].
///
/// Keeps profile strategies pure: they can issue authorized requests and read stored
/// provider-specific values, nothing else.
pub trait ProfileSource
where
	Self: Send + Sync,
{
	/// Performs an authorized API request relative to the provider's API base.
	fn request<'a>(
		&'a self,
		path: &'a str,
		method: Method,
		params: &'a [(String, String)],
	) -> HookFuture<'a, Value>;

	/// Reads a provider-specific stored value (e.g. a subject id persisted at exchange time).
	fn stored<'a>(&'a self, name: &'a str) -> HookFuture<'a, Option<String>>;

	/// Returns the adapter configuration for settings lookups.
	fn config(&self) -> &AdapterConfig;
}

//! Provider descriptor data structures shared by the engine and adapters.
//!
//! A descriptor is the data half of a provider definition: endpoints, scope, wire quirks.
//! Everything that can be data lives here; logic that genuinely differs per provider lives in
//! [`ProviderHooks`](crate::provider::ProviderHooks).

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, provider::ProviderId};

/// Client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenEndpointAuth {
	#[default]
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
}

/// Where the bearer token rides on authorized API calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BearerPlacement {
	#[default]
	/// `Authorization: Bearer <token>` request header.
	AuthorizationHeader,
	/// Request parameter carrying the token, named per provider (e.g. `access_token`).
	Parameter(String),
}

/// Immutable per-provider configuration consumed by the engine.
///
/// One instance per provider type, shared read-only across sessions of that provider; nothing
/// mutates a descriptor after [`build`](ProviderDescriptorBuilder::build).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Provider identifier, doubling as the storage namespace.
	pub id: ProviderId,
	/// Authorization endpoint the end-user is redirected to.
	pub authorize_endpoint: Url,
	/// Token endpoint used for exchanges and refreshes.
	pub token_endpoint: Url,
	/// Base URL for authorized API calls; `None` marks providers without a REST surface.
	pub api_base: Option<Url>,
	/// Default scope string requested during authorization.
	pub scope: Option<String>,
	/// Extra query parameters appended to the authorization redirect.
	pub extra_auth_params: Vec<(String, String)>,
	/// Extra form parameters sent with the token exchange.
	pub extra_token_params: Vec<(String, String)>,
	/// Extra headers sent with token exchange and refresh calls.
	pub extra_token_headers: Vec<(String, String)>,
	/// Client authentication mode for the token endpoint.
	pub token_auth: TokenEndpointAuth,
	/// Bearer token placement for authorized API calls.
	pub bearer: BearerPlacement,
	/// Attach a PKCE challenge to the authorization redirect.
	pub pkce: bool,
	/// Treat non-2xx API statuses as failures (disable only for providers that tunnel errors
	/// through 200 responses).
	pub validate_http_status: bool,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}
}

// self
use crate::{
	_prelude::*,
	provider::{BearerPlacement, ProviderDescriptor, ProviderId, TokenEndpointAuth},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// Authorization endpoint is required.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizeEndpoint,
	/// Token endpoint is required.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Endpoint URL could not be parsed.
	#[error("Endpoint URL `{url}` is invalid.")]
	InvalidEndpointUrl {
		/// URL text that failed to parse.
		url: String,
	},
	/// Endpoints must speak HTTP.
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Parameter-placed bearer tokens need a parameter name.
	#[error("Bearer parameter name must not be empty.")]
	EmptyBearerParameter,
}

/// Parses an endpoint URL, folding parse failures into [`ProviderDescriptorError`].
pub fn endpoint_url(value: &str) -> Result<Url, ProviderDescriptorError> {
	Url::parse(value)
		.map_err(|_| ProviderDescriptorError::InvalidEndpointUrl { url: value.to_owned() })
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Authorization endpoint (required).
	pub authorize_endpoint: Option<Url>,
	/// Token endpoint (required).
	pub token_endpoint: Option<Url>,
	/// Optional API base URL; absent for providers without a REST surface.
	pub api_base: Option<Url>,
	/// Default scope string.
	pub scope: Option<String>,
	/// Extra authorization redirect parameters.
	pub extra_auth_params: Vec<(String, String)>,
	/// Extra token exchange parameters.
	pub extra_token_params: Vec<(String, String)>,
	/// Extra token exchange/refresh headers.
	pub extra_token_headers: Vec<(String, String)>,
	/// Client authentication mode for the token endpoint.
	pub token_auth: TokenEndpointAuth,
	/// Bearer token placement.
	pub bearer: BearerPlacement,
	/// Attach a PKCE challenge to the authorization redirect.
	pub pkce: bool,
	/// Treat non-2xx API statuses as failures.
	pub validate_http_status: bool,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			authorize_endpoint: None,
			token_endpoint: None,
			api_base: None,
			scope: None,
			extra_auth_params: Vec::new(),
			extra_token_params: Vec::new(),
			extra_token_headers: Vec::new(),
			token_auth: TokenEndpointAuth::default(),
			bearer: BearerPlacement::default(),
			pkce: false,
			validate_http_status: true,
		}
	}

	/// Sets the authorization endpoint.
	pub fn authorize_endpoint(mut self, url: Url) -> Self {
		self.authorize_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the API base URL.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Sets the default scope string.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Appends one extra authorization redirect parameter.
	pub fn extra_auth_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra_auth_params.push((name.into(), value.into()));

		self
	}

	/// Appends one extra token exchange parameter.
	pub fn extra_token_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra_token_params.push((name.into(), value.into()));

		self
	}

	/// Appends one extra token exchange/refresh header.
	pub fn extra_token_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra_token_headers.push((name.into(), value.into()));

		self
	}

	/// Overrides the client authentication mode.
	pub fn token_auth(mut self, auth: TokenEndpointAuth) -> Self {
		self.token_auth = auth;

		self
	}

	/// Overrides the bearer token placement.
	pub fn bearer(mut self, bearer: BearerPlacement) -> Self {
		self.bearer = bearer;

		self
	}

	/// Enables the PKCE challenge on the authorization redirect.
	pub fn pkce(mut self, pkce: bool) -> Self {
		self.pkce = pkce;

		self
	}

	/// Overrides HTTP status validation for API responses.
	pub fn validate_http_status(mut self, validate: bool) -> Self {
		self.validate_http_status = validate;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let authorize_endpoint =
			self.authorize_endpoint.ok_or(ProviderDescriptorError::MissingAuthorizeEndpoint)?;
		let token_endpoint =
			self.token_endpoint.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let descriptor = ProviderDescriptor {
			id: self.id,
			authorize_endpoint,
			token_endpoint,
			api_base: self.api_base,
			scope: self.scope,
			extra_auth_params: self.extra_auth_params,
			extra_token_params: self.extra_token_params,
			extra_token_headers: self.extra_token_headers,
			token_auth: self.token_auth,
			bearer: self.bearer,
			pkce: self.pkce,
			validate_http_status: self.validate_http_status,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("authorization", &self.authorize_endpoint)?;
		validate_endpoint("token", &self.token_endpoint)?;

		if let Some(api_base) = self.api_base.as_ref() {
			validate_endpoint("API base", api_base)?;
		}

		if let BearerPlacement::Parameter(name) = &self.bearer {
			if name.is_empty() {
				return Err(ProviderDescriptorError::EmptyBearerParameter);
			}
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if matches!(url.scheme(), "http" | "https") {
		Ok(())
	} else {
		Err(ProviderDescriptorError::UnsupportedScheme { endpoint: name, url: url.to_string() })
	}
}

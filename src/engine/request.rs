//! Authorized API calls and the response-validation choke point.

// self
use crate::{
	_prelude::*,
	engine::Engine,
	error::TransportError,
	http::{ApiCall, Method, Transport, TransportReply},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::BearerPlacement,
};

/// One authorized API request, addressed relative to the provider's API base.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// Request path; absolute URLs pass through untouched.
	pub path: String,
	/// HTTP method.
	pub method: Method,
	/// Request parameters.
	pub params: Vec<(String, String)>,
	/// Request headers.
	pub headers: Vec<(String, String)>,
	/// Encode body parameters as `multipart/form-data`.
	pub multipart: bool,
}
impl ApiRequest {
	/// Creates a request with no parameters or headers.
	pub fn new(path: impl Into<String>, method: Method) -> Self {
		Self {
			path: path.into(),
			method,
			params: Vec::new(),
			headers: Vec::new(),
			multipart: false,
		}
	}

	/// Convenience constructor for GET requests.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(path, Method::Get)
	}

	/// Replaces the request parameters.
	pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
		self.params = params;

		self
	}

	/// Replaces the request headers.
	pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
		self.headers = headers;

		self
	}

	/// Overrides the multipart flag.
	pub fn with_multipart(mut self, multipart: bool) -> Self {
		self.multipart = multipart;

		self
	}
}

impl<T> Engine<T>
where
	T: ?Sized + Transport,
{
	/// Performs an authorized API call: resolves the path against the API base, injects the
	/// bearer token per the descriptor's placement, and validates the response.
	pub async fn authorized_request(&self, request: ApiRequest) -> Result<Value> {
		const KIND: FlowKind = FlowKind::ApiRequest;

		let span = FlowSpan::new(KIND, "authorized_request");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.signed_request(request)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn signed_request(&self, request: ApiRequest) -> Result<Value> {
		let base = self
			.descriptor
			.api_base
			.as_ref()
			.ok_or(Error::NotSupported { operation: "api_request" })?;
		let url = resolve_path(base, &request.path)?;
		let credential = self.load_credential().await?;
		let token = credential
			.access_token
			.as_ref()
			.filter(|token| !token.expose().is_empty())
			.ok_or(Error::NotConnected)?
			.expose()
			.to_owned();
		let ApiRequest { method, mut params, mut headers, multipart, .. } = request;

		match &self.descriptor.bearer {
			BearerPlacement::AuthorizationHeader =>
				headers.push(("Authorization".into(), format!("Bearer {token}"))),
			BearerPlacement::Parameter(name) => params.push((name.clone(), token)),
		}

		let mut call = ApiCall::new(url, method);

		call.params = params;
		call.headers = headers;
		call.multipart = multipart;

		let reply = self.transport.call(call).await;

		self.validate(reply, "api_request")
	}

	/// Single validation choke point every API call and token exchange passes through.
	///
	/// Transport-level failures are always fatal for the current call. Non-2xx statuses fail
	/// when the descriptor enables status validation. The body then parses as JSON, falling
	/// back to `application/x-www-form-urlencoded` pairs for providers that still answer token
	/// exchanges in the legacy form encoding.
	pub(crate) fn validate(
		&self,
		reply: Result<TransportReply, TransportError>,
		context: &'static str,
	) -> Result<Value> {
		let reply = reply.map_err(Error::from)?;

		if self.descriptor.validate_http_status && !(200..300).contains(&reply.status) {
			return Err(Error::ProviderRequest {
				context,
				status: reply.status,
				body: reply.body,
			});
		}

		parse_body(&reply.body).ok_or(Error::UnexpectedResponse { context })
	}
}

fn resolve_path(base: &Url, path: &str) -> Result<Url> {
	if let Ok(url) = Url::parse(path) {
		return Ok(url);
	}

	base.join(path)
		.map_err(|e| Error::InvalidArgument { reason: format!("Request path `{path}` cannot be resolved: {e}") })
}

fn parse_body(body: &str) -> Option<Value> {
	if let Ok(value) = serde_json::from_str::<Value>(body) {
		return Some(value);
	}
	if body.trim().is_empty() {
		return None;
	}

	let mut map = serde_json::Map::new();

	for (name, value) in url::form_urlencoded::parse(body.as_bytes()) {
		map.insert(name.into_owned(), Value::String(value.into_owned()));
	}

	if map.is_empty() { None } else { Some(Value::Object(map)) }
}

//! Transport primitives for provider HTTP calls.
//!
//! [`Transport`] is the crate's only dependency on an HTTP stack. Implementations execute one
//! request and report the status and body as data; only transport-level failures (DNS, TCP,
//! TLS, timeout) use the error channel, so success and failure semantics of the response stay
//! with the response-validation layer. Timeouts and TLS settings are plain client configuration
//! on the implementation, never a capability probe.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`Transport::call`].
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// HTTP methods supported by provider calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
	/// HTTP PUT.
	Put,
	/// HTTP PATCH.
	Patch,
	/// HTTP DELETE.
	Delete,
}
impl Method {
	/// Returns the uppercase wire name of the method.
	pub fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}

	/// True when parameters ride in the query string instead of the request body.
	pub fn carries_query_params(self) -> bool {
		matches!(self, Method::Get | Method::Delete)
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One outbound provider request.
#[derive(Clone, Debug)]
pub struct ApiCall {
	/// Fully resolved request URL.
	pub url: Url,
	/// HTTP method.
	pub method: Method,
	/// Parameters; query-string for GET/DELETE, form body (or multipart parts) otherwise.
	pub params: Vec<(String, String)>,
	/// Request headers.
	pub headers: Vec<(String, String)>,
	/// Encode body parameters as `multipart/form-data` instead of a urlencoded form.
	pub multipart: bool,
}
impl ApiCall {
	/// Creates a call with no parameters or headers.
	pub fn new(url: Url, method: Method) -> Self {
		Self { url, method, params: Vec::new(), headers: Vec::new(), multipart: false }
	}
}

/// Raw reply reported by a transport, independent of the response's success semantics.
#[derive(Clone, Debug)]
pub struct TransportReply {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
}

/// Abstraction over HTTP transports capable of executing provider calls.
///
/// The core performs no retries and offers no cancellation; a hung call is bounded only by the
/// transport's own timeout configuration and surfaces as a [`TransportError`].
pub trait Transport: Send + Sync {
	/// Executes one HTTP request.
	fn call(&self, call: ApiCall) -> TransportFuture<'_, TransportReply>;
}

#[cfg(feature = "reqwest")]
/// Default transport backed by [`ReqwestClient`].
///
/// Token endpoints return results directly instead of delegating to another URI, so configure
/// the client with redirect following disabled ([`ReqwestTransport::new`] does).
#[derive(Clone, Debug)]
pub struct ReqwestTransport(ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with redirect following disabled.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	fn call(&self, call: ApiCall) -> TransportFuture<'_, TransportReply> {
		Box::pin(async move {
			let ApiCall { mut url, method, params, headers, multipart } = call;
			let reqwest_method = match method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Put => reqwest::Method::PUT,
				Method::Patch => reqwest::Method::PATCH,
				Method::Delete => reqwest::Method::DELETE,
			};
			let mut request = if method.carries_query_params() {
				if !params.is_empty() {
					url.query_pairs_mut().extend_pairs(params.iter());
				}

				self.0.request(reqwest_method, url)
			} else if multipart {
				let mut form = reqwest::multipart::Form::new();

				for (name, value) in params {
					form = form.text(name, value);
				}

				self.0.request(reqwest_method, url).multipart(form)
			} else {
				self.0.request(reqwest_method, url).form(&params)
			};

			for (name, value) in &headers {
				request = request.header(name.as_str(), value.as_str());
			}

			let response = request.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.text().await.map_err(TransportError::from)?;

			Ok(TransportReply { status, body })
		})
	}
}

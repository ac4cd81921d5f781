//! Crate-level error types shared across the engine, adapters, providers, and stores.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every failure surfaces to the caller of the adapter operation that triggered it; the core
/// never retries and never swallows an error on its own.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem, fatal at construction.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS), fatal for the current call.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Caller supplied a malformed argument (callback URL, parameter set).
	#[error("Invalid argument: {reason}.")]
	InvalidArgument {
		/// Description of the offending argument.
		reason: String,
	},
	/// Callback `state` was absent or did not match the persisted value.
	///
	/// The token exchange must not proceed after this failure.
	#[error("Authorization callback state is absent or does not match the pending session.")]
	StateMismatch,
	/// Provider answered with a non-success HTTP status.
	#[error("Provider call `{context}` failed with HTTP {status}. Raw provider response: {body}")]
	ProviderRequest {
		/// Operation that produced the response.
		context: &'static str,
		/// HTTP status code returned by the provider.
		status: u16,
		/// Raw response body, kept for diagnostics.
		body: String,
	},
	/// A required field was absent from a parsed provider response.
	#[error("Provider returned an unexpected response during `{context}`.")]
	UnexpectedResponse {
		/// Operation that parsed the response.
		context: &'static str,
	},
	/// Provider declares the operation unavailable; not a bug.
	#[error("Provider does not support the `{operation}` operation.")]
	NotSupported {
		/// Name of the unsupported operation.
		operation: &'static str,
	},
	/// An authorized call was attempted without a stored access token.
	#[error("No access token is stored; complete the authorization flow first.")]
	NotConnected,
}
impl From<crate::provider::ProviderDescriptorError> for Error {
	fn from(e: crate::provider::ProviderDescriptorError) -> Self {
		Self::Config(ConfigError::InvalidDescriptor(e))
	}
}
impl From<crate::provider::ProviderIdError> for Error {
	fn from(e: crate::provider::ProviderIdError) -> Self {
		Self::Config(ConfigError::InvalidProviderId(e))
	}
}

/// Configuration and validation failures raised at construction time.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Provider identifier failed validation.
	#[error(transparent)]
	InvalidProviderId(#[from] crate::provider::ProviderIdError),

	/// A provider-required setting is missing from the adapter configuration.
	#[error("Required provider setting `{name}` is missing.")]
	MissingSetting {
		/// Name of the missing setting.
		name: &'static str,
	},
	/// A provider-required setting is present but unusable.
	#[error("Provider setting `{name}` is invalid: {reason}.")]
	InvalidSetting {
		/// Name of the offending setting.
		name: &'static str,
		/// Description of the failure.
		reason: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

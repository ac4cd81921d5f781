//! Storage contracts and built-in credential store implementations.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Namespaced persistence contract for credentials and flow state.
///
/// The namespace is conventionally the provider identifier, isolating one provider's tokens
/// from another's within a session. Distinct end-user sessions are expected to use distinct
/// store instances; the core holds no cross-session state.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the value stored under `key`, if present.
	fn get<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<String>>;

	/// Persists or replaces the value stored under `key`.
	fn set(&self, key: StoreKey, value: String) -> StoreFuture<'_, ()>;

	/// Removes the value stored under `key`; absent keys are a no-op.
	fn delete<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, ()>;

	/// Removes every key under `namespace`; idempotent.
	fn clear<'a>(&'a self, namespace: &'a str) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Namespaced key identifying one stored value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
	/// Namespace component, conventionally the provider identifier.
	pub namespace: String,
	/// Key name within the namespace.
	pub name: String,
}
impl StoreKey {
	/// Builds a key from its namespace and name components.
	pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
		Self { namespace: namespace.into(), name: name.into() }
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}.{}", self.namespace, self.name)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let crate_error: Error = store_error.clone().into();

		assert!(matches!(crate_error, Error::Storage(_)));
		assert!(crate_error.to_string().contains("database unreachable"));

		let source = StdError::source(&crate_error)
			.expect("Crate error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn store_key_renders_namespaced_form() {
		let key = StoreKey::new("orcid", "access_token");

		assert_eq!(key.to_string(), "orcid.access_token");
		assert_eq!(key, StoreKey::new("orcid", "access_token"));
		assert_ne!(key, StoreKey::new("github", "access_token"));
	}
}

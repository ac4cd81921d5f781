//! Authentication-delegation core—drive the OAuth 2.0 authorization-code handshake against
//! arbitrary identity providers, manage the resulting credential across its lifetime, and
//! normalize heterogeneous provider profile responses into one canonical shape.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod adapter;
pub mod credential;
pub mod engine;
pub mod error;
pub mod http;
pub mod obs;
pub mod profile;
pub mod provider;
pub mod providers;
pub mod store;
pub mod tree;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		adapter::Adapter,
		engine::Engine,
		http::ReqwestTransport,
		provider::{AdapterConfig, ProviderDescriptor, ProviderHooks},
		store::{CredentialStore, MemoryStore},
	};

	/// Engine type alias used by reqwest-backed integration tests.
	pub type ReqwestTestEngine = Engine<ReqwestTransport>;
	/// Adapter type alias used by reqwest-backed integration tests.
	pub type ReqwestTestAdapter = Adapter<ReqwestTransport>;

	/// Builds a reqwest transport suitable for talking to local `httpmock` servers.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.danger_accept_invalid_certs(true)
			.build()
			.expect("Failed to build Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs an [`Engine`] backed by an in-memory store and the reqwest transport used
	/// across integration tests.
	pub fn build_reqwest_test_engine(
		descriptor: ProviderDescriptor,
		client_id: &str,
		client_secret: &str,
		callback: Url,
	) -> (ReqwestTestEngine, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let engine = Engine::new(store, test_reqwest_transport(), descriptor, client_id, callback)
			.with_client_secret(client_secret);

		(engine, store_backend)
	}

	/// Constructs an [`Adapter`] from provider hooks and configuration, backed by an in-memory
	/// store and the reqwest transport used across integration tests.
	pub fn build_reqwest_test_adapter(
		hooks: Arc<dyn ProviderHooks>,
		config: AdapterConfig,
	) -> Result<(ReqwestTestAdapter, Arc<MemoryStore>)> {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let adapter = Adapter::new(hooks, config, store, test_reqwest_transport())?;

		Ok((adapter, store_backend))
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};

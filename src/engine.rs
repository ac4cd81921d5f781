//! OAuth 2.0 protocol engine: authorization redirects, code exchange, refresh, and authorized
//! API calls against one provider descriptor.
//!
//! The engine is deliberately not overridable. Provider differences reach it as descriptor data
//! only; per-provider logic stays in the adapter layer. Every operation is a plain `async fn`
//! with no internal locking, no retries, and no cancellation. One logical flow runs per
//! session; isolation between sessions comes from distinct store instances.

pub mod request;

pub use refresh::RefreshMetrics;
pub use request::ApiRequest;

mod authorize;
mod exchange;
mod refresh;
mod session;

pub use exchange::TokenExchange;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	credential::{Credential, RECOGNIZED_KEYS},
	http::Transport,
	provider::{ProviderDescriptor, TokenEndpointAuth},
	store::{CredentialStore, StoreKey},
};

pub(crate) const STATE_KEY: &str = "authorization_state";
pub(crate) const VERIFIER_KEY: &str = "pkce_verifier";

/// Lifecycle phase derived purely from stored state; never triggers network I/O.
///
/// Disconnection clears the namespace wholesale, so a disconnected session reads as
/// [`Unauthenticated`](FlowPhase::Unauthenticated) again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowPhase {
	/// No credential and no pending callback.
	Unauthenticated,
	/// An authorization redirect was issued; the callback has not arrived yet.
	AwaitingCallback,
	/// A usable credential is stored.
	Connected,
	/// A credential is stored but its known expiry instant has passed.
	Expired,
}

/// Drives OAuth 2.0 flows against a single provider descriptor.
///
/// The engine owns the transport, credential store, and descriptor so the flow implementations
/// can focus on protocol steps. Client credentials are kept alongside the descriptor so the
/// configured authentication mode can be applied consistently across token endpoint calls.
pub struct Engine<T>
where
	T: ?Sized + Transport,
{
	/// Store persisting credentials and flow state for this session.
	pub store: Arc<dyn CredentialStore>,
	/// Transport used for every outbound provider request.
	pub transport: Arc<T>,
	/// Immutable provider descriptor.
	pub descriptor: ProviderDescriptor,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Optional client secret for confidential clients.
	pub client_secret: Option<String>,
	/// Redirect URI the provider sends the end-user back to.
	pub callback: Url,
	/// Shared counters for refresh flow outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
}
impl<T> Engine<T>
where
	T: ?Sized + Transport,
{
	/// Creates an engine from its injected collaborators.
	pub fn new(
		store: Arc<dyn CredentialStore>,
		transport: impl Into<Arc<T>>,
		descriptor: ProviderDescriptor,
		client_id: impl Into<String>,
		callback: Url,
	) -> Self {
		Self {
			store,
			transport: transport.into(),
			descriptor,
			client_id: client_id.into(),
			client_secret: None,
			callback,
			refresh_metrics: Default::default(),
		}
	}

	/// Sets or replaces the client secret used for confidential client auth modes.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Derives the current lifecycle phase from stored state.
	pub async fn phase(&self) -> Result<FlowPhase> {
		let credential = self.load_credential().await?;

		if credential.is_connected() {
			return if credential.is_expired_at(OffsetDateTime::now_utc()) {
				Ok(FlowPhase::Expired)
			} else {
				Ok(FlowPhase::Connected)
			};
		}
		if self.stored(STATE_KEY).await?.is_some() {
			return Ok(FlowPhase::AwaitingCallback);
		}

		Ok(FlowPhase::Unauthenticated)
	}

	/// True iff a credential with a non-empty access token is stored.
	pub async fn is_connected(&self) -> Result<bool> {
		Ok(self.load_credential().await?.is_connected())
	}

	/// Loads the stored credential, restricted to the recognized field names.
	pub async fn load_credential(&self) -> Result<Credential> {
		let mut entries = Vec::with_capacity(RECOGNIZED_KEYS.len());

		for name in RECOGNIZED_KEYS {
			if let Some(value) = self.stored(name).await? {
				entries.push((name, value));
			}
		}

		Ok(Credential::from_entries(entries))
	}

	/// Overwrites the stored credential wholesale: recognized fields absent from `credential`
	/// are cleared, extras are written alongside.
	pub async fn persist_credential(&self, credential: &Credential) -> Result<()> {
		for (name, value) in credential.recognized_entries() {
			match value {
				Some(value) => self.store_value(name, value).await?,
				None => self.delete_stored(name).await?,
			}
		}
		for (name, value) in &credential.extras {
			self.store_value(name, value.clone()).await?;
		}

		Ok(())
	}

	/// Clears all stored data for this provider namespace; idempotent.
	pub async fn disconnect(&self) -> Result<()> {
		self.store.clear(self.descriptor.id.as_ref()).await?;

		Ok(())
	}

	pub(crate) fn key(&self, name: &str) -> StoreKey {
		StoreKey::new(self.descriptor.id.as_ref(), name)
	}

	pub(crate) async fn stored(&self, name: &str) -> Result<Option<String>> {
		Ok(self.store.get(&self.key(name)).await?)
	}

	pub(crate) async fn store_value(&self, name: &str, value: String) -> Result<()> {
		self.store.set(self.key(name), value).await?;

		Ok(())
	}

	pub(crate) async fn delete_stored(&self, name: &str) -> Result<()> {
		self.store.delete(&self.key(name)).await?;

		Ok(())
	}

	pub(crate) fn apply_client_auth(
		&self,
		form: &mut Vec<(String, String)>,
		headers: &mut Vec<(String, String)>,
	) {
		match self.descriptor.token_auth {
			TokenEndpointAuth::ClientSecretPost => {
				form.push(("client_id".into(), self.client_id.clone()));

				if let Some(secret) = &self.client_secret {
					form.push(("client_secret".into(), secret.clone()));
				}
			},
			TokenEndpointAuth::ClientSecretBasic => {
				let raw = format!(
					"{}:{}",
					self.client_id,
					self.client_secret.as_deref().unwrap_or_default()
				);

				headers.push(("Authorization".into(), format!("Basic {}", STANDARD.encode(raw))));
			},
		}
	}
}
impl<T> Clone for Engine<T>
where
	T: ?Sized + Transport,
{
	fn clone(&self) -> Self {
		Self {
			store: self.store.clone(),
			transport: self.transport.clone(),
			descriptor: self.descriptor.clone(),
			client_id: self.client_id.clone(),
			client_secret: self.client_secret.clone(),
			callback: self.callback.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
		}
	}
}
impl<T> Debug for Engine<T>
where
	T: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Engine")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("callback", &self.callback)
			.finish()
	}
}

//! Per-session provider facade combining one engine with one set of provider hooks.

// self
use crate::{
	_prelude::*,
	credential::Credential,
	engine::{ApiRequest, Engine, FlowPhase},
	http::{Method, Transport},
	profile::Profile,
	provider::{AdapterConfig, HookFuture, ProfileSource, ProviderHooks, RequestDecor},
	store::CredentialStore,
	tree::TreeCursor,
};

/// Per-session facade every provider adapter reuses unmodified.
///
/// One adapter owns one credential for its lifetime. Instances are single-owner-per-request:
/// operations that replace the credential take `&mut self`, and sharing an instance across
/// worker threads is the caller's concern; the facade provides no internal locking.
pub struct Adapter<T>
where
	T: ?Sized + Transport,
{
	/// Protocol engine driving redirects, exchanges, refreshes, and authorized calls.
	pub engine: Engine<T>,
	hooks: Arc<dyn ProviderHooks>,
	config: AdapterConfig,
	decor: RequestDecor,
}
impl<T> Adapter<T>
where
	T: ?Sized + Transport,
{
	/// Builds an adapter: runs the provider's `configure` hook, applies configuration
	/// overrides, and wires the engine.
	///
	/// This is the only fallible configuration point; a provider missing a required setting
	/// fails here, before any flow starts.
	pub fn new(
		hooks: Arc<dyn ProviderHooks>,
		config: AdapterConfig,
		store: Arc<dyn CredentialStore>,
		transport: impl Into<Arc<T>>,
	) -> Result<Self> {
		let mut descriptor = hooks.configure(&config)?;

		if let Some(authorize) = &config.endpoints.authorize {
			descriptor.authorize_endpoint = authorize.clone();
		}
		if let Some(token) = &config.endpoints.token {
			descriptor.token_endpoint = token.clone();
		}
		if let Some(api_base) = &config.endpoints.api_base {
			descriptor.api_base = Some(api_base.clone());
		}
		if let Some(scope) = &config.scope {
			descriptor.scope = Some(scope.clone());
		}

		let mut engine = Engine::new(
			store,
			transport,
			descriptor,
			config.client_id.clone(),
			config.callback.clone(),
		);

		if let Some(secret) = &config.client_secret {
			engine = engine.with_client_secret(secret.clone());
		}

		let decor = hooks.initialize(&config, None);

		Ok(Self { engine, hooks, config, decor })
	}

	/// Starts the handshake.
	///
	/// Returns `None` when already connected (a no-op per the lifecycle contract), otherwise
	/// the authorization URL the host must redirect the end-user to.
	pub async fn authenticate_begin(&self) -> Result<Option<Url>> {
		if self.is_connected().await? {
			return Ok(None);
		}

		self.engine.authorization_redirect().await.map(Some)
	}

	/// Completes the handshake from callback query parameters.
	///
	/// On success the provider's post-exchange extras are persisted, the initialization hook
	/// re-runs against the fresh credential, and the returned credential carries the extras.
	pub async fn authenticate_finish(&mut self, params: &[(String, String)]) -> Result<Credential> {
		let exchange = self.engine.complete_authorization(params).await?;
		let extras = self.hooks.token_exchange_extras(&TreeCursor::new(&exchange.response));
		let mut credential = exchange.credential;

		for (name, value) in extras {
			self.engine.store_value(&name, value.clone()).await?;
			credential.extras.insert(name, value);
		}

		self.decor = self.hooks.initialize(&self.config, Some(&credential));

		Ok(credential)
	}

	/// Completes the handshake from the full callback URL the provider redirected to.
	pub async fn authenticate_finish_url(&mut self, callback: &str) -> Result<Credential> {
		let url = Url::parse(callback)
			.map_err(|e| Error::InvalidArgument { reason: format!("Callback URL is malformed: {e}") })?;
		let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();

		self.authenticate_finish(&params).await
	}

	/// True iff a credential with a non-empty access token is stored. Never performs I/O
	/// beyond the store read.
	pub async fn is_connected(&self) -> Result<bool> {
		self.engine.is_connected().await
	}

	/// Derives the current lifecycle phase from stored state.
	pub async fn phase(&self) -> Result<FlowPhase> {
		self.engine.phase().await
	}

	/// Performs an authorized API request, refreshing the credential first when it is known to
	/// be expired.
	pub async fn api_request(&self, mut request: ApiRequest) -> Result<Value> {
		self.engine.refresh_if_needed().await?;

		request.params.extend(self.decor.api_params.iter().cloned());
		request.headers.extend(self.decor.api_headers.iter().cloned());

		self.engine.authorized_request(request).await
	}

	/// Returns the stored credential, restricted to the recognized field names.
	pub async fn get_access_token(&self) -> Result<Credential> {
		self.engine.load_credential().await
	}

	/// Replaces the stored credential wholesale.
	///
	/// Prior stored state is cleared first (full overwrite, not merge), the provided entries
	/// are written verbatim, and the provider's initialization hook re-runs so derived request
	/// parameters stay consistent with the new token.
	pub async fn set_access_token(&mut self, entries: &[(String, String)]) -> Result<()> {
		self.engine.disconnect().await?;

		for (name, value) in entries {
			self.engine.store_value(name, value.clone()).await?;
		}

		let credential = self.engine.load_credential().await?;

		self.decor = self
			.hooks
			.initialize(&self.config, credential.is_connected().then_some(&credential));

		Ok(())
	}

	/// Clears all stored data for this provider namespace; idempotent.
	pub async fn disconnect(&mut self) -> Result<()> {
		self.engine.disconnect().await?;
		self.decor = self.hooks.initialize(&self.config, None);

		Ok(())
	}

	/// Fetches the provider profile through the provider's extraction strategy.
	pub async fn user_profile(&self) -> Result<Profile> {
		let hooks = self.hooks.clone();

		hooks.fetch_profile(self).await
	}
}
impl<T> ProfileSource for Adapter<T>
where
	T: ?Sized + Transport,
{
	fn request<'a>(
		&'a self,
		path: &'a str,
		method: Method,
		params: &'a [(String, String)],
	) -> HookFuture<'a, Value> {
		Box::pin(async move {
			let request = ApiRequest::new(path, method).with_params(params.to_vec());

			self.api_request(request).await
		})
	}

	fn stored<'a>(&'a self, name: &'a str) -> HookFuture<'a, Option<String>> {
		Box::pin(async move { self.engine.stored(name).await })
	}

	fn config(&self) -> &AdapterConfig {
		&self.config
	}
}
impl<T> Clone for Adapter<T>
where
	T: ?Sized + Transport,
{
	fn clone(&self) -> Self {
		Self {
			engine: self.engine.clone(),
			hooks: self.hooks.clone(),
			config: self.config.clone(),
			decor: self.decor.clone(),
		}
	}
}
impl<T> Debug for Adapter<T>
where
	T: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Adapter")
			.field("engine", &self.engine)
			.field("decor", &self.decor)
			.finish()
	}
}

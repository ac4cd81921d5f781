// self
use crate::{
	_prelude::*,
	engine::{Engine, STATE_KEY, VERIFIER_KEY, session},
	http::Transport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<T> Engine<T>
where
	T: ?Sized + Transport,
{
	/// Builds the authorization redirect URL.
	///
	/// The anti-forgery `state` (and, when the descriptor enables PKCE, the code verifier) is
	/// persisted before the URL is returned, so the callback can be validated even if it
	/// arrives on another worker sharing the same store. No network I/O happens here; sending
	/// the end-user to the returned URL is the host's concern.
	pub async fn authorization_redirect(&self) -> Result<Url> {
		const KIND: FlowKind = FlowKind::Authorize;

		let span = FlowSpan::new(KIND, "authorization_redirect");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.build_redirect()).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn build_redirect(&self) -> Result<Url> {
		let state = session::random_string(session::STATE_LEN);

		self.store_value(STATE_KEY, state.clone()).await?;

		let pkce = if self.descriptor.pkce {
			let pair = session::PkcePair::generate();

			self.store_value(VERIFIER_KEY, pair.verifier.clone()).await?;

			Some(pair)
		} else {
			None
		};
		let mut url = self.descriptor.authorize_endpoint.clone();

		{
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair("response_type", "code");
			pairs.append_pair("client_id", &self.client_id);
			pairs.append_pair("redirect_uri", self.callback.as_str());

			if let Some(scope) = self.descriptor.scope.as_deref() {
				pairs.append_pair("scope", scope);
			}

			pairs.append_pair("state", &state);

			if let Some(pair) = &pkce {
				pairs.append_pair("code_challenge", &pair.challenge);
				pairs.append_pair("code_challenge_method", session::PKCE_METHOD);
			}

			for (name, value) in &self.descriptor.extra_auth_params {
				pairs.append_pair(name, value);
			}
		}

		Ok(url)
	}
}

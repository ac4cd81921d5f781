// self
use crate::{
	_prelude::*,
	credential::Credential,
	engine::{Engine, STATE_KEY, VERIFIER_KEY},
	http::{ApiCall, Method, Transport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	tree::TreeCursor,
};

/// Outcome of a successful authorization-code exchange.
///
/// Carries the raw token-endpoint response alongside the persisted credential so the adapter
/// layer can run provider post-exchange hooks over fields the core does not recognize.
#[derive(Clone, Debug)]
pub struct TokenExchange {
	/// Credential built from the response and persisted under the provider namespace.
	pub credential: Credential,
	/// Parsed token-endpoint response.
	pub response: Value,
}

impl<T> Engine<T>
where
	T: ?Sized + Transport,
{
	/// Completes the authorization callback: validates `state`, extracts `code`, and performs
	/// the code→token exchange.
	///
	/// A missing or mismatched `state` fails with
	/// [`Error::StateMismatch`](crate::error::Error::StateMismatch) before any token-endpoint
	/// call is made. A token response without an `access_token` fails with
	/// [`Error::UnexpectedResponse`](crate::error::Error::UnexpectedResponse) and leaves the
	/// store untouched.
	pub async fn complete_authorization(
		&self,
		params: &[(String, String)],
	) -> Result<TokenExchange> {
		const KIND: FlowKind = FlowKind::Exchange;

		let span = FlowSpan::new(KIND, "complete_authorization");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.exchange(params)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn exchange(&self, params: &[(String, String)]) -> Result<TokenExchange> {
		let pending = self.stored(STATE_KEY).await?;

		// The stored state is one-shot; a replayed or forged callback must not get a second try.
		self.delete_stored(STATE_KEY).await?;

		match (pending, lookup(params, "state")) {
			(Some(expected), Some(returned)) if returned == expected => {},
			_ => return Err(Error::StateMismatch),
		}

		let code = lookup(params, "code").ok_or_else(|| {
			let reason = match lookup(params, "error") {
				Some(error) =>
					format!("Callback carries no authorization code (provider error: {error})"),
				None => "Callback carries no authorization code".into(),
			};

			Error::InvalidArgument { reason }
		})?;
		let verifier = if self.descriptor.pkce {
			let verifier = self.stored(VERIFIER_KEY).await?;

			self.delete_stored(VERIFIER_KEY).await?;

			verifier
		} else {
			None
		};
		let mut form = vec![
			("grant_type".into(), "authorization_code".into()),
			("code".into(), code.clone()),
			("redirect_uri".into(), self.callback.to_string()),
		];

		if let Some(verifier) = verifier {
			form.push(("code_verifier".into(), verifier));
		}

		let mut headers = self.descriptor.extra_token_headers.clone();

		self.apply_client_auth(&mut form, &mut headers);
		form.extend(self.descriptor.extra_token_params.iter().cloned());

		let mut call = ApiCall::new(self.descriptor.token_endpoint.clone(), Method::Post);

		call.params = form;
		call.headers = headers;

		let reply = self.transport.call(call).await;
		let response = self.validate(reply, "token_exchange")?;
		let cursor = TreeCursor::new(&response);

		if cursor.string("access_token").is_none_or(|token| token.is_empty()) {
			return Err(Error::UnexpectedResponse { context: "token_exchange" });
		}

		let credential = Credential::from_token_response(&cursor, OffsetDateTime::now_utc());

		self.persist_credential(&credential).await?;

		Ok(TokenExchange { credential, response })
	}
}

fn lookup(params: &[(String, String)], name: &str) -> Option<String> {
	params.iter().find(|(key, _)| key == name).map(|(_, value)| value.clone())
}

//! Token refresh orchestration.
//!
//! Policy: a refresh happens only when a `refresh_token` is stored AND the expiry instant is
//! known and has passed. A stored refresh token with unknown expiry never triggers network I/O;
//! the policy is engine-wide and providers cannot override it.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	credential::Credential,
	engine::Engine,
	http::{ApiCall, Method, Transport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	tree::TreeCursor,
};

impl<T> Engine<T>
where
	T: ?Sized + Transport,
{
	/// Refreshes the stored credential when it is known to be expired.
	///
	/// Returns `Ok(None)` when no refresh was needed (no credential, no refresh token, or the
	/// expiry instant is unknown or in the future). On success the stored credential is
	/// overwritten, preserving the previous refresh token when the provider's response omits a
	/// new one. On failure the stale credential stays in place and the engine never
	/// auto-disconnects, since the provider may still serve API calls with additional grace.
	pub async fn refresh_if_needed(&self) -> Result<Option<Credential>> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_if_needed");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span.instrument(self.refresh()).await;

		match &result {
			Ok(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				self.refresh_metrics.record_success();
			},
			Err(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				self.refresh_metrics.record_failure();
			},
		}

		result
	}

	async fn refresh(&self) -> Result<Option<Credential>> {
		let current = self.load_credential().await?;

		if !current.is_connected() {
			return Ok(None);
		}

		let Some(refresh_token) = current.refresh_token.as_ref() else {
			return Ok(None);
		};

		if !current.is_expired_at(OffsetDateTime::now_utc()) {
			return Ok(None);
		}

		let mut form = vec![
			("grant_type".into(), "refresh_token".into()),
			("refresh_token".into(), refresh_token.expose().to_owned()),
		];
		let mut headers = self.descriptor.extra_token_headers.clone();

		self.apply_client_auth(&mut form, &mut headers);

		let mut call = ApiCall::new(self.descriptor.token_endpoint.clone(), Method::Post);

		call.params = form;
		call.headers = headers;

		let reply = self.transport.call(call).await;
		let response = self.validate(reply, "token_refresh")?;
		let cursor = TreeCursor::new(&response);

		if cursor.string("access_token").is_none_or(|token| token.is_empty()) {
			return Err(Error::UnexpectedResponse { context: "token_refresh" });
		}

		let mut refreshed = Credential::from_token_response(&cursor, OffsetDateTime::now_utc());

		if refreshed.refresh_token.is_none() {
			refreshed.refresh_token = current.refresh_token.clone();
		}

		self.persist_credential(&refreshed).await?;

		Ok(Some(refreshed))
	}
}

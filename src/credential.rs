//! Credential value object, its expiry math, and its persistence layout.

// self
use crate::{_prelude::*, tree::TreeCursor};

/// Store key names recognized as part of the credential proper.
///
/// `get_access_token` round-trips exactly this set; anything else a provider persists lives in
/// [`Credential::extras`] on the write side and is read back through the store directly.
pub const RECOGNIZED_KEYS: [&str; 6] =
	["access_token", "access_token_secret", "token_type", "refresh_token", "expires_in", "expires_at"];

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Credential issued by a provider's token endpoint.
///
/// Owned by one adapter session for its lifetime, persisted under the provider namespace,
/// mutated only by the token-exchange and token-refresh operations, and cleared wholesale on
/// disconnect or before a fresh `set_access_token`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Bearer access token; an absent or empty value means "not connected".
	pub access_token: Option<TokenSecret>,
	/// Legacy token secret slot kept for providers that still issue one.
	pub access_token_secret: Option<TokenSecret>,
	/// Token type reported by the provider (typically `bearer`).
	pub token_type: Option<String>,
	/// Refresh token, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Relative lifetime in seconds, as reported by the provider.
	pub expires_in: Option<i64>,
	/// Absolute expiry instant derived from `expires_in` at exchange time.
	pub expires_at: Option<OffsetDateTime>,
	/// Provider-specific extra fields persisted alongside the credential (e.g. a subject id).
	pub extras: BTreeMap<String, String>,
}
impl Credential {
	/// True iff a non-empty access token is present.
	///
	/// A pure probe over stored state; connectivity checks never trigger network I/O.
	pub fn is_connected(&self) -> bool {
		self.access_token.as_ref().is_some_and(|token| !token.expose().is_empty())
	}

	/// True iff the expiry instant is known and has passed.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|deadline| now >= deadline)
	}

	/// Builds a credential from a parsed token-endpoint response taken at `now`.
	///
	/// The caller is responsible for requiring `access_token`; optional fields stay unset when
	/// the response omits them. `expires_at` is the absolute deadline `now + expires_in`.
	pub fn from_token_response(response: &TreeCursor<'_>, now: OffsetDateTime) -> Self {
		let expires_in = response.integer("expires_in");

		Self {
			access_token: response.string("access_token").map(TokenSecret::new),
			access_token_secret: response.string("access_token_secret").map(TokenSecret::new),
			token_type: response.string("token_type"),
			refresh_token: response.string("refresh_token").map(TokenSecret::new),
			expires_in,
			expires_at: expires_in.map(|delta| now + Duration::seconds(delta)),
			extras: BTreeMap::new(),
		}
	}

	/// Renders the recognized fields as store values, `None` marking fields to clear.
	pub fn recognized_entries(&self) -> [(&'static str, Option<String>); 6] {
		[
			("access_token", self.access_token.as_ref().map(|token| token.expose().to_owned())),
			(
				"access_token_secret",
				self.access_token_secret.as_ref().map(|token| token.expose().to_owned()),
			),
			("token_type", self.token_type.clone()),
			("refresh_token", self.refresh_token.as_ref().map(|token| token.expose().to_owned())),
			("expires_in", self.expires_in.map(|delta| delta.to_string())),
			("expires_at", self.expires_at.map(|instant| instant.unix_timestamp().to_string())),
		]
	}

	/// Rebuilds a credential from store entries, ignoring unrecognized names and unparseable
	/// values.
	pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, String)>) -> Self {
		let mut credential = Self::default();

		for (name, value) in entries {
			match name {
				"access_token" => credential.access_token = Some(TokenSecret::new(value)),
				"access_token_secret" =>
					credential.access_token_secret = Some(TokenSecret::new(value)),
				"token_type" => credential.token_type = Some(value),
				"refresh_token" => credential.refresh_token = Some(TokenSecret::new(value)),
				"expires_in" => credential.expires_in = value.parse().ok(),
				"expires_at" =>
					credential.expires_at = value
						.parse::<i64>()
						.ok()
						.and_then(|stamp| OffsetDateTime::from_unix_timestamp(stamp).ok()),
				_ => {},
			}
		}

		credential
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros;
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn token_response_derives_absolute_expiry() {
		let response = json!({"access_token": "abc", "expires_in": 3600});
		let now = macros::datetime!(2025-06-01 12:00 UTC);
		let credential = Credential::from_token_response(&TreeCursor::new(&response), now);

		assert!(credential.is_connected());
		assert_eq!(credential.expires_in, Some(3600));
		assert_eq!(credential.expires_at, Some(macros::datetime!(2025-06-01 13:00 UTC)));
		assert!(!credential.is_expired_at(macros::datetime!(2025-06-01 12:59:59 UTC)));
		assert!(credential.is_expired_at(macros::datetime!(2025-06-01 13:00 UTC)));
	}

	#[test]
	fn unknown_expiry_never_reports_expired() {
		let response = json!({"access_token": "abc"});
		let credential =
			Credential::from_token_response(&TreeCursor::new(&response), OffsetDateTime::now_utc());

		assert_eq!(credential.expires_at, None);
		assert!(!credential.is_expired_at(macros::datetime!(2099-01-01 00:00 UTC)));
	}

	#[test]
	fn empty_access_token_means_not_connected() {
		let credential = Credential::from_entries([("access_token", String::new())]);

		assert!(!credential.is_connected());
		assert!(!Credential::default().is_connected());
	}

	#[test]
	fn store_entries_round_trip_recognized_fields() {
		let response = json!({
			"access_token": "abc",
			"refresh_token": "def",
			"token_type": "bearer",
			"expires_in": 60,
		});
		let now = macros::datetime!(2025-06-01 12:00 UTC);
		let credential = Credential::from_token_response(&TreeCursor::new(&response), now);
		let entries = credential
			.recognized_entries()
			.into_iter()
			.filter_map(|(name, value)| value.map(|value| (name, value)));
		let rebuilt = Credential::from_entries(entries);

		assert_eq!(rebuilt, credential);
	}

	#[test]
	fn unrecognized_entries_are_ignored() {
		let rebuilt = Credential::from_entries([
			("access_token", "abc".to_owned()),
			("orcid", "0000-0002-1825-0097".to_owned()),
		]);

		assert!(rebuilt.is_connected());
		assert!(rebuilt.extras.is_empty());
	}
}

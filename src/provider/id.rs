//! Validated provider identifier.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const PROVIDER_ID_MAX_LEN: usize = 128;

/// Error returned when provider identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ProviderIdError {
	/// The identifier was empty.
	#[error("Provider identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Provider identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Provider identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Identifier for a provider adapter.
///
/// Declared statically at construction or registration; it doubles as the credential-store
/// namespace, so it must be stable across sessions.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);
impl ProviderId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ProviderIdError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for ProviderId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ProviderId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ProviderId> for String {
	fn from(value: ProviderId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProviderId {
	type Error = ProviderIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for ProviderId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Provider({})", self.0)
	}
}
impl Display for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ProviderId {
	type Err = ProviderIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), ProviderIdError> {
	if view.is_empty() {
		return Err(ProviderIdError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(ProviderIdError::ContainsWhitespace);
	}
	if view.len() > PROVIDER_ID_MAX_LEN {
		return Err(ProviderIdError::TooLong { max: PROVIDER_ID_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_validate() {
		assert!(ProviderId::new("").is_err());
		assert!(ProviderId::new("with space").is_err());
		assert!(ProviderId::new(" github").is_err());

		let id = ProviderId::new("github").expect("Identifier fixture should be valid.");

		assert_eq!(id.as_ref(), "github");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let id: ProviderId =
			serde_json::from_str("\"orcid\"").expect("Identifier should deserialize successfully.");

		assert_eq!(id.as_ref(), "orcid");
		assert!(serde_json::from_str::<ProviderId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limits_apply() {
		let exact = "a".repeat(PROVIDER_ID_MAX_LEN);

		ProviderId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(PROVIDER_ID_MAX_LEN + 1);

		assert!(ProviderId::new(&too_long).is_err());
	}
}

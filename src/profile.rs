//! Canonical user profile produced by provider profile extraction.

// self
use crate::_prelude::*;

/// Canonical user profile shared by every provider adapter.
///
/// `identifier` is the only field every extraction strategy must populate; strategies fail with
/// [`Error::UnexpectedResponse`](crate::error::Error::UnexpectedResponse) before constructing a
/// profile without one. Everything else is best effort.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	/// Provider-scoped unique identifier for the user.
	pub identifier: String,
	/// Display name, when the provider exposes one.
	pub display_name: Option<String>,
	/// Email address, when granted.
	pub email: Option<String>,
	/// The email address again, when the provider marks it verified.
	pub email_verified: Option<String>,
	/// Avatar or photo URL.
	pub photo_url: Option<String>,
	/// URL of the user's profile page at the provider.
	pub profile_url: Option<String>,
	/// URL of the user's own website.
	pub web_site_url: Option<String>,
	/// Free-form biography or description.
	pub description: Option<String>,
	/// Given name.
	pub first_name: Option<String>,
	/// Family name.
	pub last_name: Option<String>,
	/// Region or free-form location string.
	pub region: Option<String>,
	/// Country.
	pub country: Option<String>,
	/// Preferred language or locale.
	pub language: Option<String>,
	/// Age, for the few providers that report one.
	pub age: Option<u32>,
}
impl Profile {
	/// Creates a profile seeded with the mandatory identifier.
	pub fn new(identifier: impl Into<String>) -> Self {
		Self { identifier: identifier.into(), ..Self::default() }
	}
}

//! GitHub provider adapter.

// self
use crate::{
	_prelude::*,
	http::Method,
	profile::Profile,
	provider::{
		AdapterConfig, HookFuture, ProfileSource, ProviderDescriptor, ProviderHooks, ProviderId,
		endpoint_url,
	},
	tree::TreeCursor,
};

/// GitHub OAuth2 provider adapter.
///
/// GitHub's token endpoint still answers in the legacy form encoding unless asked otherwise;
/// the engine's response parsing covers both shapes, so no override is needed here.
#[derive(Clone, Copy, Debug, Default)]
pub struct GitHub;
impl ProviderHooks for GitHub {
	fn configure(&self, config: &AdapterConfig) -> Result<ProviderDescriptor> {
		let _ = config;

		Ok(ProviderDescriptor::builder(ProviderId::new("github")?)
			.authorize_endpoint(endpoint_url("https://github.com/login/oauth/authorize")?)
			.token_endpoint(endpoint_url("https://github.com/login/oauth/access_token")?)
			.api_base(endpoint_url("https://api.github.com/")?)
			.scope("user:email")
			.build()?)
	}

	fn fetch_profile<'a>(&'a self, api: &'a dyn ProfileSource) -> HookFuture<'a, Profile> {
		Box::pin(async move {
			let response = api.request("user", Method::Get, &[]).await?;
			let data = TreeCursor::new(&response);
			let identifier = data
				.string("id")
				.ok_or(Error::UnexpectedResponse { context: "user_profile" })?;
			let mut profile = Profile::new(identifier);

			profile.display_name = data.string("name").or_else(|| data.string("login"));
			profile.description = data.string("bio");
			profile.photo_url = data.string("avatar_url");
			profile.profile_url = data.string("html_url");
			profile.email = data.string("email");
			profile.web_site_url = data.string("blog");
			profile.region = data.string("location");

			if profile.email.is_none() {
				// The public profile omits private addresses; the dedicated endpoint is best
				// effort and its failure leaves the profile without an email.
				if let Ok(emails) = api.request("user/emails", Method::Get, &[]).await {
					apply_primary_email(&mut profile, &TreeCursor::new(&emails));
				}
			}

			Ok(profile)
		})
	}
}

fn apply_primary_email(profile: &mut Profile, emails: &TreeCursor<'_>) {
	for entry in emails.items() {
		if entry.boolean("primary").unwrap_or(false) {
			profile.email = entry.string("email");

			if entry.boolean("verified").unwrap_or(false) {
				profile.email_verified = profile.email.clone();
			}

			break;
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn primary_email_wins_over_secondary_entries() {
		let emails = json!([
			{"email": "old@example.com", "primary": false, "verified": true},
			{"email": "main@example.com", "primary": true, "verified": true},
		]);
		let mut profile = Profile::new("583231");

		apply_primary_email(&mut profile, &TreeCursor::new(&emails));

		assert_eq!(profile.email.as_deref(), Some("main@example.com"));
		assert_eq!(profile.email_verified.as_deref(), Some("main@example.com"));
	}

	#[test]
	fn unverified_primary_email_is_not_marked_verified() {
		let emails = json!([{"email": "main@example.com", "primary": true, "verified": false}]);
		let mut profile = Profile::new("583231");

		apply_primary_email(&mut profile, &TreeCursor::new(&emails));

		assert_eq!(profile.email.as_deref(), Some("main@example.com"));
		assert_eq!(profile.email_verified, None);
	}
}

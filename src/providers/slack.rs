//! Slack provider adapter.

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

/// Slack OAuth2 provider adapter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Slack;
impl ProviderHooks for Slack {
	fn configure(&self, config: &AdapterConfig) -> Result<ProviderDescriptor> {
		let _ = config;

		Ok(ProviderDescriptor::builder(ProviderId::new("slack")?)
			.authorize_endpoint(endpoint_url("https://slack.com/oauth/authorize")?)
			.token_endpoint(endpoint_url("https://slack.com/api/oauth.access")?)
			.api_base(endpoint_url("https://slack.com/")?)
			.scope("identity.basic identity.email identity.avatar")
			.build()?)
	}

	fn fetch_profile<'a>(&'a self, api: &'a dyn ProfileSource) -> HookFuture<'a, Profile> {
		Box::pin(async move {
			let response = api.request("api/users.identity", Method::Get, &[]).await?;
			let data = TreeCursor::new(&response);

			if !data.boolean("ok").unwrap_or(false) {
				return Err(Error::UnexpectedResponse { context: "user_profile" });
			}

			let user = data.filter("user");
			let identifier = user
				.string("id")
				.ok_or(Error::UnexpectedResponse { context: "user_profile" })?;
			let mut profile = Profile::new(identifier);

			profile.display_name = user.string("name");
			profile.email = user.string("email");
			profile.photo_url = largest_image(&user);

			Ok(profile)
		})
	}
}

/// Returns the `image_*` property with the highest resolution.
///
/// Slack sends several image URLs and makes no guarantee which resolutions are present, so the
/// property names themselves (`image_32`, `image_192`, …) have to be scanned.
fn largest_image(user: &TreeCursor<'_>) -> Option<String> {
	let largest = user
		.keys()
		.filter_map(|key| key.strip_prefix("image_")?.parse::<u32>().ok())
		.max()?;

	user.string(&format!("image_{largest}"))
}

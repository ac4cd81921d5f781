//! ORCID provider adapter.

// self
use crate::{
	_prelude::*,
	credential::Credential,
	http::Method,
	profile::Profile,
	provider::{
		AdapterConfig, HookFuture, ProfileSource, ProviderDescriptor, ProviderHooks, ProviderId,
		RequestDecor, endpoint_url,
	},
	tree::TreeCursor,
};

/// ORCID OAuth2 provider adapter.
///
/// ORCID's token response carries the researcher's `orcid` subject id, which the record
/// endpoint path is built from; the post-exchange hook persists it alongside the credential.
#[derive(Clone, Copy, Debug, Default)]
pub struct Orcid;
impl ProviderHooks for Orcid {
	fn configure(&self, config: &AdapterConfig) -> Result<ProviderDescriptor> {
		let _ = config;

		Ok(ProviderDescriptor::builder(ProviderId::new("orcid")?)
			.authorize_endpoint(endpoint_url("https://orcid.org/oauth/authorize")?)
			.token_endpoint(endpoint_url("https://orcid.org/oauth/token")?)
			.api_base(endpoint_url("https://pub.orcid.org/v2.1/")?)
			.scope("/authenticate")
			.build()?)
	}

	fn initialize(&self, config: &AdapterConfig, credential: Option<&Credential>) -> RequestDecor {
		let _ = (config, credential);

		// The public API answers XML unless told otherwise.
		RequestDecor {
			api_params: Vec::new(),
			api_headers: vec![("Accept".into(), "application/json".into())],
		}
	}

	fn token_exchange_extras(&self, response: &TreeCursor<'_>) -> BTreeMap<String, String> {
		response
			.string("orcid")
			.map(|orcid| BTreeMap::from_iter([("orcid".to_owned(), orcid)]))
			.unwrap_or_default()
	}

	fn fetch_profile<'a>(&'a self, api: &'a dyn ProfileSource) -> HookFuture<'a, Profile> {
		Box::pin(async move {
			let orcid = api
				.stored("orcid")
				.await?
				.ok_or(Error::UnexpectedResponse { context: "user_profile" })?;
			let response = api.request(&format!("{orcid}/record"), Method::Get, &[]).await?;
			let data = TreeCursor::new(&response);

			if !data.exists("orcid-identifier") {
				return Err(Error::UnexpectedResponse { context: "user_profile" });
			}

			let identity = data.filter("orcid-identifier");
			let identifier = identity
				.string("path")
				.ok_or(Error::UnexpectedResponse { context: "user_profile" })?;
			let mut profile = Profile::new(identifier);

			profile.profile_url = identity.string("uri");

			let person = data.filter("person");

			profile.description = person.filter("biography").string("content");
			apply_name(&mut profile, &person.filter("name"));
			apply_email(&mut profile, &person);
			profile.web_site_url = first_entry(&person.filter("researcher-urls").filter("researcher-url")).string("url");
			profile.country = first_entry(&person.filter("addresses").filter("address")).string("country");
			profile.language = data.filter("preferences").string("locale");

			Ok(profile)
		})
	}
}

fn apply_name(profile: &mut Profile, name: &TreeCursor<'_>) {
	let given = name.string("given-names");
	let family = name.string("family-name");

	profile.display_name = name.string("credit-name").or_else(|| match (&given, &family) {
		(Some(given), Some(family)) => Some(format!("{given} {family}")),
		(Some(given), None) => Some(given.clone()),
		(None, Some(family)) => Some(family.clone()),
		(None, None) => None,
	});
	profile.first_name = given;
	profile.last_name = family;
}

/// ORCID only discloses an address when a primary entry exists; a list holding nothing but
/// non-primary entries yields no email at all.
fn apply_email(profile: &mut Profile, person: &TreeCursor<'_>) {
	let entries = person.filter("emails").filter("email");
	let chosen = if entries.has_index(0) {
		entries.items().find(|entry| entry.boolean("primary").unwrap_or(false))
	} else if entries.boolean("primary").unwrap_or(false) {
		Some(entries)
	} else {
		None
	};
	let Some(entry) = chosen else {
		return;
	};

	profile.email = entry.string("email");

	if entry.boolean("verified").unwrap_or(false) {
		profile.email_verified = profile.email.clone();
	}
}

/// Scopes to the first element when the provider wraps a single record in a sequence.
fn first_entry<'a>(cursor: &TreeCursor<'a>) -> TreeCursor<'a> {
	if cursor.has_index(0) { cursor.at(0) } else { *cursor }
}

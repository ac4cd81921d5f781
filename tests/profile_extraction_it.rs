#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use url::Url;
// self
use oauth2_bridge::{
	adapter::Adapter,
	error::{ConfigError, Error},
	http::ReqwestTransport,
	provider::{AdapterConfig, EndpointOverrides, ProviderHooks},
	providers::{GitHub, Keycloak, Orcid, Slack},
	store::{CredentialStore, MemoryStore},
};

fn build_adapter(
	server: &MockServer,
	hooks: Arc<dyn ProviderHooks>,
) -> (Adapter<ReqwestTransport>, Arc<MemoryStore>) {
	let callback =
		Url::parse("https://app.example.com/callback").expect("Callback URL fixture should parse.");
	let config = AdapterConfig::new("client-it", callback)
		.with_client_secret("secret-it")
		.with_endpoints(EndpointOverrides {
			authorize: Some(
				Url::parse(&server.url("/authorize"))
					.expect("Mock authorization endpoint should parse."),
			),
			token: Some(
				Url::parse(&server.url("/token")).expect("Mock token endpoint should parse."),
			),
			api_base: Some(Url::parse(&server.url("/")).expect("Mock API base should parse.")),
		});
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn CredentialStore> = store_backend.clone();
	let transport =
		ReqwestTransport::new().expect("Reqwest transport should build for profile test.");
	let adapter = Adapter::new(hooks, config, store, transport)
		.expect("Adapter construction should succeed.");

	(adapter, store_backend)
}

async fn connect(adapter: &mut Adapter<ReqwestTransport>, token: &str) {
	adapter
		.set_access_token(&[("access_token".to_owned(), token.to_owned())])
		.await
		.expect("Seeding the access token should succeed.");
}

#[tokio::test]
async fn slack_profile_picks_the_largest_image() {
	let server = MockServer::start_async().await;
	let (mut adapter, _store) = build_adapter(&server, Arc::new(Slack));

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users.identity").header("authorization", "Bearer abc");
			then.status(200).header("content-type", "application/json").body(
				"{\"ok\":true,\"user\":{\"id\":\"U1\",\"name\":\"worker\",\"email\":\"w@example.com\",\"image_32\":\"a\",\"image_192\":\"b\"}}",
			);
		})
		.await;
	connect(&mut adapter, "abc").await;

	let profile = adapter.user_profile().await.expect("Profile extraction should succeed.");

	assert_eq!(profile.identifier, "U1");
	assert_eq!(profile.display_name.as_deref(), Some("worker"));
	assert_eq!(profile.email.as_deref(), Some("w@example.com"));
	assert_eq!(profile.photo_url.as_deref(), Some("b"));
}

#[tokio::test]
async fn slack_rejects_responses_without_the_ok_flag() {
	let server = MockServer::start_async().await;
	let (mut adapter, _store) = build_adapter(&server, Arc::new(Slack));

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users.identity");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"ok\":false,\"error\":\"account_inactive\"}");
		})
		.await;
	connect(&mut adapter, "abc").await;

	let err = adapter
		.user_profile()
		.await
		.expect_err("Responses without the ok flag should fail extraction.");

	assert!(matches!(err, Error::UnexpectedResponse { context: "user_profile" }));
}

#[tokio::test]
async fn github_profile_falls_back_to_login_and_best_effort_email() {
	let server = MockServer::start_async().await;
	let (mut adapter, _store) = build_adapter(&server, Arc::new(GitHub));

	server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":583231,\"login\":\"octocat\",\"avatar_url\":\"https://example.com/a.png\"}");
		})
		.await;
	// The email endpoint failing must not fail the profile.
	server
		.mock_async(|when, then| {
			when.method(GET).path("/user/emails");
			then.status(403).body("{\"message\":\"forbidden\"}");
		})
		.await;
	connect(&mut adapter, "abc").await;

	let profile = adapter.user_profile().await.expect("Profile extraction should succeed.");

	assert_eq!(profile.identifier, "583231");
	assert_eq!(profile.display_name.as_deref(), Some("octocat"));
	assert_eq!(profile.email, None);
}

#[tokio::test]
async fn github_profile_adopts_the_primary_email() {
	let server = MockServer::start_async().await;
	let (mut adapter, _store) = build_adapter(&server, Arc::new(GitHub));

	server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":583231,\"login\":\"octocat\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/user/emails");
			then.status(200).header("content-type", "application/json").body(
				"[{\"email\":\"octo@example.com\",\"primary\":true,\"verified\":true}]",
			);
		})
		.await;
	connect(&mut adapter, "abc").await;

	let profile = adapter.user_profile().await.expect("Profile extraction should succeed.");

	assert_eq!(profile.email.as_deref(), Some("octo@example.com"));
	assert_eq!(profile.email_verified.as_deref(), Some("octo@example.com"));
}

#[tokio::test]
async fn github_profiles_without_an_identifier_fail() {
	let server = MockServer::start_async().await;
	let (mut adapter, _store) = build_adapter(&server, Arc::new(GitHub));

	server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"message\":\"bad credentials\"}");
		})
		.await;
	connect(&mut adapter, "abc").await;

	let err = adapter
		.user_profile()
		.await
		.expect_err("Profiles without an identifier should fail extraction.");

	assert!(matches!(err, Error::UnexpectedResponse { context: "user_profile" }));
}

#[tokio::test]
async fn orcid_persists_the_subject_id_and_reads_the_record() {
	let server = MockServer::start_async().await;
	let (mut adapter, store) = build_adapter(&server, Arc::new(Orcid));
	let redirect = adapter
		.authenticate_begin()
		.await
		.expect("Starting the handshake should succeed.")
		.expect("An unauthenticated session should produce a redirect.");
	let state = redirect
		.query_pairs()
		.find(|(name, _)| name == "state")
		.map(|(_, value)| value.into_owned())
		.expect("Redirect should carry a state parameter.");

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"at\",\"expires_in\":3600,\"orcid\":\"0000-0002-1825-0097\"}",
			);
		})
		.await;

	let params =
		vec![("state".to_owned(), state), ("code".to_owned(), "auth-code".to_owned())];
	let credential = adapter
		.authenticate_finish(&params)
		.await
		.expect("Finishing the handshake should succeed.");

	assert_eq!(
		credential.extras.get("orcid").map(String::as_str),
		Some("0000-0002-1825-0097")
	);
	assert_eq!(
		store.namespace_snapshot("orcid").get("orcid").map(String::as_str),
		Some("0000-0002-1825-0097")
	);

	let record = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/0000-0002-1825-0097/record")
				.header("accept", "application/json");
			then.status(200).header("content-type", "application/json").body(
				"{\"orcid-identifier\":{\"path\":\"0000-0002-1825-0097\",\"uri\":\"https://orcid.org/0000-0002-1825-0097\"},\
				\"person\":{\"name\":{\"given-names\":\"Josiah\",\"family-name\":\"Carberry\"},\
				\"emails\":{\"email\":[{\"email\":\"hidden@example.com\",\"primary\":false,\"verified\":true}]}},\
				\"preferences\":{\"locale\":\"en\"}}",
			);
		})
		.await;
	let profile = adapter.user_profile().await.expect("Profile extraction should succeed.");

	record.assert_async().await;

	assert_eq!(profile.identifier, "0000-0002-1825-0097");
	assert_eq!(profile.profile_url.as_deref(), Some("https://orcid.org/0000-0002-1825-0097"));
	assert_eq!(profile.display_name.as_deref(), Some("Josiah Carberry"));
	assert_eq!(profile.language.as_deref(), Some("en"));
	assert_eq!(profile.email, None, "A list with no primary entry must yield no email.");
	assert_eq!(profile.email_verified, None);
}

#[tokio::test]
async fn keycloak_requires_its_deployment_settings() {
	let callback =
		Url::parse("https://app.example.com/callback").expect("Callback URL fixture should parse.");
	let config = AdapterConfig::new("client-it", callback);
	let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
	let transport =
		ReqwestTransport::new().expect("Reqwest transport should build for Keycloak test.");
	let err = Adapter::new(Arc::new(Keycloak), config, store, transport)
		.err()
		.expect("Construction without deployment settings should fail.");

	assert!(matches!(err, Error::Config(ConfigError::MissingSetting { name: "url" })));
}

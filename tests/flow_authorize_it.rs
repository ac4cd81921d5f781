#![cfg(feature = "reqwest")]

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use url::Url;
// self
use oauth2_bridge::{
	engine::{Engine, FlowPhase},
	http::ReqwestTransport,
	provider::{ProviderDescriptor, ProviderId},
	store::{CredentialStore, MemoryStore, StoreKey},
};

const CLIENT_ID: &str = "client-it";

fn build_descriptor(pkce: bool) -> ProviderDescriptor {
	let provider_id =
		ProviderId::new("mock").expect("Provider identifier should be valid for authorize test.");

	ProviderDescriptor::builder(provider_id)
		.authorize_endpoint(
			Url::parse("https://provider.example.com/authorize")
				.expect("Authorization endpoint fixture should parse."),
		)
		.token_endpoint(
			Url::parse("https://provider.example.com/token")
				.expect("Token endpoint fixture should parse."),
		)
		.scope("openid profile")
		.extra_auth_param("prompt", "consent")
		.pkce(pkce)
		.build()
		.expect("Provider descriptor should build successfully.")
}

fn build_engine(pkce: bool) -> (Engine<ReqwestTransport>, Arc<MemoryStore>) {
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn CredentialStore> = store_backend.clone();
	let transport =
		ReqwestTransport::new().expect("Reqwest transport should build for authorize test.");
	let callback = Url::parse("https://app.example.com/callback")
		.expect("Callback URL fixture should parse.");
	let engine = Engine::new(store, transport, build_descriptor(pkce), CLIENT_ID, callback);

	(engine, store_backend)
}

#[tokio::test]
async fn authorization_redirect_carries_protocol_parameters() {
	let (engine, store) = build_engine(false);
	let redirect = engine
		.authorization_redirect()
		.await
		.expect("Authorization redirect should build successfully.");
	let pairs: HashMap<_, _> = redirect.query_pairs().into_owned().collect();

	assert!(redirect.as_str().starts_with("https://provider.example.com/authorize?"));
	assert_eq!(pairs.get("response_type"), Some(&"code".into()));
	assert_eq!(pairs.get("client_id"), Some(&CLIENT_ID.into()));
	assert_eq!(pairs.get("redirect_uri"), Some(&"https://app.example.com/callback".into()));
	assert_eq!(pairs.get("scope"), Some(&"openid profile".into()));
	assert_eq!(pairs.get("prompt"), Some(&"consent".into()));
	assert!(!pairs.contains_key("code_challenge"));

	let state = pairs.get("state").expect("Redirect should carry a state parameter.");

	assert_eq!(state.len(), 32);

	let stored = store
		.get(&StoreKey::new("mock", "authorization_state"))
		.await
		.expect("Store read should succeed.")
		.expect("State should be persisted before the redirect is returned.");

	assert_eq!(&stored, state);
}

#[tokio::test]
async fn pkce_descriptors_persist_the_verifier() {
	let (engine, store) = build_engine(true);
	let redirect = engine
		.authorization_redirect()
		.await
		.expect("Authorization redirect should build successfully.");
	let pairs: HashMap<_, _> = redirect.query_pairs().into_owned().collect();

	assert!(pairs.contains_key("code_challenge"));
	assert_eq!(pairs.get("code_challenge_method"), Some(&"S256".into()));

	let verifier = store
		.get(&StoreKey::new("mock", "pkce_verifier"))
		.await
		.expect("Store read should succeed.")
		.expect("Verifier should be persisted before the redirect is returned.");

	assert_eq!(verifier.len(), 64);
}

#[tokio::test]
async fn issuing_a_redirect_transitions_to_awaiting_callback() {
	let (engine, _store) = build_engine(false);

	assert_eq!(
		engine.phase().await.expect("Phase derivation should succeed."),
		FlowPhase::Unauthenticated
	);

	engine
		.authorization_redirect()
		.await
		.expect("Authorization redirect should build successfully.");

	assert_eq!(
		engine.phase().await.expect("Phase derivation should succeed."),
		FlowPhase::AwaitingCallback
	);
}

// std
use std::{env, process, sync::Arc};
// crates.io
use time::OffsetDateTime;
// self
use oauth2_bridge::store::{CredentialStore, FileStore, MemoryStore, StoreKey};

fn key(namespace: &str, name: &str) -> StoreKey {
	StoreKey::new(namespace, name)
}

#[tokio::test]
async fn memory_store_works_through_the_trait_object() {
	let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());

	store
		.set(key("github", "access_token"), "abc".into())
		.await
		.expect("Set should succeed through the trait object.");
	store
		.set(key("github", "refresh_token"), "def".into())
		.await
		.expect("Set should succeed through the trait object.");
	store
		.set(key("orcid", "access_token"), "zzz".into())
		.await
		.expect("Set should succeed through the trait object.");

	assert_eq!(
		store.get(&key("github", "access_token")).await.expect("Get should succeed."),
		Some("abc".into())
	);

	store.delete(&key("github", "refresh_token")).await.expect("Delete should succeed.");

	assert_eq!(
		store.get(&key("github", "refresh_token")).await.expect("Get should succeed."),
		None
	);

	store.clear("github").await.expect("Clear should succeed.");

	assert_eq!(
		store.get(&key("github", "access_token")).await.expect("Get should succeed."),
		None
	);
	assert_eq!(
		store.get(&key("orcid", "access_token")).await.expect("Get should succeed."),
		Some("zzz".into()),
		"Clearing one namespace must not touch another."
	);
}

#[tokio::test]
async fn file_store_clears_namespaces_across_reopen() {
	let unique = format!(
		"oauth2_bridge_store_it_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	);
	let path = env::temp_dir().join(unique);

	{
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");

		store
			.set(key("github", "access_token"), "abc".into())
			.await
			.expect("Set should succeed.");
		store
			.set(key("orcid", "access_token"), "zzz".into())
			.await
			.expect("Set should succeed.");
		store.clear("github").await.expect("Clear should succeed.");
	}

	let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");

	assert_eq!(
		reopened.get(&key("github", "access_token")).await.expect("Get should succeed."),
		None
	);
	assert_eq!(
		reopened.get(&key("orcid", "access_token")).await.expect("Get should succeed."),
		Some("zzz".into())
	);

	std::fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
	});
}

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub(crate) const STATE_LEN: usize = 32;
const PKCE_VERIFIER_LEN: usize = 64;

/// RFC 7636 identifier for the only challenge method the engine emits.
pub(crate) const PKCE_METHOD: &str = "S256";

#[derive(Clone, Debug)]
pub(crate) struct PkcePair {
	pub(crate) verifier: String,
	pub(crate) challenge: String,
}
impl PkcePair {
	pub(crate) fn generate() -> Self {
		let verifier = random_string(PKCE_VERIFIER_LEN);
		let challenge = compute_pkce_challenge(&verifier);

		Self { verifier, challenge }
	}
}

pub(crate) fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

fn compute_pkce_challenge(verifier: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(verifier.as_bytes());
	let digest = hasher.finalize();
	URL_SAFE_NO_PAD.encode(digest)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn random_strings_are_alphanumeric_and_sized() {
		let state = random_string(STATE_LEN);

		assert_eq!(state.len(), STATE_LEN);
		assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(state, random_string(STATE_LEN));
	}

	#[test]
	fn pkce_challenge_matches_rfc_7636_vector() {
		let challenge = compute_pkce_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");

		assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
	}

	#[test]
	fn generated_pairs_are_consistent() {
		let pair = PkcePair::generate();

		assert_eq!(pair.challenge, compute_pkce_challenge(&pair.verifier));
	}
}

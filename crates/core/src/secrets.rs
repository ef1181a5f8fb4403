//! Secret generation, hashing, and webhook signature verification.
//!
//! Three families of secret live in this module:
//!
//! - **Developer keys** -- long-lived integrator secrets. Stored as Argon2id
//!   PHC hashes (salted, constant-time verification) alongside a short
//!   unique prefix used to locate the row at verification time. The
//!   plaintext is shown exactly once at creation.
//! - **Access / refresh tokens** -- short-lived opaque strings. Only their
//!   SHA-256 hex digest is stored, so a database leak does not compromise
//!   live sessions; lookup is by digest.
//! - **Billing webhook signatures** -- HMAC-SHA256 over the raw request
//!   body, hex-encoded, verified in constant time.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of generated developer-key and token strings (alphanumeric).
pub const SECRET_LENGTH: usize = 48;

/// Number of leading characters of a developer key stored as a lookup prefix.
pub const KEY_PREFIX_LENGTH: usize = 8;

type HmacSha256 = Hmac<Sha256>;

// ---------------------------------------------------------------------------
// Developer keys
// ---------------------------------------------------------------------------

/// The result of generating a new developer key.
pub struct GeneratedKey {
    /// The plaintext secret (returned to the integrator exactly once).
    pub plaintext: String,
    /// The first [`KEY_PREFIX_LENGTH`] characters, stored for row lookup.
    pub prefix: String,
    /// Argon2id PHC hash of the plaintext (the only stored form).
    pub hash: String,
}

/// Generate a new random developer key.
///
/// The plaintext must never be persisted or logged.
pub fn generate_developer_key() -> Result<GeneratedKey, argon2::password_hash::Error> {
    let plaintext = random_alphanumeric(SECRET_LENGTH);
    let prefix = plaintext[..KEY_PREFIX_LENGTH].to_string();
    let hash = hash_developer_key(&plaintext)?;
    Ok(GeneratedKey {
        plaintext,
        prefix,
        hash,
    })
}

/// Hash a developer-key secret using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (algorithm, params, salt embedded).
pub fn hash_developer_key(secret: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(secret.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a presented secret against a stored PHC-formatted Argon2id hash.
///
/// Argon2 verification is constant-time with respect to the hash contents.
/// Returns `Ok(true)` on match, `Ok(false)` on mismatch.
pub fn verify_developer_key(
    secret: &str,
    hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(secret.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Extract the lookup prefix from a presented developer-key secret.
pub fn extract_prefix(secret: &str) -> &str {
    &secret[..KEY_PREFIX_LENGTH.min(secret.len())]
}

// ---------------------------------------------------------------------------
// Opaque tokens
// ---------------------------------------------------------------------------

/// Generate a cryptographically random opaque token.
///
/// Returns `(plaintext, sha256_hex_digest)`. The plaintext goes to the
/// caller; only the digest is persisted.
pub fn generate_token() -> (String, String) {
    let plaintext = random_alphanumeric(SECRET_LENGTH);
    let digest = hash_token(&plaintext);
    (plaintext, digest)
}

/// Compute the SHA-256 hex digest of a token for storage or lookup.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Billing webhook signatures
// ---------------------------------------------------------------------------

/// Compute the hex-encoded HMAC-SHA256 signature for a webhook payload.
///
/// Used by tests and by any outbound tooling that needs to sign a payload
/// the way the billing provider does.
pub fn compute_billing_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a hex-encoded HMAC-SHA256 signature against a raw payload.
///
/// Comparison is constant-time (`Mac::verify_slice`). Malformed hex is
/// treated as a failed verification, not an error.
pub fn verify_billing_signature(secret: &str, payload: &[u8], signature_hex: &str) -> bool {
    let Some(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    mac.verify_slice(&signature).is_ok()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string; `None` if the input is not valid hex.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

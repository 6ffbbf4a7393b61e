use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::debug;

/// Raw password against stored representation. The hashing scheme is opaque
/// to the rest of the system; swap implementations at this seam.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, raw: &str, stored: &str) -> bool;
}

/// Argon2id verification over PHC-format hashes. Fails closed on unparsable
/// stored values.
pub struct Argon2Verifier;

impl Argon2Verifier {
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn verify(&self, raw: &str, stored: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored) {
            Ok(h) => h,
            Err(e) => {
                debug!("Stored credential is not a valid hash: {}", e);
                return false;
            }
        };
        Argon2::default()
            .verify_password(raw.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Exact string comparison. Test fixtures only.
pub struct PlainTextVerifier;

impl CredentialVerifier for PlainTextVerifier {
    fn verify(&self, raw: &str, stored: &str) -> bool {
        raw == stored
    }
}

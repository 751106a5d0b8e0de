//! Salted argon2i password credentials.
//!
//! New credentials are stored in the argon2 encoded form (`$argon2i$m=...$<salt>$<hash>`).
//! Credentials imported from older databases are bcrypt hashes (`$2y$...`) and still verify.

use argon2rs::verifier::Encoded;
use rand::RngCore;

use crate::error::{ServiceError, ServiceResult};

const SALT_LENGTH: usize = 16;
const DUMMY_SALT: &[u8] = b"dummy-salt-value";

/// Placeholder credential for identities that never log in with a password.
pub const PLACEHOLDER_CREDENTIAL: &str = "!external";

pub fn password_hash_create(password: &str) -> ServiceResult<String> {
    if password.is_empty() {
        return Err(ServiceError::Validation(
            "Password must not be empty.".to_string(),
        ));
    }

    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let encoded = Encoded::default2i(password.as_bytes(), &salt, b"", b"").to_u8();
    String::from_utf8(encoded).map_err(|e| {
        ServiceError::InternalServerError(format!("Encoded password hash is not utf-8: {}", e))
    })
}

pub fn password_hash_verify(stored: &str, password: &str) -> bool {
    if stored.starts_with("$2") {
        return match bcrypt::verify(password, stored) {
            Ok(valid) => valid,
            Err(e) => {
                log::warn!("Could not verify legacy password hash: {}", e);
                false
            }
        };
    }

    match Encoded::from_u8(stored.as_bytes()) {
        Ok(encoded) => encoded.verify(password.as_bytes()),
        Err(_) => false,
    }
}

/// Burn the same amount of work as a real verification.
pub fn password_hash_dummy_verify(password: &str) {
    let _ = Encoded::default2i(password.as_bytes(), DUMMY_SALT, b"", b"");
}

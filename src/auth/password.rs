//! Password hashing
//!
//! Argon2id with a per-call random salt. The PHC output string carries the
//! algorithm, parameters and salt, so digests stay verifiable after the work
//! factor is retuned.

use anyhow::{Result, anyhow};
use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};

use crate::config::PasswordHashConfig;

/// Hashes and verifies user passwords
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    /// Verified against when a login names an unknown account.
    dummy_digest: String,
}

impl PasswordService {
    /// Build the service with the given work factor
    pub fn new(config: PasswordHashConfig) -> Result<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| anyhow!("Invalid Argon2 parameters: {}", e))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut service = Self {
            argon2,
            dummy_digest: String::new(),
        };
        service.dummy_digest = service.hash("taskboard-timing-equalizer")?;
        Ok(service)
    }

    /// Hash a plaintext password into a salted PHC string
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
        Ok(digest.to_string())
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// Malformed digests verify as `false`. The final comparison of the
    /// derived hash is constant-time.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Spend the same effort as a real verification, then fail.
    pub fn verify_against_dummy(&self, plaintext: &str) -> bool {
        let _ = self.verify(plaintext, &self.dummy_digest);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_service() -> PasswordService {
        PasswordService::new(PasswordHashConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn hash_then_verify() {
        let service = fast_service();
        let digest = service.hash("pw123").unwrap();

        assert!(service.verify("pw123", &digest));
        assert!(!service.verify("pw124", &digest));
        assert!(!service.verify("", &digest));
    }

    #[test]
    fn digest_is_salted_and_not_the_plaintext() {
        let service = fast_service();
        let first = service.hash("correct horse").unwrap();
        let second = service.hash("correct horse").unwrap();

        assert_ne!(first, second);
        assert!(!first.contains("correct horse"));
        assert!(first.starts_with("$argon2id$"));
        assert!(service.verify("correct horse", &first));
        assert!(service.verify("correct horse", &second));
    }

    #[test]
    fn malformed_digest_is_a_mismatch() {
        let service = fast_service();
        assert!(!service.verify("pw123", ""));
        assert!(!service.verify("pw123", "pw123"));
        assert!(!service.verify("pw123", "$argon2id$v=19$garbage"));
    }

    #[test]
    fn digests_survive_a_work_factor_change() {
        let old = fast_service();
        let digest = old.hash("pw123").unwrap();

        let retuned = PasswordService::new(PasswordHashConfig {
            memory_kib: 16,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(retuned.verify("pw123", &digest));
    }

    #[test]
    fn dummy_verification_never_succeeds() {
        let service = fast_service();
        assert!(!service.verify_against_dummy("taskboard-timing-equalizer"));
    }

    #[test]
    fn rejects_impossible_parameters() {
        let result = PasswordService::new(PasswordHashConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(result.is_err());
    }
}

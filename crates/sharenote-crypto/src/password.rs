//! Password hashing and verification using Argon2id.
//!
//! Hashes are PHC-format strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
//! carrying their own salt and parameters, so verification needs nothing but
//! the stored string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{CryptoError, CryptoResult};

/// Argon2id parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory in KiB (default: 19456 = 19 MiB).
    pub memory_kib: u32,
    /// Time iterations (default: 2).
    pub iterations: u32,
    /// Parallelism degree (default: 1).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl KdfParams {
    /// Cheapest parameters Argon2 accepts. Tests only.
    pub fn minimal() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn argon2(&self) -> CryptoResult<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| CryptoError::InvalidParams(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a password with a fresh random salt. Returns a PHC-format string.
pub fn hash_password(password: &str, params: &KdfParams) -> CryptoResult<String> {
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = params
        .argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CryptoError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
///
/// Returns `Ok(false)` on mismatch and `Err` only if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> CryptoResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| CryptoError::InvalidHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kdf_params_default_matches_argon2() {
        let params = KdfParams::default();
        assert_eq!(params.memory_kib, 19456);
        assert_eq!(params.iterations, 2);
        assert_eq!(params.parallelism, 1);
    }

    #[test]
    fn test_hash_is_phc_argon2id() {
        let hash = hash_password("correct horse", &KdfParams::minimal()).unwrap();
        assert!(hash.starts_with("$argon2id$v=19$"));
        assert!(!hash.contains("correct horse"));
    }

    #[test]
    fn test_hash_embeds_params() {
        let hash = hash_password("correct horse", &KdfParams::minimal()).unwrap();
        assert!(hash.contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let params = KdfParams::minimal();
        let a = hash_password("hunter2", &params).unwrap();
        let b = hash_password("hunter2", &params).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_correct_password() {
        let hash = hash_password("hunter2", &KdfParams::minimal()).unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("hunter2", &KdfParams::minimal()).unwrap();
        assert!(!verify_password("hunter3", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash() {
        let result = verify_password("hunter2", "hunter2");
        assert!(matches!(result, Err(CryptoError::InvalidHash(_))));
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = hash_password("", &KdfParams::minimal());
        assert!(matches!(result, Err(CryptoError::EmptyPassword)));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = KdfParams {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        };
        let result = hash_password("hunter2", &params);
        assert!(matches!(result, Err(CryptoError::InvalidParams(_))));
    }
}

//! # sharenote-crypto
//!
//! Credential hashing for sharenote.
//!
//! Passwords are hashed with Argon2id and stored as self-describing PHC
//! strings. Plaintext passwords never leave the request that carried them.
//!
//! ```rust
//! use sharenote_crypto::{hash_password, verify_password, KdfParams};
//!
//! let hash = hash_password("correct horse battery staple", &KdfParams::minimal()).unwrap();
//! assert!(verify_password("correct horse battery staple", &hash).unwrap());
//! assert!(!verify_password("Tr0ub4dor&3", &hash).unwrap());
//! ```

pub mod error;
pub mod password;

pub use error::{CryptoError, CryptoResult};
pub use password::{hash_password, verify_password, KdfParams};

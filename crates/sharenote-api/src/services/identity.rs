//! Registration and login.
//!
//! Passwords are hashed with Argon2id before they reach the repository and
//! verified against the stored PHC string on login. Both run on the blocking
//! pool since Argon2 is deliberately CPU and memory heavy.
//!
//! A login for an unknown username still verifies against a decoy hash built
//! with the service's own parameters, so it costs the same as a wrong password.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use sharenote_core::{Error, NewUser, Result, User, UserRepository};
use sharenote_crypto::{hash_password, verify_password, CryptoError, KdfParams};

#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    kdf: KdfParams,
    decoy_hash: Arc<OnceCell<String>>,
}

const DECOY_PASSWORD: &str = "sharenote-decoy-password";

impl IdentityService {
    pub fn new(users: Arc<dyn UserRepository>, kdf: KdfParams) -> Self {
        Self {
            users,
            kdf,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Create a user. Username uniqueness is checked before email uniqueness.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() {
            return Err(Error::InvalidInput("Username must not be empty".to_string()));
        }
        if email.is_empty() {
            return Err(Error::InvalidInput("Email must not be empty".to_string()));
        }

        let password_hash = hash_blocking(password, self.kdf).await?;

        let user = self
            .users
            .insert(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(
            subsystem = "api",
            component = "identity",
            op = "register",
            user_id = %user.id,
            "User registered"
        );
        Ok(user)
    }

    /// Check a username/password pair. Unknown users and wrong passwords are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let Some(creds) = self.users.find_by_username(username.trim()).await? else {
            warn!(
                subsystem = "api",
                component = "identity",
                op = "authenticate",
                "Login failed"
            );
            // Result ignored; only the cost matters.
            let decoy = self.decoy_hash().await?;
            let _ = verify_blocking(password, decoy).await;
            return Err(Error::InvalidCredentials);
        };

        let valid = verify_blocking(password, &creds.password_hash).await?;

        if !valid {
            warn!(
                subsystem = "api",
                component = "identity",
                op = "authenticate",
                user_id = %creds.user.id,
                "Login failed"
            );
            return Err(Error::InvalidCredentials);
        }

        info!(
            subsystem = "api",
            component = "identity",
            op = "authenticate",
            user_id = %creds.user.id,
            "Login succeeded"
        );
        Ok(creds.user)
    }
}

impl IdentityService {
    async fn decoy_hash(&self) -> Result<&str> {
        let hash = self
            .decoy_hash
            .get_or_try_init(|| hash_blocking(DECOY_PASSWORD, self.kdf))
            .await?;
        Ok(hash.as_str())
    }
}

async fn hash_blocking(password: &str, kdf: KdfParams) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password, &kdf))
        .await
        .map_err(|e| Error::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(crypto_error)
}

async fn verify_blocking(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal(format!("Verification task failed: {}", e)))?
        .map_err(crypto_error)
}

fn crypto_error(err: CryptoError) -> Error {
    match err {
        CryptoError::EmptyPassword => Error::InvalidInput(err.to_string()),
        other => Error::PasswordHash(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharenote_db::MemoryUserRepository;

    fn service() -> (IdentityService, MemoryUserRepository) {
        let repo = MemoryUserRepository::new();
        let svc = IdentityService::new(Arc::new(repo.clone()), KdfParams::minimal());
        (svc, repo)
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (svc, repo) = service();
        svc.register("alice", "alice@example.com", "s3cret")
            .await
            .unwrap();

        let creds = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(creds.password_hash, "s3cret");
        assert!(creds.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_authenticate_round_trip() {
        let (svc, _) = service();
        let user = svc
            .register("alice", "alice@example.com", "s3cret")
            .await
            .unwrap();

        let logged_in = svc.authenticate("alice", "s3cret").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let (svc, _) = service();
        svc.register("alice", "alice@example.com", "s3cret")
            .await
            .unwrap();

        let err = svc.authenticate("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let (svc, _) = service();
        let err = svc.authenticate("nobody", "s3cret").await.unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_user_verifies_against_decoy_hash() {
        let (svc, _) = service();
        assert!(svc.decoy_hash.get().is_none());

        let err = svc.authenticate("nobody", "s3cret").await.unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));

        // Built once, with the same cost parameters real hashes use.
        let decoy = svc.decoy_hash.get().cloned().unwrap();
        assert!(decoy.starts_with("$argon2id$"));
        assert!(decoy.contains("m=1024,t=1,p=1"));

        svc.authenticate("ghost", "").await.unwrap_err();
        assert_eq!(svc.decoy_hash.get(), Some(&decoy));
    }

    #[tokio::test]
    async fn test_decoy_password_cannot_log_in() {
        let (svc, _) = service();
        let err = svc
            .authenticate("nobody", DECOY_PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_password() {
        let (svc, _) = service();
        let err = svc
            .register("alice", "alice@example.com", "")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_username() {
        let (svc, _) = service();
        let err = svc
            .register("   ", "alice@example.com", "s3cret")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_malformed_stored_hash_is_server_error() {
        let repo = MemoryUserRepository::new();
        repo.insert(NewUser {
            username: "legacy".to_string(),
            email: "legacy@example.com".to_string(),
            password_hash: "plaintext".to_string(),
        })
        .await
        .unwrap();
        let svc = IdentityService::new(Arc::new(repo), KdfParams::minimal());

        let err = svc.authenticate("legacy", "plaintext").await.unwrap_err();
        assert!(matches!(err, Error::PasswordHash(_)));
    }
}

// Authentication primitives: bcrypt for passwords, SHA-256 for session tokens.
use bcrypt::{DEFAULT_COST, hash, verify};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::user::{CreateUser, User, UserError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    User(#[from] UserError),
    #[error("Password hashing failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

pub struct AuthService;

impl AuthService {
    /// Hash a password using bcrypt
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        hash(password, DEFAULT_COST)
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
        verify(password, hash)
    }

    /// Generate a new session token. UUID v4 provides 122 bits of randomness.
    pub fn generate_session_token() -> String {
        Uuid::new_v4().to_string()
    }

    /// Hash a session token for storage. Tokens are already high-entropy, so
    /// a fast SHA-256 (checked on every authenticated request) is the right
    /// tradeoff; bcrypt stays reserved for passwords.
    pub fn hash_session_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Create the first admin account from `ADMIN_USERNAME`/`ADMIN_PASSWORD`
/// when the users table is empty. Returns the created user, if any.
pub async fn ensure_admin_user(pool: &SqlitePool) -> Result<Option<User>, AuthError> {
    if User::count(pool).await? > 0 {
        return Ok(None);
    }

    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        warn!(
            "No users exist and ADMIN_USERNAME/ADMIN_PASSWORD are unset; admin routes will be unreachable until an account is created"
        );
        return Ok(None);
    };

    let password_hash = AuthService::hash_password(&password)?;
    let user = User::create(
        pool,
        &CreateUser {
            username: username.clone(),
            email: format!("{}@localhost", username),
            password_hash,
            is_admin: true,
        },
    )
    .await?;

    info!("Bootstrapped admin user '{}'", username);
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = "test_password_123";
        let hash = AuthService::hash_password(password).unwrap();

        // Verify correct password
        assert!(AuthService::verify_password(password, &hash).unwrap());

        // Verify wrong password fails
        assert!(!AuthService::verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_session_token_generation() {
        let token1 = AuthService::generate_session_token();
        let token2 = AuthService::generate_session_token();

        assert_ne!(token1, token2);
        assert!(Uuid::parse_str(&token1).is_ok());
        assert!(Uuid::parse_str(&token2).is_ok());
    }

    #[test]
    fn test_session_token_hash_is_stable() {
        let token = "5f8c2f9e-92f6-4f5a-9f2e-demo";
        assert_eq!(
            AuthService::hash_session_token(token),
            AuthService::hash_session_token(token)
        );
        assert_ne!(
            AuthService::hash_session_token(token),
            AuthService::hash_session_token("other")
        );
    }
}

//! Session tokens and password hashing behind sign-up and login.

use uuid::Uuid;

/// Role granted to every registered account.
pub const DEFAULT_ROLE: &str = "user";

/// What a valid session token says about its holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    /// Username at issue time, used for profile links without a lookup.
    pub username: String,
    pub roles: Vec<String>,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Issues and checks signed session tokens.
pub trait TokenService: Send + Sync {
    fn generate_token(
        &self,
        user_id: Uuid,
        username: &str,
        roles: Vec<String>,
    ) -> Result<String, AuthError>;

    /// Rejects expired, tampered and foreign-issuer tokens.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Cookie lifetime matching issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// One-way password storage.
pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Session expired")]
    TokenExpired,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Not logged in")]
    MissingAuth,

    #[error("Password hashing failed: {0}")]
    HashingError(String),
}

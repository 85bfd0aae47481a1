use chrono::Utc;
use rand::RngExt;
use sha2::{Digest, Sha256};

use crate::domain::repository::UserRepository;
use crate::domain::types::{PasswordDigest, RememberToken, User, normalize_email};
use crate::error::SocialServiceError;

/// SHA-256 hex digest of `"{salt}--{plaintext}"`.
pub fn hash_secret(salt: &str, plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"--");
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fresh salt from OS randomness, the current time and `seed`.
pub fn new_salt(seed: &str) -> String {
    let noise: [u8; 32] = rand::rng().random();
    let now = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(noise);
    hasher.update(now.to_be_bytes());
    hasher.update(seed.as_bytes());
    hex::encode(hasher.finalize())
}

/// Replace the user's digest. The salt always rotates, which invalidates
/// every remember token issued before.
pub fn set_password(user: &mut User, plaintext: &str) {
    let salt = new_salt(&format!("{}--{}", user.id, user.email));
    let encrypted_password = hash_secret(&salt, plaintext);
    user.password = Some(PasswordDigest {
        salt,
        encrypted_password,
    });
}

pub fn verify(user: &User, plaintext: &str) -> bool {
    match user.password {
        Some(ref digest) => hash_secret(&digest.salt, plaintext) == digest.encrypted_password,
        None => false,
    }
}

// ── AuthenticatePassword ─────────────────────────────────────────────────────

pub struct AuthenticatePasswordUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> AuthenticatePasswordUseCase<R> {
    pub async fn execute(&self, email: &str, password: &str) -> Result<User, SocialServiceError> {
        let user = self
            .repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(SocialServiceError::InvalidCredentials)?;
        if !verify(&user, password) {
            return Err(SocialServiceError::InvalidCredentials);
        }
        Ok(user)
    }
}

// ── AuthenticateRemember ─────────────────────────────────────────────────────

pub struct AuthenticateRememberUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> AuthenticateRememberUseCase<R> {
    /// The user whose current salt equals the token's, else `UserNotFound`.
    pub async fn execute(&self, token: &RememberToken) -> Result<User, SocialServiceError> {
        let user = self
            .repo
            .find_by_id(token.user_id)
            .await?
            .ok_or(SocialServiceError::UserNotFound)?;
        match user.salt() {
            Some(salt) if salt == token.salt => Ok(user),
            _ => Err(SocialServiceError::UserNotFound),
        }
    }
}

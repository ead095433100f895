use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use async_trait::async_trait;
use rand::RngCore;

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("password hashing failed: {0}")]
    Argon2(String),
    #[error("password hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// One-way transform of a plaintext secret into a storable passphrase.
#[async_trait]
pub trait HashingService: Send + Sync {
    async fn hash_password(&self, plaintext: &str) -> Result<String, HashError>;
}

#[derive(Default)]
pub struct Argon2HashingService;

impl Argon2HashingService {
    pub fn new() -> Self {
        Self
    }

    fn hash_blocking(plaintext: &str) -> Result<String, HashError> {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt =
            SaltString::encode_b64(&salt).map_err(|err| HashError::Argon2(err.to_string()))?;
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| HashError::Argon2(err.to_string()))?
            .to_string();
        Ok(hash)
    }
}

#[async_trait]
impl HashingService for Argon2HashingService {
    async fn hash_password(&self, plaintext: &str) -> Result<String, HashError> {
        // argon2 is CPU bound; keep it off the async workers.
        let plaintext = plaintext.to_string();
        tokio::task::spawn_blocking(move || Self::hash_blocking(&plaintext)).await?
    }
}

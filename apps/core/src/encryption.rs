use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose, Engine as _};
use rand::{Rng, RngCore};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::AppError;

const NONCE_SIZE: usize = 12;
const KEY_SIZE: usize = 32;

/// A 256-bit AES-GCM key.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; KEY_SIZE]);

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

impl EncryptionKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Builds a key from a passphrase such as `ENCRYPTION_KEY`.
    ///
    /// Shorter input is padded with zeros, longer input is truncated.
    pub fn from_passphrase(passphrase: &str) -> Self {
        let mut key_bytes = [0u8; KEY_SIZE];
        let bytes = passphrase.as_bytes();
        let len = bytes.len().min(KEY_SIZE);
        key_bytes[..len].copy_from_slice(&bytes[..len]);
        Self(key_bytes)
    }

    pub fn generate() -> Self {
        let mut key_bytes = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key_bytes);
        Self(key_bytes)
    }

    /// Reads a Base64 key file, creating one with a fresh random key if it does not exist.
    pub fn load_or_generate(path: &Path) -> Result<Self, AppError> {
        if path.exists() {
            let encoded = fs::read_to_string(path)?;
            let decoded = general_purpose::STANDARD
                .decode(encoded.trim())
                .map_err(|e| AppError::Crypto(format!("Key file {:?} is not Base64: {}", path, e)))?;
            let bytes: [u8; KEY_SIZE] = decoded.try_into().map_err(|v: Vec<u8>| {
                AppError::Crypto(format!(
                    "Key file {:?} holds {} bytes, expected {}",
                    path,
                    v.len(),
                    KEY_SIZE
                ))
            })?;
            return Ok(Self(bytes));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let key = Self::generate();
        fs::write(path, general_purpose::STANDARD.encode(key.0))?;
        info!("Generated new encryption key at {:?}", path);
        Ok(key)
    }

    /// Prefers the passphrase when present, otherwise the key file.
    pub fn resolve(passphrase: Option<&str>, key_path: &Path) -> Result<Self, AppError> {
        match passphrase {
            Some(passphrase) => Ok(Self::from_passphrase(passphrase)),
            None => Self::load_or_generate(key_path),
        }
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0))
    }
}

/// Encrypts data using AES-256-GCM.
///
/// A random 12-byte nonce is generated for each encryption. The nonce is prepended
/// to the ciphertext, and the combined result is Base64 encoded.
pub fn encrypt(key: &EncryptionKey, data: &[u8]) -> Result<String, AppError> {
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = key
        .cipher()
        .encrypt(nonce, data)
        .map_err(|e| AppError::Crypto(format!("Encryption failure: {}", e)))?;

    let mut combined = nonce_bytes.to_vec();
    combined.extend(ciphertext);

    Ok(general_purpose::STANDARD.encode(combined))
}

/// Decrypts data that was encrypted with [`encrypt`].
pub fn decrypt(key: &EncryptionKey, encrypted_base64: &str) -> Result<Vec<u8>, AppError> {
    let decoded = general_purpose::STANDARD
        .decode(encrypted_base64)
        .map_err(|e| AppError::Crypto(format!("Base64 decode failure: {}", e)))?;

    if decoded.len() < NONCE_SIZE {
        return Err(AppError::Crypto("Invalid encrypted data length".to_string()));
    }

    let nonce = Nonce::from_slice(&decoded[..NONCE_SIZE]);
    let ciphertext = &decoded[NONCE_SIZE..];

    key.cipher()
        .decrypt(nonce, ciphertext)
        .map_err(|e| AppError::Crypto(format!("Decryption failure: {}", e)))
}

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{EncryptionError, EncryptionPort, EncryptionResult};

pub(super) const KEY_LEN: usize = 32;
pub(super) const NONCE_LEN: usize = 12;
const VERSION_PREFIX: &str = "v1:";

pub(super) fn cipher_from_bytes(key: &[u8]) -> EncryptionResult<Aes256Gcm> {
    if key.len() != KEY_LEN {
        return Err(EncryptionError::InvalidKey(format!(
            "expected {} bytes, got {}",
            KEY_LEN,
            key.len()
        )));
    }
    Aes256Gcm::new_from_slice(key).map_err(|e| EncryptionError::InvalidKey(e.to_string()))
}

pub(super) fn cipher_from_base64(key_b64: &str) -> EncryptionResult<Aes256Gcm> {
    let bytes = STANDARD
        .decode(key_b64.trim())
        .map_err(|e| EncryptionError::InvalidKey(format!("key is not base64: {}", e)))?;
    cipher_from_bytes(&bytes)
}

pub(super) fn random_cipher() -> Aes256Gcm {
    Aes256Gcm::new(&Aes256Gcm::generate_key(OsRng))
}

/// Encrypt under a fresh random nonce. Returns `(nonce, ciphertext || tag)`.
pub(super) fn seal(cipher: &Aes256Gcm, plaintext: &[u8]) -> EncryptionResult<(Vec<u8>, Vec<u8>)> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| EncryptionError::EncryptionFailed)?;
    Ok((nonce.to_vec(), ciphertext))
}

pub(super) fn open(cipher: &Aes256Gcm, nonce: &[u8], ciphertext: &[u8]) -> EncryptionResult<Vec<u8>> {
    if nonce.len() != NONCE_LEN {
        return Err(EncryptionError::MalformedCiphertext(format!(
            "nonce must be {} bytes",
            NONCE_LEN
        )));
    }
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| EncryptionError::DecryptionFailed)
}

pub(super) fn decode_field(name: &str, value: &str) -> EncryptionResult<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| EncryptionError::MalformedCiphertext(format!("{}: {}", name, e)))
}

/// AES-256-GCM under a single master key.
///
/// Output format: `v1:` followed by base64 of `nonce (12 bytes) || ciphertext || tag`.
#[derive(Clone)]
pub struct AesGcmEncryption {
    cipher: Aes256Gcm,
}

impl fmt::Debug for AesGcmEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesGcmEncryption").finish_non_exhaustive()
    }
}

impl AesGcmEncryption {
    /// Build from a raw 32-byte key.
    pub fn new(key: &[u8]) -> EncryptionResult<Self> {
        Ok(Self {
            cipher: cipher_from_bytes(key)?,
        })
    }

    /// Build from a base64-encoded 32-byte key.
    pub fn from_base64(key_b64: &str) -> EncryptionResult<Self> {
        Ok(Self {
            cipher: cipher_from_base64(key_b64)?,
        })
    }

    /// Build with a random key that lives only as long as this value.
    pub fn generate() -> Self {
        Self {
            cipher: random_cipher(),
        }
    }
}

impl EncryptionPort for AesGcmEncryption {
    fn protect(&self, plaintext: &str) -> EncryptionResult<String> {
        let (nonce, ciphertext) = seal(&self.cipher, plaintext.as_bytes())?;
        let mut blob = nonce;
        blob.extend_from_slice(&ciphertext);
        Ok(format!("{}{}", VERSION_PREFIX, STANDARD.encode(blob)))
    }

    fn unprotect(&self, protected: &str) -> EncryptionResult<String> {
        let encoded = protected.strip_prefix(VERSION_PREFIX).ok_or_else(|| {
            EncryptionError::MalformedCiphertext("missing version prefix".to_string())
        })?;
        let blob = decode_field("payload", encoded)?;
        if blob.len() <= NONCE_LEN {
            return Err(EncryptionError::MalformedCiphertext(
                "payload too short".to_string(),
            ));
        }

        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let plaintext = open(&self.cipher, nonce, ciphertext)?;
        String::from_utf8(plaintext)
            .map_err(|e| EncryptionError::MalformedCiphertext(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "aes-gcm"
    }
}

use std::fmt;

use aes_gcm::aead::{KeyInit, OsRng};
use aes_gcm::Aes256Gcm;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::aead::{cipher_from_base64, cipher_from_bytes, decode_field, open, random_cipher, seal};
use super::{EncryptionError, EncryptionPort, EncryptionResult};

/// Stored form of an envelope-encrypted value. All fields are base64.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    encrypted_key: String,
    key_nonce: String,
    nonce: String,
    ciphertext: String,
}

/// Envelope encryption: every call draws a fresh 256-bit data key, encrypts the
/// plaintext with it, then wraps the data key with the master key.
///
/// Rotating the master key only requires re-wrapping `encrypted_key`.
#[derive(Clone)]
pub struct EnvelopeEncryption {
    master: Aes256Gcm,
}

impl fmt::Debug for EnvelopeEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeEncryption").finish_non_exhaustive()
    }
}

impl EnvelopeEncryption {
    pub fn new(master_key: &[u8]) -> EncryptionResult<Self> {
        Ok(Self {
            master: cipher_from_bytes(master_key)?,
        })
    }

    pub fn from_base64(master_key_b64: &str) -> EncryptionResult<Self> {
        Ok(Self {
            master: cipher_from_base64(master_key_b64)?,
        })
    }

    pub fn generate() -> Self {
        Self {
            master: random_cipher(),
        }
    }
}

impl EncryptionPort for EnvelopeEncryption {
    fn protect(&self, plaintext: &str) -> EncryptionResult<String> {
        let data_key = Aes256Gcm::generate_key(OsRng);
        let data_cipher = Aes256Gcm::new(&data_key);

        let (nonce, ciphertext) = seal(&data_cipher, plaintext.as_bytes())?;
        let (key_nonce, encrypted_key) = seal(&self.master, data_key.as_slice())?;

        let envelope = Envelope {
            encrypted_key: STANDARD.encode(encrypted_key),
            key_nonce: STANDARD.encode(key_nonce),
            nonce: STANDARD.encode(nonce),
            ciphertext: STANDARD.encode(ciphertext),
        };
        serde_json::to_string(&envelope).map_err(|_| EncryptionError::EncryptionFailed)
    }

    fn unprotect(&self, protected: &str) -> EncryptionResult<String> {
        let envelope: Envelope = serde_json::from_str(protected)
            .map_err(|e| EncryptionError::MalformedCiphertext(e.to_string()))?;

        let encrypted_key = decode_field("encrypted_key", &envelope.encrypted_key)?;
        let key_nonce = decode_field("key_nonce", &envelope.key_nonce)?;
        let nonce = decode_field("nonce", &envelope.nonce)?;
        let ciphertext = decode_field("ciphertext", &envelope.ciphertext)?;

        let data_key = open(&self.master, &key_nonce, &encrypted_key)?;
        let data_cipher = cipher_from_bytes(&data_key)
            .map_err(|_| EncryptionError::MalformedCiphertext("bad data key".to_string()))?;
        let plaintext = open(&data_cipher, &nonce, &ciphertext)?;

        String::from_utf8(plaintext)
            .map_err(|e| EncryptionError::MalformedCiphertext(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "envelope"
    }
}

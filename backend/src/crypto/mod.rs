//! Encryption at rest for observation coordinates.
//!
//! The store hands a serialized [`LocationPayload`](crate::db::LocationPayload)
//! to an [`EncryptionPort`] before writing and reverses it on read. Three
//! providers are available:
//!
//! - [`NoopEncryption`]: identity, for local development and tests
//! - [`AesGcmEncryption`]: AES-256-GCM under a single master key
//! - [`EnvelopeEncryption`]: a fresh data key per value, wrapped by the master key

mod aead;
mod envelope;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use aead::AesGcmEncryption;
pub use envelope::EnvelopeEncryption;

/// Result type for encryption operations
pub type EncryptionResult<T> = Result<T, EncryptionError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncryptionError {
    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),

    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed")]
    DecryptionFailed,
}

/// Reversible string protection applied to data before it is persisted.
pub trait EncryptionPort: Send + Sync {
    fn protect(&self, plaintext: &str) -> EncryptionResult<String>;
    fn unprotect(&self, protected: &str) -> EncryptionResult<String>;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}

/// Pass-through provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEncryption;

impl EncryptionPort for NoopEncryption {
    fn protect(&self, plaintext: &str) -> EncryptionResult<String> {
        Ok(plaintext.to_string())
    }

    fn unprotect(&self, protected: &str) -> EncryptionResult<String> {
        Ok(protected.to_string())
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Which provider to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncryptionProvider {
    None,
    #[default]
    AesGcm,
    Envelope,
}

impl FromStr for EncryptionProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "noop" | "off" => Ok(Self::None),
            "aes-gcm" | "aes_gcm" | "aesgcm" => Ok(Self::AesGcm),
            "envelope" => Ok(Self::Envelope),
            _ => Err(format!("Unknown encryption provider: {}", s)),
        }
    }
}

impl fmt::Display for EncryptionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::AesGcm => "aes-gcm",
            Self::Envelope => "envelope",
        };
        f.write_str(name)
    }
}

/// `[encryption]` configuration section.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct EncryptionSettings {
    #[serde(default)]
    pub provider: EncryptionProvider,
    /// Base64-encoded 32-byte master key.
    #[serde(default)]
    pub key: Option<String>,
}

impl fmt::Debug for EncryptionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionSettings")
            .field("provider", &self.provider)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Build the configured provider.
///
/// Keyed providers without a configured key get an ephemeral random key;
/// data written with it cannot be read after a restart.
pub fn build_encryption(settings: &EncryptionSettings) -> EncryptionResult<Arc<dyn EncryptionPort>> {
    let key = settings
        .key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());

    if key.is_none() && settings.provider != EncryptionProvider::None {
        warn!(
            provider = %settings.provider,
            "No encryption key configured; using an ephemeral key for this process"
        );
    }

    let port: Arc<dyn EncryptionPort> = match (settings.provider, key) {
        (EncryptionProvider::None, _) => Arc::new(NoopEncryption),
        (EncryptionProvider::AesGcm, Some(k)) => Arc::new(AesGcmEncryption::from_base64(k)?),
        (EncryptionProvider::AesGcm, None) => Arc::new(AesGcmEncryption::generate()),
        (EncryptionProvider::Envelope, Some(k)) => Arc::new(EnvelopeEncryption::from_base64(k)?),
        (EncryptionProvider::Envelope, None) => Arc::new(EnvelopeEncryption::generate()),
    };

    info!(provider = port.name(), "Encryption provider ready");
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    const PAYLOAD: &str = r#"{"right_ascension_degrees":80.0,"declination_degrees":38.78}"#;

    fn key_b64() -> String {
        STANDARD.encode([7u8; 32])
    }

    #[test]
    fn test_noop_is_identity() {
        let port = NoopEncryption;
        let protected = port.protect(PAYLOAD).unwrap();
        assert_eq!(protected, PAYLOAD);
        assert_eq!(port.unprotect(&protected).unwrap(), PAYLOAD);
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("none".parse::<EncryptionProvider>(), Ok(EncryptionProvider::None));
        assert_eq!("AES-GCM".parse::<EncryptionProvider>(), Ok(EncryptionProvider::AesGcm));
        assert_eq!("envelope".parse::<EncryptionProvider>(), Ok(EncryptionProvider::Envelope));
        assert!("rot13".parse::<EncryptionProvider>().is_err());
    }

    #[test]
    fn test_provider_deserializes_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            provider: EncryptionProvider,
        }
        let w: Wrapper = toml::from_str(r#"provider = "aes-gcm""#).unwrap();
        assert_eq!(w.provider, EncryptionProvider::AesGcm);
    }

    #[test]
    fn test_build_each_provider() {
        for (provider, expected) in [
            (EncryptionProvider::None, "none"),
            (EncryptionProvider::AesGcm, "aes-gcm"),
            (EncryptionProvider::Envelope, "envelope"),
        ] {
            let port = build_encryption(&EncryptionSettings {
                provider,
                key: Some(key_b64()),
            })
            .unwrap();
            assert_eq!(port.name(), expected);
            let protected = port.protect(PAYLOAD).unwrap();
            assert_eq!(port.unprotect(&protected).unwrap(), PAYLOAD);
        }
    }

    #[test]
    fn test_build_without_key_uses_ephemeral_key() {
        let port = build_encryption(&EncryptionSettings {
            provider: EncryptionProvider::AesGcm,
            key: Some("   ".into()),
        })
        .unwrap();
        let protected = port.protect(PAYLOAD).unwrap();
        assert!(!protected.contains("80.0"));
        assert_eq!(port.unprotect(&protected).unwrap(), PAYLOAD);
    }

    #[test]
    fn test_build_rejects_bad_key() {
        let err = build_encryption(&EncryptionSettings {
            provider: EncryptionProvider::Envelope,
            key: Some(STANDARD.encode([1u8; 16])),
        })
        .err()
        .unwrap();
        assert!(matches!(err, EncryptionError::InvalidKey(_)));
    }

    #[test]
    fn test_settings_debug_redacts_key() {
        let settings = EncryptionSettings {
            provider: EncryptionProvider::AesGcm,
            key: Some(key_b64()),
        };
        let debug = format!("{:?}", settings);
        assert!(!debug.contains(&key_b64()));
        assert!(debug.contains("<redacted>"));
    }
}

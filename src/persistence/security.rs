use super::crypto::{self, CryptoError, CryptoKey};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PIN_LEN: usize = 4;
pub const MAX_PIN_LEN: usize = 8;

/// Plaintext encrypted under a PIN key so a wrong PIN can be told apart
const VERIFIER_PLAINTEXT: &[u8] = b"pomodo-pin-check";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecurityMode {
    Auto,
    Pin,
}

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("PIN must be 4 to 8 digits")]
    InvalidPin,
    #[error("wrong PIN")]
    WrongPin,
    #[error("security config is missing key material")]
    MissingKeyMaterial,
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Key material stored in the clear next to the encrypted blobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    pub mode: SecurityMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier: Option<String>,
}

impl SecurityConfig {
    /// New auto-mode config with a fresh device key
    pub fn new_auto() -> (Self, CryptoKey) {
        let key = CryptoKey::generate();
        let config = Self {
            mode: SecurityMode::Auto,
            auto_key: Some(key.to_base64()),
            salt: None,
            verifier: None,
        };
        (config, key)
    }

    /// New PIN-mode config with a fresh salt
    pub fn new_pin(pin: &str) -> Result<(Self, CryptoKey), SecurityError> {
        validate_pin(pin)?;
        let salt = crypto::generate_salt();
        let key = CryptoKey::derive_from_pin(pin, &salt);
        let verifier = crypto::encrypt(&key, VERIFIER_PLAINTEXT)?;
        let config = Self {
            mode: SecurityMode::Pin,
            auto_key: None,
            salt: Some(B64.encode(salt)),
            verifier: Some(verifier),
        };
        Ok((config, key))
    }

    pub fn requires_pin(&self) -> bool {
        self.mode == SecurityMode::Pin
    }

    /// Key for auto mode; `None` in PIN mode
    pub fn auto_key(&self) -> Result<Option<CryptoKey>, SecurityError> {
        match self.mode {
            SecurityMode::Pin => Ok(None),
            SecurityMode::Auto => {
                let encoded = self
                    .auto_key
                    .as_deref()
                    .ok_or(SecurityError::MissingKeyMaterial)?;
                Ok(Some(CryptoKey::from_base64(encoded)?))
            }
        }
    }

    /// Derive the PIN key and check it against the verifier
    pub fn unlock(&self, pin: &str) -> Result<CryptoKey, SecurityError> {
        validate_pin(pin)?;
        let salt = self
            .salt
            .as_deref()
            .ok_or(SecurityError::MissingKeyMaterial)?;
        let salt = B64.decode(salt).map_err(CryptoError::from)?;
        let key = CryptoKey::derive_from_pin(pin, &salt);

        if let Some(verifier) = &self.verifier {
            match crypto::decrypt(&key, verifier) {
                Ok(plain) if plain == VERIFIER_PLAINTEXT => {}
                _ => return Err(SecurityError::WrongPin),
            }
        }
        Ok(key)
    }
}

/// PINs are 4 to 8 ASCII digits
pub fn validate_pin(pin: &str) -> Result<(), SecurityError> {
    let len = pin.len();
    if (MIN_PIN_LEN..=MAX_PIN_LEN).contains(&len) && pin.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(SecurityError::InvalidPin)
    }
}

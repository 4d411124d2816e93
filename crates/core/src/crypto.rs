//! Credential token sealing.
//!
//! Derives a 256-bit key from an operator-provided secret with
//! HKDF-SHA256 and seals tokens with AES-256-GCM. The registry engine
//! only ever stores the sealed bytes; plaintext tokens exist in memory
//! for the duration of a call.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::error::CoreError;

type HmacSha256 = Hmac<Sha256>;

/// Domain-separation label for the key derivation step.
const HKDF_INFO: &[u8] = b"grove-credential-key";

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Seals and opens credential tokens with a key derived from a secret.
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    /// Derive the sealing key from `secret` and build a cipher.
    pub fn new(secret: &[u8]) -> Result<Self, CoreError> {
        let key = derive_key(secret)?;
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| CoreError::Internal(format!("cipher init failed: {e}")))?;
        Ok(Self { cipher })
    }

    /// Seal a token. Output layout is `nonce || ciphertext || tag`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CoreError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| CoreError::Internal("token encryption failed".to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Open a sealed token produced by [`TokenCipher::encrypt`].
    pub fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, CoreError> {
        if sealed.len() <= NONCE_LEN {
            return Err(CoreError::Internal(
                "sealed token is too short".to_string(),
            ));
        }
        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CoreError::Internal("token decryption failed".to_string()))
    }
}

/// HKDF-SHA256 (RFC 5869) with an empty salt, expanded to one block.
fn derive_key(secret: &[u8]) -> Result<[u8; 32], CoreError> {
    // Extract: PRK = HMAC(salt = zeroed block, IKM = secret).
    let mut mac = <HmacSha256 as Mac>::new_from_slice(&[0u8; 32])
        .map_err(|e| CoreError::Internal(format!("hkdf extract failed: {e}")))?;
    mac.update(secret);
    let prk = mac.finalize().into_bytes();

    // Expand: OKM(1) = HMAC(PRK, info || 0x01); 32 bytes is one block.
    let mut mac = <HmacSha256 as Mac>::new_from_slice(&prk)
        .map_err(|e| CoreError::Internal(format!("hkdf expand failed: {e}")))?;
    mac.update(HKDF_INFO);
    mac.update(&[0x01]);
    let okm = mac.finalize().into_bytes();

    Ok(okm.into())
}

//! AEAD codec using ChaCha20-Poly1305
//!
//! Blob = base64(nonce || ciphertext+tag). The key is derived from an
//! injected application secret via HKDF-SHA256; a fixed AAD label binds
//! the ciphertext to its purpose so it cannot be replayed into another
//! decryption context. Any tampering surfaces as `DecryptionFailed`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Nonce,
};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use formrelay_core::{FormError, FormResult, RequestId};

use crate::{framing, HiddenParameterSet, HiddenValueCodec};

/// Key size for ChaCha20-Poly1305
pub const KEY_SIZE: usize = 32;

/// Nonce size for ChaCha20-Poly1305
pub const NONCE_SIZE: usize = 12;

/// Tag size for ChaCha20-Poly1305
pub const TAG_SIZE: usize = 16;

const AAD_LABEL: &[u8] = b"formrelay-hidden-state";

/// AEAD-protected hidden value codec
pub struct AeadHiddenCodec {
    cipher: ChaCha20Poly1305,
}

impl AeadHiddenCodec {
    /// Create a codec from an application secret of any length
    pub fn new(secret: &[u8]) -> Self {
        let key = derive_key(secret);
        let cipher = ChaCha20Poly1305::new_from_slice(&key).expect("Invalid key size");
        AeadHiddenCodec { cipher }
    }
}

/// Derive the blob key from the application secret
fn derive_key(secret: &[u8]) -> [u8; KEY_SIZE] {
    let hkdf = Hkdf::<Sha256>::new(None, secret);
    let mut key = [0u8; KEY_SIZE];
    hkdf.expand(b"FORMRELAY_HIDDEN_KEY_v1", &mut key)
        .expect("HKDF expand failed");
    key
}

impl HiddenValueCodec for AeadHiddenCodec {
    fn encode(&self, request_ids: &[RequestId], set: &HiddenParameterSet) -> FormResult<String> {
        let payload = framing::encode_payload(request_ids, set);

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: &payload,
                    aad: AAD_LABEL,
                },
            )
            .map_err(|_| FormError::EncodingFailed)?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(out))
    }

    fn decode(&self, blob: &str) -> FormResult<(Vec<RequestId>, HiddenParameterSet)> {
        let data = URL_SAFE_NO_PAD
            .decode(blob)
            .map_err(|_| FormError::DecryptionFailed)?;

        if data.len() < NONCE_SIZE + TAG_SIZE {
            return Err(FormError::DecryptionFailed);
        }
        let (nonce, ciphertext) = data.split_at(NONCE_SIZE);

        let payload = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: AAD_LABEL,
                },
            )
            .map_err(|_| FormError::DecryptionFailed)?;

        framing::decode_payload(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<RequestId>, HiddenParameterSet) {
        let mut set = HiddenParameterSet::new();
        set.append("orderId", "42");
        set.append("item", "a");
        set.append("item", "b");
        (vec![RequestId::new("ORDER_CONFIRM")], set)
    }

    #[test]
    fn test_aead_roundtrip() {
        let (ids, set) = sample();
        let codec = AeadHiddenCodec::new(b"application secret");

        let blob = codec.encode(&ids, &set).unwrap();
        let (decoded_ids, decoded_set) = codec.decode(&blob).unwrap();

        assert_eq!(decoded_ids, ids);
        assert_eq!(decoded_set, set);
    }

    #[test]
    fn test_wrong_secret_fails() {
        let (ids, set) = sample();
        let codec = AeadHiddenCodec::new(b"secret one");
        let other = AeadHiddenCodec::new(b"secret two");

        let blob = codec.encode(&ids, &set).unwrap();
        assert!(matches!(
            other.decode(&blob),
            Err(FormError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_tampering_detected() {
        let (ids, set) = sample();
        let codec = AeadHiddenCodec::new(b"application secret");
        let blob = codec.encode(&ids, &set).unwrap();

        let mut data = URL_SAFE_NO_PAD.decode(&blob).unwrap();
        for i in 0..data.len() {
            data[i] ^= 0x01;
            let forged = URL_SAFE_NO_PAD.encode(&data);
            assert!(
                matches!(codec.decode(&forged), Err(FormError::DecryptionFailed)),
                "flipped byte {} went undetected",
                i
            );
            data[i] ^= 0x01;
        }
    }

    #[test]
    fn test_truncated_blob_rejected() {
        let codec = AeadHiddenCodec::new(b"application secret");
        assert!(matches!(codec.decode(""), Err(FormError::DecryptionFailed)));
        assert!(matches!(
            codec.decode("AAAA"),
            Err(FormError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_nonce_is_fresh_per_encode() {
        let (ids, set) = sample();
        let codec = AeadHiddenCodec::new(b"application secret");

        let a = codec.encode(&ids, &set).unwrap();
        let b = codec.encode(&ids, &set).unwrap();
        assert_ne!(a, b);
        assert_eq!(codec.decode(&a).unwrap(), codec.decode(&b).unwrap());
    }
}

//! Hidden value codec trait and the plain implementation
//!
//! The codec turns the framed payload into the text carried by the blob
//! field and back. The plain codec only makes the payload attribute-safe;
//! tamper resistance is the AEAD codec's job (see `cipher`).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use formrelay_core::{FormError, FormResult, RequestId};

use crate::{framing, HiddenParameterSet};

/// Injected codec for the hidden state blob.
///
/// `decode(encode(ids, set)) == (ids, set)` must hold for any
/// implementation.
pub trait HiddenValueCodec: Send + Sync {
    /// Encode the permitted request ids and the parameter set into the
    /// blob text
    fn encode(&self, request_ids: &[RequestId], set: &HiddenParameterSet) -> FormResult<String>;

    /// Inverse of `encode`
    fn decode(&self, blob: &str) -> FormResult<(Vec<RequestId>, HiddenParameterSet)>;
}

/// Framing + base64 only; used when encryption policy does not apply
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHiddenCodec;

impl HiddenValueCodec for PlainHiddenCodec {
    fn encode(&self, request_ids: &[RequestId], set: &HiddenParameterSet) -> FormResult<String> {
        Ok(URL_SAFE_NO_PAD.encode(framing::encode_payload(request_ids, set)))
    }

    fn decode(&self, blob: &str) -> FormResult<(Vec<RequestId>, HiddenParameterSet)> {
        let payload = URL_SAFE_NO_PAD
            .decode(blob)
            .map_err(|_| FormError::MalformedHiddenState("blob is not base64".into()))?;
        framing::decode_payload(&payload)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sample() -> (Vec<RequestId>, HiddenParameterSet) {
        let mut set = HiddenParameterSet::new();
        set.append("orderId", "42");
        set.append("item", "a");
        set.append("item", "b");
        (vec![RequestId::new("ORDER_CONFIRM")], set)
    }

    #[test]
    fn test_plain_roundtrip() {
        let (ids, set) = sample();
        let codec = PlainHiddenCodec;

        let blob = codec.encode(&ids, &set).unwrap();
        let (decoded_ids, decoded_set) = codec.decode(&blob).unwrap();

        assert_eq!(decoded_ids, ids);
        assert_eq!(decoded_set, set);
    }

    #[test]
    fn test_blob_is_attribute_safe() {
        let (ids, set) = sample();
        let blob = PlainHiddenCodec.encode(&ids, &set).unwrap();
        assert!(blob
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_garbage_blob_rejected() {
        assert!(PlainHiddenCodec.decode("not!!base64??").is_err());
        assert!(PlainHiddenCodec.decode("AAAA").is_err());
    }

    proptest! {
        #[test]
        fn prop_plain_roundtrip(
            ids in proptest::collection::vec("[A-Z_]{1,12}", 0..4),
            entries in proptest::collection::vec(
                ("[a-z][a-z0-9_.]{0,15}", proptest::collection::vec(".{0,24}", 1..4)),
                0..8,
            ),
        ) {
            let ids: Vec<RequestId> = ids.iter().map(|id| RequestId::new(id.as_str())).collect();
            let mut set = HiddenParameterSet::new();
            for (name, values) in &entries {
                set.append_all(name, values.iter().cloned());
            }

            let codec = PlainHiddenCodec;
            let blob = codec.encode(&ids, &set).unwrap();
            let (decoded_ids, decoded_set) = codec.decode(&blob).unwrap();

            prop_assert_eq!(decoded_ids, ids);
            prop_assert_eq!(decoded_set, set);
        }
    }
}

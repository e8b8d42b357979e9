//! Serialization and deserialization -related logic.

/// A trait for types that can serialize keys for storage access.
pub trait StateKeyCodec<K> {
    /// Serializes a key into a bytes vector.
    ///
    /// This method **must** not panic as all instances of the key type are
    /// supposed to be serializable.
    fn encode_key(&self, key: &K) -> Vec<u8>;
}

/// A trait for types that can serialize and deserialize values for storage
/// access.
pub trait StateValueCodec<V> {
    /// Error type that can arise during deserialization.
    type ValueError: std::fmt::Debug;

    /// Serializes a value into a bytes vector.
    ///
    /// This method **must** not panic as all instances of the value type are
    /// supposed to be serializable.
    fn encode_value(&self, value: &V) -> Vec<u8>;

    /// Tries to deserialize a value from a bytes slice, and returns a
    /// [`Result`] with either the deserialized value or an error.
    fn try_decode_value(&self, bytes: &[u8]) -> Result<V, Self::ValueError>;

    /// Deserializes a value from a bytes slice.
    ///
    /// # Panics
    /// Panics if the call to [`StateValueCodec::try_decode_value`] fails.
    /// Values only ever reach storage through [`StateValueCodec::encode_value`],
    /// so a decoding failure means the state itself is corrupted.
    fn decode_value(&self, bytes: &[u8]) -> V {
        self.try_decode_value(bytes).unwrap_or_else(|err| {
            panic!(
                "Failed to decode value 0x{}, error: {:?}",
                hex::encode(bytes),
                err
            )
        })
    }
}

/// A codec that uses [`borsh`] for all keys and values.
#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Clone,
    borsh::BorshDeserialize,
    borsh::BorshSerialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct BorshCodec;

impl<K> StateKeyCodec<K> for BorshCodec
where
    K: borsh::BorshSerialize,
{
    fn encode_key(&self, key: &K) -> Vec<u8> {
        key.try_to_vec().expect("Failed to serialize key")
    }
}

impl<V> StateValueCodec<V> for BorshCodec
where
    V: borsh::BorshSerialize + borsh::BorshDeserialize,
{
    type ValueError = std::io::Error;

    fn encode_value(&self, value: &V) -> Vec<u8> {
        value.try_to_vec().expect("Failed to serialize value")
    }

    fn try_decode_value(&self, bytes: &[u8]) -> Result<V, Self::ValueError> {
        V::try_from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borsh_codec_decodes_what_it_encodes() {
        let codec = BorshCodec;
        let bytes = StateValueCodec::<(u64, String)>::encode_value(&codec, &(7, "x".to_owned()));
        let decoded: (u64, String) = codec.decode_value(&bytes);
        assert_eq!(decoded, (7, "x".to_owned()));
    }

    #[test]
    fn borsh_codec_rejects_truncated_input() {
        let codec = BorshCodec;
        let bytes = StateValueCodec::<u64>::encode_value(&codec, &u64::MAX);
        let decoded = StateValueCodec::<u64>::try_decode_value(&codec, &bytes[..4]);
        assert!(decoded.is_err());
    }
}

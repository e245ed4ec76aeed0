//! Serde serialization for `arkworks-rs` objects through their compressed
//! canonical byte encoding.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

pub struct ArkObjectBytes;

impl<T: CanonicalSerialize> SerializeAs<T> for ArkObjectBytes {
    fn serialize_as<S>(x: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut bytes = Vec::with_capacity(x.compressed_size());
        x.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        Serialize::serialize(&bytes, serializer)
    }
}

impl<'de, T: CanonicalDeserialize> DeserializeAs<'de, T> for ArkObjectBytes {
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        T::deserialize_compressed(bytes.as_slice()).map_err(serde::de::Error::custom)
    }
}

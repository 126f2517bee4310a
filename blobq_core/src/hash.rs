//! Object ids: SHA-1 digests of framed object bytes.

use crate::error::{Error, Result};
use crate::object;
use serde::{Serialize, Serializer};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

/// Digest size in bytes (SHA-1 produces 160-bit hashes).
pub const ID_SIZE: usize = 20;

/// Length of the hex rendering of an id.
pub const ID_HEX_LEN: usize = ID_SIZE * 2;

/// A 20-byte SHA-1 object id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; ID_SIZE]);

impl ObjectId {
    /// Create an ObjectId from raw bytes.
    pub fn from_bytes(bytes: [u8; ID_SIZE]) -> Self {
        ObjectId(bytes)
    }

    /// Parse an id from 40 hex characters (either case).
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        if hex_str.len() != ID_HEX_LEN {
            return Err(Error::invalid_object_id(
                hex_str,
                format!(
                    "expected {} hex characters, got {}",
                    ID_HEX_LEN,
                    hex_str.len()
                ),
            ));
        }

        let mut id = [0u8; ID_SIZE];
        hex::decode_to_slice(hex_str, &mut id)
            .map_err(|e| Error::invalid_object_id(hex_str, format!("invalid hex: {}", e)))?;
        Ok(ObjectId(id))
    }

    /// Lowercase hex rendering (40 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Fan-out directory name: the first 2 hex characters.
    pub fn prefix(&self) -> String {
        hex::encode(&self.0[..1])
    }

    /// File name inside the fan-out directory: the remaining 38 hex characters.
    pub fn suffix(&self) -> String {
        hex::encode(&self.0[1..])
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ID_SIZE] {
        &self.0
    }

    /// Digest already-framed bytes.
    pub fn hash_bytes(framed: &[u8]) -> Self {
        ObjectId(Sha1::digest(framed).into())
    }

    /// Id of an object with the given kind and payload.
    ///
    /// Equivalent to `hash_bytes(&object::encode(kind, payload)?)` but feeds the
    /// header and payload to the hasher separately instead of concatenating them.
    pub fn for_object(kind: &str, payload: &[u8]) -> Result<Self> {
        let header = object::encode_header(kind, payload.len())?;
        let mut hasher = Sha1::new();
        hasher.update(&header);
        hasher.update(payload);
        Ok(ObjectId(hasher.finalize().into()))
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ObjectId::from_hex(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_hi_blob() {
        let id = ObjectId::hash_bytes(b"blob 3\0hi\n");
        assert_eq!(id.to_hex(), "45b983be36b73c0788dc9cbcb76cbb80fc7bb057");
    }

    #[test]
    fn test_hash_empty_blob() {
        let id = ObjectId::hash_bytes(b"blob 0\0");
        assert_eq!(id.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
    }

    #[test]
    fn test_for_object_matches_framed_digest() {
        let id = ObjectId::for_object("blob", b"hello world").unwrap();
        assert_eq!(id.to_hex(), "95d09f2b10159347eece71399a7e2e907ea3df4f");
        assert_eq!(id, ObjectId::hash_bytes(b"blob 11\0hello world"));
    }

    #[test]
    fn test_single_byte_flip_changes_id() {
        let base = ObjectId::for_object("blob", b"hi\n").unwrap();
        let flipped = ObjectId::for_object("blob", b"hj\n").unwrap();
        let longer = ObjectId::for_object("blob", b"hi\n\0").unwrap();
        let other_kind = ObjectId::for_object("tree", b"hi\n").unwrap();

        assert_eq!(flipped.to_hex(), "67d3497a1bf0acb721ec03bfed0ac38920fad9c1");
        assert_ne!(base, flipped);
        assert_ne!(base, longer);
        assert_ne!(base, other_kind);
    }

    #[test]
    fn test_from_hex_roundtrip() {
        let original = ObjectId::hash_bytes(b"test data");
        let parsed = ObjectId::from_hex(&original.to_hex()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_hex_uppercase_renders_lowercase() {
        let id = ObjectId::from_hex("45B983BE36B73C0788DC9CBCB76CBB80FC7BB057").unwrap();
        assert_eq!(id.to_hex(), "45b983be36b73c0788dc9cbcb76cbb80fc7bb057");
    }

    #[test]
    fn test_from_hex_invalid_length() {
        assert!(matches!(
            ObjectId::from_hex("abcd"),
            Err(Error::InvalidObjectId { .. })
        ));
        assert!(ObjectId::from_hex("").is_err());
        assert!(ObjectId::from_hex(&"a".repeat(41)).is_err());
    }

    #[test]
    fn test_from_hex_invalid_chars() {
        let invalid = "z".repeat(40);
        assert!(matches!(
            ObjectId::from_hex(&invalid),
            Err(Error::InvalidObjectId { .. })
        ));
    }

    #[test]
    fn test_prefix_suffix() {
        let id = ObjectId::hash_bytes(b"blob 3\0hi\n");
        assert_eq!(id.prefix(), "45");
        assert_eq!(id.suffix(), "b983be36b73c0788dc9cbcb76cbb80fc7bb057");
    }

    #[test]
    fn test_serialize_as_hex_string() {
        let id = ObjectId::hash_bytes(b"blob 0\0");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"e69de29bb2d1d6434b8b29ae775ad8c2e48c5391\"");
    }

    // Property-based tests
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            max_shrink_iters: 10000,
            ..ProptestConfig::default()
        })]

        /// Hashing the same object always produces the same id
        #[test]
        fn prop_id_deterministic(payload: Vec<u8>) {
            let id1 = ObjectId::for_object("blob", &payload)?;
            let id2 = ObjectId::for_object("blob", &payload)?;
            prop_assert_eq!(id1, id2);
        }

        /// Hex rendering is lowercase, 40 chars, and parses back
        #[test]
        fn prop_hex_roundtrip(bytes in prop::array::uniform20(any::<u8>())) {
            let id = ObjectId::from_bytes(bytes);
            let hex = id.to_hex();
            prop_assert_eq!(hex.len(), ID_HEX_LEN);
            prop_assert!(hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
            prop_assert_eq!(ObjectId::from_hex(&hex)?, id);
        }

        /// Prefix + suffix reconstruction equals full hex
        #[test]
        fn prop_prefix_suffix_concat(bytes in prop::array::uniform20(any::<u8>())) {
            let id = ObjectId::from_bytes(bytes);
            let reconstructed = format!("{}{}", id.prefix(), id.suffix());
            prop_assert_eq!(id.to_hex(), reconstructed);
        }

        /// Flipping any single payload bit changes the id
        #[test]
        fn prop_bit_flip_changes_id(
            payload in prop::collection::vec(any::<u8>(), 1..256),
            index: prop::sample::Index,
            bit in 0u8..8,
        ) {
            let mut flipped = payload.clone();
            let i = index.index(flipped.len());
            flipped[i] ^= 1 << bit;
            prop_assert_ne!(
                ObjectId::for_object("blob", &payload)?,
                ObjectId::for_object("blob", &flipped)?
            );
        }

        /// Invalid hex length always fails
        #[test]
        fn prop_invalid_hex_length_fails(
            s in "[0-9a-f]{0,39}|[0-9a-f]{41,80}"
        ) {
            prop_assert!(ObjectId::from_hex(&s).is_err());
        }
    }
}

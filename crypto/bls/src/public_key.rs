use crate::{Error, PUBLIC_KEY_BYTES_LEN};
use blst::min_pk as blst_core;

/// A decompressed, subgroup-checked BLS public key, ready for verification.
#[derive(Clone)]
pub struct PublicKey {
    point: blst_core::PublicKey,
}

impl PublicKey {
    pub(crate) fn from_point(point: blst_core::PublicKey) -> Self {
        Self { point }
    }

    pub(crate) fn point(&self) -> &blst_core::PublicKey {
        &self.point
    }

    pub fn serialize(&self) -> [u8; PUBLIC_KEY_BYTES_LEN] {
        self.point.compress()
    }

    /// Decompresses the key, rejecting points at infinity and points outside
    /// the prime-order subgroup.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        blst_core::PublicKey::key_validate(bytes)
            .map(|point| Self { point })
            .map_err(Into::into)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl Eq for PublicKey {}

impl_byte_container!(PublicKey, PUBLIC_KEY_BYTES_LEN);

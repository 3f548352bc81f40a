use crate::{DST, Error, Hash256, INFINITY_SIGNATURE, PublicKey, SIGNATURE_BYTES_LEN};
use blst::BLST_ERROR;
use blst::min_pk as blst_core;

/// A single BLS signature, stored compressed. Parsing and group checks happen
/// at verification time.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    bytes: [u8; SIGNATURE_BYTES_LEN],
}

impl Signature {
    /// The point at infinity; a placeholder that verifies against nothing.
    pub fn empty() -> Self {
        Self {
            bytes: INFINITY_SIGNATURE,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes == INFINITY_SIGNATURE
    }

    pub(crate) fn from_point(point: &blst_core::Signature) -> Self {
        Self {
            bytes: point.compress(),
        }
    }

    pub(crate) fn point(&self) -> Result<blst_core::Signature, Error> {
        blst_core::Signature::from_bytes(&self.bytes).map_err(Into::into)
    }

    pub fn serialize(&self) -> [u8; SIGNATURE_BYTES_LEN] {
        self.bytes
    }

    /// Length check only; malformed points surface at verification time.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: SIGNATURE_BYTES_LEN,
            });
        }
        let mut fixed = [0; SIGNATURE_BYTES_LEN];
        fixed.copy_from_slice(bytes);
        Ok(Self { bytes: fixed })
    }

    pub fn verify(&self, pubkey: &PublicKey, msg: Hash256) -> bool {
        if self.is_empty() {
            return false;
        }
        let Ok(point) = self.point() else {
            return false;
        };
        point.verify(true, msg.as_slice(), DST, &[], pubkey.point(), true)
            == BLST_ERROR::BLST_SUCCESS
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::empty()
    }
}

impl_byte_container!(Signature, SIGNATURE_BYTES_LEN);

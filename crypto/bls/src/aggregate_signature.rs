use crate::{DST, Error, Hash256, INFINITY_SIGNATURE, PublicKey, SIGNATURE_BYTES_LEN, Signature};
use blst::BLST_ERROR;
use blst::min_pk as blst_core;

/// An aggregate of BLS signatures over a common message.
///
/// Aggregation is point addition, so the resulting bytes are independent of
/// the order in which signatures were added.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AggregateSignature {
    bytes: [u8; SIGNATURE_BYTES_LEN],
}

impl AggregateSignature {
    /// An aggregate with no entries yet.
    pub fn infinity() -> Self {
        Self {
            bytes: INFINITY_SIGNATURE,
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.bytes == INFINITY_SIGNATURE
    }

    fn point(&self) -> Result<blst_core::Signature, Error> {
        blst_core::Signature::from_bytes(&self.bytes).map_err(Into::into)
    }

    pub fn serialize(&self) -> [u8; SIGNATURE_BYTES_LEN] {
        self.bytes
    }

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

    /// Adds a signature to the aggregate.
    pub fn add_assign(&mut self, other: &Signature) -> Result<(), Error> {
        let other_point = other.point()?;
        if self.is_infinity() {
            self.bytes = other.serialize();
        } else {
            let agg =
                blst_core::AggregateSignature::aggregate(&[&self.point()?, &other_point], false)?;
            self.bytes = agg.to_signature().compress();
        }
        Ok(())
    }

    /// Verifies the aggregate against a common message and the set of keys
    /// whose signatures it claims to contain.
    pub fn fast_aggregate_verify(&self, msg: Hash256, pubkeys: &[&PublicKey]) -> bool {
        if self.is_infinity() || pubkeys.is_empty() {
            return false;
        }
        let Ok(point) = self.point() else {
            return false;
        };
        let pubkey_points = pubkeys.iter().map(|pk| pk.point()).collect::<Vec<_>>();
        point.fast_aggregate_verify(true, msg.as_slice(), DST, &pubkey_points)
            == BLST_ERROR::BLST_SUCCESS
    }
}

impl Default for AggregateSignature {
    fn default() -> Self {
        Self::infinity()
    }
}

impl_byte_container!(AggregateSignature, SIGNATURE_BYTES_LEN);

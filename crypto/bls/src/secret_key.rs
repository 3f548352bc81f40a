use crate::{DST, Error, Hash256, PublicKey, SECRET_KEY_BYTES_LEN, Signature};
use blst::min_pk as blst_core;
use rand::RngCore;
use zeroize::Zeroizing;

/// A BLS secret key. Deliberately opaque: no SSZ, serde or `Debug` impls.
#[derive(Clone)]
pub struct SecretKey {
    point: blst_core::SecretKey,
}

impl SecretKey {
    /// Generates a key from the operating system RNG.
    pub fn random() -> Self {
        let mut ikm = Zeroizing::new([0u8; SECRET_KEY_BYTES_LEN]);
        rand::rng().fill_bytes(ikm.as_mut());
        // `key_gen` only fails when the ikm is shorter than 32 bytes.
        let point = blst_core::SecretKey::key_gen(ikm.as_ref(), &[])
            .expect("ikm is 32 bytes");
        Self { point }
    }

    /// Derives a key from input keying material, per the `KeyGen` procedure of
    /// the BLS signature draft. `ikm` must be at least 32 bytes.
    pub fn key_gen(ikm: &[u8]) -> Result<Self, Error> {
        blst_core::SecretKey::key_gen(ikm, &[])
            .map(|point| Self { point })
            .map_err(Into::into)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(self.point.sk_to_pk())
    }

    pub fn sign(&self, msg: Hash256) -> Signature {
        Signature::from_point(&self.point.sign(msg.as_slice(), DST, &[]))
    }

    pub fn serialize(&self) -> Zeroizing<[u8; SECRET_KEY_BYTES_LEN]> {
        Zeroizing::new(self.point.to_bytes())
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        blst_core::SecretKey::from_bytes(bytes)
            .map(|point| Self { point })
            .map_err(Into::into)
    }
}

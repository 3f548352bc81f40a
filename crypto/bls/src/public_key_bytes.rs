use crate::{Error, PUBLIC_KEY_BYTES_LEN, PublicKey};

/// Compressed public key bytes, as stored in the validator and builder
/// registries. The (expensive) decompression and subgroup check are deferred
/// until the key is actually used for verification.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKeyBytes {
    bytes: [u8; PUBLIC_KEY_BYTES_LEN],
}

impl PublicKeyBytes {
    pub fn empty() -> Self {
        Self {
            bytes: [0; PUBLIC_KEY_BYTES_LEN],
        }
    }

    pub fn serialize(&self) -> [u8; PUBLIC_KEY_BYTES_LEN] {
        self.bytes
    }

    /// Length check only; the bytes are not guaranteed to be a valid point.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != PUBLIC_KEY_BYTES_LEN {
            return Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: PUBLIC_KEY_BYTES_LEN,
            });
        }
        let mut fixed = [0; PUBLIC_KEY_BYTES_LEN];
        fixed.copy_from_slice(bytes);
        Ok(Self { bytes: fixed })
    }

    pub fn decompress(&self) -> Result<PublicKey, Error> {
        PublicKey::deserialize(&self.bytes)
    }
}

impl Default for PublicKeyBytes {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&PublicKey> for PublicKeyBytes {
    fn from(pk: &PublicKey) -> Self {
        Self {
            bytes: pk.serialize(),
        }
    }
}

impl From<PublicKey> for PublicKeyBytes {
    fn from(pk: PublicKey) -> Self {
        Self::from(&pk)
    }
}

impl_byte_container!(PublicKeyBytes, PUBLIC_KEY_BYTES_LEN);

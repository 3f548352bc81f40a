//! A thin wrapper around the Supranational `blst` BLS12-381 implementation,
//! restricted to the operations the beacon chain needs: signing, individual
//! verification and signature aggregation over the `min_pk` scheme (48-byte
//! public keys, 96-byte signatures).

#[macro_use]
mod macros;

mod aggregate_signature;
mod keypair;
mod public_key;
mod public_key_bytes;
mod secret_key;
mod signature;

pub use aggregate_signature::AggregateSignature;
pub use keypair::Keypair;
pub use public_key::PublicKey;
pub use public_key_bytes::PublicKeyBytes;
pub use secret_key::SecretKey;
pub use signature::Signature;

pub use alloy_primitives::B256 as Hash256;

/// Domain separation tag for the Ethereum proof-of-possession scheme.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

pub const SECRET_KEY_BYTES_LEN: usize = 32;
pub const PUBLIC_KEY_BYTES_LEN: usize = 48;
pub const SIGNATURE_BYTES_LEN: usize = 96;

/// The compressed encoding of the G2 point at infinity, used as the
/// placeholder for a signature that carries no entries yet.
pub const INFINITY_SIGNATURE: [u8; SIGNATURE_BYTES_LEN] = {
    let mut bytes = [0u8; SIGNATURE_BYTES_LEN];
    bytes[0] = 0xc0;
    bytes
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An error was raised from the Supranational BLST library.
    BlstError(blst::BLST_ERROR),
    /// The provided bytes were an incorrect length.
    InvalidByteLength { got: usize, expected: usize },
}

impl From<blst::BLST_ERROR> for Error {
    fn from(e: blst::BLST_ERROR) -> Self {
        Error::BlstError(e)
    }
}

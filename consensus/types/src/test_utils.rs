//! Deterministic keypairs for tests: the secret key is derived from the
//! index, so states built in different tests agree on key material.

use bls::{Keypair, SecretKey};

pub fn generate_deterministic_keypair(index: usize) -> Keypair {
    let mut ikm = [0u8; 32];
    ikm[0..8].copy_from_slice(&(index as u64 + 1).to_le_bytes());
    let sk = SecretKey::key_gen(&ikm).expect("ikm is 32 bytes");
    Keypair::from(sk)
}

pub fn generate_deterministic_keypairs(count: usize) -> Vec<Keypair> {
    (0..count).map(generate_deterministic_keypair).collect()
}

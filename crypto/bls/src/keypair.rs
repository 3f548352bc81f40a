use crate::{PublicKey, SecretKey};

#[derive(Clone)]
pub struct Keypair {
    pub pk: PublicKey,
    pub sk: SecretKey,
}

impl Keypair {
    pub fn from_components(pk: PublicKey, sk: SecretKey) -> Self {
        Self { pk, sk }
    }

    pub fn random() -> Self {
        let sk = SecretKey::random();
        Self {
            pk: sk.public_key(),
            sk,
        }
    }
}

impl From<SecretKey> for Keypair {
    fn from(sk: SecretKey) -> Self {
        Self {
            pk: sk.public_key(),
            sk,
        }
    }
}

//! Password hashing and bearer token minting.
//!
//! Passwords are stored as `<salt-hex>$<digest-hex>` where the digest is
//! SHA-256 over the salt followed by the password. Tokens are 32 random bytes
//! hex-encoded; only their SHA-256 digest is ever persisted.

use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::ports::{PasswordHasher, TokenIssuer};
use crate::domain::{AccessToken, PasswordHash};

const SALT_BYTES: usize = 16;
const TOKEN_BYTES: usize = 32;

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0_u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

fn salted_digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Salted SHA-256 [`PasswordHasher`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256PasswordHasher;

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> PasswordHash {
        let salt = random_bytes::<SALT_BYTES>();
        PasswordHash::from_stored(format!(
            "{}${}",
            hex::encode(salt),
            salted_digest(&salt, password)
        ))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        let Some((salt_hex, expected)) = hash.as_str().split_once('$') else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        let actual = salted_digest(&salt, password);
        constant_time_eq::constant_time_eq(actual.as_bytes(), expected.as_bytes())
    }
}

/// Random opaque [`TokenIssuer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenIssuer;

impl TokenIssuer for RandomTokenIssuer {
    fn issue(&self) -> AccessToken {
        AccessToken::new(hex::encode(random_bytes::<TOKEN_BYTES>()))
    }

    fn digest(&self, token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }
}

//! Ports for password hashing and bearer token minting.

use crate::domain::{AccessToken, PasswordHash};

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> PasswordHash;

    /// Constant-time comparison of `password` against a stored hash.
    fn verify(&self, password: &str, hash: &PasswordHash) -> bool;
}

/// Opaque bearer token generation.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self) -> AccessToken;

    /// Digest under which a token is stored and looked up.
    fn digest(&self, token: &str) -> String;
}

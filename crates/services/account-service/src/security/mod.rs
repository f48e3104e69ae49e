//! Password hashing and token issuance primitives.

mod hasher;
mod token;

pub use hasher::{Argon2Hasher, SecretHasher};
pub use token::{Claims, JwtIssuer, TokenIssuer, TokenKind, TokenPair};

#[cfg(any(test, feature = "test-utils"))]
pub use hasher::MockSecretHasher;

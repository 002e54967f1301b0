pub mod codec;
pub mod identity;

pub use codec::IdentityCodec;
pub use identity::Identity;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential could be extracted from the request.
    #[error("{0}")]
    MissingCredential(String),

    /// Signature, algorithm or expiry check failed. Deliberately carries no detail.
    #[error("invalid token")]
    InvalidToken,

    #[error("failed to sign token: {0}")]
    Signing(String),

    /// A required claim is absent or has the wrong shape.
    #[error("{0}")]
    InvalidClaims(String),

    /// The decoded identity is missing a required field.
    #[error("{0}")]
    InvalidIdentity(String),
}

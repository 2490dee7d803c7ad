//! Boundary traits for the external identity, notification, and credential
//! collaborators. The core never performs cryptographic verification or
//! e-mail delivery itself; deployments plug real implementations in and the
//! API service ships development stand-ins.

use crate::auth::domain::{AuthContext, GoogleProfile, TokenPair, User};
use crate::error::DomainError;

/// Issues bearer credentials for an authenticated user.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User) -> Result<TokenPair, DomainError>;
}

/// Resolves an inbound bearer token to the requester identity.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, bearer: &str) -> Result<AuthContext, DomainError>;
}

/// Verifies a Google id_token and returns the asserted profile.
pub trait GoogleTokenVerifier: Send + Sync {
    fn verify(&self, id_token: &str) -> Result<GoogleProfile, DomainError>;
}

/// Hashes and checks passwords. Hashing algorithms live outside the core.
pub trait CredentialVault: Send + Sync {
    fn hash(&self, raw: &str) -> String;
    fn matches(&self, raw: &str, hash: &str) -> bool;
}

/// Outbound message dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Trait describing outbound message hooks (e-mail adapters and the like).
/// Delivery failure is logged by callers, never fatal to the request.
pub trait Notifier: Send + Sync {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), NotifyError>;
}

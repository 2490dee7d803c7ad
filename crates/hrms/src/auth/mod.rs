//! Authentication and account lifecycle.
//!
//! Password and Google-identity login, password changes, and the OTP-based
//! reset flow. External concerns (token minting, identity verification,
//! hashing, message delivery) sit behind the traits in [`collaborators`].

pub mod collaborators;
pub mod domain;
pub mod otp;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use collaborators::{
    CredentialVault, GoogleTokenVerifier, IdentityVerifier, Notifier, NotifyError, TokenIssuer,
};
pub use domain::{AuthContext, GoogleProfile, TokenPair, User, UserId, UserType};
pub use otp::{OtpCache, OtpError, DEFAULT_OTP_TTL_SECONDS};
pub use repository::UserRepository;
pub use router::{auth_router, AuthRouterState};
pub use service::{AuthService, LoginOutput, UserSummary};

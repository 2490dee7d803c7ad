use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::directory::domain::{Company, CompanyId};
use crate::error::DomainError;
use crate::store::HrStore;

use super::collaborators::{CredentialVault, GoogleTokenVerifier, Notifier, TokenIssuer};
use super::domain::{TokenPair, User, UserId, UserType};
use super::otp::{OtpCache, OtpError};

/// Public view of a logged-in user for response payloads.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub username: String,
    pub profile_picture: Option<String>,
    #[serde(rename = "type")]
    pub user_type: &'static str,
    pub company_id: Option<CompanyId>,
}

impl UserSummary {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.first_name.clone(),
            username: user.username.clone(),
            profile_picture: user.profile_picture.clone(),
            user_type: user.user_type.label(),
            company_id: user.company_id,
        }
    }
}

/// Successful login result.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserSummary,
}

/// Login, Google login, and password lifecycle orchestration.
///
/// Token minting, Google verification, password hashing, and message
/// delivery are all collaborator seams; this service only sequences them.
pub struct AuthService<S> {
    store: Arc<S>,
    tokens: Arc<dyn TokenIssuer>,
    google: Arc<dyn GoogleTokenVerifier>,
    vault: Arc<dyn CredentialVault>,
    notifier: Arc<dyn Notifier>,
    otp: Arc<OtpCache>,
}

impl<S> AuthService<S>
where
    S: HrStore + 'static,
{
    pub fn new(
        store: Arc<S>,
        tokens: Arc<dyn TokenIssuer>,
        google: Arc<dyn GoogleTokenVerifier>,
        vault: Arc<dyn CredentialVault>,
        notifier: Arc<dyn Notifier>,
        otp: Arc<OtpCache>,
    ) -> Self {
        Self {
            store,
            tokens,
            google,
            vault,
            notifier,
            otp,
        }
    }

    fn issue_for(&self, user: &User) -> Result<LoginOutput, DomainError> {
        let TokenPair {
            access_token,
            refresh_token,
        } = self.tokens.issue(user)?;
        Ok(LoginOutput {
            access_token,
            refresh_token,
            user: UserSummary::from_user(user),
        })
    }

    /// Password login.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginOutput, DomainError> {
        let user = self
            .store
            .fetch_user_by_username(username)?
            .ok_or_else(|| DomainError::validation("username does not exist"))?;

        if !self.vault.matches(password, &user.password_hash) {
            return Err(DomainError::validation("username or password is incorrect"));
        }

        self.issue_for(&user)
    }

    fn generate_unique_username(&self, name: &str) -> Result<String, DomainError> {
        let base = name.trim().to_lowercase().replace(' ', "_");
        let base = if base.is_empty() {
            "user".to_string()
        } else {
            base
        };

        let mut candidate = base.clone();
        let mut counter = 1u32;
        while self.store.username_taken(&candidate)? {
            candidate = format!("{base}_{counter}");
            counter += 1;
        }
        Ok(candidate)
    }

    fn provision_default_company(&self, user: &mut User) -> Result<(), DomainError> {
        let now = Utc::now();
        let company = Company {
            id: CompanyId::generate(),
            name: format!("{}'s Company", user.first_name),
            owner_name: Some(user.first_name.clone()),
            email: user.email.clone(),
            industry: None,
            size: None,
            address: None,
            country_code: None,
            phone: None,
            logo: None,
            tax_id: None,
            website: None,
            created_at: now,
            updated_at: now,
        };
        let company = self
            .store
            .insert_company(company)
            .map_err(|_| DomainError::conflict("a company with this email already exists"))?;

        user.company_id = Some(company.id);
        user.updated_at = Utc::now();
        self.store.update_user(user.clone())?;
        Ok(())
    }

    /// Google-identity login. First login creates an admin user and
    /// auto-provisions their company; later logins backfill a missing
    /// company but never create a second one.
    pub fn google_login(&self, id_token: &str) -> Result<LoginOutput, DomainError> {
        let profile = self.google.verify(id_token.trim())?;

        let user = match self.store.fetch_user_by_email(&profile.email)? {
            Some(mut user) => {
                if user.company_id.is_none() {
                    self.provision_default_company(&mut user)?;
                }
                user
            }
            None => {
                let username = self.generate_unique_username(&profile.name)?;
                let now = Utc::now();
                let mut user = self.store.insert_user(User {
                    id: UserId::generate(),
                    username: username.clone(),
                    email: profile.email.clone(),
                    first_name: profile.name.clone(),
                    user_type: UserType::Admin,
                    profile_picture: profile.picture.clone(),
                    google_id: Some(profile.uid.clone()),
                    company_id: None,
                    password_hash: self.vault.hash(&username),
                    created_at: now,
                    updated_at: now,
                })?;
                self.provision_default_company(&mut user)?;
                user
            }
        };

        self.issue_for(&user)
    }

    /// Change a password after confirming the old one.
    pub fn update_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let mut user = self
            .store
            .fetch_user_by_username(username)?
            .ok_or_else(|| DomainError::validation("username does not exist"))?;

        if !self.vault.matches(old_password, &user.password_hash) {
            return Err(DomainError::validation("incorrect password"));
        }

        user.password_hash = self.vault.hash(new_password);
        user.updated_at = Utc::now();
        self.store.update_user(user)?;
        Ok(())
    }

    /// Start the OTP reset flow. Delivery failure is logged, not fatal:
    /// the code stays valid and the caller still gets the user id back.
    pub fn request_password_reset(
        &self,
        email: &str,
        company_id: CompanyId,
    ) -> Result<UserId, DomainError> {
        let user = self
            .store
            .fetch_user_by_email_and_company(email, company_id)?
            .ok_or_else(|| DomainError::not_found("user"))?;

        let code = self.otp.issue(user.id);
        let body = format!(
            "Your OTP for password reset is: {code}\nThis OTP will expire in {minutes} minutes.",
            minutes = self.otp.ttl().num_minutes().max(1),
        );
        if let Err(err) = self
            .notifier
            .send("HRMS Password Reset OTP", &body, &user.email)
        {
            warn!(user_id = %user.id.0, error = %err, "OTP delivery failed");
        }

        Ok(user.id)
    }

    /// Complete the OTP reset flow. The code is single-use: replaying it
    /// after a successful confirm fails not-found.
    pub fn confirm_password_reset(
        &self,
        user_id: UserId,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let mut user = self
            .store
            .fetch_user(user_id)?
            .ok_or_else(|| DomainError::validation("invalid user id"))?;

        if !user.email.eq_ignore_ascii_case(email) {
            return Err(DomainError::validation("invalid user id"));
        }

        match self.otp.consume(user_id, code) {
            Ok(()) => {}
            Err(OtpError::Mismatch) => {
                return Err(DomainError::validation("invalid OTP"));
            }
            Err(OtpError::Expired) => {
                return Err(DomainError::validation("OTP has expired"));
            }
            Err(OtpError::Missing) => {
                return Err(DomainError::not_found("OTP"));
            }
        }

        user.password_hash = self.vault.hash(new_password);
        user.updated_at = Utc::now();
        self.store.update_user(user)?;
        Ok(())
    }
}

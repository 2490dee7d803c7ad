use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use crate::auth::collaborators::{
    CredentialVault, GoogleTokenVerifier, Notifier, NotifyError, TokenIssuer,
};
use crate::auth::domain::{GoogleProfile, TokenPair, User, UserId, UserType};
use crate::auth::otp::OtpCache;
use crate::auth::repository::UserRepository;
use crate::auth::service::AuthService;
use crate::directory::domain::{Company, CompanyId};
use crate::directory::repository::CompanyRepository;
use crate::error::DomainError;
use crate::store::InMemoryHrStore;

/// Deterministic token pair derived from the username.
pub(super) struct StubTokens;

impl TokenIssuer for StubTokens {
    fn issue(&self, user: &User) -> Result<TokenPair, DomainError> {
        Ok(TokenPair {
            access_token: format!("access-{}", user.username),
            refresh_token: format!("refresh-{}", user.username),
        })
    }
}

/// Token-to-profile table standing in for real id_token verification.
#[derive(Default)]
pub(super) struct StubGoogle {
    profiles: Mutex<HashMap<String, GoogleProfile>>,
}

impl StubGoogle {
    pub fn register(&self, id_token: &str, profile: GoogleProfile) {
        self.profiles
            .lock()
            .expect("lock")
            .insert(id_token.to_string(), profile);
    }
}

impl GoogleTokenVerifier for StubGoogle {
    fn verify(&self, id_token: &str) -> Result<GoogleProfile, DomainError> {
        self.profiles
            .lock()
            .expect("lock")
            .get(id_token)
            .cloned()
            .ok_or_else(|| DomainError::validation("invalid google token"))
    }
}

/// Reversible "hash" so tests can assert against stored digests.
pub(super) struct PlainVault;

impl CredentialVault for PlainVault {
    fn hash(&self, raw: &str) -> String {
        format!("hash:{raw}")
    }

    fn matches(&self, raw: &str, hash: &str) -> bool {
        hash == format!("hash:{raw}")
    }
}

/// Captures outbound messages; optionally fails every send.
#[derive(Default)]
pub(super) struct RecordingNotifier {
    pub failing: bool,
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn last_body(&self) -> String {
        self.sent
            .lock()
            .expect("lock")
            .last()
            .map(|(_, body, _)| body.clone())
            .expect("a message was sent")
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), NotifyError> {
        if self.failing {
            return Err(NotifyError::Transport("smtp down".to_string()));
        }
        self.sent.lock().expect("lock").push((
            subject.to_string(),
            body.to_string(),
            recipient.to_string(),
        ));
        Ok(())
    }
}

pub(super) struct Harness {
    pub store: Arc<InMemoryHrStore>,
    pub google: Arc<StubGoogle>,
    pub notifier: Arc<RecordingNotifier>,
    pub service: AuthService<InMemoryHrStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(RecordingNotifier::default(), OtpCache::new())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        Self::build(notifier, OtpCache::new())
    }

    /// Harness whose issued codes carry the given lifetime; a negative
    /// duration makes every code already expired.
    pub fn with_otp_ttl(ttl: Duration) -> Self {
        Self::build(RecordingNotifier::default(), OtpCache::with_ttl(ttl))
    }

    fn build(notifier: RecordingNotifier, otp: OtpCache) -> Self {
        let store = Arc::new(InMemoryHrStore::new());
        let google = Arc::new(StubGoogle::default());
        let notifier = Arc::new(notifier);
        let service = AuthService::new(
            store.clone(),
            Arc::new(StubTokens),
            google.clone(),
            Arc::new(PlainVault),
            notifier.clone(),
            Arc::new(otp),
        );
        Self {
            store,
            google,
            notifier,
            service,
        }
    }

    pub fn insert_company(&self, email: &str) -> CompanyId {
        let now = Utc::now();
        self.store
            .insert_company(Company {
                id: CompanyId::generate(),
                name: "Acme".to_string(),
                owner_name: None,
                email: email.to_string(),
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
            })
            .expect("insert company")
            .id
    }

    pub fn insert_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        company_id: Option<CompanyId>,
    ) -> User {
        let now = Utc::now();
        self.store
            .insert_user(User {
                id: UserId::generate(),
                username: username.to_string(),
                email: email.to_string(),
                first_name: "Alex".to_string(),
                user_type: UserType::Admin,
                profile_picture: None,
                google_id: None,
                company_id,
                password_hash: format!("hash:{password}"),
                created_at: now,
                updated_at: now,
            })
            .expect("insert user")
    }
}

/// Pull the six-digit code out of a captured reset message.
pub(super) fn code_from(body: &str) -> String {
    body.split("is: ")
        .nth(1)
        .expect("code marker present")
        .chars()
        .take(6)
        .collect()
}

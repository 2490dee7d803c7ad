//! Development stand-ins for the core's collaborator seams.
//!
//! Real deployments supply JWT minting, Google token verification, password
//! hashing, and e-mail delivery; the stand-ins here keep the service
//! self-contained for local runs and demos.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use uuid::Uuid;

use hrms::auth::collaborators::{
    CredentialVault, GoogleTokenVerifier, IdentityVerifier, Notifier, NotifyError, TokenIssuer,
};
use hrms::auth::domain::{AuthContext, GoogleProfile, TokenPair, User, UserId};
use hrms::auth::repository::UserRepository;
use hrms::error::DomainError;
use hrms::store::InMemoryHrStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Opaque session tokens held in process memory.
///
/// Verification re-reads the user record, so a context picked up from a
/// token always reflects the current company and role rather than the ones
/// at issue time.
pub(crate) struct LocalTokenService {
    store: Arc<InMemoryHrStore>,
    sessions: Mutex<HashMap<String, UserId>>,
}

impl LocalTokenService {
    pub(crate) fn new(store: Arc<InMemoryHrStore>) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl TokenIssuer for LocalTokenService {
    fn issue(&self, user: &User) -> Result<TokenPair, DomainError> {
        let access_token = format!("hrms-{}", Uuid::new_v4());
        let refresh_token = format!("hrms-refresh-{}", Uuid::new_v4());
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(access_token.clone(), user.id);
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

impl IdentityVerifier for LocalTokenService {
    fn verify(&self, bearer: &str) -> Result<AuthContext, DomainError> {
        let user_id = self
            .sessions
            .lock()
            .expect("session mutex poisoned")
            .get(bearer)
            .copied()
            .ok_or(DomainError::Unauthenticated)?;

        let user = self
            .store
            .fetch_user(user_id)?
            .ok_or(DomainError::Unauthenticated)?;
        Ok(AuthContext {
            user_id: user.id,
            company_id: user.company_id,
            user_type: user.user_type,
        })
    }
}

/// Accepts a JSON-encoded profile in place of a real id_token.
#[derive(Default)]
pub(crate) struct LocalGoogleVerifier;

impl GoogleTokenVerifier for LocalGoogleVerifier {
    fn verify(&self, id_token: &str) -> Result<GoogleProfile, DomainError> {
        serde_json::from_str(id_token)
            .map_err(|_| DomainError::validation("google token could not be verified"))
    }
}

/// Marks digests with a `plain$` prefix instead of hashing.
pub(crate) struct PlainCredentialVault;

impl CredentialVault for PlainCredentialVault {
    fn hash(&self, raw: &str) -> String {
        format!("plain${raw}")
    }

    fn matches(&self, raw: &str, hash: &str) -> bool {
        hash == format!("plain${raw}")
    }
}

/// Writes outbound messages to the log instead of an SMTP relay.
#[derive(Default)]
pub(crate) struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), NotifyError> {
        tracing::info!(%recipient, %subject, %body, "outbound message");
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directory::domain::CompanyId;

/// Identifier wrapper for user (identity) records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Role attached to a user record. Only `Admin` may mutate policies,
/// departments, or other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Admin,
    Hr,
    Manager,
    Employee,
    FieldEmployee,
}

impl UserType {
    pub const fn label(self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Hr => "hr",
            UserType::Manager => "manager",
            UserType::Employee => "employee",
            UserType::FieldEmployee => "field_employee",
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, UserType::Admin)
    }
}

/// Identity record behind every login. An employee wraps exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique login handle.
    pub username: String,
    /// Unique across tenants.
    pub email: String,
    pub first_name: String,
    pub user_type: UserType,
    pub profile_picture: Option<String>,
    pub google_id: Option<String>,
    pub company_id: Option<CompanyId>,
    /// Opaque digest produced by the credential vault collaborator.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The already-authenticated requester identity threaded explicitly into
/// every service call. No handler reads ambient request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub company_id: Option<CompanyId>,
    pub user_type: UserType,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.user_type.is_admin()
    }
}

/// Access/refresh credential pair minted by the token collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Verified Google identity payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleProfile {
    pub uid: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

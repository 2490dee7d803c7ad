use crate::directory::domain::CompanyId;
use crate::error::RepositoryError;

use super::domain::{User, UserId};

/// Storage abstraction for identity records.
pub trait UserRepository: Send + Sync {
    /// Conflict on duplicate username or email.
    fn insert_user(&self, user: User) -> Result<User, RepositoryError>;
    fn fetch_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    fn fetch_user_by_email_and_company(
        &self,
        email: &str,
        company_id: CompanyId,
    ) -> Result<Option<User>, RepositoryError>;
    fn update_user(&self, user: User) -> Result<(), RepositoryError>;
    fn username_taken(&self, username: &str) -> Result<bool, RepositoryError>;
}

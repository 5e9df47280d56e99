use std::sync::Arc;

use tracing::instrument;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};

#[derive(Clone)]
pub struct UserService<R: UserRepository + 'static> {
    repo: Arc<R>,
}

impl<R> UserService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn create_user(&self, username: Option<String>) -> Result<User, DomainError> {
        self.repo.create(username.as_deref()).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.repo.list().await
    }
}

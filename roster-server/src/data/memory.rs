use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::User;

/// Vec-backed store that mirrors the `users` table: serial ids, `NOT NULL` username.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
    offline: bool,
}

impl InMemoryUserRepository {
    pub fn offline() -> Self {
        Self {
            rows: Mutex::default(),
            offline: true,
        }
    }

    fn check_online(&self) -> Result<(), DomainError> {
        if self.offline {
            return Err(DomainError::StoreUnavailable("pool timed out".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, username: Option<&str>) -> Result<User, DomainError> {
        self.check_online()?;
        let username = username.ok_or_else(|| {
            DomainError::Rejected("null value in column \"username\"".into())
        })?;

        let mut rows = self.rows.lock().unwrap();
        let user = User {
            id: rows.last().map_or(1, |u| u.id + 1),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.check_online()?;
        Ok(self.rows.lock().unwrap().clone())
    }
}

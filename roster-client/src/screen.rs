use tracing::warn;

use crate::User;
use crate::api::UserApi;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenState {
    #[default]
    Idle,
    LoadingUsers,
    Submitting,
    Displaying,
}

/// One table row, keyed by the server-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub key: i64,
    pub username: String,
    pub created: String,
}

/// Local state of the user screen: the input box, the table and the last
/// failure. The `begin_*`/`finish_*` pairs let a UI drive the transitions
/// around its own async runtime; `load` and `submit` compose them.
#[derive(Debug, Clone, Default)]
pub struct UserScreen {
    input: String,
    users: Vec<User>,
    state: ScreenState,
    error: Option<ApiError>,
    has_data: bool,
}

impl UserScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn can_submit(&self) -> bool {
        !self.input.is_empty()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn begin_load(&mut self) {
        self.state = ScreenState::LoadingUsers;
    }

    pub fn finish_load(&mut self, result: Result<Vec<User>, ApiError>) {
        match result {
            Ok(users) => {
                self.users = users;
                self.error = None;
                self.has_data = true;
            }
            Err(err) => {
                warn!(status = err.status, message = %err.message, "failed to load users");
                self.error = Some(err);
            }
        }
        self.settle();
    }

    /// Returns the username to send, or `None` when the input is empty and no
    /// request must be made.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        self.state = ScreenState::Submitting;
        Some(self.input.clone())
    }

    pub fn finish_submit(&mut self, result: Result<User, ApiError>) {
        match result {
            Ok(user) => {
                self.users.push(user);
                self.input.clear();
                self.error = None;
                self.has_data = true;
            }
            Err(err) => {
                warn!(status = err.status, message = %err.message, "failed to create user");
                self.error = Some(err);
            }
        }
        self.settle();
    }

    pub fn rows(&self) -> Vec<UserRow> {
        self.users
            .iter()
            .map(|user| UserRow {
                key: user.id,
                username: user.username.clone(),
                created: user.created_at.format("%Y-%m-%d").to_string(),
            })
            .collect()
    }

    pub async fn load<A: UserApi + ?Sized>(&mut self, api: &A) -> Result<(), ApiError> {
        self.begin_load();
        let result = api.get_users().await.map(|res| res.data);
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.finish_load(result);
        outcome
    }

    pub async fn submit<A: UserApi + ?Sized>(&mut self, api: &A) -> Result<Option<User>, ApiError> {
        let Some(username) = self.begin_submit() else {
            return Ok(None);
        };
        let result = api.create_user(&username).await.map(|res| res.data);
        let outcome = result.clone().map(Some);
        self.finish_submit(result);
        outcome
    }

    fn settle(&mut self) {
        self.state = if self.has_data {
            ScreenState::Displaying
        } else {
            ScreenState::Idle
        };
    }
}

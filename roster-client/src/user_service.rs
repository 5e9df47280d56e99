use async_trait::async_trait;

use crate::api::{ApiResponse, UserApi};
use crate::error::ApiError;
use crate::http_client::ApiService;
use crate::{CreateUserRequest, USERS_PATH, User};

#[derive(Debug, Clone)]
pub struct UserService {
    api: ApiService,
}

impl UserService {
    pub fn new(api: ApiService) -> Self {
        Self { api }
    }
}

#[async_trait(?Send)]
impl UserApi for UserService {
    async fn get_users(&self) -> Result<ApiResponse<Vec<User>>, ApiError> {
        self.api.get(USERS_PATH).await
    }

    async fn create_user(&self, username: &str) -> Result<ApiResponse<User>, ApiError> {
        self.api
            .post(USERS_PATH, &CreateUserRequest { username })
            .await
    }
}

use async_trait::async_trait;
use dioxus::logger::tracing::error;
use gloo_net::http::{Method, RequestBuilder, Response};
use roster_client::api::{decode_json, encode_json, status_error};
use roster_client::{ApiError, ApiResponse, CreateUserRequest, USERS_PATH, User, UserApi};
use serde::{Serialize, de::DeserializeOwned};

/// Browser transport rooted at `<base>/api`. Constructed once in `App` and
/// shared through context.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClient {
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: format!("{}/api", base_url.trim_end_matches('/')),
        }
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        RequestBuilder::new(&format!("{}{}", self.base_url, path))
            .method(method)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json; charset=utf-8")
            .header("X-Requested-With", "XMLHttpRequest")
    }

    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.builder(method, path);
        let request = match body {
            Some(body) => builder.body(encode_json(body)?),
            None => builder.build(),
        }
        .map_err(transport_error)?;

        let response = request.send().await.map_err(transport_error)?;
        Self::decode(response).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request::<(), T>(Method::DELETE, path, None).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<ApiResponse<T>, ApiError> {
        let status = response.status();
        if !response.ok() {
            return Err(status_error(status, Some(&response.status_text())));
        }

        let text = response.text().await.map_err(transport_error)?;
        decode_json(status, text.as_bytes())
    }
}

fn transport_error(err: gloo_net::Error) -> ApiError {
    error!("request failed: {}", err);
    ApiError::normalize(None, None)
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebUserService {
    http: HttpClient,
}

impl WebUserService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait(?Send)]
impl UserApi for WebUserService {
    async fn get_users(&self) -> Result<ApiResponse<Vec<User>>, ApiError> {
        self.http.get(USERS_PATH).await
    }

    async fn create_user(&self, username: &str) -> Result<ApiResponse<User>, ApiError> {
        self.http
            .post(USERS_PATH, &CreateUserRequest { username })
            .await
    }
}

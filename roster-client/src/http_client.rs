use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{ApiResponse, decode_json, encode_json, status_error};
use crate::error::ApiError;

pub const API_PREFIX: &str = "/api";

/// JSON client rooted at `<base>/api`.
///
/// Build one per application and hand out clones; clones share the same
/// connection pool, so nothing is initialized lazily behind the caller's back.
#[derive(Debug, Clone)]
pub struct ApiService {
    client: Client,
    base_url: String,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::normalize(
            err.status().map(|s| s.as_u16()),
            err.status().and_then(|s| s.canonical_reason()),
        )
    }
}

pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers
}

impl ApiService {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = format!("{}{}", base_url.trim_end_matches('/'), API_PREFIX);
        let client = Client::builder().default_headers(default_headers()).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
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
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "api request");

        let mut builder = self.client.request(method, url);
        if let Some(body) = body {
            builder = builder.body(encode_json(body)?);
        }

        let response = builder.send().await?;
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
        if !status.is_success() {
            return Err(status_error(status.as_u16(), status.canonical_reason()));
        }

        let bytes = response.bytes().await?;
        decode_json(status.as_u16(), &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_the_api_prefix() {
        let api = ApiService::new("http://localhost:3000/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn fixed_headers_are_json_and_ajax() {
        let headers = default_headers();
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[CONTENT_TYPE], "application/json; charset=utf-8");
        assert_eq!(headers["x-requested-with"], "XMLHttpRequest");
    }
}

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::User;
use crate::error::ApiError;

/// Raw response wrapper: the HTTP status alongside the decoded body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

#[async_trait(?Send)]
pub trait UserApi {
    async fn get_users(&self) -> Result<ApiResponse<Vec<User>>, ApiError>;
    async fn create_user(&self, username: &str) -> Result<ApiResponse<User>, ApiError>;
}

/// Serializes a request body. Callers send it as a raw body so the fixed
/// `Content-Type` header, charset included, is the one that goes out.
pub fn encode_json<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body)
        .map_err(|e| ApiError::normalize(None, Some(&format!("invalid request body: {}", e))))
}

/// Error for a non-2xx response, whatever transport produced it.
pub fn status_error(status: u16, reason: Option<&str>) -> ApiError {
    ApiError::normalize(Some(status), reason)
}

/// Decodes a successful response body. An empty body reads as JSON `null`.
pub fn decode_json<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<ApiResponse<T>, ApiError> {
    let raw: &[u8] = if body.is_empty() { b"null" } else { body };
    let data = serde_json::from_slice(raw)
        .map_err(|e| ApiError::normalize(None, Some(&format!("invalid response body: {}", e))))?;
    Ok(ApiResponse { status, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_is_plain_json() {
        let body = crate::CreateUserRequest { username: "ada" };
        assert_eq!(encode_json(&body).unwrap(), r#"{"username":"ada"}"#);
    }

    #[test]
    fn blank_status_text_falls_back_to_the_default_message() {
        let err = status_error(503, Some(""));
        assert_eq!(err.status, 503);
        assert_eq!(err.message, "Internal server error");

        assert_eq!(status_error(404, None).message, "Internal server error");
    }

    #[test]
    fn status_text_is_kept_when_present() {
        let err = status_error(404, Some("Not Found"));
        assert_eq!(err, ApiError::normalize(Some(404), Some("Not Found")));
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let res: ApiResponse<Option<User>> = decode_json(204, b"").unwrap();
        assert_eq!(res.status, 204);
        assert_eq!(res.data, None);
    }

    #[test]
    fn body_is_decoded_into_the_target_type() {
        let body = br#"[{"id":3,"username":"ada","created_at":"2024-05-01T10:00:00Z"}]"#;
        let res: ApiResponse<Vec<User>> = decode_json(200, body).unwrap();
        assert_eq!(res.data.len(), 1);
        assert_eq!(res.data[0].id, 3);
    }

    #[test]
    fn malformed_body_becomes_a_500() {
        let err = decode_json::<Vec<User>>(200, b"<html>").unwrap_err();
        assert_eq!(err.status, 500);
        assert!(err.message.starts_with("invalid response body"));
    }
}

use axum::body::to_bytes;
use serde_json::{Value, json};

use super::*;

#[derive(Debug, thiserror::Error)]
#[error("tile missing")]
struct Missing;

impl ErrorCode for Missing {
    fn error_code(&self) -> &'static str {
        "E_TILE_NOT_FOUND"
    }
}

async fn body_json(err: ApiError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn retryable_defaults_to_false() {
    assert!(!Missing.retryable());
}

#[tokio::test]
async fn from_error_keeps_code_and_message() {
    let (status, body) = body_json(ApiError::from_error(StatusCode::NOT_FOUND, &Missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "code": "E_TILE_NOT_FOUND", "message": "tile missing" }));
}

#[tokio::test]
async fn fields_are_rendered_when_present() {
    let mut fields = FieldErrors::default();
    fields.0.insert("caption".into(), "Caption must be 500 characters or less".into());
    let err = ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "E_INVALID_METADATA", "invalid").with_fields(fields);
    let (status, body) = body_json(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"]["caption"], json!("Caption must be 500 characters or less"));
}

#[tokio::test]
async fn bad_request_uses_generic_code() {
    let (status, body) = body_json(ApiError::bad_request("file_name is required")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("E_BAD_REQUEST"));
}

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::protocol::RouteError;

#[derive(Debug)]
pub enum AppError {
    /// Session or user id segment absent.
    MissingIdentifier,
    UnknownOperation(String),
    BadRequest(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::MissingIdentifier => "missing_identifier",
            AppError::UnknownOperation(_) => "unknown_operation",
            AppError::BadRequest(_) => "invalid_request",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingIdentifier => StatusCode::BAD_REQUEST,
            AppError::UnknownOperation(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::MissingIdentifier => "session id and user id are required".to_string(),
            AppError::UnknownOperation(op) => format!("unknown operation: {op:?}"),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Internal(e) => {
                tracing::error!("internal error: {e}");
                "internal server error".to_string()
            }
        }
    }

    /// Malformed routes get a hard close after the reply.
    fn closes_connection(&self) -> bool {
        matches!(
            self,
            AppError::MissingIdentifier | AppError::UnknownOperation(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.message()
            }
        });

        let mut response = (status, Json(body)).into_response();
        if self.closes_connection() {
            response
                .headers_mut()
                .insert(header::CONNECTION, HeaderValue::from_static("close"));
        }
        response
    }
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::UnknownOperation(op) => AppError::UnknownOperation(op),
            RouteError::MissingIdentifier => AppError::MissingIdentifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_identifier_is_400_with_close() {
        let response = AppError::MissingIdentifier.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers().get(header::CONNECTION).unwrap(), "close");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "missing_identifier");
    }

    #[test]
    fn test_unknown_operation_is_404_with_close() {
        let response = AppError::UnknownOperation("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers().get(header::CONNECTION).unwrap(), "close");
    }

    #[test]
    fn test_unknown_peer_keeps_connection() {
        let response = AppError::BadRequest("peer is not connected".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::CONNECTION).is_none());
    }

    #[test]
    fn test_payload_too_large_status() {
        let response = AppError::PayloadTooLarge("too big".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}

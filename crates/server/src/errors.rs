use axum::{http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::json;

#[derive(Debug)]
pub struct ServerError {
    status: StatusCode,
    code: String,
    message: String,
    shape: Shape,
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Envelope,
    /// `{"message": ...}`, the body API clients already parse for a rejected key.
    Message,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl ServerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code: status_code_to_string(status),
            message: message.into(),
            shape: Shape::Envelope,
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            shape: Shape::Message,
            ..Self::new(StatusCode::FORBIDDEN, "Unauthorized")
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self.shape {
            Shape::Message => {
                (self.status, axum::Json(json!({ "message": self.message }))).into_response()
            }
            Shape::Envelope => {
                let body = ErrorEnvelope {
                    error: ErrorBody {
                        code: self.code,
                        message: self.message,
                    },
                };
                (self.status, axum::Json(body)).into_response()
            }
        }
    }
}

fn status_code_to_string(status: StatusCode) -> String {
    match status {
        StatusCode::BAD_REQUEST => "bad_request",
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::INTERNAL_SERVER_ERROR => "internal_error",
        _ => status.canonical_reason().unwrap_or("error"),
    }
    .to_string()
}

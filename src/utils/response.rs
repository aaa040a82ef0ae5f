use actix_web::{HttpResponse, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Uniform envelope returned by every endpoint, success or failure.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub message: String,
    pub success: bool,
    pub status_code: u16,
    #[serde(default)]
    pub errors: Vec<String>,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            success: true,
            status_code: status.as_u16(),
            errors: Vec::new(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn failed(status: StatusCode, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            status_code: status.as_u16(),
            errors,
            data: None,
        }
    }
}

pub fn success<T: Serialize>(status: StatusCode, message: impl Into<String>, data: T) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::ok(status, message, data))
}

pub fn failure(status: StatusCode, message: impl Into<String>, errors: Vec<String>) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::failed(status, message, errors))
}

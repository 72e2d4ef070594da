//! API Response wrapper

use axum::{http::StatusCode, Json};
use chrono::Utc;
use hrnav_core::MenuError;
use serde::Serialize;
use tracing::{error, warn};

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Error half of every handler result.
pub type ApiFailure = (StatusCode, Json<ApiResponse<()>>);

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.to_string(),
            }),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Maps a menu error to status code and envelope.
pub fn failure(err: MenuError) -> ApiFailure {
    let (status, code) = match &err {
        MenuError::ValidationError(_) | MenuError::InvalidLevel(_) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        }
        MenuError::RoleProviderError(_) => (StatusCode::BAD_GATEWAY, "ROLE_PROVIDER_ERROR"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    if status.is_server_error() {
        error!("Menu request failed: {}", err);
    } else {
        warn!("Rejected menu request: {}", err);
    }
    (status, Json(ApiResponse::error(code, &err.to_string())))
}

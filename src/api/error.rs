use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// One validated parameter, named by its CLI flag and its request key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub flag: &'static str,
    pub key: &'static str,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}", self.flag)
    }
}

/// Rejections raised while turning CLI flags or API parameters into an input.
/// `Display` names the CLI flag; [`InputError::api_message`] names the request key.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{param} must be a finite number")]
    NotFinite { param: Param },
    #[error("{param} must be > {min}")]
    NotAbove { param: Param, min: f64 },
    #[error("{param} must be >= {min}")]
    Below { param: Param, min: f64 },
    #[error("{param} must be <= {max}")]
    Above { param: Param, max: f64 },
    #[error("{param} must be between {min} and {max}")]
    OutOfRange { param: Param, min: f64, max: f64 },
}

impl InputError {
    pub fn param(&self) -> Param {
        match self {
            InputError::NotFinite { param }
            | InputError::NotAbove { param, .. }
            | InputError::Below { param, .. }
            | InputError::Above { param, .. }
            | InputError::OutOfRange { param, .. } => *param,
        }
    }

    pub fn api_message(&self) -> String {
        let cli = self.to_string();
        let flag = self.param().to_string();
        match cli.strip_prefix(flag.as_str()) {
            Some(rest) => format!("{}{rest}", self.param().key),
            None => cli,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", .0.api_message())]
    Input(#[from] InputError),
    #[error("Failed to encode share link: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("Not found")]
    NotFound,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Input(_) => StatusCode::BAD_REQUEST,
            ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        super::json_response(
            status,
            ErrorResponse {
                error: self.to_string(),
            },
        )
    }
}

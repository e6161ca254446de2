// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::registry::RegistryError;

/// Error codes for the directory API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiError {
    BadRequest,
    Validation,
    RegistryUnavailable,
    Internal,
}

impl ApiError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Validation => 422,
            Self::RegistryUnavailable => 500,
            Self::Internal => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Validation => "VALIDATION_ERROR",
            Self::RegistryUnavailable => "REGISTRY_UNAVAILABLE",
            Self::Internal => "INTERNAL",
        }
    }

    pub fn to_error_body(&self, message: impl Into<String>) -> ErrorResponse {
        ErrorResponse { err: message.into(), code: self.as_str().to_owned() }
    }

    pub fn to_http_response(
        &self,
        message: impl Into<String>,
    ) -> (StatusCode, Json<ErrorResponse>) {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_error_body(message)))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&RegistryError> for ApiError {
    fn from(err: &RegistryError) -> Self {
        match err {
            RegistryError::Validation(_) => Self::Validation,
            RegistryError::StoreRead(_) | RegistryError::StoreWrite(_) => {
                Self::RegistryUnavailable
            }
        }
    }
}

/// Error body: human-readable `err` plus a machine-readable `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub err: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_errors_map_to_codes() {
        let validation = RegistryError::Validation("owner must not be empty".to_owned());
        assert_eq!(ApiError::from(&validation), ApiError::Validation);

        let down = RegistryError::StoreRead("gone".to_owned());
        assert_eq!(ApiError::from(&down), ApiError::RegistryUnavailable);
        assert_eq!(ApiError::from(&down).http_status(), 500);
    }

    #[test]
    fn http_response_carries_message_and_code() {
        let (status, Json(body)) = ApiError::Validation.to_http_response("bad body");
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.err, "bad body");
        assert_eq!(body.code, "VALIDATION_ERROR");
    }
}

//! Shared-password gate for mutating routes.

use crate::error::ApiError;
use axum::http::HeaderMap;

pub const ADMIN_HEADER: &str = "x-admin-password";

pub(crate) fn require_admin(headers: &HeaderMap, password: &str) -> Result<(), ApiError> {
    let supplied = headers
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);
    match supplied {
        Some(p) if !password.is_empty() && p == password => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

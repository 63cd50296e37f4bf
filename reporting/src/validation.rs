// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Guards for read-path parameters
//!
//! All guards run before the cache or the repository is touched.

use crate::error::ValidationError;
use url::Url;

/// Returns true if the URI is an absolute http(s) URI with a host
pub fn is_valid_base_uri(uri: &Url) -> bool {
    matches!(uri.scheme(), "http" | "https") && uri.host_str().is_some_and(|h| !h.is_empty())
}

/// Parse a required URI parameter
pub fn require_uri(parameter: &str, value: Option<&str>) -> Result<Url, ValidationError> {
    let raw = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(ValidationError::MissingParameter(parameter.to_string())),
    };

    let invalid = || ValidationError::InvalidUri {
        parameter: parameter.to_string(),
        value: raw.to_string(),
    };

    let uri = Url::parse(raw).map_err(|_| invalid())?;
    if !is_valid_base_uri(&uri) {
        return Err(invalid());
    }
    Ok(uri)
}

/// Require a strictly positive integer parameter
pub fn require_positive(parameter: &str, value: i64) -> Result<u64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositive {
            parameter: parameter.to_string(),
            value,
        });
    }
    Ok(value as u64)
}

/// Require a non-blank string parameter
pub fn require_not_blank<'a>(
    parameter: &str,
    value: Option<&'a str>,
) -> Result<&'a str, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Blank(parameter.to_string())),
    }
}

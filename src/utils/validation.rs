use crate::utils::error::{DocError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> DocError {
    DocError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Backends are only reachable over http(s).
pub fn validate_endpoint(field_name: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field_name, endpoint, format!("Invalid URL format: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            endpoint,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field_name, endpoint, "URL has no host"));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    let reason = if path.trim().is_empty() {
        "Path cannot be empty"
    } else if path.contains('\0') {
        "Path contains null bytes"
    } else {
        return Ok(());
    };
    Err(invalid(field_name, path, reason))
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ))
    }
}

/// At most one of the two settings may be present.
pub fn validate_exclusive(
    first_field: &str,
    first: Option<&str>,
    second_field: &str,
    second: Option<&str>,
) -> Result<()> {
    match (first, second) {
        (Some(a), Some(b)) => Err(invalid(
            &format!("{}/{}", first_field, second_field),
            format!("{} / {}", a, b),
            format!("{} and {} cannot both be set", first_field, second_field),
        )),
        _ => Ok(()),
    }
}

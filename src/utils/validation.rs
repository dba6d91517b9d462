use crate::utils::error::{FinderError, Result};
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::path::Path;
use url::Url;

/// 搜尋逾時上限，超過這個值通常是設定打錯
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> FinderError {
    FinderError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Search endpoints must be absolute http(s) URLs.
pub fn validate_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field, endpoint, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(field, endpoint, format!("Unsupported URL scheme: {}", scheme))),
    }
}

pub fn validate_within<T>(field: &str, value: T, bounds: RangeInclusive<T>) -> Result<()>
where
    T: PartialOrd + Display,
{
    if bounds.contains(&value) {
        return Ok(());
    }
    let reason = format!("Value must be between {} and {}", bounds.start(), bounds.end());
    Err(invalid(field, value, reason))
}

pub fn validate_not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty"));
    }
    if value.contains('\0') {
        return Err(invalid(field, value.escape_debug(), "Value contains null bytes"));
    }
    Ok(())
}

/// 副檔名比對不分大小寫
pub fn validate_extension(field: &str, file: &str, allowed: &[&str]) -> Result<()> {
    let extension = Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| invalid(field, file, "File has no extension"))?;

    if allowed.iter().any(|known| known.eq_ignore_ascii_case(extension)) {
        return Ok(());
    }
    Err(invalid(
        field,
        file,
        format!("Unsupported file extension: {}. Expected one of: {}", extension, allowed.join(", ")),
    ))
}

//! Field-level checks applied before anything reaches the store.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::model::{DatabaseError, DatabaseResult};

pub const USER_NAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;
pub const CATEGORY_NAME_MAX: usize = 100;
pub const TITLE_MAX: usize = 200;
pub const VIDEO_URL_MAX: usize = 200;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("Invalid email regex")
});

/// Non-blank and at most `max` characters.
pub fn required(field: &str, value: &str, max: usize) -> DatabaseResult<()> {
    if value.trim().is_empty() {
        return Err(DatabaseError::validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(DatabaseError::validation(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}

pub fn email(value: &str) -> DatabaseResult<()> {
    required("email", value, EMAIL_MAX)?;
    if !EMAIL_RE.is_match(value) {
        return Err(DatabaseError::validation(format!(
            "email `{value}` is not a valid address"
        )));
    }
    Ok(())
}

/// Absolute http(s) URL.
pub fn video_url(value: &str) -> DatabaseResult<()> {
    required("video_url", value, VIDEO_URL_MAX)?;
    let url = Url::parse(value)
        .map_err(|e| DatabaseError::validation(format!("video_url `{value}` is invalid: {e}")))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        _ => Err(DatabaseError::validation(format!(
            "video_url `{value}` must be an http or https URL"
        ))),
    }
}

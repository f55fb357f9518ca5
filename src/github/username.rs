use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Longest login GitHub accepts.
pub const MAX_USERNAME_LEN: usize = 39;

// Alphanumeric runs joined by single hyphens. Length is checked separately.
static USERNAME_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]+(?:-[A-Za-z0-9]+)*$").expect("username pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,

    #[error("Username \"{0}\" is longer than 39 characters")]
    TooLong(String),

    #[error("Username \"{0}\" may only contain letters, digits, and single hyphens between them")]
    InvalidFormat(String),
}

/// Check a username against GitHub's login rules.
///
/// Accepts 1-39 ASCII alphanumerics with optional single hyphens that are
/// neither leading, trailing, nor doubled. Surrounding whitespace is trimmed
/// and the trimmed form is returned.
pub fn validate_username(raw: &str) -> Result<&str, UsernameError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(UsernameError::Empty);
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(UsernameError::TooLong(username.to_string()));
    }
    if !USERNAME_SHAPE.is_match(username) {
        return Err(UsernameError::InvalidFormat(username.to_string()));
    }
    Ok(username)
}

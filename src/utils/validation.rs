//! Centralized validation and helper functions.

/// Longest file name most file systems accept, in bytes
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Empty name provided")]
    EmptyName,
    #[error("Name '{0}' contains no characters usable in a file name")]
    InvalidName(String),
    #[error("'{0:?}' cannot be used as a header delimiter")]
    InvalidDelimiter(char),
}

/// Turn a bin name into something safe to embed in a file name.
///
/// Path separators, `..` and control characters cannot reach the file system:
/// every character outside `[A-Za-z0-9._-]` becomes `_`, leading dots are
/// dropped, and the result is capped at `max_len` bytes.
///
/// # Examples
///
/// ```
/// use bin_reads::utils::validation::{sanitize_file_component, MAX_FILENAME_LENGTH};
///
/// assert_eq!(sanitize_file_component("Bin_3", MAX_FILENAME_LENGTH).unwrap(), "Bin_3");
/// assert_eq!(sanitize_file_component("../etc/bin 1", 64).unwrap(), "_etc_bin_1");
/// assert!(sanitize_file_component("  ", 64).is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::EmptyName` for a blank name, or
/// `ValidationError::InvalidName` if no character of the name survives.
pub fn sanitize_file_component(name: &str, max_len: usize) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let mut kept = 0;
    let sanitized: String = trimmed
        .replace("..", "")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                kept += 1;
                c
            } else {
                '_'
            }
        })
        .collect();

    // Prevent hidden files
    let mut sanitized = sanitized.trim_start_matches('.').to_string();

    // ASCII only from here, so byte truncation is safe
    sanitized.truncate(max_len);
    if kept == 0 || sanitized.is_empty() {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(sanitized)
}

/// The longest prefix of `s` that fits in `max_bytes` without splitting a
/// character.
#[must_use]
pub fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Check a character given as a header separator or tag delimiter.
///
/// Whitespace and the `>` record marker would be ambiguous in a header line.
///
/// # Errors
///
/// Returns `ValidationError::InvalidDelimiter` if the character is rejected.
pub fn validate_delimiter(c: char) -> Result<char, ValidationError> {
    if c.is_whitespace() || c.is_control() || c == '>' {
        Err(ValidationError::InvalidDelimiter(c))
    } else {
        Ok(c)
    }
}

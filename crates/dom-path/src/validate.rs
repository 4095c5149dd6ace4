//! Validation helpers for the pointer string form.

use crate::PathError;

/// Validate a pointer string.
///
/// # Errors
///
/// Returns [`PathError::MissingLeadingSlash`] if the pointer is non-empty
/// but doesn't start with `/`.
///
/// # Example
///
/// ```
/// use dom_path::validate_pointer;
///
/// validate_pointer("").unwrap();
/// validate_pointer("/foo/bar").unwrap();
/// validate_pointer("foo").unwrap_err();
/// ```
pub fn validate_pointer(pointer: &str) -> Result<(), PathError> {
    if pointer.is_empty() || pointer.starts_with('/') {
        return Ok(());
    }
    Err(PathError::MissingLeadingSlash(pointer.to_string()))
}

/// Check if a string is a canonical non-negative integer array index.
///
/// # Example
///
/// ```
/// use dom_path::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("abc"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    // No leading zeros except for "0" itself
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

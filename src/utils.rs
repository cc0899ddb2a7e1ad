//! Utility functions
use crate::errors::QueryError;

/// Whitespace-only strings count as empty
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Reject a blank parameter with `InvalidArgument`, otherwise hand it back untouched
pub fn require_non_blank<'a>(value: &'a str, message: &str) -> Result<&'a str, QueryError> {
    if is_blank(value) {
        return Err(QueryError::invalid(message));
    }
    Ok(value)
}

/// Split a comma-separated list, dropping empty entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \t"));
        assert!(!is_blank("falcon9"));
    }

    #[test]
    fn test_require_non_blank_passes_value_through() {
        assert_eq!(require_non_blank(" a ", "msg").unwrap(), " a ");
    }

    #[test]
    fn test_require_non_blank_rejects() {
        let err = require_non_blank("  ", "Status cannot be null or empty").unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidArgument(msg) if msg == "Status cannot be null or empty"
        ));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("http://a.test, ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(split_list("").is_empty());
    }
}

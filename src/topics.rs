//! Topic list parsing.

use crate::error::{Error, Result};

/// Split a comma-separated topic string into trimmed topics.
///
/// Empty elements are kept, so `"a,,b"` yields three topics. The result
/// always has one more element than the input has commas.
pub fn validate_topics(topics: &str) -> Result<Vec<String>> {
    if topics.is_empty() {
        return Err(Error::InvalidArgument(
            "Topics must be a non-empty string".to_string(),
        ));
    }
    Ok(topics.split(',').map(|t| t.trim().to_string()).collect())
}

/// Join topics back together for use in a task description.
pub fn join_topics(topics: &[String]) -> String {
    topics.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_trim() {
        let topics = validate_topics("Pericles, Plato ,Aristotle").unwrap();
        assert_eq!(topics, vec!["Pericles", "Plato", "Aristotle"]);
    }

    #[test]
    fn test_single_topic() {
        assert_eq!(validate_topics("Rust").unwrap(), vec!["Rust"]);
    }

    #[test]
    fn test_length_matches_comma_count() {
        for raw in ["a", "a,b", " a , b , c ", "a,,b", ",", "x, y,z,"] {
            let topics = validate_topics(raw).unwrap();
            assert_eq!(topics.len(), raw.matches(',').count() + 1, "input {raw:?}");
            let expected: Vec<String> = raw.split(',').map(|s| s.trim().to_string()).collect();
            assert_eq!(topics, expected);
        }
    }

    #[test]
    fn test_empty_elements_are_kept() {
        assert_eq!(validate_topics("a,,b").unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = validate_topics("").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_join_topics() {
        let topics = vec!["Pericles".to_string(), "Plato".to_string()];
        assert_eq!(join_topics(&topics), "Pericles, Plato");
    }
}

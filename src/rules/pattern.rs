/*!
 * Field Redaction Patterns
 * Dot-path and prefix-wildcard rules identifying fields to mask
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Pattern parse errors, raised at configuration load time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("malformed redaction pattern {pattern:?}: {reason}")]
    Malformed { pattern: String, reason: String },
}

impl PatternError {
    fn new(pattern: &str, reason: &str) -> Self {
        Self::Malformed {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A field-redaction pattern
///
/// Either an exact dot-path (`crew.salary`) or a prefix wildcard
/// (`maintenance.*`). No other wildcard placement is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldPattern {
    /// Matches one path exactly
    Exact(String),
    /// Matches any path under the stored prefix; the prefix keeps its
    /// trailing dot so matching is a plain `starts_with`
    Prefix(String),
}

impl FieldPattern {
    /// Parse a pattern string, rejecting ill-formed wildcards
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PatternError::new(raw, "empty pattern"));
        }
        if let Some(stem) = trimmed.strip_suffix(".*") {
            if stem.is_empty() {
                return Err(PatternError::new(raw, "wildcard needs a prefix"));
            }
            if stem.contains('*') {
                return Err(PatternError::new(raw, "wildcard allowed only as trailing '.*'"));
            }
            return Ok(FieldPattern::Prefix(format!("{stem}.")));
        }
        if trimmed.contains('*') {
            return Err(PatternError::new(raw, "wildcard allowed only as trailing '.*'"));
        }
        Ok(FieldPattern::Exact(trimmed.to_string()))
    }

    /// Whether `path` is matched by this pattern
    pub fn matches(&self, path: &str) -> bool {
        match self {
            FieldPattern::Exact(exact) => exact == path,
            FieldPattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// Whether any pattern in the list matches `path`
pub fn any_match(patterns: &[FieldPattern], path: &str) -> bool {
    patterns.iter().any(|p| p.matches(path))
}

impl fmt::Display for FieldPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPattern::Exact(exact) => f.write_str(exact),
            FieldPattern::Prefix(prefix) => write!(f, "{prefix}*"),
        }
    }
}

impl TryFrom<String> for FieldPattern {
    type Error = PatternError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<FieldPattern> for String {
    fn from(pattern: FieldPattern) -> Self {
        pattern.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let p = FieldPattern::parse("crew.salary").unwrap();
        assert!(p.matches("crew.salary"));
        assert!(!p.matches("crew.salary_currency"));
        assert!(!p.matches("crew"));
    }

    #[test]
    fn test_prefix_wildcard() {
        let p = FieldPattern::parse("maintenance.*").unwrap();
        assert!(p.matches("maintenance.cost"));
        assert!(p.matches("maintenance.jobs.overdue"));
        assert!(!p.matches("maintenance"));
        assert!(!p.matches("maintenance_log.cost"));
    }

    #[test]
    fn test_malformed_patterns_rejected() {
        assert!(FieldPattern::parse("").is_err());
        assert!(FieldPattern::parse("   ").is_err());
        assert!(FieldPattern::parse(".*").is_err());
        assert!(FieldPattern::parse("crew.*.salary").is_err());
        assert!(FieldPattern::parse("crew*").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for raw in ["crew.salary", "maintenance.*"] {
            let p = FieldPattern::parse(raw).unwrap();
            assert_eq!(p.to_string(), raw);
            assert_eq!(FieldPattern::parse(&p.to_string()).unwrap(), p);
        }
    }

    #[test]
    fn test_serde_uses_pattern_strings() {
        let p: FieldPattern = serde_json::from_str("\"crew.bank.*\"").unwrap();
        assert_eq!(p, FieldPattern::Prefix("crew.bank.".to_string()));
        assert!(serde_json::from_str::<FieldPattern>("\"bad*pattern\"").is_err());
    }
}

//! TTL Policy Module
//!
//! Resolves the time-to-live of a cache key from an ordered table of
//! pattern rules with a default fallback.

use std::time::Duration;

use regex::Regex;

use crate::error::{GuardError, Result};

const MINUTE: u64 = 60;

/// Rule table applied by [`TtlPolicy::standard`], highest priority first.
///
/// Fast-moving listings expire quickly, "top" listings change slowly,
/// single-item lookups sit in between.
const STANDARD_RULES: &[(&str, u64)] = &[
    (r"^subreddit:.*:hot$", 5 * MINUTE),
    (r"^subreddit:.*:new$", 2 * MINUTE),
    (r"^subreddit:.*:top$", 30 * MINUTE),
    (r"^post:", 10 * MINUTE),
    (r"^user:", 15 * MINUTE),
    (r"^search:", 10 * MINUTE),
];

// == TTL Rule ==
/// A key pattern paired with the TTL of the keys it matches.
#[derive(Debug, Clone)]
pub struct TtlRule {
    pattern: Regex,
    ttl: Duration,
}

impl TtlRule {
    /// Compiles `pattern` into a rule.
    pub fn new(pattern: &str, ttl: Duration) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            GuardError::InvalidRequest(format!("Invalid TTL pattern '{}': {}", pattern, e))
        })?;
        Ok(Self { pattern, ttl })
    }

    /// Returns true if the rule applies to `key`.
    pub fn matches(&self, key: &str) -> bool {
        self.pattern.is_match(key)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

// == TTL Policy ==
/// Ordered TTL rules plus a default. Immutable once handed to a cache.
#[derive(Debug, Clone)]
pub struct TtlPolicy {
    rules: Vec<TtlRule>,
    default_ttl: Duration,
}

impl TtlPolicy {
    // == Constructor ==
    /// Creates a policy with no rules: every key gets `default_ttl`.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            rules: Vec::new(),
            default_ttl,
        }
    }

    // == Standard Policy ==
    /// Creates a policy with the standard listing/item rule table.
    pub fn standard(default_ttl: Duration) -> Result<Self> {
        STANDARD_RULES
            .iter()
            .try_fold(Self::new(default_ttl), |policy, (pattern, secs)| {
                policy.with_rule(pattern, Duration::from_secs(*secs))
            })
    }

    // == With Rule ==
    /// Appends a rule at the lowest priority so far.
    pub fn with_rule(mut self, pattern: &str, ttl: Duration) -> Result<Self> {
        self.rules.push(TtlRule::new(pattern, ttl)?);
        Ok(self)
    }

    // == Resolve ==
    /// Returns the TTL of the first rule matching `key`, or the default.
    pub fn resolve(&self, key: &str) -> Duration {
        self.rules
            .iter()
            .find(|rule| rule.matches(key))
            .map(TtlRule::ttl)
            .unwrap_or(self.default_ttl)
    }

    pub fn rules(&self) -> &[TtlRule] {
        &self.rules
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn mins(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[test]
    fn test_empty_policy_uses_default() {
        let policy = TtlPolicy::new(mins(5));
        assert_eq!(policy.resolve("anything"), mins(5));
        assert!(policy.rules().is_empty());
    }

    #[test]
    fn test_standard_policy_table() {
        let policy = TtlPolicy::standard(mins(5)).unwrap();

        assert_eq!(policy.resolve("subreddit:rust:hot"), mins(5));
        assert_eq!(policy.resolve("subreddit:rust:new"), mins(2));
        assert_eq!(policy.resolve("subreddit:rust:top"), mins(30));
        assert_eq!(policy.resolve("post:abc123"), mins(10));
        assert_eq!(policy.resolve("user:spez"), mins(15));
        assert_eq!(policy.resolve("search:tokio"), mins(10));
        assert_eq!(policy.resolve("subreddit:rust:rising"), mins(5));
        assert_eq!(policy.rules().len(), 6);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let policy = TtlPolicy::new(mins(1))
            .with_rule("^post:", mins(10))
            .unwrap()
            .with_rule("^post:pinned", mins(60))
            .unwrap();

        assert_eq!(policy.resolve("post:pinned:1"), mins(10));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let result = TtlPolicy::new(mins(1)).with_rule("([unclosed", mins(2));
        assert!(matches!(result, Err(GuardError::InvalidRequest(_))));
    }

    #[test]
    fn test_rule_accessors() {
        let rule = TtlRule::new("^user:", mins(15)).unwrap();
        assert_eq!(rule.pattern(), "^user:");
        assert_eq!(rule.ttl(), mins(15));
        assert!(rule.matches("user:alice"));
        assert!(!rule.matches("post:user:alice"));
    }
}

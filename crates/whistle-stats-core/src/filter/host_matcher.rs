use glob::{MatchOptions, Pattern};

const CASE_INSENSITIVE: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Hostname pattern used to restrict an analysis to some domains
#[derive(Debug, Clone)]
pub enum HostPattern {
    /// Whole hostname, compared case-insensitively
    Exact(String),
    /// Wildcard pattern such as `*.example.com` or `api?.internal`
    Glob(Pattern),
}

impl HostPattern {
    /// Patterns containing `*` or `?` are globs; anything else is exact
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(crate::Error::InvalidPattern(
                "Empty host pattern".to_string(),
            ));
        }

        if pattern.contains(['*', '?']) {
            let glob = Pattern::new(pattern).map_err(|e| {
                crate::Error::InvalidPattern(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
            Ok(HostPattern::Glob(glob))
        } else {
            Ok(HostPattern::Exact(pattern.to_lowercase()))
        }
    }

    pub fn matches(&self, hostname: &str) -> bool {
        match self {
            HostPattern::Exact(expected) => hostname.eq_ignore_ascii_case(expected),
            HostPattern::Glob(glob) => glob.matches_with(hostname, CASE_INSENSITIVE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let pattern = HostPattern::parse("api.example.com").unwrap();
        assert!(pattern.matches("api.example.com"));
        assert!(pattern.matches("API.Example.COM"));
        assert!(!pattern.matches("cdn.example.com"));
        assert!(!pattern.matches("api.example.com.evil.test"));
    }

    #[test]
    fn test_subdomain_wildcard() {
        let pattern = HostPattern::parse("*.example.com").unwrap();
        assert!(pattern.matches("api.example.com"));
        assert!(pattern.matches("static.cdn.example.com"));
        assert!(pattern.matches("CDN.EXAMPLE.COM"));
        assert!(!pattern.matches("example.com"));
        assert!(!pattern.matches("example.org"));
    }

    #[test]
    fn test_single_character_wildcard() {
        let pattern = HostPattern::parse("node?.cluster.local").unwrap();
        assert!(pattern.matches("node1.cluster.local"));
        assert!(!pattern.matches("node.cluster.local"));
        assert!(!pattern.matches("node12.cluster.local"));
    }

    #[test]
    fn test_ip_literal() {
        let pattern = HostPattern::parse("127.0.0.1").unwrap();
        assert!(pattern.matches("127.0.0.1"));
        assert!(!pattern.matches("127.0.0.10"));
    }

    #[test]
    fn test_ipv6_literal_is_exact() {
        let pattern = HostPattern::parse("[::1]").unwrap();
        assert!(pattern.matches("[::1]"));
        assert!(!pattern.matches(":"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(HostPattern::parse("").is_err());
        assert!(HostPattern::parse("   ").is_err());
        assert!(HostPattern::parse("api.***.com").is_err());
    }
}

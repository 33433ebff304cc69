//! Domain extraction from downloaded list text.
//!
//! Every [`Format`] has one multiline pattern and one capture group that holds
//! the candidate domain. Tokens are trimmed; empty tokens and tokens with a
//! trailing dot are dropped. Results are deduplicated and the output is sorted
//! so files are stable between runs.

use crate::source::Format;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

struct PatternRule {
    pattern: Regex,
    group: usize,
}

impl PatternRule {
    fn new(pattern: &str, group: usize, name: &str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect(name),
            group,
        }
    }
}

// `m`: ^/$ match at line boundaries, `R`: treat \r\n as a line terminator.

static DOMAINS_RULE: LazyLock<PatternRule> = LazyLock::new(|| {
    PatternRule::new(r"(?mR)^[a-zA-Z0-9][a-zA-Z0-9_.\-]+", 0, "domains pattern")
});

static HOSTS_RULE: LazyLock<PatternRule> = LazyLock::new(|| {
    PatternRule::new(
        r"(?mR)^([0-9]{1,3}\.){3}[0-9]{1,3}[ \t]+([a-zA-Z0-9_.\-]+)",
        2,
        "hosts pattern",
    )
});

static ABP_RULE: LazyLock<PatternRule> = LazyLock::new(|| {
    PatternRule::new(
        r"(?mR)^(\|\|)?([a-zA-Z0-9][a-zA-Z0-9_.\-]+)(\^[a-zA-Z0-9\-|$.*,=~]*|\$[a-zA-Z0-9\-|.,=~]*|\\[a-zA-Z0-9\-|^.]*)?$",
        2,
        "abp pattern",
    )
});

static WILDCARD_RULE: LazyLock<PatternRule> = LazyLock::new(|| {
    PatternRule::new(
        r"(?mR)^(\*\.|\.)?([a-zA-Z0-9][a-zA-Z0-9_.\-]+)",
        2,
        "wildcard pattern",
    )
});

fn rule_for(format: Format) -> &'static PatternRule {
    match format {
        Format::Domains => &*DOMAINS_RULE,
        Format::Hosts => &*HOSTS_RULE,
        Format::Abp => &*ABP_RULE,
        Format::Wildcard => &*WILDCARD_RULE,
    }
}

/// Unique domains found in `text`.
pub fn extract_domains(text: &str, format: Format) -> FxHashSet<String> {
    let rule = rule_for(format);
    let mut domains = FxHashSet::default();

    for caps in rule.pattern.captures_iter(text) {
        let Some(m) = caps.get(rule.group) else {
            continue;
        };
        let token = m.as_str().trim();
        if token.is_empty() || token.ends_with('.') {
            continue;
        }
        domains.insert(token.to_string());
    }

    domains
}

/// Newline-joined domains; empty when nothing qualifies.
pub fn extract(text: &str, format: Format) -> String {
    join_domains(extract_domains(text, format))
}

pub fn join_domains(domains: FxHashSet<String>) -> String {
    let mut sorted: Vec<String> = domains.into_iter().collect();
    sorted.sort_unstable();
    sorted.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> FxHashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_hosts_drops_trailing_dot() {
        let text = "127.0.0.1 example.com\n10.0.0.1 sub.example.org.";
        assert_eq!(extract_domains(text, Format::Hosts), set(&["example.com"]));
        assert_eq!(extract(text, Format::Hosts), "example.com");
    }

    #[test]
    fn test_hosts_format() {
        let text = "\
# comment
127.0.0.1\tlocalhost
0.0.0.0   ads.example.com
0.0.0.0 tracker.example.net # inline comment
::1 ip6-localhost
0.0.0.0 ads.example.com
";
        assert_eq!(
            extract_domains(text, Format::Hosts),
            set(&["localhost", "ads.example.com", "tracker.example.net"])
        );
    }

    #[test]
    fn test_domains_requires_alphanumeric_start() {
        let text = "foo.bar.com\n.leadingdot.com\n# comment\n-dash.com\n\nbaz.org\n";
        let domains = extract_domains(text, Format::Domains);
        assert!(domains.contains("foo.bar.com"));
        assert!(domains.contains("baz.org"));
        assert!(!domains.iter().any(|d| d.contains("leadingdot")));
        assert!(!domains.iter().any(|d| d.contains("dash")));
    }

    #[test]
    fn test_domains_handles_crlf_and_trailing_text() {
        let text = "one.example.com\r\ntwo.example.com trailing words\r\nthree.example.com.\r\n";
        assert_eq!(
            extract_domains(text, Format::Domains),
            set(&["one.example.com", "two.example.com"])
        );
    }

    #[test]
    fn test_abp_format() {
        let text = "\
[Adblock Plus 2.0]
! Title: test
||ads.example.com^
||tracker.example.net^$third-party
||cdn.example.org
plain.example.io
@@||allowed.example.com^
example.com##.banner
||bad.example.com/path^
";
        assert_eq!(
            extract_domains(text, Format::Abp),
            set(&[
                "ads.example.com",
                "tracker.example.net",
                "cdn.example.org",
                "plain.example.io",
            ])
        );
    }

    #[test]
    fn test_wildcard_format() {
        let text = "*.ads.example.com\n.tracker.example.net\nplain.example.org\n# c\n*.\n";
        assert_eq!(
            extract_domains(text, Format::Wildcard),
            set(&["ads.example.com", "tracker.example.net", "plain.example.org"])
        );
    }

    #[test]
    fn test_is_case_sensitive_and_deduplicates() {
        let text = "Example.com\nexample.com\nexample.com\n";
        assert_eq!(
            extract_domains(text, Format::Domains),
            set(&["Example.com", "example.com"])
        );
    }

    #[test]
    fn test_no_matches_is_empty() {
        assert_eq!(extract("# only comments\n\n", Format::Domains), "");
        assert_eq!(extract("<html><body>404</body></html>", Format::Hosts), "");
        assert_eq!(extract("", Format::Abp), "");
    }

    #[test]
    fn test_output_is_sorted_lines() {
        let out = extract("c.com\na.com\nb.com\na.com\n", Format::Domains);
        assert_eq!(out, "a.com\nb.com\nc.com");
    }
}

//! Wildcard domain patterns
//!
//! Patterns are dot-separated labels where `*` stands for exactly one
//! label of the host. `*.example.com` therefore matches `www.example.com`
//! but neither `example.com` nor `a.b.example.com`. Labels are compared
//! exactly, without case folding.

/// Check whether `host` matches any of the ignore patterns
///
/// Patterns are tried in order and surrounding whitespace is trimmed.
/// Empty patterns never match.
pub fn is_ignored<S: AsRef<str>>(host: &str, patterns: &[S]) -> bool {
    let host_labels: Vec<&str> = host.split('.').collect();

    for pattern in patterns {
        let pattern = pattern.as_ref().trim();
        if pattern.is_empty() {
            continue;
        }

        if matches_labels(pattern, &host_labels) {
            tracing::debug!("Ignoring domain {} because it matches {}", host, pattern);
            return true;
        }
    }

    false
}

fn matches_labels(pattern: &str, host_labels: &[&str]) -> bool {
    let pattern_labels: Vec<&str> = pattern.split('.').collect();
    if pattern_labels.len() != host_labels.len() {
        return false;
    }

    pattern_labels
        .iter()
        .zip(host_labels)
        .all(|(p, h)| *p == "*" || p == h)
}

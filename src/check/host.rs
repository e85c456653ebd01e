//! Host extraction from request and tab URLs

use crate::utils::EvaluationError;

/// Extract the host of a connection URL of the form `scheme://host...`
///
/// The scheme must end in lower-case ASCII letters directly before `://`.
/// The host runs up to the first `/` or `:` and a single trailing dot is
/// removed.
pub fn connection_host(url: &str) -> Result<String, EvaluationError> {
    let parse_error = || EvaluationError::UrlParse {
        url: url.to_string(),
    };

    let (scheme, rest) = url.split_once("://").ok_or_else(parse_error)?;
    if !scheme.ends_with(|c: char| c.is_ascii_lowercase()) {
        return Err(parse_error());
    }

    let host = authority(rest, &['/', ':']);
    if host.is_empty() {
        return Err(parse_error());
    }

    Ok(strip_trailing_dot(host).to_string())
}

/// Best-effort host fragment of a URL that failed to parse
pub fn recoverable_host(url: &str) -> String {
    url.split_once("://")
        .map(|(_, rest)| strip_trailing_dot(authority(rest, &['/', ':'])).to_string())
        .unwrap_or_default()
}

/// Host of the page shown in a tab
///
/// Unlike [`connection_host`] a port is kept, so `https://example.com:8443/`
/// yields `example.com:8443`.
pub fn tab_host(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("://")?;
    let host = authority(rest, &['/']);
    if host.is_empty() {
        return None;
    }
    Some(strip_trailing_dot(host).to_string())
}

fn authority<'a>(rest: &'a str, terminators: &[char]) -> &'a str {
    match rest.find(terminators) {
        Some(end) => &rest[..end],
        None => rest,
    }
}

fn strip_trailing_dot(host: &str) -> &str {
    host.strip_suffix('.').unwrap_or(host)
}

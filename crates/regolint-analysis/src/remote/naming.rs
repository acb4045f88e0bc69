//! Deterministic names for remote policies.

use reqwest::Url;

const POLICY_SUFFIX: &str = ".rego";

/// Final path segment when it ends in `.rego`, otherwise `<host>.rego`.
/// Unparseable input is returned unchanged.
pub fn policy_name_from_url(raw: &str) -> String {
    let Ok(url) = Url::parse(raw) else {
        return raw.to_string();
    };

    let last = url
        .path()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    if last.ends_with(POLICY_SUFFIX) {
        return last.to_string();
    }

    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}{POLICY_SUFFIX}"),
        None => format!("{host}{POLICY_SUFFIX}"),
    }
}

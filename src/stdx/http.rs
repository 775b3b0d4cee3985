use std::time::Duration;

pub(crate) static DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

pub(crate) static DEFAULT_BASE_URL: &str = "https://www.kobis.or.kr";

/// Applied to every request, covering connect through reading the body.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Joins a site-relative path onto `base`, tolerating a trailing `/` on the
/// base and a missing leading `/` on the path.
pub(crate) fn absolute(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

//! Target URL resolution.
//!
//! The solver drives real browser sessions, which need a secure origin, so
//! every target is rewritten onto `https://`.

use axum::http::{header, HeaderMap, Uri};

/// Work out the URL the solver should fetch for an inbound request.
///
/// - absolute-form (`GET http://host/path`): that URL, `http://` forced to `https://`
/// - origin-form with a Host header: `https://<host><path>`
/// - origin-form without Host: the raw path, passed on as-is
pub fn resolve_target_url(uri: &Uri, headers: &HeaderMap) -> String {
    if uri.scheme().is_some() {
        return force_secure(&uri.to_string());
    }

    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("");

    match headers.get(header::HOST).and_then(|v| v.to_str().ok()) {
        Some(host) if !host.is_empty() => {
            if path.starts_with('/') {
                format!("https://{host}{path}")
            } else {
                format!("https://{host}/{path}")
            }
        }
        _ => path.to_string(),
    }
}

/// Swap a leading `http://` for `https://`; anything else is returned unchanged.
pub fn force_secure(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

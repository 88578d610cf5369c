use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};

use super::{Response, ResponseError};
use crate::request::Request;

/// 307/308 redirect.
///
/// Relative targets are resolved against the directory of the current
/// request path and cleaned, keeping a trailing slash. Non-ASCII bytes in the
/// final location are percent-escaped.
#[derive(Debug, Clone)]
pub struct RedirectResponse {
    status: StatusCode,
    headers: HeaderMap,
}

impl RedirectResponse {
    pub fn temporary(req: &Request, url: &str) -> Self {
        Self::new(req, url, StatusCode::TEMPORARY_REDIRECT)
    }

    pub fn permanent(req: &Request, url: &str) -> Self {
        Self::new(req, url, StatusCode::PERMANENT_REDIRECT)
    }

    fn new(req: &Request, url: &str, status: StatusCode) -> Self {
        let location = resolve_location(req.path(), url);

        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&hex_escape_non_ascii(&location)) {
            headers.insert(header::LOCATION, value);
        }
        if matches!(*req.method(), Method::GET | Method::HEAD) {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
        }

        Self { status, headers }
    }
}

impl Response for RedirectResponse {
    fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    fn body(&self) -> Result<Bytes, ResponseError> {
        Ok(Bytes::new())
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }
}

fn resolve_location(current_path: &str, url: &str) -> String {
    // Absolute URLs (scheme or authority present) pass through untouched.
    if url::Url::parse(url).is_ok() || url.starts_with("//") {
        return url.to_string();
    }

    let current = if current_path.is_empty() { "/" } else { current_path };
    let mut target = if url.starts_with('/') {
        url.to_string()
    } else {
        let dir_end = current.rfind('/').map(|i| i + 1).unwrap_or(0);
        format!("{}{}", &current[..dir_end], url)
    };

    let query = match target.find('?') {
        Some(i) => target.split_off(i),
        None => String::new(),
    };

    let trailing = target.ends_with('/');
    let mut cleaned = clean_path(&target);
    if trailing && !cleaned.ends_with('/') {
        cleaned.push('/');
    }
    cleaned + &query
}

/// Lexical path normalization: collapses `//`, drops `.`, resolves `..`.
fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

fn hex_escape_non_ascii(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        if byte.is_ascii() {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:x}"));
        }
    }
    out
}

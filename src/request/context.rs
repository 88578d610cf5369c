//! Per-request context.
//!
//! # Responsibilities
//! - Merge every caller-supplied value into one name → value table
//! - Keep the transport request data (method, URI, headers, peer) readable
//! - Expose typed accessors that coerce exactly like the validators do
//!
//! # Merge order
//! ```text
//! path variables
//!     → form values (url-encoded body fields, then query fields, per key)
//!     → query values
//!     → url-encoded body values
//!     → JSON object body
//! ```
//! Later sources overwrite earlier ones on key collision.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::body::Bytes;
use axum::http::{header, request::Parts, uri::Scheme, HeaderMap, Method, Uri, Version};
use serde_json::{Map, Value};
use thiserror::Error;

use super::coerce::{self, CoercionError};
use crate::app::{ParamLocation, Parameter};

/// Errors raised while turning a transport request into a [`Request`].
#[derive(Debug, Error)]
pub enum RequestError {
    /// A non-empty body that is neither a form nor valid JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The body could not be read from the connection.
    #[error("failed to read request body: {0}")]
    BodyRead(String),
}

/// Transport-level pieces a [`Request`] is built from.
pub struct RawRequest {
    pub parts: Parts,
    pub path_params: Vec<(String, String)>,
    pub body: Bytes,
    pub remote_addr: Option<SocketAddr>,
}

/// Unified, immutable view of one inbound request.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    remote_addr: Option<SocketAddr>,
    tls: bool,
    parameters: HashMap<String, Value>,
}

impl Request {
    /// Build the context, merging all value sources.
    ///
    /// `declared` lets header and cookie parameters be picked up from the
    /// request metadata when no other source supplied them.
    pub fn build(raw: RawRequest, declared: &[Parameter]) -> Result<Self, RequestError> {
        let RawRequest {
            parts,
            path_params,
            body,
            remote_addr,
        } = raw;

        let mut parameters: HashMap<String, Value> = HashMap::new();

        for (name, value) in path_params {
            parameters.insert(name, Value::String(value));
        }

        let query = parse_form(parts.uri.query().unwrap_or_default().as_bytes());
        let body_form = if is_form_body(&parts) {
            Some(parse_form(&body))
        } else {
            None
        };

        // Generic form: body fields first, then query fields, combined per key.
        let mut combined: Vec<(String, Vec<String>)> = Vec::new();
        for fields in body_form.iter().chain(std::iter::once(&query)) {
            for (key, values) in fields {
                match combined.iter_mut().find(|(k, _)| k == key) {
                    Some((_, existing)) => existing.extend(values.iter().cloned()),
                    None => combined.push((key.clone(), values.clone())),
                }
            }
        }
        apply_fields(&mut parameters, &combined);
        apply_fields(&mut parameters, &query);
        if let Some(fields) = &body_form {
            apply_fields(&mut parameters, fields);
        }

        if body_form.is_none() {
            if let Some(object) = parse_json_object(&body)? {
                parameters.extend(object);
            }
        }

        for param in declared {
            if parameters.contains_key(&param.name) {
                continue;
            }
            let value = match param.location {
                ParamLocation::Header => parts
                    .headers
                    .get(param.name.as_str())
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string),
                ParamLocation::Cookie => cookie_value(&parts.headers, &param.name),
                ParamLocation::Path | ParamLocation::Query => None,
            };
            if let Some(value) = value {
                parameters.insert(param.name.clone(), Value::String(value));
            }
        }

        let tls = parts.uri.scheme() == Some(&Scheme::HTTPS);

        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            remote_addr,
            tls,
            parameters,
        })
    }

    /// Context holding only the given parameters, for exercising actions and
    /// validators without a transport.
    pub fn from_parameters<I, K>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            method: Method::GET,
            uri: Uri::from_static("/"),
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            remote_addr: None,
            tls: false,
            parameters: parameters.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if it is valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        cookie_value(&self.headers, name)
    }

    pub fn host(&self) -> Option<&str> {
        self.uri.host().or_else(|| self.header(header::HOST.as_str()))
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.header(header::USER_AGENT.as_str())
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    pub fn is_tls(&self) -> bool {
        self.tls
    }

    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.parameters
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    fn lookup(&self, name: &str) -> Result<&Value, CoercionError> {
        self.parameters.get(name).ok_or_else(|| CoercionError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn get_string(&self, name: &str) -> Result<String, CoercionError> {
        coerce::to_string(name, self.lookup(name)?)
    }

    pub fn get_int(&self, name: &str) -> Result<i64, CoercionError> {
        coerce::to_int(name, self.lookup(name)?)
    }

    pub fn get_float(&self, name: &str) -> Result<f64, CoercionError> {
        coerce::to_float(name, self.lookup(name)?)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, CoercionError> {
        coerce::to_bool(name, self.lookup(name)?)
    }

    pub fn get_array(&self, name: &str) -> Result<Vec<Value>, CoercionError> {
        coerce::to_array(name, self.lookup(name)?).cloned()
    }

    pub fn get_map(&self, name: &str) -> Result<Map<String, Value>, CoercionError> {
        coerce::to_map(name, self.lookup(name)?).cloned()
    }

    pub fn get_int_array(&self, name: &str) -> Result<Vec<i64>, CoercionError> {
        self.typed_array(name, "an array of integers", coerce::to_int)
    }

    pub fn get_float_array(&self, name: &str) -> Result<Vec<f64>, CoercionError> {
        self.typed_array(name, "an array of floats", coerce::to_float)
    }

    pub fn get_string_array(&self, name: &str) -> Result<Vec<String>, CoercionError> {
        self.typed_array(name, "an array of strings", coerce::to_string)
    }

    pub fn get_bool_array(&self, name: &str) -> Result<Vec<bool>, CoercionError> {
        self.typed_array(name, "an array of booleans", coerce::to_bool)
    }

    pub fn get_string_bool_map(&self, name: &str) -> Result<HashMap<String, bool>, CoercionError> {
        let map = coerce::to_map(name, self.lookup(name)?)?;
        map.iter()
            .map(|(k, v)| {
                coerce::to_bool(name, v)
                    .map(|b| (k.clone(), b))
                    .map_err(|_| CoercionError::WrongType {
                        name: name.to_string(),
                        expected: "a map of booleans",
                    })
            })
            .collect()
    }

    fn typed_array<T>(
        &self,
        name: &str,
        expected: &'static str,
        element: fn(&str, &Value) -> Result<T, CoercionError>,
    ) -> Result<Vec<T>, CoercionError> {
        let items = coerce::to_array(name, self.lookup(name)?)?;
        items
            .iter()
            .map(|item| {
                element(name, item).map_err(|_| CoercionError::WrongType {
                    name: name.to_string(),
                    expected,
                })
            })
            .collect()
    }
}

fn is_form_body(parts: &Parts) -> bool {
    let body_method = matches!(parts.method, Method::POST | Method::PUT | Method::PATCH);
    let form_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);
    body_method && form_type
}

/// Decode url-encoded fields, grouping repeated keys in arrival order.
fn parse_form(input: &[u8]) -> Vec<(String, Vec<String>)> {
    let mut fields: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in url::form_urlencoded::parse(input) {
        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into_owned()),
            None => fields.push((key.into_owned(), vec![value.into_owned()])),
        }
    }
    fields
}

fn apply_fields(parameters: &mut HashMap<String, Value>, fields: &[(String, Vec<String>)]) {
    for (key, values) in fields {
        let value = match values.as_slice() {
            [single] => Value::String(single.clone()),
            many => Value::Array(many.iter().cloned().map(Value::String).collect()),
        };
        parameters.insert(key.clone(), value);
    }
}

/// Empty bodies and non-object JSON are ignored; invalid JSON is an error.
fn parse_json_object(body: &[u8]) -> Result<Option<Map<String, Value>>, RequestError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(_) => Ok(None),
        Err(e) => Err(RequestError::MalformedBody(e.to_string())),
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;
    use serde_json::json;

    fn raw(method: Method, uri: &str, content_type: Option<&str>, body: &str) -> RawRequest {
        let mut builder = HttpRequest::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        RawRequest {
            parts,
            path_params: Vec::new(),
            body: Bytes::from(body.to_string()),
            remote_addr: None,
        }
    }

    #[test]
    fn test_json_body_wins_over_query() {
        let req = Request::build(
            raw(Method::POST, "/ping?age=5", Some("application/json"), r#"{"age": 20}"#),
            &[],
        )
        .unwrap();
        assert_eq!(req.get_int("age"), Ok(20));
    }

    #[test]
    fn test_form_body_wins_over_query() {
        let req = Request::build(
            raw(
                Method::POST,
                "/ping?age=5&name=q",
                Some("application/x-www-form-urlencoded"),
                "age=7",
            ),
            &[],
        )
        .unwrap();
        assert_eq!(req.get_int("age"), Ok(7));
        assert_eq!(req.get_string("name"), Ok("q".to_string()));
    }

    #[test]
    fn test_repeated_query_values_become_array() {
        let req = Request::build(raw(Method::GET, "/mul?n=1&n=2&n=3&one=x", None, ""), &[]).unwrap();
        assert_eq!(req.get_int_array("n"), Ok(vec![1, 2, 3]));
        assert_eq!(req.get_string("one"), Ok("x".to_string()));
    }

    #[test]
    fn test_query_overrides_path_variable() {
        let mut raw = raw(Method::GET, "/users/3?id=9", None, "");
        raw.path_params.push(("id".to_string(), "3".to_string()));
        raw.path_params.push(("slug".to_string(), "abc".to_string()));
        let req = Request::build(raw, &[]).unwrap();
        assert_eq!(req.get_int("id"), Ok(9));
        assert_eq!(req.get_string("slug"), Ok("abc".to_string()));
    }

    #[test]
    fn test_non_object_and_empty_bodies_are_ignored() {
        let req = Request::build(raw(Method::POST, "/?a=1", None, "[1, 2]"), &[]).unwrap();
        assert_eq!(req.parameters().len(), 1);

        let req = Request::build(raw(Method::POST, "/?a=1", None, "  \n"), &[]).unwrap();
        assert_eq!(req.get_int("a"), Ok(1));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let result = Request::build(raw(Method::POST, "/", None, "{\"age\": "), &[]);
        assert!(matches!(result, Err(RequestError::MalformedBody(_))));
    }

    #[test]
    fn test_header_and_cookie_parameters() {
        let mut raw = raw(Method::GET, "/", None, "");
        raw.parts.headers.insert("x-token", "abc".parse().unwrap());
        raw.parts.headers.insert(header::COOKIE, "theme=dark; lang=en".parse().unwrap());
        let declared = [
            Parameter::new("x-token", ParamLocation::Header, Vec::new()),
            Parameter::new("lang", ParamLocation::Cookie, Vec::new()),
        ];
        let req = Request::build(raw, &declared).unwrap();
        assert_eq!(req.get_string("x-token"), Ok("abc".to_string()));
        assert_eq!(req.get_string("lang"), Ok("en".to_string()));
        assert!(!req.contains("theme"));
    }

    #[test]
    fn test_accessors() {
        let req = Request::from_parameters([
            ("num1", json!(42)),
            ("num2", json!("84")),
            ("str", json!("not a number")),
            ("flags", json!({"a": true, "b": false})),
            ("mixed", json!(["1", 2, "x"])),
        ]);
        assert_eq!(req.get_int("num1"), Ok(42));
        assert_eq!(req.get_int("num2"), Ok(84));
        assert!(req.get_int("str").is_err());
        assert_eq!(
            req.get_int("missing"),
            Err(CoercionError::NotFound { name: "missing".into() })
        );

        let flags = req.get_string_bool_map("flags").unwrap();
        assert_eq!(flags.get("a"), Some(&true));
        assert_eq!(flags.get("b"), Some(&false));

        assert!(req.get_int_array("mixed").is_err());
        assert_eq!(req.get_array("mixed").unwrap().len(), 3);
        assert!(req.get_map("num1").is_err());
    }
}

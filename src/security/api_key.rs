use super::SecurityProvider;
use crate::openapi::schema::SecurityScheme;
use crate::request::Request;

/// Shared-secret key sent in a request header.
///
/// The header is checked first; a parameter of the same name (query, form or
/// JSON body) is accepted as a fallback.
#[derive(Clone)]
pub struct ApiKeySecurity {
    header_name: String,
    api_key: String,
}

impl ApiKeySecurity {
    pub fn new(header_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for ApiKeySecurity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeySecurity")
            .field("header_name", &self.header_name)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SecurityProvider for ApiKeySecurity {
    fn name(&self) -> &str {
        "api-key"
    }

    fn scheme(&self) -> Option<SecurityScheme> {
        Some(SecurityScheme {
            kind: "apiKey".to_string(),
            name: self.header_name.clone(),
            location: "header".to_string(),
        })
    }

    fn is_authenticated(&self, req: &Request) -> bool {
        let presented = req
            .header(&self.header_name)
            .map(str::to_string)
            .or_else(|| req.get_string(&self.header_name).ok());
        presented.is_some_and(|key| key == self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_from_parameter_fallback() {
        let sec = ApiKeySecurity::new("x-api-key", "secret");
        assert!(sec.is_authenticated(&Request::from_parameters([("x-api-key", json!("secret"))])));
        assert!(!sec.is_authenticated(&Request::from_parameters([("x-api-key", json!("wrong"))])));
        assert!(!sec.is_authenticated(&Request::from_parameters(
            Vec::<(String, serde_json::Value)>::new()
        )));
    }

    #[test]
    fn test_scheme() {
        let sec = ApiKeySecurity::new("x-api-key", "secret");
        assert_eq!(sec.name(), "api-key");
        assert!(sec.scopes().is_empty());
        let scheme = sec.scheme().unwrap();
        assert_eq!(scheme.kind, "apiKey");
        assert_eq!(scheme.name, "x-api-key");
        assert!(!format!("{sec:?}").contains("secret"));
    }
}

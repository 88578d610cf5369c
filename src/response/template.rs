use std::fs;
use std::path::PathBuf;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use minijinja::Environment;
use serde::Serialize;
use serde_json::Value;

use super::{Response, ResponseError};

/// HTML rendered from a template file on disk.
///
/// The file is read and rendered each time the body is produced, so edits to
/// the template show up without a restart.
#[derive(Debug, Clone)]
pub struct TemplateResponse {
    path: PathBuf,
    context: Result<Value, String>,
    status: StatusCode,
}

impl TemplateResponse {
    pub fn new<T: Serialize>(path: impl Into<PathBuf>, context: T) -> Self {
        Self {
            path: path.into(),
            context: serde_json::to_value(context).map_err(|e| e.to_string()),
            status: StatusCode::OK,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl Response for TemplateResponse {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        headers
    }

    fn body(&self) -> Result<Bytes, ResponseError> {
        let context = self
            .context
            .as_ref()
            .map_err(|e| ResponseError::Serialize(e.clone()))?;
        let source = fs::read_to_string(&self.path).map_err(|source| ResponseError::TemplateRead {
            path: self.path.clone(),
            source,
        })?;

        let render_err = |source| ResponseError::TemplateRender {
            path: self.path.clone(),
            source,
        };
        let mut env = Environment::new();
        env.add_template("page", &source).map_err(render_err)?;
        let rendered = env
            .get_template("page")
            .and_then(|tmpl| tmpl.render(context))
            .map_err(render_err)?;
        Ok(Bytes::from(rendered))
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_render_template_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<h1>Hello {{{{ name }}}}!</h1>").unwrap();

        let response = TemplateResponse::new(file.path(), json!({"name": "World"}));
        assert_eq!(response.body().unwrap(), Bytes::from_static(b"<h1>Hello World!</h1>"));
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let response = TemplateResponse::new("/definitely/not/here.html", json!({}));
        assert!(matches!(response.body(), Err(ResponseError::TemplateRead { .. })));
    }

    #[test]
    fn test_unserializable_context_is_an_error() {
        use std::collections::HashMap;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<p>{{{{ missing }}}}</p>").unwrap();

        // Maps with non-string keys cannot become JSON objects.
        let context: HashMap<(u8, u8), &str> = HashMap::from([((1, 2), "x")]);
        let response = TemplateResponse::new(file.path(), context);
        assert!(matches!(response.body(), Err(ResponseError::Serialize(_))));
    }
}

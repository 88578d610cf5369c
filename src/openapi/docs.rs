//! Swagger UI shell served at the docs path.

const SWAGGER_JS_URL: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist@3/swagger-ui-bundle.js";
const SWAGGER_CSS_URL: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist@3/swagger-ui.css";
const SWAGGER_FAVICON_URL: &str = "https://fastapi.tiangolo.com/img/favicon.png";

/// Render the docs page for `title`, loading the document from `schema_url`.
pub fn swagger_html(title: &str, schema_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<link type="text/css" rel="stylesheet" href="{SWAGGER_CSS_URL}">
<link rel="shortcut icon" href="{SWAGGER_FAVICON_URL}">
<title>{title}</title>
</head>
<body>
<div id="swagger-ui">
</div>
<script src="{SWAGGER_JS_URL}"></script>
<script>
const ui = SwaggerUIBundle({{
    url: '{schema_url}',
    dom_id: '#swagger-ui',
    presets: [
        SwaggerUIBundle.presets.apis,
        SwaggerUIBundle.SwaggerUIStandalonePreset
    ],
    layout: "BaseLayout",
    deepLinking: true,
    showExtensions: true,
    showCommonExtensions: true
}})
</script>
</body>
</html>
"#,
        title = escape_html(title),
        schema_url = escape_js_string(schema_url),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape for a single-quoted JavaScript string inside a `<script>` block.
fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3c"),
            '>' => out.push_str("\\x3e"),
            '&' => out.push_str("\\x26"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_points_at_schema() {
        let html = swagger_html("Math <API>", "/openapi.json");
        assert!(html.contains("url: '/openapi.json'"));
        assert!(html.contains("<title>Math &lt;API&gt;</title>"));
        assert!(html.contains("swagger-ui-dist@3/swagger-ui-bundle.js"));
    }

    #[test]
    fn test_title_and_schema_url_are_escaped() {
        let html = swagger_html("</title><script>x()</script>", "/it's</script>.json");
        assert!(!html.contains("<script>x()"));
        assert!(html.contains("<title>&lt;/title&gt;&lt;script&gt;x()&lt;/script&gt;</title>"));
        assert!(html.contains(r"url: '/it\'s\x3c/script\x3e.json'"));
        assert_eq!(html.matches("</script>").count(), 2);
    }
}

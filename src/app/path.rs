//! Route path syntax checks.
//!
//! Paths are checked when declared, so a path the router cannot insert is
//! a [`RegistryError`] instead of a panic while the server is built.

use super::RegistryError;

fn invalid(path: &str, reason: &'static str) -> RegistryError {
    RegistryError::InvalidPath {
        path: path.to_string(),
        reason,
    }
}

/// Name of a `{name}` or `{*name}` segment, if it is one.
fn capture_name(segment: &str) -> Option<&str> {
    let inner = segment.strip_prefix('{')?.strip_suffix('}')?;
    Some(inner.strip_prefix('*').unwrap_or(inner))
}

fn is_capture(segment: &str) -> bool {
    capture_name(segment).is_some()
}

/// Check that `path` is a route the router accepts.
pub(crate) fn check_path(path: &str) -> Result<(), RegistryError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(invalid(path, "must start with '/'"));
    };

    let segments: Vec<&str> = rest.split('/').collect();
    let mut names: Vec<&str> = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err(invalid(path, "captures are written {name} or {*name}"));
        }
        match capture_name(segment) {
            Some(name) => {
                let valid = !name.is_empty()
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                if !valid {
                    return Err(invalid(path, "capture names must be alphanumeric"));
                }
                if segment.starts_with("{*") && i + 1 != segments.len() {
                    return Err(invalid(path, "a wildcard capture must be the last segment"));
                }
                if names.contains(&name) {
                    return Err(invalid(path, "capture names must be unique"));
                }
                names.push(name);
            }
            None if segment.contains('{') || segment.contains('}') => {
                return Err(invalid(path, "a capture must span a whole segment"));
            }
            None => {}
        }
    }
    Ok(())
}

/// Check a mount point for an included service.
pub(crate) fn check_mount(path: &str) -> Result<(), RegistryError> {
    check_path(path)?;
    if path.split('/').any(is_capture) {
        return Err(invalid(path, "mount paths cannot contain captures"));
    }
    Ok(())
}

/// Whether two distinct paths would collide in the router: at the first
/// segment where they differ, both are captures.
pub(crate) fn conflicts(a: &str, b: &str) -> bool {
    a.split('/')
        .zip(b.split('/'))
        .find(|(x, y)| x != y)
        .is_some_and(|(x, y)| is_capture(x) && is_capture(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        for path in ["/", "/ping", "/users/{id}", "/files/{*rest}", "/a/{x}/b/{y}"] {
            assert!(check_path(path).is_ok(), "{path}");
        }
    }

    #[test]
    fn test_legacy_capture_syntax_is_rejected() {
        assert_eq!(
            check_path("/v/:id"),
            Err(RegistryError::InvalidPath {
                path: "/v/:id".into(),
                reason: "captures are written {name} or {*name}",
            })
        );
        assert!(check_path("/files/*rest").is_err());
    }

    #[test]
    fn test_malformed_captures_are_rejected() {
        for path in ["/u/{}", "/u/{id", "/u/x{id}", "/u/{a-b}", "/f/{*rest}/x", "/a/{id}/b/{id}"] {
            assert!(check_path(path).is_err(), "{path}");
        }
        assert!(check_path("ping").is_err());
    }

    #[test]
    fn test_conflicting_captures() {
        assert!(conflicts("/u/{id}", "/u/{name}"));
        assert!(conflicts("/u/{id}/posts", "/u/{name}/likes"));
        assert!(conflicts("/f/{id}", "/f/{*rest}"));
        assert!(!conflicts("/u/{id}", "/u/me"));
        assert!(!conflicts("/u/{id}", "/v/{id}"));
        assert!(!conflicts("/u/{id}", "/u/{id}/posts"));
    }

    #[test]
    fn test_mount_paths_are_static() {
        assert!(check_mount("/static").is_ok());
        assert!(check_mount("/static/{dir}").is_err());
    }
}

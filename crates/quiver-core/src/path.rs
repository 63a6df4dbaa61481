//! URL path joining.
//!
//! [`join_path`] combines a base URL reference with further path elements
//! the way URL routers expect: duplicate separators collapse, `.` and `..`
//! segments resolve lexically, a rooted base stays rooted, and a trailing
//! separator on the last element survives.
//!
//! ```
//! use quiver_core::path::join_path;
//!
//! assert_eq!(join_path("/api", &["/foo"]).unwrap(), "/api/foo");
//! assert_eq!(join_path("/api/", &["//docs/", "swagger-ui/"]).unwrap(), "/api/docs/swagger-ui/");
//! ```

use thiserror::Error;

/// Errors returned when the base of a join is not a valid URL reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathJoinError {
    /// The base contains an ASCII control character.
    #[error("invalid control character in URL {path:?}")]
    ControlCharacter {
        /// The rejected base.
        path: String,
    },

    /// The base contains a `%` not followed by two hex digits.
    #[error("invalid URL escape {escape:?}")]
    InvalidEscape {
        /// The malformed escape sequence.
        escape: String,
    },

    /// The base starts with `:`, so it has an empty scheme.
    #[error("missing protocol scheme in URL {path:?}")]
    MissingScheme {
        /// The rejected base.
        path: String,
    },
}

/// Joins `elems` onto the path of `base`.
///
/// `base` may be a bare path (`/api`) or an absolute URL
/// (`https://host/api?x=1`); scheme, authority, query and fragment are kept
/// as they are and only the path is joined.
///
/// # Errors
///
/// Returns [`PathJoinError`] when `base` is not a valid URL reference.
pub fn join_path(base: &str, elems: &[&str]) -> Result<String, PathJoinError> {
    validate_reference(base)?;

    let (prefix, rest) = split_origin(base);
    let split = rest.find(['?', '#']).unwrap_or(rest.len());
    let (base_path, suffix) = rest.split_at(split);

    let last = elems.last().copied().unwrap_or(base_path);

    let mut joined = if base_path.starts_with('/') {
        join(std::iter::once(base_path).chain(elems.iter().copied()))
    } else {
        // Keep a relative base relative, without letting `..` escape it.
        let rooted = format!("/{base_path}");
        let full = join(std::iter::once(rooted.as_str()).chain(elems.iter().copied()));
        full[1..].to_string()
    };

    if last.ends_with('/') && !joined.ends_with('/') {
        joined.push('/');
    }

    if !prefix.is_empty() && !joined.is_empty() && !joined.starts_with('/') {
        joined.insert(0, '/');
    }

    Ok(format!("{prefix}{joined}{suffix}"))
}

/// Lexically normalises a slash-separated path.
///
/// Repeated separators collapse, `.` segments drop, and `..` removes the
/// preceding segment. A rooted path never climbs above `/`; a relative one
/// keeps leading `..` segments. The empty path cleans to `.`.
///
/// ```
/// use quiver_core::path::clean;
///
/// assert_eq!(clean("/a//b/./c/.."), "/a/b");
/// assert_eq!(clean("/../x"), "/x");
/// assert_eq!(clean("../x/../.."), "../..");
/// assert_eq!(clean(""), ".");
/// ```
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            s => segments.push(s),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

// Joins the non-empty elements with `/` and cleans the result. Returns the
// empty string when every element is empty.
fn join<'a>(elems: impl Iterator<Item = &'a str>) -> String {
    let parts: Vec<&str> = elems.filter(|e| !e.is_empty()).collect();
    if parts.is_empty() {
        return String::new();
    }
    clean(&parts.join("/"))
}

// Splits `scheme://authority` off an absolute URL.
fn split_origin(base: &str) -> (&str, &str) {
    match base.find("://") {
        Some(scheme_end) => {
            let after = scheme_end + 3;
            let path_start = base[after..]
                .find(['/', '?', '#'])
                .map_or(base.len(), |i| after + i);
            base.split_at(path_start)
        }
        None => ("", base),
    }
}

fn validate_reference(base: &str) -> Result<(), PathJoinError> {
    if base.bytes().any(|b| b < 0x20 || b == 0x7f) {
        return Err(PathJoinError::ControlCharacter {
            path: base.to_string(),
        });
    }

    if base.starts_with(':') {
        return Err(PathJoinError::MissingScheme {
            path: base.to_string(),
        });
    }

    let bytes = base.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                return Err(PathJoinError::InvalidEscape {
                    escape: String::from_utf8_lossy(&bytes[i..end]).into_owned(),
                });
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_join_prefixes_base() {
        assert_eq!(join_path("/api", &["/foo"]).unwrap(), "/api/foo");
        assert_eq!(join_path("/api/", &["foo"]).unwrap(), "/api/foo");
    }

    #[test]
    fn test_join_collapses_duplicate_separators() {
        assert_eq!(join_path("/api//", &["//foo//bar"]).unwrap(), "/api/foo/bar");
    }

    #[test]
    fn test_join_preserves_trailing_separator() {
        assert_eq!(join_path("/api", &["/swagger-ui/"]).unwrap(), "/api/swagger-ui/");
        assert_eq!(join_path("/api", &["/"]).unwrap(), "/api/");
    }

    #[test]
    fn test_join_root_base() {
        assert_eq!(join_path("/", &["/openapi.json"]).unwrap(), "/openapi.json");
    }

    #[test]
    fn test_join_resolves_dot_segments() {
        assert_eq!(join_path("/api", &["/a/./b/../c"]).unwrap(), "/api/a/c");
        assert_eq!(join_path("/api", &["/../../etc"]).unwrap(), "/etc");
    }

    #[test]
    fn test_join_relative_base_stays_relative() {
        assert_eq!(join_path("api", &["/foo"]).unwrap(), "api/foo");
        assert_eq!(join_path("api", &["../../foo"]).unwrap(), "foo");
        assert_eq!(join_path("", &["/foo"]).unwrap(), "foo");
    }

    #[test]
    fn test_join_with_no_elements_cleans_base() {
        assert_eq!(join_path("/api//v1/", &[]).unwrap(), "/api/v1/");
    }

    #[test]
    fn test_join_keeps_origin_query_and_fragment() {
        assert_eq!(
            join_path("https://example.com/api?x=1#top", &["docs"]).unwrap(),
            "https://example.com/api/docs?x=1#top"
        );
        assert_eq!(
            join_path("https://example.com", &["docs"]).unwrap(),
            "https://example.com/docs"
        );
    }

    #[test]
    fn test_join_rejects_control_characters() {
        let err = join_path("/api\n", &["/foo"]).unwrap_err();
        assert!(matches!(err, PathJoinError::ControlCharacter { .. }));
    }

    #[test]
    fn test_join_rejects_bad_escapes() {
        let err = join_path("/api%zz", &["/foo"]).unwrap_err();
        assert_eq!(
            err,
            PathJoinError::InvalidEscape {
                escape: "%zz".to_string()
            }
        );
        assert!(join_path("/api%", &[]).is_err());
        assert!(join_path("/api%2F", &[]).is_ok());
    }

    #[test]
    fn test_join_rejects_missing_scheme() {
        let err = join_path(":api", &["/foo"]).unwrap_err();
        assert!(err.to_string().contains("missing protocol scheme"));
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("/"), "/");
        assert_eq!(clean("//"), "/");
        assert_eq!(clean("a/b/../../.."), "..");
        assert_eq!(clean("./"), ".");
        assert_eq!(clean("/a/b/"), "/a/b");
    }

    proptest! {
        #[test]
        fn prop_clean_is_idempotent(path in "[a-z./]{0,24}") {
            let once = clean(&path);
            prop_assert_eq!(clean(&once), once);
        }

        #[test]
        fn prop_rooted_join_has_single_leading_separator(
            base in "/[a-z/]{0,12}",
            path in "[a-z/.]{0,16}",
        ) {
            let joined = join_path(&base, &[&path]).unwrap();
            prop_assert!(joined.starts_with('/'));
            prop_assert!(!joined.contains("//"));
        }
    }
}

//! Static asset bundles.
//!
//! An [`AssetBundle`] maps relative paths (`index.html`, `css/app.css`) to
//! bytes and a content type. Bundles are built once at startup and only read
//! afterwards.

use crate::error::{DocsError, DocsResult};
use bytes::Bytes;
use std::collections::HashMap;
use std::path::Path;

const SWAGGER_INDEX: &str = include_str!("../assets/swagger-ui/index.html");
const SWAGGER_INITIALIZER: &str = include_str!("../assets/swagger-ui/swagger-initializer.js");

/// A single bundled file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// File contents.
    pub bytes: Bytes,
    /// `Content-Type` to serve the file with.
    pub content_type: &'static str,
}

/// A read-only collection of static files keyed by relative path.
///
/// # Example
///
/// ```
/// use quiver_docs::AssetBundle;
///
/// let bundle = AssetBundle::from_static(&[
///     ("index.html", b"<html></html>".as_slice()),
///     ("/css/app.css", b"body {}".as_slice()),
/// ]);
///
/// assert_eq!(bundle.get("css/app.css").unwrap().content_type, "text/css; charset=utf-8");
/// assert!(bundle.get("missing.js").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    files: HashMap<String, Asset>,
}

impl AssetBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in Swagger UI bundle.
    ///
    /// Contains an `index.html` that loads Swagger UI from a CDN and a
    /// `swagger-initializer.js` template pointing it at the spec.
    #[must_use]
    pub fn swagger_ui() -> Self {
        Self::new()
            .with_asset("index.html", SWAGGER_INDEX)
            .with_asset("swagger-initializer.js", SWAGGER_INITIALIZER)
    }

    /// Builds a bundle from in-memory files.
    #[must_use]
    pub fn from_static(files: &[(&str, &'static [u8])]) -> Self {
        files.iter().fold(Self::new(), |bundle, &(path, bytes)| {
            bundle.with_asset(path, Bytes::from_static(bytes))
        })
    }

    /// Loads every file under `root`, recursively.
    ///
    /// Files are read eagerly; later changes on disk are not picked up.
    pub fn from_dir(root: impl AsRef<Path>) -> DocsResult<Self> {
        let root = root.as_ref();
        let mut bundle = Self::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let entries = std::fs::read_dir(&dir).map_err(read_error(&dir))?;
            for entry in entries {
                let entry = entry.map_err(read_error(&dir))?;
                let path = entry.path();
                let file_type = entry.file_type().map_err(read_error(&path))?;

                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }

                let bytes = std::fs::read(&path).map_err(read_error(&path))?;
                let relative = path.strip_prefix(root).unwrap_or(&path);
                let key = relative.to_string_lossy().replace('\\', "/");
                bundle.insert(&key, bytes);
            }
        }

        tracing::debug!(root = %root.display(), files = bundle.len(), "Loaded asset bundle");
        Ok(bundle)
    }

    /// Adds a file, replacing any file at the same path.
    ///
    /// The content type is derived from the file extension.
    pub fn insert(&mut self, path: &str, bytes: impl Into<Bytes>) {
        let key = normalize(path);
        let content_type = detect_mime_type(&key);
        self.files.insert(
            key,
            Asset {
                bytes: bytes.into(),
                content_type,
            },
        );
    }

    /// Adds a file and returns the bundle.
    #[must_use]
    pub fn with_asset(mut self, path: &str, bytes: impl Into<Bytes>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Looks up a file by relative path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Asset> {
        self.files.get(path.trim_start_matches('/'))
    }

    /// Returns true if the bundle contains `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Number of files in the bundle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the bundle has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

fn read_error(path: &Path) -> impl FnOnce(std::io::Error) -> DocsError + '_ {
    move |source| DocsError::AssetRead {
        path: path.to_path_buf(),
        source,
    }
}

/// Content type for a file path, by extension.
pub(crate) fn detect_mime_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "yaml" | "yml" => "application/yaml",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",

        _ => "application/octet-stream",
    }
}

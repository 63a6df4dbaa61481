//! Swagger UI hosting.
//!
//! [`SwaggerUiHost`] is a middleware that serves three things under a base
//! path and lets every other request through untouched:
//!
//! | Path | Response |
//! |------|----------|
//! | `{base}/openapi.json` | The serialized spec, `application/json` |
//! | `{base}/swagger-ui/swagger-initializer.js` | Initializer rendered for this host |
//! | `{base}/swagger-ui/…` | Files from the [`AssetBundle`] |
//!
//! A request whose path only matches one of these after lexical cleaning
//! (`//`, `.` or `..` segments) is answered with a `301` to the cleaned path.
//!
//! ## Usage
//!
//! ```
//! use quiver_docs::{DocExpansion, SwaggerUiHost};
//! use serde_json::json;
//!
//! let spec = json!({ "openapi": "3.1.0", "info": { "title": "Events", "version": "1.0.0" } });
//! let host = SwaggerUiHost::new("/api", &spec)
//!     .unwrap()
//!     .doc_expansion(DocExpansion::Full);
//!
//! assert_eq!(host.spec_path(), "/api/openapi.json");
//! assert_eq!(host.ui_path(), "/api/swagger-ui/");
//! ```

use crate::assets::AssetBundle;
use crate::error::{DocsError, DocsResult};
use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use quiver_core::path::clean;
use quiver_core::{join_path, RequestContext};
use quiver_middleware::{BoxFuture, Middleware, Next, Request, Response, ResponseExt};
use serde::Serialize;

/// Bundle path of the initializer template.
pub const INITIALIZER_FILE: &str = "swagger-initializer.js";

/// Document expansion level for Swagger UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocExpansion {
    /// Show all operations collapsed.
    None,
    /// Show only the list of operations.
    #[default]
    List,
    /// Expand all operations fully.
    Full,
}

impl DocExpansion {
    /// The value Swagger UI expects for `docExpansion`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::List => "list",
            Self::Full => "full",
        }
    }
}

/// Middleware hosting Swagger UI and the OpenAPI document.
#[derive(Debug, Clone)]
pub struct SwaggerUiHost {
    /// Directory the UI is served from, always ending in `/`.
    ui_path: String,
    /// Path of the rendered initializer script.
    init_path: String,
    /// Path of the OpenAPI document.
    spec_path: String,
    /// The spec, serialized once at construction.
    spec_json: Bytes,
    /// Static files served under `ui_path`.
    assets: AssetBundle,
    /// Whether to use deep linking (URL updates with operations).
    deep_linking: bool,
    /// Default expansion depth for operations.
    doc_expansion: DocExpansion,
    /// Whether to display the request duration.
    display_request_duration: bool,
}

enum Route<'p> {
    Spec,
    Initializer,
    RedirectToUi,
    Asset(&'p str),
    Fallthrough,
}

impl SwaggerUiHost {
    /// Creates a host for `spec` under `base_path`, using the built-in
    /// Swagger UI bundle.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::InvalidBasePath`] if `base_path` cannot be
    /// joined with the documentation routes, and
    /// [`DocsError::Serialization`] if `spec` fails to serialize.
    pub fn new<S: Serialize + ?Sized>(base_path: &str, spec: &S) -> DocsResult<Self> {
        let ui_path = resolve(base_path, &["/swagger-ui/"])?;
        let init_path = resolve(base_path, &["/swagger-ui/", INITIALIZER_FILE])?;
        let spec_path = resolve(base_path, &["/openapi.json"])?;
        let spec_json = Bytes::from(serde_json::to_vec(spec)?);

        tracing::debug!(
            ui_path = %ui_path,
            spec_path = %spec_path,
            "Configured Swagger UI host"
        );

        Ok(Self {
            ui_path,
            init_path,
            spec_path,
            spec_json,
            assets: AssetBundle::swagger_ui(),
            deep_linking: true,
            doc_expansion: DocExpansion::List,
            display_request_duration: true,
        })
    }

    /// Replaces the served UI files.
    ///
    /// The bundle should contain `index.html` and, for the initializer route
    /// to work, a `swagger-initializer.js` template.
    #[must_use]
    pub fn assets(mut self, assets: AssetBundle) -> Self {
        self.assets = assets;
        self
    }

    /// Enable or disable deep linking.
    #[must_use]
    pub fn deep_linking(mut self, enabled: bool) -> Self {
        self.deep_linking = enabled;
        self
    }

    /// Set the document expansion level.
    #[must_use]
    pub fn doc_expansion(mut self, expansion: DocExpansion) -> Self {
        self.doc_expansion = expansion;
        self
    }

    /// Enable or disable request duration display.
    #[must_use]
    pub fn display_request_duration(mut self, enabled: bool) -> Self {
        self.display_request_duration = enabled;
        self
    }

    /// Path the UI is served under, with a trailing `/`.
    #[must_use]
    pub fn ui_path(&self) -> &str {
        &self.ui_path
    }

    /// Path of the rendered initializer script.
    #[must_use]
    pub fn init_path(&self) -> &str {
        &self.init_path
    }

    /// Path of the OpenAPI document.
    #[must_use]
    pub fn spec_path(&self) -> &str {
        &self.spec_path
    }

    /// The serialized OpenAPI document.
    #[must_use]
    pub fn spec_json(&self) -> &Bytes {
        &self.spec_json
    }

    fn route<'p>(&self, path: &'p str) -> Route<'p> {
        if path == self.spec_path {
            Route::Spec
        } else if path == self.init_path {
            Route::Initializer
        } else if path == self.ui_path.trim_end_matches('/') {
            Route::RedirectToUi
        } else if let Some(relative) = path.strip_prefix(self.ui_path.as_str()) {
            Route::Asset(relative)
        } else {
            Route::Fallthrough
        }
    }

    /// Renders the initializer template from the bundle.
    ///
    /// Returns `None` when the bundle has no usable template.
    fn render_initializer(&self) -> Option<String> {
        let template = self.assets.get(INITIALIZER_FILE)?;
        let template = std::str::from_utf8(&template.bytes).ok()?;
        let spec_url = serde_json::to_string(&self.spec_path).ok()?;

        Some(
            template
                .replace("{{spec_url}}", &spec_url)
                .replace("{{deep_linking}}", bool_str(self.deep_linking))
                .replace("{{doc_expansion}}", self.doc_expansion.as_str())
                .replace(
                    "{{display_request_duration}}",
                    bool_str(self.display_request_duration),
                ),
        )
    }

    fn serve_initializer(&self) -> Response {
        match self.render_initializer() {
            Some(script) => Response::bytes(
                StatusCode::OK,
                "text/javascript; charset=utf-8",
                Bytes::from(script),
            ),
            None => {
                tracing::error!(
                    file = INITIALIZER_FILE,
                    "Swagger UI initializer template is missing or not UTF-8"
                );
                Response::text(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }

    fn serve_asset(&self, relative: &str) -> Response {
        let file = if relative.is_empty() || relative.ends_with('/') {
            format!("{relative}index.html")
        } else {
            relative.to_string()
        };

        if let Some(asset) = self.assets.get(&file) {
            return Response::bytes(StatusCode::OK, asset.content_type, asset.bytes.clone());
        }

        // A directory requested without its trailing slash.
        if self.assets.contains(&format!("{file}/index.html")) {
            return redirect(&format!("{}{file}/", self.ui_path), None);
        }

        Response::not_found()
    }
}

impl Middleware for SwaggerUiHost {
    fn name(&self) -> &'static str {
        "swagger_ui"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let path = request.uri().path();
            let cleaned = clean_request_path(path);
            if cleaned != path && !matches!(self.route(&cleaned), Route::Fallthrough) {
                return redirect(&cleaned, request.uri().query());
            }

            match self.route(path) {
                Route::Spec => Response::json(StatusCode::OK, self.spec_json.clone()),
                Route::Initializer => self.serve_initializer(),
                Route::RedirectToUi => redirect(&self.ui_path, request.uri().query()),
                Route::Asset(relative) => self.serve_asset(relative),
                Route::Fallthrough => next.run(ctx, request).await,
            }
        })
    }
}

fn resolve(base: &str, elems: &[&str]) -> DocsResult<String> {
    let mut path = join_path(base, elems).map_err(|source| DocsError::InvalidBasePath {
        path: base.to_string(),
        source,
    })?;
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    Ok(path)
}

/// Lexically cleans a request path, keeping a trailing `/`.
fn clean_request_path(path: &str) -> String {
    let mut cleaned = clean(path);
    if path.ends_with('/') && cleaned != "/" {
        cleaned.push('/');
    }
    cleaned
}

fn redirect(location: &str, query: Option<&str>) -> Response {
    let target = match query {
        Some(query) => format!("{location}?{query}"),
        None => location.to_string(),
    };

    let mut response = Response::text(StatusCode::MOVED_PERMANENTLY, "");
    if let Ok(value) = HeaderValue::from_str(&target) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

const fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Full};
    use quiver_middleware::handler_fn;
    use serde_json::json;

    fn test_spec() -> serde_json::Value {
        json!({
            "openapi": "3.1.0",
            "info": { "title": "Test API", "version": "1.0.0" },
            "paths": {}
        })
    }

    fn fallthrough() -> impl quiver_middleware::Handler {
        handler_fn(|_ctx, req| {
            let path = req.uri().path().to_string();
            Box::pin(async move { Response::text(StatusCode::IM_A_TEAPOT, path) })
        })
    }

    async fn send(host: &SwaggerUiHost, uri: &str) -> (StatusCode, http::HeaderMap, String) {
        let handler = fallthrough();
        let mut ctx = RequestContext::new();
        let request = http::Request::builder()
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap();

        let response = host
            .process(&mut ctx, request, Next::endpoint(&handler))
            .await;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8_lossy(&body).into_owned())
    }

    #[test]
    fn test_paths() {
        let host = SwaggerUiHost::new("/api", &test_spec()).unwrap();
        assert_eq!(host.ui_path(), "/api/swagger-ui/");
        assert_eq!(host.init_path(), "/api/swagger-ui/swagger-initializer.js");
        assert_eq!(host.spec_path(), "/api/openapi.json");
    }

    #[test]
    fn test_paths_at_root() {
        let host = SwaggerUiHost::new("/", &test_spec()).unwrap();
        assert_eq!(host.ui_path(), "/swagger-ui/");
        assert_eq!(host.spec_path(), "/openapi.json");

        let host = SwaggerUiHost::new("", &test_spec()).unwrap();
        assert_eq!(host.ui_path(), "/swagger-ui/");
    }

    #[test]
    fn test_invalid_base_path() {
        let err = SwaggerUiHost::new("/api%", &test_spec()).unwrap_err();
        assert!(matches!(err, DocsError::InvalidBasePath { .. }));
    }

    #[test]
    fn test_spec_is_serialized_once() {
        let host = SwaggerUiHost::new("/api", &test_spec()).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(host.spec_json()).unwrap();
        assert_eq!(parsed, test_spec());
    }

    #[test]
    fn test_doc_expansion_as_str() {
        assert_eq!(DocExpansion::None.as_str(), "none");
        assert_eq!(DocExpansion::List.as_str(), "list");
        assert_eq!(DocExpansion::Full.as_str(), "full");
    }

    #[tokio::test]
    async fn test_initializer_is_rendered() {
        let host = SwaggerUiHost::new("/api", &test_spec())
            .unwrap()
            .deep_linking(false)
            .doc_expansion(DocExpansion::Full)
            .display_request_duration(false);

        let (status, headers, body) = send(&host, "/api/swagger-ui/swagger-initializer.js").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/javascript; charset=utf-8"
        );
        assert!(body.contains("url: \"/api/openapi.json\""));
        assert!(body.contains("deepLinking: false"));
        assert!(body.contains("docExpansion: \"full\""));
        assert!(body.contains("displayRequestDuration: false"));
        assert!(!body.contains("{{"));
    }

    #[tokio::test]
    async fn test_missing_initializer_template() {
        let host = SwaggerUiHost::new("/api", &test_spec())
            .unwrap()
            .assets(AssetBundle::new().with_asset("index.html", "<html></html>"));

        let (status, _, body) = send(&host, "/api/swagger-ui/swagger-initializer.js").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "internal server error");
    }

    #[tokio::test]
    async fn test_index_served_for_directory() {
        let host = SwaggerUiHost::new("/api", &test_spec()).unwrap();

        let (status, headers, body) = send(&host, "/api/swagger-ui/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert!(body.contains("swagger-ui"));
    }

    #[tokio::test]
    async fn test_ui_path_without_slash_redirects() {
        let host = SwaggerUiHost::new("/api", &test_spec()).unwrap();

        let (status, headers, _) = send(&host, "/api/swagger-ui?tab=1").await;

        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            headers.get(header::LOCATION).unwrap(),
            "/api/swagger-ui/?tab=1"
        );
    }

    #[tokio::test]
    async fn test_nested_directory_redirects() {
        let host = SwaggerUiHost::new("/api", &test_spec()).unwrap().assets(
            AssetBundle::new().with_asset("v2/index.html", "<html>v2</html>"),
        );

        let (status, headers, _) = send(&host, "/api/swagger-ui/v2").await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(headers.get(header::LOCATION).unwrap(), "/api/swagger-ui/v2/");

        let (status, _, body) = send(&host, "/api/swagger-ui/v2/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<html>v2</html>");
    }

    #[tokio::test]
    async fn test_missing_asset_is_not_found() {
        let host = SwaggerUiHost::new("/api", &test_spec()).unwrap();

        let (status, _, body) = send(&host, "/api/swagger-ui/nope.css").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "404 page not found\n");
    }

    #[tokio::test]
    async fn test_unclean_paths_redirect_to_route() {
        let host = SwaggerUiHost::new("/api", &test_spec()).unwrap();

        for uri in [
            "/api//openapi.json",
            "/api/./openapi.json",
            "/api/swagger-ui/../openapi.json",
        ] {
            let (status, headers, _) = send(&host, uri).await;
            assert_eq!(status, StatusCode::MOVED_PERMANENTLY, "{uri}");
            assert_eq!(headers.get(header::LOCATION).unwrap(), "/api/openapi.json");
        }

        let (status, headers, _) = send(&host, "/api/swagger-ui//index.html?x=1").await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            headers.get(header::LOCATION).unwrap(),
            "/api/swagger-ui/index.html?x=1"
        );

        let (status, headers, _) = send(&host, "/api/swagger-ui/./").await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(headers.get(header::LOCATION).unwrap(), "/api/swagger-ui/");
    }

    #[tokio::test]
    async fn test_unclean_paths_outside_routes_fall_through() {
        let host = SwaggerUiHost::new("/api", &test_spec()).unwrap();

        let (status, _, body) = send(&host, "/api/swagger-ui/../../events").await;

        assert_eq!(status, StatusCode::IM_A_TEAPOT);
        assert_eq!(body, "/api/swagger-ui/../../events");
    }

    #[test]
    fn test_clean_request_path() {
        assert_eq!(clean_request_path("/api//openapi.json"), "/api/openapi.json");
        assert_eq!(clean_request_path("/api/swagger-ui/./"), "/api/swagger-ui/");
        assert_eq!(clean_request_path("/"), "/");
        assert_eq!(clean_request_path("/a/../"), "/");
    }

    #[tokio::test]
    async fn test_other_paths_fall_through() {
        let host = SwaggerUiHost::new("/api", &test_spec()).unwrap();

        let (status, _, body) = send(&host, "/api/events").await;

        assert_eq!(status, StatusCode::IM_A_TEAPOT);
        assert_eq!(body, "/api/events");
    }
}

//! Local content serving via the `rte://` custom protocol.
//!
//! The editor page is compiled into the binary. An optional asset directory
//! can shadow any bundled file, which is how a customised page is deployed
//! without rebuilding.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Custom protocol scheme name.
pub const SCHEME: &str = "rte";

const BUNDLED: &[(&str, &str, &str)] = &[
    (
        "editor/index.html",
        "text/html",
        include_str!("../assets/editor/index.html"),
    ),
    (
        "editor/editor.js",
        "application/javascript",
        include_str!("../assets/editor/editor.js"),
    ),
    (
        "editor/editor.css",
        "text/css",
        include_str!("../assets/editor/editor.css"),
    ),
];

/// Resolves `rte://` request paths to bytes and a MIME type.
///
/// Lookup order: in-memory overrides, then the asset directory (if any),
/// then the bundled editor page.
#[derive(Debug, Default)]
pub struct ContentProvider {
    asset_dir: Option<PathBuf>,
    overrides: HashMap<String, (String, Vec<u8>)>,
}

impl ContentProvider {
    /// Serve only the bundled editor page.
    pub fn bundled() -> Self {
        Self::default()
    }

    /// Serve files from `dir` in front of the bundled page.
    pub fn with_asset_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_dir: Some(dir.into()),
            overrides: HashMap::new(),
        }
    }

    pub fn add_override(
        &mut self,
        path: impl Into<String>,
        mime: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) {
        self.overrides
            .insert(path.into(), (mime.into(), data.into()));
    }

    /// Strip the scheme and host from a request URI, leaving the asset path.
    ///
    /// WebView2 rewrites `rte://localhost/x` to `http://rte.localhost/x`, so
    /// both spellings are accepted.
    pub fn request_path(uri: &str) -> &str {
        let rest = uri
            .strip_prefix("rte://localhost")
            .or_else(|| uri.strip_prefix("http://rte.localhost"))
            .or_else(|| uri.strip_prefix("rte://"))
            .unwrap_or("");
        let rest = rest.split(['?', '#']).next().unwrap_or("");
        rest.trim_start_matches('/')
    }

    pub fn resolve(&self, path: &str) -> Option<(Cow<'_, str>, Cow<'_, [u8]>)> {
        let clean = path.trim_start_matches('/');

        if let Some((mime, data)) = self.overrides.get(clean) {
            return Some((Cow::Borrowed(mime.as_str()), Cow::Borrowed(data.as_slice())));
        }

        if let Some(dir) = &self.asset_dir {
            if let Some(found) = resolve_in_dir(dir, clean) {
                debug!(path = %clean, "serving editor asset from asset dir");
                return Some(found);
            }
        }

        BUNDLED
            .iter()
            .find(|(p, _, _)| *p == clean)
            .map(|(_, mime, data)| (Cow::Borrowed(*mime), Cow::Borrowed(data.as_bytes())))
    }
}

fn resolve_in_dir(
    base: &Path,
    clean: &str,
) -> Option<(Cow<'static, str>, Cow<'static, [u8]>)> {
    let file_path = base.join(clean);

    // Canonicalize both sides so `..` and symlinks cannot escape the base.
    let canonical_base = std::fs::canonicalize(base).ok()?;
    let canonical_file = std::fs::canonicalize(&file_path).ok()?;
    if !canonical_file.starts_with(&canonical_base) || !canonical_file.is_file() {
        return None;
    }

    let data = std::fs::read(&canonical_file).ok()?;
    let mime = mime_from_extension(&file_path);
    Some((Cow::Borrowed(mime), Cow::Owned(data)))
}

fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

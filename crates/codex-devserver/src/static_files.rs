//! Static file serving rooted at a single directory.
//!
//! Request paths are checked before touching the filesystem: anything
//! containing `..` or starting with `/` is refused, whether or not such a
//! file exists.

use axum::{
    body::Body,
    http::{Response, StatusCode, header},
};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DevServerError, DevServerResult};

pub const INDEX_FILE: &str = "index.html";

/// Directory static files are served from.
#[derive(Debug, Clone)]
pub struct StaticRoot {
    root: PathBuf,
}

impl StaticRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Serve `requested` after the traversal check.
    pub async fn serve(&self, requested: &str) -> DevServerResult<Response<Body>> {
        check_request_path(requested)?;
        self.serve_unchecked(requested).await
    }

    /// Serve the site index.
    pub async fn serve_index(&self) -> DevServerResult<Response<Body>> {
        self.serve_unchecked(INDEX_FILE).await
    }

    async fn serve_unchecked(&self, relative: &str) -> DevServerResult<Response<Body>> {
        let full = self.root.join(relative);

        let is_file = match tokio::fs::metadata(&full).await {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        if !is_file {
            return Err(DevServerError::NotFound(relative.to_string()));
        }

        let data = tokio::fs::read(&full).await?;
        let mime = mime_guess::from_path(&full).first_or_octet_stream();
        debug!(path = relative, bytes = data.len(), mime = %mime, "serving static file");

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime.as_ref())
            .body(Body::from(data))
            .map_err(|e| DevServerError::Io(std::io::Error::other(e)))
    }
}

/// Refuse parent-directory segments and absolute paths.
pub fn check_request_path(requested: &str) -> DevServerResult<()> {
    if requested.contains("..") || requested.starts_with('/') || Path::new(requested).is_absolute() {
        return Err(DevServerError::AccessDenied(requested.to_string()));
    }
    Ok(())
}

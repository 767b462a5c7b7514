//! Static asset lookup for the `app://bundle/...` scheme
//!
//! URLs map onto files under a bundle root. Paths are percent-decoded, `/`
//! serves `index.html`, and nothing outside the root is reachable. A query of
//! the form `payload=<sha256 hex>` is answered from a fixed file instead.

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const SCHEME_PREFIX: &str = "app://bundle";
const INDEX_FILE: &str = "index.html";
const PAYLOAD_HASH_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("not an app://bundle URL: {0}")]
    InvalidUrl(String),
    #[error("path escapes the bundle root: {0}")]
    Traversal(String),
    #[error("asset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A resolved asset ready to serve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub path: PathBuf,
    pub mime: String,
}

impl Asset {
    pub fn read(&self) -> Result<Vec<u8>, AssetError> {
        std::fs::read(&self.path).map_err(|source| AssetError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
    payload_path: Option<PathBuf>,
}

impl AssetResolver {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            payload_path: None,
        }
    }

    /// File served for `?payload=<hash>` requests
    pub fn with_payload_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.payload_path = Some(path.into());
        self
    }

    pub fn resolve(&self, url: &str) -> Result<Asset, AssetError> {
        let result = self.resolve_inner(url);
        if let Err(e) = &result {
            tracing::warn!(url, error = %e, "asset request failed");
        }
        result
    }

    fn resolve_inner(&self, url: &str) -> Result<Asset, AssetError> {
        let rest = url
            .strip_prefix(SCHEME_PREFIX)
            .filter(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
            .ok_or_else(|| AssetError::InvalidUrl(url.to_string()))?;
        let rest = rest.split('#').next().unwrap_or_default();
        let (raw_path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        if let Some(query) = query {
            if is_payload_query(query) {
                let path = self
                    .payload_path
                    .clone()
                    .ok_or_else(|| AssetError::NotFound(PathBuf::from(raw_path)))?;
                return existing_asset(path);
            }
        }

        let decoded = percent_decode_str(raw_path).decode_utf8_lossy().to_string();
        let relative = sanitize(&decoded)?;

        let mut path = self.root.join(&relative);
        if relative.as_os_str().is_empty() || path.is_dir() {
            path = path.join(INDEX_FILE);
        }
        existing_asset(path)
    }
}

fn existing_asset(path: PathBuf) -> Result<Asset, AssetError> {
    if !path.is_file() {
        return Err(AssetError::NotFound(path));
    }
    let mime = mime_guess::from_path(&path).first_or_octet_stream().to_string();
    Ok(Asset { path, mime })
}

fn is_payload_query(query: &str) -> bool {
    query.split('&').any(|pair| match pair.split_once('=') {
        Some(("payload", value)) => {
            value.len() == PAYLOAD_HASH_LEN && value.chars().all(|c| c.is_ascii_hexdigit())
        }
        _ => false,
    })
}

/// Normalize a URL path into a root-relative path, refusing to climb out
fn sanitize(decoded: &str) -> Result<PathBuf, AssetError> {
    let mut clean = PathBuf::new();
    for component in Path::new(decoded).components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Normal(part) => clean.push(part),
            Component::ParentDir => {
                if !clean.pop() {
                    return Err(AssetError::Traversal(decoded.to_string()));
                }
            }
            Component::Prefix(_) => return Err(AssetError::Traversal(decoded.to_string())),
        }
    }
    Ok(clean)
}

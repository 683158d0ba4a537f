use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::errors::{ProwlError, Result};

/// Reads asset bytes relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    /// `path` may be a directory, or a file whose parent becomes the root.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    #[must_use]
    pub fn resolve(&self, uri: &str) -> PathBuf {
        self.root_path.join(uri)
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        if is_data_uri(uri) {
            return decode_data_uri(uri);
        }
        let path = self.resolve(uri);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ProwlError::AssetNotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reader rooted at the directory containing `uri`, for resolving the
    /// file's own relative references.
    #[must_use]
    pub fn sibling_reader(&self, uri: &str) -> Self {
        let parent = Path::new(uri).parent().unwrap_or(Path::new(""));
        Self {
            root_path: self.root_path.join(parent),
        }
    }
}

#[inline]
#[must_use]
pub fn is_data_uri(uri: &str) -> bool {
    uri.starts_with("data:")
}

/// Decodes a base64 `data:` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ProwlError::DataUri(format!("not a data URI: {}", truncate(uri))))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ProwlError::DataUri("missing ',' separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(ProwlError::DataUri(format!(
            "only base64 data URIs are supported, got '{header}'"
        )));
    }
    Ok(STANDARD.decode(payload)?)
}

fn truncate(s: &str) -> &str {
    match s.char_indices().nth(32) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

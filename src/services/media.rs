//! Local storage for uploaded order files.
//!
//! Files live under `<media_root>/order_files/` and are served read-only
//! from `/media/`. The database stores paths relative to the media root.

use std::{
    io,
    path::{Path, PathBuf},
};

use url::Url;
use uuid::Uuid;

/// Subdirectory of the media root holding order attachments.
pub const ORDER_FILES_DIR: &str = "order_files";

const MAX_FILE_NAME_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    base_url: Url,
}

impl MediaStore {
    /// `base_url` is the public URL `root` is served under.
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the path ends in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            root: root.into(),
            base_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an uploaded file and return its path relative to the media root.
    ///
    /// A random prefix keeps uploads with the same name apart.
    pub async fn save_order_file(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let dir = self.root.join(ORDER_FILES_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!(
            "{}_{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(original_name)
        );
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        tracing::debug!(file = %file_name, size = bytes.len(), "Stored order file");
        Ok(format!("{ORDER_FILES_DIR}/{file_name}"))
    }

    /// Delete a stored file. Missing files are not an error.
    pub async fn remove(&self, relative_path: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.root.join(relative_path)).await {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }

    /// Public URL of a stored file.
    pub fn url_for(&self, relative_path: &str) -> String {
        match self.base_url.join(relative_path) {
            Ok(url) => url.into(),
            Err(_) => format!("{}{}", self.base_url, relative_path),
        }
    }
}

/// Reduce a client-supplied file name to a safe single path segment.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return "file".to_string();
    }
    // Keep the tail so the extension survives truncation
    let skip = cleaned.chars().count().saturating_sub(MAX_FILE_NAME_CHARS);
    cleaned.chars().skip(skip).collect()
}

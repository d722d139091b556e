//! Local media bucket: uploaded files land under a configured root and are
//! served back under a public URL prefix. Names are sanitized and
//! uniquified so an upload can never clobber an earlier one.

use crate::error::ComicError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;
use uuid::Uuid;

#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
    public_prefix: String,
    /// When set, public URLs are absolute under this origin; otherwise they
    /// are site-relative paths.
    base_url: Option<Url>,
}

impl MediaStore {
    pub fn new(root: PathBuf, public_prefix: String, base_url: Option<Url>) -> Self {
        let public_prefix = public_prefix.trim_end_matches('/').to_string();
        Self {
            root,
            public_prefix,
            base_url,
        }
    }

    /// Write `bytes` under `bucket/` and return the public URL.
    pub async fn store(
        &self,
        bucket: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, ComicError> {
        let bucket = sanitize(bucket);
        let safe_name = sanitize(file_name);
        let unique = format!("{}-{}", Uuid::new_v4(), safe_name);

        let dir = self.root.join(&bucket);
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(&unique);
        tokio::fs::write(&path, bytes).await?;

        info!(path = %path.display(), size = bytes.len(), "stored media object");
        Ok(self.public_url(&bucket, &unique))
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        let path = format!("{}/{}/{}", self.public_prefix, bucket, name);
        match &self.base_url {
            Some(base) => base
                .join(&path)
                .map(|u| u.to_string())
                .unwrap_or(path),
            None => path,
        }
    }

    /// Read an object back by its bucket-relative path. Traversal segments
    /// are rejected before touching the filesystem.
    pub async fn read(&self, rel_path: &str) -> Result<(Vec<u8>, &'static str), ComicError> {
        let path = self.resolve(rel_path)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok((bytes, content_type_for(&path))),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ComicError::MediaNotFound),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, rel_path: &str) -> Result<PathBuf, ComicError> {
        let mut path = self.root.clone();
        for segment in rel_path.split('/') {
            if segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains('\\')
            {
                return Err(ComicError::MediaNotFound);
            }
            path.push(segment);
        }
        Ok(path)
    }
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

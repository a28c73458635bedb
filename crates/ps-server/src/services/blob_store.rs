//! Storage for uploaded documents.
//!
//! Files land either in a local directory (served back under `/uploads`) or
//! in an S3 bucket. Either way the caller gets a URL clients can fetch.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use ps_common::config::StorageBackend;
use ps_common::AppConfig;

use super::s3;

/// Fallback name for uploads whose original name sanitizes to nothing.
const FALLBACK_FILE_NAME: &str = "upload.pdf";

/// Where a stored file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub key: String,
    pub url: String,
}

pub enum BlobStore {
    Local(LocalBlobStore),
    S3(S3BlobStore),
}

impl BlobStore {
    /// Build the configured backend, creating its directory or bucket.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match config.storage.backend {
            StorageBackend::Local => {
                let store = LocalBlobStore::new(
                    &config.storage.upload_dir,
                    &config.server.public_base_url,
                )
                .await?;
                Ok(Self::Local(store))
            }
            StorageBackend::S3 => {
                let client = s3::init_client(&config.s3);
                s3::ensure_bucket(&client, &config.s3.bucket).await?;
                Ok(Self::S3(S3BlobStore {
                    client,
                    bucket: config.s3.bucket.clone(),
                    public_endpoint: config.s3.public_endpoint().to_string(),
                }))
            }
        }
    }

    /// Store `data` under a fresh key derived from `original_name`.
    pub async fn put(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> anyhow::Result<StoredBlob> {
        let key = object_key(original_name, chrono::Utc::now().timestamp_millis());
        let data_len = data.len();
        let url = match self {
            Self::Local(store) => store.put(&key, &data).await?,
            Self::S3(store) => store.put(&key, content_type, data).await?,
        };
        tracing::info!(%key, %url, bytes = data_len, "Document stored");
        Ok(StoredBlob { key, url })
    }

    /// Directory to serve under `/uploads`, if files live on local disk.
    pub fn local_dir(&self) -> Option<&Path> {
        match self {
            Self::Local(store) => Some(store.dir.as_path()),
            Self::S3(_) => None,
        }
    }
}

pub struct LocalBlobStore {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub async fn new(dir: impl AsRef<Path>, public_base_url: &str) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create upload dir {}: {}", dir.display(), e))?;
        Ok(Self {
            dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn put(&self, key: &str, data: &[u8]) -> anyhow::Result<String> {
        let path = self.dir.join(key);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
        Ok(format!("{}/uploads/{}", self.public_base_url, key))
    }
}

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_endpoint: String,
}

impl S3BlobStore {
    async fn put(&self, key: &str, content_type: Option<&str>, data: Bytes) -> anyhow::Result<String> {
        s3::put_object(&self.client, &self.bucket, key, content_type, data.to_vec()).await?;
        Ok(s3::object_url(&self.public_endpoint, &self.bucket, key))
    }
}

/// `<millis>-<name>` with the name reduced to a safe single path segment.
pub fn object_key(original_name: &str, now_millis: i64) -> String {
    format!("{}-{}", now_millis, sanitize_file_name(original_name))
}

fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
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

    if cleaned.trim_matches('.').is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned
    }
}

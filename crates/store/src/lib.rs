use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("invalid object path: {0}")]
    InvalidPath(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("upstream storage error: {0}")]
    Upstream(String),
}

/// The shape a successful download arrives in.
///
/// A closed set of tagged variants — the store implementation picks whichever
/// matches how it holds the object, and [`resolve`] normalizes all three into
/// one contiguous buffer.  This layer knows nothing about file types.
pub enum DownloadResult {
    /// The whole object, already in memory.
    Buffer(Bytes),
    /// A pull-based byte source, read until EOF.
    Reader(Box<dyn AsyncRead + Send + Unpin>),
    /// A chunked stream, iterated until completion.
    Stream(BoxStream<'static, Result<Bytes, StoreError>>),
}

/// Collapse a download result into a single contiguous byte buffer.
///
/// Chunks are concatenated in arrival order; the assembled buffer's length is
/// exactly the sum of the chunk lengths.  A mid-stream error aborts the whole
/// download — a partial buffer is never returned.
pub async fn resolve(result: DownloadResult) -> Result<Bytes, StoreError> {
    match result {
        DownloadResult::Buffer(bytes) => Ok(bytes),
        DownloadResult::Reader(mut reader) => {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).await?;
            Ok(buf.into())
        }
        DownloadResult::Stream(mut stream) => {
            let mut buf = Vec::new();
            while let Some(chunk) = stream.next().await {
                buf.extend_from_slice(&chunk?);
            }
            Ok(buf.into())
        }
    }
}

/// Object-storage collaborator: fetch a stored document by bucket + path.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn download(&self, bucket: &str, path: &str) -> Result<DownloadResult, StoreError>;
}

// ── Filesystem backend ───────────────────────────────────────────────────────

/// Serves objects from `<root>/<bucket>/<path>` on the local filesystem.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Reject paths that could escape the storage root.
fn sanitize(path: &str) -> Result<&Path, StoreError> {
    let p = Path::new(path);
    let ok = !path.is_empty()
        && !p.is_absolute()
        && p.components().all(|c| matches!(c, Component::Normal(_)));
    if ok {
        Ok(p)
    } else {
        Err(StoreError::InvalidPath(path.to_string()))
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn download(&self, bucket: &str, path: &str) -> Result<DownloadResult, StoreError> {
        sanitize(bucket)?;
        let full = self.root.join(bucket).join(sanitize(path)?);
        let file = tokio::fs::File::open(&full).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(format!("{bucket}/{path}"))
            } else {
                StoreError::Io(e)
            }
        })?;
        Ok(DownloadResult::Reader(Box::new(file)))
    }
}

// ── HTTP backend ─────────────────────────────────────────────────────────────

/// Fetches objects from an HTTP object store at `{base_url}/{bucket}/{path}`
/// with bearer-token auth, streaming the body chunk by chunk.
pub struct HttpStore {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpStore {
    async fn download(&self, bucket: &str, path: &str) -> Result<DownloadResult, StoreError> {
        let url = format!("{}/{bucket}/{path}", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::Upstream(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{bucket}/{path}")));
        }
        if !resp.status().is_success() {
            return Err(StoreError::Upstream(format!(
                "GET {url} returned {}",
                resp.status()
            )));
        }

        let stream = resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| StoreError::Upstream(e.to_string())));
        Ok(DownloadResult::Stream(Box::pin(stream)))
    }
}

// ── In-memory backend ────────────────────────────────────────────────────────

/// In-memory store used by tests and local demos.
#[derive(Default)]
pub struct MemStore {
    objects: HashMap<String, Bytes>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bucket: &str, path: &str, bytes: impl Into<Bytes>) {
        self.objects.insert(format!("{bucket}/{path}"), bytes.into());
    }
}

#[async_trait]
impl ObjectStore for MemStore {
    async fn download(&self, bucket: &str, path: &str) -> Result<DownloadResult, StoreError> {
        self.objects
            .get(&format!("{bucket}/{path}"))
            .cloned()
            .map(DownloadResult::Buffer)
            .ok_or_else(|| StoreError::NotFound(format!("{bucket}/{path}")))
    }
}

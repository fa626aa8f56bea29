use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory for the `fs` backend.
    #[serde(default = "default_root")]
    pub root: String,

    /// Base URL for the `http` backend, e.g. "https://storage.example.com/object".
    #[serde(default)]
    pub base_url: String,

    /// Bearer token for the `http` backend.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_bucket")]
    pub bucket: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Fs,
    Http,
}

fn default_root() -> String {
    "./data".into()
}

fn default_bucket() -> String {
    "documents".into()
}

/// Knobs shared by the extraction pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum trimmed character count for extractor output to count as
    /// real text.  Below this, the PDF pipeline falls back to the next
    /// strategy.
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,

    /// Wall-clock budget for one extraction attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_len: default_min_text_len(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_min_text_len() -> usize { 5 }
fn default_timeout_secs() -> u64 { 30 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            [storage]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:8080");
        assert_eq!(cfg.storage.backend, StorageBackend::Fs);
        assert_eq!(cfg.storage.bucket, "documents");
        assert_eq!(cfg.extraction.min_text_len, 5);
        assert_eq!(cfg.extraction.timeout_secs, 30);
    }

    #[test]
    fn test_http_backend() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            bind = "0.0.0.0:9000"

            [storage]
            backend = "http"
            base_url = "https://storage.example.com/object"
            token = "secret"
            bucket = "tech"

            [extraction]
            min_text_len = 10
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.storage.backend, StorageBackend::Http);
        assert_eq!(cfg.storage.bucket, "tech");
        assert_eq!(cfg.extraction.min_text_len, 10);
    }
}

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tokio::task::spawn_blocking;
use tokio::time::timeout;

use doctext_common::api::{ExtractRequest, ExtractResponse};
use doctext_common::outcome::Outcome;
use doctext_extract_dispatch::FileKind;
use doctext_store::resolve;

use crate::AppState;

pub async fn healthz() -> &'static str {
    "ok"
}

// ── POST /api/v1/extract ─────────────────────────────────────────────────────
//
// Status mapping is fixed: 200 for Success and Warning (both arrive in the
// `text` field), 400 for a missing path, 415 for unsupported types, 502 for
// storage or extraction failures.  Internal error detail is logged, never
// returned.

pub async fn extract(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> Response {
    let file_path = req.file_path.trim().to_string();
    if file_path.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing filePath");
    }

    // Classify before touching storage: unsupported types cost no download.
    if FileKind::classify(&file_path) == FileKind::Unsupported {
        return error_response(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported file type");
    }

    let bucket = &state.config.storage.bucket;
    let download = match state.store.download(bucket, &file_path).await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("download failed for '{file_path}': {e}");
            return error_response(StatusCode::BAD_GATEWAY, "Could not download file");
        }
    };
    let bytes = match resolve(download).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("download stream failed for '{file_path}': {e}");
            return error_response(StatusCode::BAD_GATEWAY, "Could not download file");
        }
    };

    // Extraction is CPU-bound library code; run it off the async runtime,
    // bounded by the configured wall-clock budget.
    let cfg = state.config.extraction.clone();
    let name = file_path.clone();
    let attempt = spawn_blocking(move || {
        doctext_extract_dispatch::dispatch_from_bytes(&bytes, &name, &cfg)
    });

    let outcome = match timeout(
        Duration::from_secs(state.config.extraction.timeout_secs),
        attempt,
    )
    .await
    {
        Err(_) => {
            tracing::error!("extraction timed out for '{file_path}'");
            return error_response(StatusCode::BAD_GATEWAY, "Failed to extract text");
        }
        Ok(Err(join_err)) => {
            tracing::error!("extraction task failed for '{file_path}': {join_err}");
            return error_response(StatusCode::BAD_GATEWAY, "Failed to extract text");
        }
        Ok(Ok(Err(e))) => {
            tracing::error!("extraction failed for '{file_path}': {e}");
            return error_response(StatusCode::BAD_GATEWAY, "Failed to extract text");
        }
        Ok(Ok(Ok(outcome))) => outcome,
    };

    let status = match &outcome {
        Outcome::Failure { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    (status, Json(ExtractResponse::from(outcome))).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ExtractResponse::error(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    use doctext_common::config::AppConfig;
    use doctext_common::outcome::{DOCX_EMPTY, PDF_FAILED};
    use doctext_store::MemStore;
    use zip::write::SimpleFileOptions;

    fn docx_bytes(body_text: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{body_text}</w:t></w:r></w:p></w:body></w:document>"#
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn test_state() -> Arc<AppState> {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            [storage]
            bucket = "documents"
            "#,
        )
        .unwrap();

        let mut store = MemStore::new();
        store.insert("documents", "u1/125.docx", docx_bytes("Hello from docx"));
        store.insert("documents", "u1/127.docx", docx_bytes("   "));
        store.insert("documents", "u1/128.docx", b"not a zip at all".to_vec());
        store.insert("documents", "u1/124.pdf", b"not really a pdf".to_vec());

        Arc::new(AppState {
            config,
            store: Box::new(store),
        })
    }

    async fn call(state: Arc<AppState>, file_path: &str) -> (StatusCode, ExtractResponse) {
        let req = ExtractRequest { file_path: file_path.to_string() };
        let response = extract(State(state), Json(req)).await;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_missing_file_path_is_400() {
        let (status, body) = call(test_state(), "   ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, ExtractResponse::error("Missing filePath"));
    }

    #[tokio::test]
    async fn test_unsupported_type_is_415_without_download() {
        // u1/126.txt is not in the store; classification must reject it
        // before any fetch, so this cannot be a download error.
        let (status, body) = call(test_state(), "u1/126.txt").await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body, ExtractResponse::error("Unsupported file type"));
    }

    #[tokio::test]
    async fn test_missing_object_is_502() {
        let (status, body) = call(test_state(), "u1/999.pdf").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, ExtractResponse::error("Could not download file"));
    }

    #[tokio::test]
    async fn test_docx_success() {
        let (status, body) = call(test_state(), "u1/125.docx").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            ExtractResponse::Text { text: "Hello from docx".into() }
        );
    }

    #[tokio::test]
    async fn test_empty_docx_is_200_warning() {
        let (status, body) = call(test_state(), "u1/127.docx").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            ExtractResponse::Text { text: format!("⚠ {DOCX_EMPTY}") }
        );
    }

    #[tokio::test]
    async fn test_malformed_docx_is_generic_502() {
        let (status, body) = call(test_state(), "u1/128.docx").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, ExtractResponse::error("Failed to extract text"));
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_502_with_diagnostic() {
        let (status, body) = call(test_state(), "u1/124.pdf").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, ExtractResponse::error(PDF_FAILED));
    }

    #[tokio::test]
    async fn test_idempotent_across_calls() {
        let state = test_state();
        let first = call(state.clone(), "u1/125.docx").await;
        let second = call(state, "u1/125.docx").await;
        assert_eq!(first, second);
    }
}

/// Errors raised by the extraction pipelines.
///
/// These never reach a client directly: the server logs the full detail and
/// responds with one of the short diagnostic sentences from [`crate::outcome`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The path's extension matches no known pipeline.
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The document container or content stream could not be parsed.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// An extractor library panicked; contained by `catch_unwind`.
    #[error("extractor panicked on malformed input")]
    Panicked,
}

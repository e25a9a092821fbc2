/// Error types shared by the provider clients.
///
/// These errors cover client construction and configuration problems that are the same for
/// every upstream provider. Request-level failures have their own per-client enums
/// (`OpenAiClientError`, `SerperClientError`) so callers can inspect upstream status codes.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("http client initialization failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

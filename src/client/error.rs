//! Client error types.

use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the HTTP invoker.
///
/// Hook failures are the one category that never reaches the caller; they
/// are logged and the send proceeds.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request could not be constructed from the given URL.
    #[error("invalid request URL: {0}")]
    Request(#[from] url::ParseError),

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or the transport failed mid-flight.
    #[error("request failed: {0}")]
    Send(#[source] reqwest::Error),

    /// The server answered with something other than `200 OK`.
    #[error("http code is {0}")]
    Status(StatusCode),

    /// The response body could not be read into memory.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The response stream ended abnormally while being consumed.
    #[error("response stream ended abnormally: {0}")]
    Stream(#[source] reqwest::Error),

    /// A file operation failed during download.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A mutation hook failed. Logged by the invoker, never propagated.
    #[error("hook failed: {0}")]
    Hook(String),
}

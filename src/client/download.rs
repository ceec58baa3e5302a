//! File download helper.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::{Method, Response};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::client::context::InvokeContext;
use crate::client::error::HttpError;
use crate::client::invoke::{Invoker, ResponseReader};

const COPY_BUFFER_SIZE: usize = 16 * 1024;

/// Response reader that streams the body into a file.
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileSink {
    /// Create (or truncate) the target file.
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self, HttpError> {
        let path = path.into();
        let file = File::create(&path).await.map_err(|source| HttpError::File {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::with_capacity(COPY_BUFFER_SIZE, file),
            path,
        })
    }
}

#[async_trait]
impl ResponseReader for FileSink {
    async fn read(&mut self, mut response: Response) -> Result<Vec<u8>, HttpError> {
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    self.writer
                        .write_all(&chunk)
                        .await
                        .map_err(|source| HttpError::File {
                            path: self.path.clone(),
                            source,
                        })?;
                }
                Ok(None) => break,
                // A truncated body must surface as a distinct error, not a
                // silently short file. reqwest reports an incomplete body as
                // a decode error wrapping the body failure.
                Err(e) if e.is_decode() || e.is_body() => return Err(HttpError::Stream(e)),
                Err(e) => return Err(HttpError::Send(e)),
            }
        }
        self.writer
            .flush()
            .await
            .map_err(|source| HttpError::File {
                path: self.path.clone(),
                source,
            })?;
        Ok(Vec::new())
    }
}

impl Invoker {
    /// GET `url` and stream the response body into a new file at `path`.
    pub async fn download(
        &self,
        cx: &InvokeContext,
        url: &str,
        path: impl Into<PathBuf>,
    ) -> Result<(), HttpError> {
        let mut sink = FileSink::create(path).await?;
        self.invoke(cx, Method::GET, url, None, Some(&mut sink), &[])
            .await?;
        Ok(())
    }
}

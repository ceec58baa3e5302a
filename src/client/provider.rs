//! Client resolution.
//!
//! # Responsibilities
//! - Decide which `reqwest::Client` executes a given request
//! - Keep the proxy-vs-default choice a visible, testable branch
//!
//! # Design Decisions
//! - One shared client for the common case (connection reuse)
//! - A one-off client when the context requests a proxy
//! - Both carry the same fixed request timeout

use std::time::Duration;

use reqwest::{Client, Proxy};

use crate::client::context::InvokeContext;
use crate::client::error::HttpError;

/// Fixed total timeout applied to every outbound request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolves the client used to execute a request.
pub trait ClientProvider: Send + Sync {
    /// Return the client for a request issued under `cx`.
    fn client(&self, cx: &InvokeContext) -> Result<Client, HttpError>;
}

/// Default provider: shared client, or a proxied one-off when asked.
pub struct DefaultClientProvider {
    shared: Client,
}

impl DefaultClientProvider {
    pub fn new() -> Result<Self, HttpError> {
        let shared = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(HttpError::Client)?;
        Ok(Self { shared })
    }
}

impl ClientProvider for DefaultClientProvider {
    fn client(&self, cx: &InvokeContext) -> Result<Client, HttpError> {
        match cx.proxy_url() {
            Some(proxy_url) => {
                let proxy = Proxy::all(proxy_url.clone()).map_err(HttpError::Client)?;
                Client::builder()
                    .timeout(REQUEST_TIMEOUT)
                    .proxy(proxy)
                    .build()
                    .map_err(HttpError::Client)
            }
            None => Ok(self.shared.clone()),
        }
    }
}

//! Generic HTTP invocation.
//!
//! # Responsibilities
//! - Build a single outbound request from method/URL/body
//! - Apply the ordered hook list, then the built-in trace ID hook
//! - Execute through the resolved client; only `200 OK` is success
//! - Hand the body to a caller-supplied reader, or buffer it in memory
//!
//! # Design Decisions
//! - Hook failures are logged, never fatal
//! - No retries, no redirect/4xx/5xx classification

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Request, Response, StatusCode};
use serde::Serialize;
use url::{form_urlencoded, Url};

use crate::client::context::InvokeContext;
use crate::client::error::HttpError;
use crate::client::hooks::{self, BeforeHook};
use crate::client::provider::{ClientProvider, DefaultClientProvider};

/// Consumes a response body in place of the default in-memory read.
#[async_trait]
pub trait ResponseReader: Send {
    async fn read(&mut self, response: Response) -> Result<Vec<u8>, HttpError>;
}

/// Derives one extra hook from the URL and the serialized body content.
/// Used for request signing schemes that cover the payload.
pub type ContentHook = dyn Fn(&str, &str) -> Option<BeforeHook> + Send + Sync;

/// Body accepted by [`Invoker::send`].
///
/// A key/value mapping goes out form-urlencoded; anything else is JSON.
#[derive(Debug, Clone)]
pub enum SendBody {
    Form(BTreeMap<String, String>),
    Json(serde_json::Value),
}

impl SendBody {
    /// JSON body from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, HttpError> {
        Ok(SendBody::Json(
            serde_json::to_value(value).map_err(HttpError::Encode)?,
        ))
    }

    /// Form-urlencoded body from key/value pairs.
    pub fn form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        SendBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn serialize_body(body: SendBody) -> Result<(String, BeforeHook), HttpError> {
    match body {
        SendBody::Form(map) => {
            let mut encoded = form_urlencoded::Serializer::new(String::new());
            for (key, value) in &map {
                encoded.append_pair(key, value);
            }
            Ok((encoded.finish(), hooks::form_content_type()))
        }
        SendBody::Json(value) => {
            let content = serde_json::to_string(&value).map_err(HttpError::Encode)?;
            Ok((content, hooks::json_content_type()))
        }
    }
}

/// Outbound HTTP invoker with a pluggable client provider.
pub struct Invoker {
    provider: Arc<dyn ClientProvider>,
}

impl Invoker {
    /// Invoker backed by [`DefaultClientProvider`].
    pub fn new() -> Result<Self, HttpError> {
        Ok(Self {
            provider: Arc::new(DefaultClientProvider::new()?),
        })
    }

    /// Invoker with an injected client provider.
    pub fn with_provider(provider: Arc<dyn ClientProvider>) -> Self {
        Self { provider }
    }

    /// Execute one request and return the raw response bytes.
    ///
    /// Caller hooks run in order, followed by the built-in trace ID hook;
    /// a failing hook is logged and skipped. Any status other than `200 OK`
    /// is an error and the body is never returned. When `reader` is given,
    /// body consumption is delegated to it.
    pub async fn invoke(
        &self,
        cx: &InvokeContext,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        reader: Option<&mut dyn ResponseReader>,
        hooks: &[BeforeHook],
    ) -> Result<Vec<u8>, HttpError> {
        let url = Url::parse(url)?;
        let mut request = Request::new(method, url);
        if let Some(bytes) = body {
            *request.body_mut() = Some(bytes.into());
        }

        let request_id = hooks::request_id();
        for hook in hooks.iter().chain(std::iter::once(&request_id)) {
            if let Err(e) = hook(cx, &mut request) {
                tracing::warn!(error = %e, url = %request.url(), "request hook failed");
            }
        }

        let client = self.provider.client(cx)?;
        let response = client.execute(request).await.map_err(HttpError::Send)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(HttpError::Status(status));
        }

        match reader {
            Some(reader) => reader.read(response).await,
            None => {
                let bytes = response.bytes().await.map_err(HttpError::Body)?;
                Ok(bytes.to_vec())
            }
        }
    }

    /// Serialize `body`, invoke, and log the request/response pair.
    ///
    /// The matching content-type hook is appended automatically; an optional
    /// `content_hook` can derive one more hook from the URL and the
    /// serialized payload (e.g. a signature header).
    pub async fn send(
        &self,
        cx: &InvokeContext,
        method: Method,
        url: &str,
        body: Option<SendBody>,
        content_hook: Option<&ContentHook>,
        mut hooks: Vec<BeforeHook>,
    ) -> Result<Vec<u8>, HttpError> {
        let mut content = String::new();
        let mut payload = None;

        if let Some(body) = body {
            let (encoded, content_type) = serialize_body(body)?;
            payload = Some(encoded.clone().into_bytes());
            hooks.push(content_type);
            if let Some(derive) = content_hook {
                if let Some(hook) = derive(url, &encoded) {
                    hooks.push(hook);
                }
            }
            content = encoded;
        }

        let result = self.invoke(cx, method.clone(), url, payload, None, &hooks).await;
        match &result {
            Ok(bytes) => tracing::info!(
                method = %method,
                url,
                request = %content,
                response = %String::from_utf8_lossy(bytes),
                "agent call"
            ),
            Err(e) => tracing::error!(
                method = %method,
                url,
                request = %content,
                error = %e,
                "agent call failed"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_body_is_urlencoded() {
        let body = SendBody::form([("b", "2"), ("a", "1 &x")]);
        let (content, _) = serialize_body(body).unwrap();
        // BTreeMap keeps keys sorted
        assert_eq!(content, "a=1+%26x&b=2");
    }

    #[test]
    fn json_body_is_serialized() {
        #[derive(Serialize)]
        struct Ping {
            seq: u32,
        }
        let body = SendBody::json(&Ping { seq: 7 }).unwrap();
        let (content, _) = serialize_body(body).unwrap();
        assert_eq!(content, r#"{"seq":7}"#);
    }

    #[test]
    fn serialized_body_carries_matching_content_type() {
        let cx = InvokeContext::new();
        let mut request = Request::new(
            Method::POST,
            Url::parse("http://example.com/").unwrap(),
        );

        let (_, hook) = serialize_body(SendBody::form([("k", "v")])).unwrap();
        hook(&cx, &mut request).unwrap();
        assert_eq!(
            request.headers().get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );

        let (_, hook) = serialize_body(SendBody::Json(serde_json::json!({"k": "v"}))).unwrap();
        hook(&cx, &mut request).unwrap();
        assert_eq!(
            request.headers().get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}

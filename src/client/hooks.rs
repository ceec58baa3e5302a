//! Pre-send mutation hooks.
//!
//! A hook may rewrite the in-flight request before it is executed. Hook
//! failures are logged by the invoker and never abort the send.

use reqwest::header::{self, HeaderValue};
use reqwest::Request;

use crate::client::context::InvokeContext;
use crate::client::error::HttpError;

/// Header the context trace ID is propagated into.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A pre-send mutation applied to an outbound request.
pub type BeforeHook =
    Box<dyn Fn(&InvokeContext, &mut Request) -> Result<(), HttpError> + Send + Sync>;

/// Set `Content-Type: application/x-www-form-urlencoded`.
pub fn form_content_type() -> BeforeHook {
    Box::new(|_cx, request| {
        request.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        Ok(())
    })
}

/// Set `Content-Type: application/json`.
pub fn json_content_type() -> BeforeHook {
    Box::new(|_cx, request| {
        request.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(())
    })
}

/// Copy the context trace ID into the `X-Request-ID` header, if present.
pub fn request_id() -> BeforeHook {
    Box::new(|cx, request| {
        if let Some(trace_id) = cx.trace_id() {
            let value = HeaderValue::from_str(trace_id)
                .map_err(|e| HttpError::Hook(format!("invalid trace id: {}", e)))?;
            request.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use url::Url;

    fn empty_request() -> Request {
        Request::new(Method::GET, Url::parse("http://example.com/").unwrap())
    }

    #[test]
    fn content_type_hooks_set_header() {
        let cx = InvokeContext::new();

        let mut request = empty_request();
        form_content_type()(&cx, &mut request).unwrap();
        assert_eq!(
            request.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );

        let mut request = empty_request();
        json_content_type()(&cx, &mut request).unwrap();
        assert_eq!(
            request.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn request_id_copies_trace_id() {
        let cx = InvokeContext::new().with_trace_id("trace-42");
        let mut request = empty_request();
        request_id()(&cx, &mut request).unwrap();
        assert_eq!(request.headers().get(REQUEST_ID_HEADER).unwrap(), "trace-42");
    }

    #[test]
    fn request_id_noop_without_trace_id() {
        let cx = InvokeContext::new();
        let mut request = empty_request();
        request_id()(&cx, &mut request).unwrap();
        assert!(request.headers().get(REQUEST_ID_HEADER).is_none());
    }

    #[test]
    fn request_id_rejects_invalid_header_value() {
        let cx = InvokeContext::new().with_trace_id("bad\nvalue");
        let mut request = empty_request();
        assert!(request_id()(&cx, &mut request).is_err());
    }
}

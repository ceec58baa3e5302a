//! Per-call invocation context.
//!
//! Carries the values that influence how a single outbound request is built
//! and executed: the trace ID propagated to `X-Request-ID`, and an optional
//! proxy the request must be routed through. Explicit fields instead of
//! ambient context lookups keep both knobs visible at the call site.

use url::Url;
use uuid::Uuid;

/// Context for a single outbound invocation.
#[derive(Debug, Clone, Default)]
pub struct InvokeContext {
    trace_id: Option<String>,
    proxy_url: Option<Url>,
}

impl InvokeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a trace ID propagated into the `X-Request-ID` header.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Attach a freshly generated (UUID v4) trace ID.
    pub fn with_generated_trace_id(self) -> Self {
        self.with_trace_id(Uuid::new_v4().to_string())
    }

    /// Route the request through the given proxy.
    pub fn with_proxy_url(mut self, proxy_url: Url) -> Self {
        self.proxy_url = Some(proxy_url);
        self
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn proxy_url(&self) -> Option<&Url> {
        self.proxy_url.as_ref()
    }
}

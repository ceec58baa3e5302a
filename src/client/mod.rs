//! Outbound HTTP invocation subsystem.
//!
//! # Data Flow
//! ```text
//! send (invoke.rs):
//!     SendBody → serialize (form / JSON) → content-type hook
//!         → invoke → log request/response pair
//!
//! invoke (invoke.rs):
//!     build request → caller hooks → trace ID hook
//!         → provider resolves client (proxy or shared)
//!         → execute → 200-only → bytes | ResponseReader
//!
//! download (download.rs):
//!     GET → FileSink reader → buffered copy to file
//! ```

pub mod context;
pub mod download;
pub mod error;
pub mod hooks;
pub mod invoke;
pub mod provider;

pub use context::InvokeContext;
pub use download::FileSink;
pub use error::HttpError;
pub use hooks::{BeforeHook, REQUEST_ID_HEADER};
pub use invoke::{ContentHook, Invoker, ResponseReader, SendBody};
pub use provider::{ClientProvider, DefaultClientProvider, REQUEST_TIMEOUT};

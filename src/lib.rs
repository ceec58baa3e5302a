//! HTTP service utilities: a graceful-shutdown server runner and an
//! outbound invocation helper.

pub mod client;
pub mod config;
pub mod server;

pub use client::{HttpError, InvokeContext, Invoker, SendBody};
pub use config::ServerConfig;
pub use server::{GracefulServer, ServeError, TermSignal};

//! Graceful server runner.
//!
//! # Responsibilities
//! - Bind the listener and serve an Axum router on a spawned task
//! - Race listener failure against the first termination signal
//! - On signal, drain in-flight connections within a bounded timeout
//!
//! # Design Decisions
//! - The runner never resolves with a success value once serving starts:
//!   listener failure, clean signal-driven shutdown, and drain timeout all
//!   report through [`ServeError`], so callers can always tell "ran and
//!   stopped" apart from "still running"
//! - Binding is a separate step ([`GracefulServer::bind`]) so callers that
//!   bind port 0 can learn the ephemeral port before serving
//! - The drain deadline is enforced here with a timeout around the serve
//!   task; on expiry the task is aborted and remaining connections are
//!   dropped with it

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::config::ServerConfig;
use crate::server::signals::{termination_signal, TermSignal};

/// Floor for the drain timeout. Configured values below this are raised.
pub const MIN_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

/// Terminal outcome of [`GracefulServer::run`].
#[derive(Debug, Error)]
pub enum ServeError {
    /// The listener failed to bind or stopped serving on its own.
    #[error("listen error on {addr}: {source}")]
    Listen {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// A termination signal arrived and the drain completed in time.
    #[error("received signal ({signal}), shut down")]
    Shutdown { signal: TermSignal },

    /// A termination signal arrived but in-flight requests outlived the
    /// drain timeout.
    #[error("received signal ({signal}), shutdown timed out after {timeout:?}")]
    ShutdownTimeout {
        signal: TermSignal,
        timeout: Duration,
    },
}

/// HTTP server wrapper that shuts down gracefully on OS signals.
pub struct GracefulServer {
    addr: String,
    shutdown_timeout: Duration,
}

impl GracefulServer {
    /// Create a runner for the given bind address.
    ///
    /// `shutdown_timeout` bounds the signal-triggered drain; values below
    /// [`MIN_SHUTDOWN_TIMEOUT`] are silently raised to the floor.
    pub fn new(bind_address: impl Into<String>, shutdown_timeout: Duration) -> Self {
        Self {
            addr: bind_address.into(),
            shutdown_timeout: shutdown_timeout.max(MIN_SHUTDOWN_TIMEOUT),
        }
    }

    /// Create a runner from a loaded [`ServerConfig`].
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.bind_address(), config.shutdown_timeout())
    }

    /// Effective drain timeout after clamping.
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Bind the listener without serving yet.
    ///
    /// The returned [`BoundServer`] reports the actual local address, which
    /// is how callers binding port 0 discover the ephemeral port.
    pub async fn bind(self) -> Result<BoundServer, ServeError> {
        let listener = match TcpListener::bind(&self.addr).await {
            Ok(listener) => listener,
            Err(e) => {
                return Err(ServeError::Listen {
                    addr: self.addr,
                    source: e,
                })
            }
        };
        let local_addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                return Err(ServeError::Listen {
                    addr: self.addr,
                    source: e,
                })
            }
        };
        Ok(BoundServer {
            listener,
            local_addr,
            shutdown_timeout: self.shutdown_timeout,
        })
    }

    /// Serve `app` until a listener error or a termination signal.
    ///
    /// Blocks the caller for the lifetime of the server. Every outcome is
    /// reported through [`ServeError`]; see the module docs.
    pub async fn run(self, app: Router) -> ServeError {
        self.run_until(app, termination_signal()).await
    }

    /// Like [`GracefulServer::run`], with the signal source injected.
    pub async fn run_until<F>(self, app: Router, signal: F) -> ServeError
    where
        F: Future<Output = TermSignal>,
    {
        match self.bind().await {
            Ok(bound) => bound.run_until(app, signal).await,
            Err(err) => err,
        }
    }
}

/// A runner whose listener is already bound.
pub struct BoundServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    shutdown_timeout: Duration,
}

impl BoundServer {
    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Effective drain timeout after clamping.
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Serve `app` until a listener error or a termination signal.
    pub async fn run(self, app: Router) -> ServeError {
        self.run_until(app, termination_signal()).await
    }

    /// Like [`BoundServer::run`], with the signal source injected.
    ///
    /// The shutdown path triggers when `signal` resolves, which lets tests
    /// drive the drain without delivering OS signals.
    pub async fn run_until<F>(self, app: Router, signal: F) -> ServeError
    where
        F: Future<Output = TermSignal>,
    {
        let addr = self.local_addr.to_string();
        tracing::info!(address = %addr, "HTTP server starting");

        let (drain_tx, drain_rx) = oneshot::channel::<()>();
        let mut serve_task = tokio::spawn(async move {
            axum::serve(self.listener, app)
                .with_graceful_shutdown(async {
                    let _ = drain_rx.await;
                })
                .await
        });

        tokio::pin!(signal);

        tokio::select! {
            result = &mut serve_task => {
                let source = match result {
                    Ok(Ok(())) => io::Error::other("server exited before shutdown was requested"),
                    Ok(Err(e)) => e,
                    Err(e) => io::Error::other(e),
                };
                ServeError::Listen { addr, source }
            }
            signal = &mut signal => {
                tracing::info!(signal = %signal, "termination signal received, draining connections");
                let _ = drain_tx.send(());
                match tokio::time::timeout(self.shutdown_timeout, &mut serve_task).await {
                    Ok(_) => {
                        tracing::info!(signal = %signal, "HTTP server stopped");
                        ServeError::Shutdown { signal }
                    }
                    Err(_) => {
                        serve_task.abort();
                        tracing::warn!(
                            signal = %signal,
                            timeout = ?self.shutdown_timeout,
                            "drain did not finish before the shutdown timeout"
                        );
                        ServeError::ShutdownTimeout {
                            signal,
                            timeout: self.shutdown_timeout,
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_timeout_clamped_to_floor() {
        let server = GracefulServer::new("127.0.0.1:0", Duration::from_secs(1));
        assert_eq!(server.shutdown_timeout(), MIN_SHUTDOWN_TIMEOUT);

        let server = GracefulServer::new("127.0.0.1:0", Duration::ZERO);
        assert_eq!(server.shutdown_timeout(), MIN_SHUTDOWN_TIMEOUT);
    }

    #[test]
    fn shutdown_timeout_above_floor_kept() {
        let server = GracefulServer::new("127.0.0.1:0", Duration::from_secs(30));
        assert_eq!(server.shutdown_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn from_config_uses_bind_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8123,
            shutdown_timeout_secs: 1,
        };
        let server = GracefulServer::from_config(&config);
        assert_eq!(server.addr, "127.0.0.1:8123");
        assert_eq!(server.shutdown_timeout(), MIN_SHUTDOWN_TIMEOUT);
    }

    #[tokio::test]
    async fn bind_reports_ephemeral_port() {
        let server = GracefulServer::new("127.0.0.1:0", Duration::from_secs(3));
        let bound = server.bind().await.unwrap();
        assert_ne!(bound.local_addr().port(), 0);
        assert_eq!(bound.shutdown_timeout(), Duration::from_secs(3));
    }
}

//! Graceful HTTP server subsystem.
//!
//! # Data Flow
//! ```text
//! run (graceful.rs):
//!     Bind listener → serve on spawned task
//!         → listener error  → report, no drain
//!         → signal received → stop accepting → drain with timeout → report
//!
//! Signals (signals.rs):
//!     SIGHUP/SIGINT/SIGTERM/SIGQUIT → TermSignal
//! ```

pub mod graceful;
pub mod signals;

pub use graceful::{BoundServer, GracefulServer, ServeError, MIN_SHUTDOWN_TIMEOUT};
pub use signals::{termination_signal, TermSignal};

//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for the platform termination signal set
//! - Translate whichever signal fires first into a [`TermSignal`]
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Non-unix platforms fall back to Ctrl+C, reported as SIGINT

use std::fmt;

/// A termination signal delivered by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermSignal {
    Hangup,
    Interrupt,
    Terminate,
    Quit,
}

impl fmt::Display for TermSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TermSignal::Hangup => "SIGHUP",
            TermSignal::Interrupt => "SIGINT",
            TermSignal::Terminate => "SIGTERM",
            TermSignal::Quit => "SIGQUIT",
        };
        write!(f, "{}", name)
    }
}

/// Wait for the first termination signal (SIGHUP, SIGINT, SIGTERM, SIGQUIT).
#[cfg(unix)]
pub async fn termination_signal() -> TermSignal {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = signal(SignalKind::hangup()).expect("failed to install SIGHUP handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigquit = signal(SignalKind::quit()).expect("failed to install SIGQUIT handler");

    tokio::select! {
        _ = sighup.recv() => TermSignal::Hangup,
        _ = sigint.recv() => TermSignal::Interrupt,
        _ = sigterm.recv() => TermSignal::Terminate,
        _ = sigquit.recv() => TermSignal::Quit,
    }
}

/// Best-effort implementation for non-unix systems.
#[cfg(not(unix))]
pub async fn termination_signal() -> TermSignal {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    TermSignal::Interrupt
}

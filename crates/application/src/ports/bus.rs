//! Session signal bus port
//!
//! The original system broadcast login/logout across browser tabs via
//! storage events; here only the contract survives: fire a named signal,
//! observe it elsewhere. The transport (in-process channel, OS IPC, ...)
//! is an adapter concern.

use tokio::sync::broadcast;

/// A session lifecycle signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// A session was established; observers should (re)initialize.
    LoggedIn,
    /// The session ended; observers should drop session state.
    LoggedOut,
}

/// Port for broadcasting session signals to other observers.
pub trait SessionBus: Send + Sync {
    /// Fires a signal. Delivery to observers is best-effort.
    fn emit(&self, signal: SessionSignal);

    /// Subscribes to signals fired after this call.
    fn subscribe(&self) -> broadcast::Receiver<SessionSignal>;
}

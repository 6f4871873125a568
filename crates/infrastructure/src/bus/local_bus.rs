//! In-process session signal bus.
//!
//! The original system broadcast login/logout across browser tabs via
//! storage events. This adapter carries the same contract over a tokio
//! broadcast channel: every observer in the process sees every signal
//! fired after it subscribed.

use tokio::sync::broadcast;

use lumen_application::ports::{SessionBus, SessionSignal};

const CHANNEL_CAPACITY: usize = 16;

/// Session signal bus backed by a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct LocalSessionBus {
    tx: broadcast::Sender<SessionSignal>,
}

impl LocalSessionBus {
    /// Creates a bus with no subscribers yet.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl Default for LocalSessionBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBus for LocalSessionBus {
    fn emit(&self, signal: SessionSignal) {
        // No subscribers is fine; the signal is simply unobserved.
        let _ = self.tx.send(signal);
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionSignal> {
        self.tx.subscribe()
    }
}

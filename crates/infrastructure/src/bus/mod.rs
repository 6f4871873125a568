//! Session signal bus adapters.

mod local_bus;

pub use local_bus::LocalSessionBus;

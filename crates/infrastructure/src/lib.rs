//! Lumen Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer: the reqwest transport, the bare auth endpoint client,
//! durable and in-memory credential storage, the system clock, and an
//! in-process session signal bus.

pub mod adapters;
pub mod auth;
pub mod bus;
pub mod persistence;

pub use adapters::{ReqwestTransport, SystemClock};
pub use auth::RestAuthApi;
pub use bus::LocalSessionBus;
pub use persistence::{FileCredentialStorage, MemoryCredentialStorage};

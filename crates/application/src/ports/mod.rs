//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session core and external
//! systems. Each port is a trait implemented by an adapter in the
//! infrastructure layer, or by a test double.

mod auth_api;
mod bus;
mod clock;
mod storage;
mod transport;

pub use auth_api::{AuthApi, AuthApiError};
pub use bus::{SessionBus, SessionSignal};
pub use clock::Clock;
pub use storage::{CredentialStorage, StorageError};
pub use transport::{HttpTransport, TransportError};

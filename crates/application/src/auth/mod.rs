//! Session authentication core.
//!
//! This module provides:
//! - Durable credential storage with expiry tracking ([`TokenStore`])
//! - Bearer header attachment ([`RequestAuthenticator`])
//! - The single-flight refresh state machine ([`RefreshCoordinator`]) and
//!   the FIFO queue of requests awaiting its outcome

mod authenticator;
mod queue;
mod refresh;
mod token_store;

pub use authenticator::RequestAuthenticator;
pub use queue::CancellationToken;
pub use refresh::RefreshCoordinator;
pub(crate) use refresh::Enrollment;
pub use token_store::TokenStore;

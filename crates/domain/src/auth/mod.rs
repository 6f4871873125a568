//! Session credential types.
//!
//! A [`TokenGrant`] is what the auth endpoints hand out (relative lifetime);
//! [`Credentials`] is what the client keeps (absolute expiry instant).

mod credentials;

pub use credentials::{Credentials, TokenGrant};

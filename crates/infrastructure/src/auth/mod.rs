//! Auth endpoint adapters.

mod rest_auth_api;

pub use rest_auth_api::RestAuthApi;

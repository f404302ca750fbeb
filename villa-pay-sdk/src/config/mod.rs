//! Connection settings shared by the SDK clients.
//!
//! These are validated runtime values. Loading them from a file is handled
//! by the server crate.

mod backend;
mod geolocation;

pub use backend::BackendConfig;
pub use geolocation::GeolocationConfig;

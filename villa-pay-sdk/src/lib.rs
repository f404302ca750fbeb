//! Shared wire objects and typed HTTP clients for the villa payment page.
//!
//! The payment page talks to four external collaborators: the identity
//! service, the `orders` table of the backend-as-a-service, the hosted
//! `create-payment-intent` function, and an IP geolocation service. The
//! objects in [`objects`] mirror their JSON shapes exactly. The clients in
//! [`client`] are gated behind the `client` cargo feature so crates that only
//! need the shared types do not pull in `reqwest`.

pub mod config;
pub mod objects;

#[cfg(feature = "client")]
pub mod client;

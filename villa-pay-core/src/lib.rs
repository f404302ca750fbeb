#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod adapters;
pub mod channel;
pub mod clipboard;
pub mod config;
pub mod country;
pub mod currency;
pub mod error;
pub mod form;
pub mod orchestrator;
pub mod ports;
pub mod pricing;
pub mod session;

pub use orchestrator::{Collaborators, ManualConfirmation, PaymentOrchestrator, SubmissionOutcome};
pub use villa_pay_sdk::objects::PaymentMethod;

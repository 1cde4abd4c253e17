//! HTTP handlers for the MediBot relay.

pub mod health;
pub mod message;
pub mod metrics;

//! HTTP handlers for the classroom AI service.
//!
//! Each model endpoint runs the same sequence: take a rate-limit slot,
//! validate the payload, answer from the demo data when no provider is
//! configured, otherwise call the model and normalize its reply.

pub mod activity;
pub mod health;
pub mod metrics;
pub mod screenshot;
pub mod summary;

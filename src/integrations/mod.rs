//! Web-framework integrations.
//!
//! Thin glue only: one route per probe, responses shaped by
//! [`crate::response`]. The core has no HTTP dependency; each integration
//! is feature-gated.

#[cfg(feature = "axum")]
pub mod axum;

//! Domain logic for the SmartQueue campus crowd platform.
//!
//! Everything in this crate is pure: no database handles, no HTTP types.
//! The classifier, suggestion scorer, and QR grammar are recomputed from
//! raw inputs on every call rather than trusting cached values.

pub mod error;
pub mod naming;
pub mod qr;
pub mod roles;
pub mod status;
pub mod suggestion;
pub mod types;

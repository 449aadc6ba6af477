//! Request handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod checkins;
pub mod locations;
pub mod tickets;

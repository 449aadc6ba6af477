//! Row models and create/update DTOs, one module per entity.

pub mod admin;
pub mod checkin;
pub mod location;
pub mod session;
pub mod ticket;
pub mod user;

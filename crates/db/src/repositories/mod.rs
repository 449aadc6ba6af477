//! Per-entity repositories.
//!
//! Repositories are stateless unit structs whose methods take the pool
//! explicitly. Occupancy and profile counters are only ever mutated through
//! single atomic UPDATE statements, never read-modify-write.

pub mod admin_repo;
pub mod checkin_repo;
pub mod location_repo;
pub mod session_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use admin_repo::AdminRepo;
pub use checkin_repo::CheckinRepo;
pub use location_repo::LocationRepo;
pub use session_repo::SessionRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;

//! Background tasks and scheduled jobs.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn`. All tasks accept or hold a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) for graceful
//! shutdown.

pub mod session_cleanup;
pub mod simulator;

pub use simulator::DemoSimulator;

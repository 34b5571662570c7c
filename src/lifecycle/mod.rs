//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//!
//! Shutdown (shutdown.rs):
//!     broadcast to subscribers → stop accepting → drain in-flight → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;

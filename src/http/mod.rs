//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, method dispatch)
//!     → OPTIONS: cors::preflight (answered locally)
//!     → GET/HEAD/POST: forward.rs (outbound fetch, CORS rewrite)
//!     → error.rs (400 / 405 / 502 for locally detected failures)
//!     → Send to client
//! ```

pub mod error;
pub mod forward;
pub mod server;

pub use error::RelayError;
pub use server::HttpServer;

//! CORS subsystem.
//!
//! # Data Flow
//! ```text
//! OPTIONS request
//!     → preflight.rs (synthesize response from request headers alone)
//!
//! GET/HEAD/POST response from upstream
//!     → allow_list.rs (membership check on the inbound Origin)
//!     → http::forward applies Access-Control-Allow-Origin / Vary
//! ```
//!
//! # Design Decisions
//! - The allow-list is exact string membership; no wildcard expansion and
//!   no scheme or port normalization
//! - Preflight never contacts an upstream

pub mod allow_list;
pub mod preflight;

pub use allow_list::OriginAllowList;

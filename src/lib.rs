//! CORS Relay Library
//!
//! A minimal forwarding proxy: relays a client request to a caller-specified
//! upstream URL (`?url=` query parameter) and rewrites response headers to
//! satisfy cross-origin resource sharing policy against a fixed origin
//! allow-list. CORS preflight (OPTIONS) requests are answered locally
//! without contacting any upstream.

pub mod config;
pub mod cors;
pub mod http;
pub mod lifecycle;

pub use config::schema::RelayConfig;
pub use cors::OriginAllowList;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

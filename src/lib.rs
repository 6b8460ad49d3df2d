//! Tron resource rental service library.
//!
//! Quotes, rents and returns delegated energy or bandwidth through an
//! on-chain rental contract, signing every call locally.

// Chain access
pub mod blockchain;

// Business logic
pub mod quoting;
pub mod rental;

// Surfaces and cross-cutting concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use rental::RentalService;

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers, ContractCaller, FeeCalculator
//!     → logging.rs (tracing events, pretty or JSON on stdout)
//!     → metrics.rs (request, contract call, broadcast and degradation counters)
//!     → Prometheus scrape listener (when enabled)
//! ```
//!
//! # Design Decisions
//! - Init failures abort startup instead of running blind
//! - Request ID flows through the HTTP trace span
//! - Key material never appears in fields or messages

pub mod logging;
pub mod metrics;

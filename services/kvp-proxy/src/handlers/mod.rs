//! HTTP request handlers.
//!
//! - `kvp`: WMTS KVP translation and forwarding (router fallback)
//! - `health`: Health check and Prometheus metrics
//! - `common`: Exception and capabilities responses

pub mod common;
pub mod health;
pub mod kvp;

pub use common::{capabilities_response, wmts_exception};
pub use health::{health_handler, metrics_handler};
pub use kvp::kvp_handler;

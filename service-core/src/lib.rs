//! service-core: Shared infrastructure for the itinerary service.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod retry;

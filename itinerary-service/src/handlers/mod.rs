//! HTTP handlers for the itinerary service.

pub mod health;
pub mod itinerary;
pub mod metrics;

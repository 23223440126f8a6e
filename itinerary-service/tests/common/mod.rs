//! Shared helpers for itinerary-service integration tests.

use itinerary_service::config::ItineraryConfig;
use service_core::config::Config;

/// Config backed by the mock provider, listening on a random port.
pub fn test_config() -> ItineraryConfig {
    let common = Config {
        port: 0,
        log_level: "debug".to_string(),
    };

    ItineraryConfig::from_lookup(common, |key| match key {
        "ITINERARY_PROVIDER" => Some("mock".to_string()),
        _ => None,
    })
    .expect("Failed to build test config")
}

pub mod itinerary;
pub mod metrics;
pub mod prompt;
pub mod providers;

pub use itinerary::{ItineraryError, ItineraryGenerator, ItineraryOptions};

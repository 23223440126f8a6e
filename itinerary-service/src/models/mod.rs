pub mod trip;

pub use trip::{GroupSize, ItineraryResult, TripRequest};

//! Prompt construction for itinerary requests.

use crate::models::TripRequest;
use crate::services::providers::Prompt;

/// Fixed, request-independent instruction describing the desired output.
pub const SYSTEM_INSTRUCTION: &str = "You are an AI travel planner that creates realistic and time-specific itineraries.
Given location, dates, interests, and group size, produce a short, structured day-by-day plan.
Only provide the itinerary, do not add extra explanations.";

/// Per-request instruction interpolating the trip details.
pub fn user_instruction(request: &TripRequest) -> String {
    format!(
        "Plan a detailed itinerary for a trip to {} from {} to {}. \
         Group size: {}\u{2013}{} people. \
         Interests: {}.\n\n\
         Include timings, activities, and local recommendations.",
        request.location,
        request.date_from,
        request.date_to,
        request.group_size.resolved_min(),
        request.group_size.resolved_max(),
        request.interests.join(", "),
    )
}

pub fn build_prompt(request: &TripRequest) -> Prompt {
    Prompt {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        user_instruction: user_instruction(request),
    }
}

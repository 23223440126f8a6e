use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const DEFAULT_MIN_GROUP_SIZE: i64 = 2;
pub const DEFAULT_MAX_GROUP_SIZE: i64 = 8;

/// Reject strings that are empty once surrounding whitespace is removed.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("cannot be empty"));
        return Err(err);
    }
    Ok(())
}

/// Trip description submitted by the caller.
///
/// Required strings default to empty when absent so that a missing field is
/// reported by validation rather than as a malformed body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TripRequest {
    /// Opaque identifier, echoed back untouched.
    #[serde(default, rename = "tripId", alias = "trip_id")]
    pub trip_id: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub location: String,

    #[serde(default, alias = "dateFrom")]
    #[validate(custom(function = "not_blank"))]
    pub date_from: String,

    #[serde(default, alias = "dateTo")]
    #[validate(custom(function = "not_blank"))]
    pub date_to: String,

    #[serde(default)]
    pub interests: Vec<String>,

    #[serde(default, alias = "groupSize")]
    pub group_size: GroupSize,
}

/// Bounds are taken as given; no range or ordering check is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct GroupSize {
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

impl GroupSize {
    pub fn resolved_min(&self) -> i64 {
        self.min.unwrap_or(DEFAULT_MIN_GROUP_SIZE)
    }

    pub fn resolved_max(&self) -> i64 {
        self.max.unwrap_or(DEFAULT_MAX_GROUP_SIZE)
    }
}

/// Generated itinerary returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryResult {
    #[serde(rename = "tripId", skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    pub itinerary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_wire_shape() {
        let request: TripRequest = serde_json::from_value(json!({
            "tripId": "t1",
            "location": "Paris",
            "date_from": "2024-05-01",
            "date_to": "2024-05-03",
            "interests": ["art", "food"],
            "group_size": {}
        }))
        .unwrap();

        assert_eq!(request.trip_id.as_deref(), Some("t1"));
        assert_eq!(request.location, "Paris");
        assert_eq!(request.interests, vec!["art", "food"]);
        assert_eq!(request.group_size, GroupSize::default());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn accepts_camel_case_aliases() {
        let request: TripRequest = serde_json::from_value(json!({
            "trip_id": "t2",
            "location": "Kyoto",
            "dateFrom": "2024-10-01",
            "dateTo": "2024-10-05",
            "groupSize": { "min": 4, "max": 10 }
        }))
        .unwrap();

        assert_eq!(request.trip_id.as_deref(), Some("t2"));
        assert_eq!(request.date_from, "2024-10-01");
        assert_eq!(request.date_to, "2024-10-05");
        assert_eq!(request.group_size.resolved_min(), 4);
        assert_eq!(request.group_size.resolved_max(), 10);
        assert!(request.interests.is_empty());
    }

    #[test]
    fn group_size_defaults_apply_per_entry() {
        let only_max = GroupSize {
            min: None,
            max: Some(12),
        };
        assert_eq!(only_max.resolved_min(), 2);
        assert_eq!(only_max.resolved_max(), 12);

        let empty = GroupSize::default();
        assert_eq!(empty.resolved_min(), 2);
        assert_eq!(empty.resolved_max(), 8);
    }

    #[test]
    fn unknown_group_size_keys_are_ignored() {
        let size: GroupSize = serde_json::from_value(json!({ "min": 3, "kids": 2 })).unwrap();
        assert_eq!(size.resolved_min(), 3);
        assert_eq!(size.resolved_max(), 8);
    }

    #[test]
    fn missing_required_fields_fail_validation() {
        let request: TripRequest = serde_json::from_value(json!({ "location": "Rome" })).unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("date_from"));
        assert!(fields.contains_key("date_to"));
        assert!(!fields.contains_key("location"));
    }

    #[test]
    fn whitespace_only_fields_fail_validation() {
        let request: TripRequest = serde_json::from_value(json!({
            "location": "   ",
            "date_from": " \t",
            "date_to": "2024-05-03"
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("location"));
        assert!(fields.contains_key("date_from"));
        assert!(!fields.contains_key("date_to"));
    }

    #[test]
    fn group_size_accepts_any_integer() {
        let size: GroupSize = serde_json::from_value(json!({ "min": -1, "max": 0 })).unwrap();
        assert_eq!(size.resolved_min(), -1);
        assert_eq!(size.resolved_max(), 0);
    }

    #[test]
    fn result_omits_missing_trip_id() {
        let with_id = ItineraryResult {
            trip_id: Some("t1".to_string()),
            itinerary: "Day 1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&with_id).unwrap(),
            json!({ "tripId": "t1", "itinerary": "Day 1" })
        );

        let without_id = ItineraryResult {
            trip_id: None,
            itinerary: "Day 1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&without_id).unwrap(),
            json!({ "itinerary": "Day 1" })
        );
    }
}

//! Feedback records
//!
//! A submission arrives with every field optional so that missing values can
//! be reported as a validation failure instead of a deserialization error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

pub const DEFAULT_NAME: &str = "Anonymous";
pub const DEFAULT_EMAIL: &str = "No email provided";
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Raw feedback as posted by the browser
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl FeedbackSubmission {
    /// Apply defaults and check the acceptance rules
    ///
    /// `rating` must be in `[1, 5]` and `message` must be non-empty.
    pub fn validate(self) -> Result<FeedbackRecord> {
        let (rating, message) = match (self.rating, self.message) {
            (Some(rating), Some(message)) if !message.is_empty() => (rating, message),
            _ => return Err(Error::validation("Rating and message are required")),
        };

        if !(i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&rating) {
            return Err(Error::validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        Ok(FeedbackRecord {
            name: self.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            email: self.email.unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            rating: rating as i32,
            message,
            created_at: Some(self.created_at.unwrap_or_else(Utc::now)),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RatingInput {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accept `4`, `4.0` and `"4"`; fractional or non-numeric values are rejected
fn lenient_rating<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let rating = match Option::<RatingInput>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RatingInput::Int(value)) => value,
        Some(RatingInput::Float(value)) if value.fract() == 0.0 && value.is_finite() => {
            value as i64
        }
        Some(RatingInput::Text(text)) => text.trim().parse::<i64>().map_err(|_| {
            serde::de::Error::custom(format!("rating must be an integer, got {:?}", text))
        })?,
        Some(RatingInput::Float(value)) => {
            return Err(serde::de::Error::custom(format!(
                "rating must be an integer, got {}",
                value
            )))
        }
    };
    Ok(Some(rating))
}

/// Accepted feedback, ready to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub name: String,
    pub email: String,
    pub rating: i32,
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Feedback as returned by the store, with its assigned identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFeedback {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub record: FeedbackRecord,
}

impl StoredFeedback {
    pub fn new(record: FeedbackRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(rating: Option<i64>, message: Option<&str>) -> FeedbackSubmission {
        FeedbackSubmission {
            rating,
            message: message.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let record = submission(Some(4), Some("Great voices")).validate().unwrap();
        assert_eq!(record.name, DEFAULT_NAME);
        assert_eq!(record.email, DEFAULT_EMAIL);
        assert_eq!(record.rating, 4);
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_rating_bounds() {
        for rating in 1..=5 {
            assert!(submission(Some(rating), Some("ok")).validate().is_ok());
        }
        for rating in [-1, 0, 6, 100] {
            let err = submission(Some(rating), Some("ok")).validate().unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
    }

    #[test]
    fn test_missing_fields_rejected() {
        for (rating, message) in [(None, Some("hi")), (Some(3), None), (Some(3), Some(""))] {
            let err = submission(rating, message).validate().unwrap_err();
            assert_eq!(err.to_string(), "Rating and message are required");
        }
    }

    #[test]
    fn test_whitespace_message_accepted() {
        let record = submission(Some(3), Some("  ")).validate().unwrap();
        assert_eq!(record.message, "  ");
    }

    #[test]
    fn test_rating_accepts_integral_numbers_and_strings() {
        for raw in [serde_json::json!(4), serde_json::json!(4.0), serde_json::json!("4")] {
            let parsed: FeedbackSubmission =
                serde_json::from_value(serde_json::json!({ "rating": raw, "message": "ok" }))
                    .unwrap();
            assert_eq!(parsed.rating, Some(4));
        }

        let parsed: FeedbackSubmission =
            serde_json::from_value(serde_json::json!({ "rating": null, "message": "ok" })).unwrap();
        assert_eq!(parsed.rating, None);

        for raw in [serde_json::json!(4.5), serde_json::json!("four"), serde_json::json!(true)] {
            let result: serde_json::Result<FeedbackSubmission> =
                serde_json::from_value(serde_json::json!({ "rating": raw, "message": "ok" }));
            assert!(result.is_err(), "{:?} should be rejected", raw);
        }
    }

    #[test]
    fn test_stored_feedback_shape() {
        let record = submission(Some(5), Some("Nice")).validate().unwrap();
        let stored = StoredFeedback::new(record);
        let value = serde_json::to_value(&stored).unwrap();
        assert!(value["_id"].is_string());
        assert_eq!(value["rating"], 5);
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_submission_deserializes_camel_case() {
        let parsed: FeedbackSubmission = serde_json::from_value(serde_json::json!({
            "rating": 2,
            "message": "slow",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        let record = parsed.validate().unwrap();
        assert_eq!(
            record.created_at.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
    }
}

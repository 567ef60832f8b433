//! Wire-shape DTOs for the review API and their defensive decoding.
//!
//! # Design
//! The server is not consistent about response shapes: `GET /reviews` may
//! return a bare array or an envelope object, and either endpoint may report
//! errors in-band. Bodies are therefore decoded from a `serde_json::Value`
//! into small tagged types instead of one fixed schema. Fields of the wrong
//! type are treated as absent, mirroring what a lenient client would do.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::types::{AddReview, Review};

/// A review as sent by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: String,
    pub rating: f64,
    pub title: String,
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ReviewDto {
    /// Decode one review entry from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError::MalformedReview(e.to_string()))
    }

    /// Map into the domain type. Fails if `createdAt` is missing or does not
    /// name a valid point in time.
    pub fn into_review(self) -> Result<Review, ApiError> {
        let created_at = self
            .created_at
            .as_deref()
            .ok_or(ApiError::InvalidCreatedAt)
            .and_then(parse_created_at)?;
        Ok(Review {
            id: self.id,
            rating: self.rating,
            title: self.title,
            comment: self.comment,
            created_at,
        })
    }
}

/// Payload of `POST /reviews`. Carries exactly the three caller-supplied
/// fields; the server assigns the id and timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct AddReviewRequest<'a> {
    pub rating: f64,
    pub title: &'a str,
    pub comment: &'a str,
}

impl<'a> From<&'a AddReview> for AddReviewRequest<'a> {
    fn from(input: &'a AddReview) -> Self {
        Self {
            rating: input.rating,
            title: &input.title,
            comment: &input.comment,
        }
    }
}

/// Body of a `GET /reviews` response.
#[derive(Debug, Clone, PartialEq)]
pub enum ListReviewsBody {
    /// A bare JSON array of review entries.
    Bare(Vec<Value>),
    /// An object with optional `reviews`, `totalCount` and `errors`.
    Envelope {
        reviews: Vec<Value>,
        total_count: Option<f64>,
        errors: Vec<String>,
    },
}

impl ListReviewsBody {
    /// A `null` body has no fields to read and fails as `InvalidJson`. Other
    /// scalars read as an empty envelope.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        Ok(match value {
            Value::Null => return Err(ApiError::InvalidJson),
            Value::Array(items) => ListReviewsBody::Bare(items),
            Value::Object(mut fields) => ListReviewsBody::Envelope {
                reviews: match fields.remove("reviews") {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                },
                total_count: declared_count(fields.get("totalCount")),
                errors: declared_errors(fields.get("errors")),
            },
            _ => ListReviewsBody::Envelope {
                reviews: Vec::new(),
                total_count: None,
                errors: Vec::new(),
            },
        })
    }
}

/// Body of a `POST /reviews` response.
#[derive(Debug, Clone, PartialEq)]
pub struct AddReviewBody {
    /// The `review` field, if present and a JSON object.
    pub review: Option<Map<String, Value>>,
    pub errors: Vec<String>,
}

impl AddReviewBody {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => AddReviewBody {
                review: match fields.remove("review") {
                    Some(Value::Object(review)) => Some(review),
                    _ => None,
                },
                errors: declared_errors(fields.get("errors")),
            },
            _ => AddReviewBody {
                review: None,
                errors: Vec::new(),
            },
        }
    }
}

/// Collect an `errors` array. Non-string entries are rendered as JSON; a
/// field that is not an array counts as no errors.
fn declared_errors(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Any JSON number is taken as declared, negative or fractional included.
fn declared_count(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}

/// Parse a `createdAt` timestamp.
///
/// Accepts RFC 3339, ISO-8601 date-times with `Z` or an offset written with or
/// without a colon (seconds optional), the same without offset (read as UTC),
/// a bare date or a year-month (midnight UTC on the first).
pub fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or(ApiError::InvalidCreatedAt)
}

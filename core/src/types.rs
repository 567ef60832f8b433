//! Domain types for reviews.
//!
//! # Design
//! These are the values consumers see. They are independent of the wire DTOs
//! in `wire`: the client maps every DTO into a `Review` and rejects entries it
//! cannot map, so a `Review` always carries a valid timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single product review. Created only by a service implementation and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub rating: f64,
    pub title: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Result of listing reviews.
///
/// `total_count` is what the server declared when it declared one, so it may
/// be larger than `reviews.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewList {
    pub reviews: Vec<Review>,
    pub total_count: f64,
}

impl ReviewList {
    /// A list whose count is its own length.
    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        let total_count = reviews.len() as f64;
        Self { reviews, total_count }
    }
}

/// Input for submitting a review. The id and timestamp are assigned by the
/// service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddReview {
    pub rating: f64,
    pub title: String,
    pub comment: String,
}

//! The review service capability shared by every backend.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{AddReview, Review, ReviewList};

/// List and submit reviews.
///
/// Implementations return fully mapped values or an error; never a partially
/// filled result. Calls are independent of each other.
#[async_trait]
pub trait ReviewService: Send + Sync {
    async fn list_reviews(&self) -> Result<ReviewList, ApiError>;

    /// Input is passed through as-is; range and length checks belong to the
    /// caller or the server.
    async fn add_review(&self, input: &AddReview) -> Result<Review, ApiError>;
}

//! In-memory `ReviewService` for development and tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::seed::seed_reviews;
use crate::service::ReviewService;
use crate::types::{AddReview, Review, ReviewList};

const ID_PREFIX: &str = "r_";

#[derive(Debug)]
struct Store {
    /// Newest first.
    items: Vec<Review>,
    next_id: u64,
}

/// Keeps reviews in memory, newest first, assigning ids `r_1`, `r_2`, ...
#[derive(Debug)]
pub struct FakeReviewService {
    store: Mutex<Store>,
}

impl FakeReviewService {
    /// Start from `initial` (already newest first). The id counter continues
    /// after the number of initial items.
    pub fn new(initial: Vec<Review>) -> Self {
        let next_id = initial.len() as u64;
        Self {
            store: Mutex::new(Store {
                items: initial,
                next_id,
            }),
        }
    }

    /// Preloaded with the demo reviews.
    pub fn seeded() -> Self {
        Self::new(seed_reviews())
    }
}

impl Default for FakeReviewService {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ReviewService for FakeReviewService {
    async fn list_reviews(&self) -> Result<ReviewList, ApiError> {
        let store = self.store.lock().await;
        Ok(ReviewList::from_reviews(store.items.clone()))
    }

    async fn add_review(&self, input: &AddReview) -> Result<Review, ApiError> {
        let mut store = self.store.lock().await;
        store.next_id += 1;
        let review = Review {
            id: format!("{ID_PREFIX}{}", store.next_id),
            rating: input.rating,
            title: input.title.clone(),
            comment: input.comment.clone(),
            created_at: Utc::now(),
        };
        store.items.insert(0, review.clone());
        Ok(review)
    }
}

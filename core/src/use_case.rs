//! Use cases: the boundary where service errors become values.
//!
//! Everything below this module is fail-fast and returns `ApiError`. Callers
//! of the use cases get an `Outcome` and never an error.

use std::fmt;
use std::sync::Arc;

use crate::config::{Backend, ServiceConfig};
use crate::error::ApiError;
use crate::fake::FakeReviewService;
use crate::http_service::HttpReviewService;
use crate::service::ReviewService;
use crate::types::{AddReview, Review, ReviewList};

/// Result of a use case.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure { errors: Vec<String> },
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Empty on success.
    pub fn errors(&self) -> &[String] {
        match self {
            Outcome::Success(_) => &[],
            Outcome::Failure { errors } => errors,
        }
    }

    pub fn into_result(self) -> Result<T, Vec<String>> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure { errors } => Err(errors),
        }
    }
}

impl<T> From<Result<T, ApiError>> for Outcome<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) => Outcome::Failure {
                errors: vec![e.to_string()],
            },
        }
    }
}

pub async fn list_reviews(service: &dyn ReviewService) -> Outcome<ReviewList> {
    service.list_reviews().await.into()
}

pub async fn add_review(service: &dyn ReviewService, input: AddReview) -> Outcome<Review> {
    service.add_review(&input).await.into()
}

/// Both use cases bound to one injected service.
#[derive(Clone)]
pub struct ReviewUses {
    service: Arc<dyn ReviewService>,
}

impl fmt::Debug for ReviewUses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewUses").finish_non_exhaustive()
    }
}

impl ReviewUses {
    pub fn new(service: Arc<dyn ReviewService>) -> Self {
        Self { service }
    }

    /// Compose the backend named by `config`. The fake backend starts with
    /// the demo reviews.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ApiError> {
        let service: Arc<dyn ReviewService> = match config.backend {
            Backend::Fake => Arc::new(FakeReviewService::seeded()),
            Backend::Http => Arc::new(HttpReviewService::from_config(config)?),
        };
        Ok(Self::new(service))
    }

    pub async fn list_reviews(&self) -> Outcome<ReviewList> {
        list_reviews(self.service.as_ref()).await
    }

    pub async fn add_review(&self, input: AddReview) -> Outcome<Review> {
        add_review(self.service.as_ref(), input).await
    }
}

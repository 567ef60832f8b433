use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub rating: f64,
    pub title: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateReview {
    pub rating: f64,
    pub title: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub total_count: usize,
}

/// `POST /reviews` answer: the created review, or the validation errors.
#[derive(Serialize, Deserialize)]
pub struct CreateReviewResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
}

/// Reviews, newest first.
pub type Db = Arc<RwLock<Vec<Review>>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

pub fn app_with(reviews: Vec<Review>) -> Router {
    let db: Db = Arc::new(RwLock::new(reviews));
    Router::new()
        .route("/reviews", get(list_reviews).post(create_review))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_reviews(State(db): State<Db>) -> Json<ReviewPage> {
    let reviews = db.read().await.clone();
    info!(count = reviews.len(), "list reviews");
    Json(ReviewPage {
        total_count: reviews.len(),
        reviews,
    })
}

/// Validation failures are reported in-band with a 200, the way the review
/// API declares domain errors.
async fn create_review(
    State(db): State<Db>,
    Json(input): Json<CreateReview>,
) -> (StatusCode, Json<CreateReviewResponse>) {
    let errors = validate(&input);
    if !errors.is_empty() {
        info!(?errors, "rejected review");
        return (
            StatusCode::OK,
            Json(CreateReviewResponse { review: None, errors }),
        );
    }
    let review = Review {
        id: format!("r_{}", Uuid::new_v4().simple()),
        rating: input.rating,
        title: input.title,
        comment: input.comment,
        created_at: Utc::now(),
    };
    db.write().await.insert(0, review.clone());
    info!(id = %review.id, "created review");
    (
        StatusCode::CREATED,
        Json(CreateReviewResponse {
            review: Some(review),
            errors: Vec::new(),
        }),
    )
}

fn validate(input: &CreateReview) -> Vec<String> {
    let mut errors = Vec::new();
    if !(1.0..=5.0).contains(&input.rating) {
        errors.push("rating must be between 1 and 5".to_string());
    }
    if input.title.trim().is_empty() {
        errors.push("title required".to_string());
    }
    errors
}

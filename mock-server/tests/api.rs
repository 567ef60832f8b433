use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, CreateReviewResponse, Review, ReviewPage};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn list_request() -> Request<String> {
    Request::builder().uri("/reviews").body(String::new()).unwrap()
}

// --- list ---

#[tokio::test]
async fn list_reviews_empty() {
    let resp = app().oneshot(list_request()).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: ReviewPage = body_json(resp).await;
    assert!(page.reviews.is_empty());
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn list_reviews_uses_envelope_shape() {
    let seeded = vec![Review {
        id: "r_1".to_string(),
        rating: 5.0,
        title: "Seeded".to_string(),
        comment: "From fixture".to_string(),
        created_at: "2025-10-15T10:30:00Z".parse().unwrap(),
    }];
    let resp = app_with(seeded).oneshot(list_request()).await.unwrap();

    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["reviews"][0]["id"], "r_1");
    assert_eq!(body["reviews"][0]["createdAt"], "2025-10-15T10:30:00Z");
}

// --- create ---

#[tokio::test]
async fn create_review_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/reviews",
            r#"{"rating":4,"title":"Good","comment":"Nice"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: CreateReviewResponse = body_json(resp).await;
    let review = created.review.unwrap();
    assert!(review.id.starts_with("r_"));
    assert_eq!(review.title, "Good");
    assert_eq!(review.rating, 4.0);
    assert!(created.errors.is_empty());
}

#[tokio::test]
async fn create_review_validation_errors_are_in_band() {
    let resp = app()
        .oneshot(json_request("POST", "/reviews", r#"{"rating":0,"title":""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body.get("review").is_none());
    assert_eq!(
        body["errors"],
        serde_json::json!(["rating must be between 1 and 5", "title required"])
    );
}

#[tokio::test]
async fn create_review_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/reviews", r#"{"not_title":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_bytes(resp).await;
    assert!(!body.is_empty());
}

// --- lifecycle ---

#[tokio::test]
async fn created_reviews_list_newest_first() {
    use tower::Service;

    let mut app = app().into_service();

    for title in ["first", "second"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request(
                "POST",
                "/reviews",
                &format!(r#"{{"rating":5,"title":"{title}","comment":"c"}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(list_request())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: ReviewPage = body_json(resp).await;
    assert_eq!(page.total_count, 2);
    assert_eq!(page.reviews[0].title, "second");
    assert_eq!(page.reviews[1].title, "first");
}

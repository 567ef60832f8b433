//! Stateless HTTP request builder and response parser for the review API.
//!
//! # Design
//! `ReviewClient` holds only its configuration (base URL and default headers)
//! and carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. The round-trip itself happens elsewhere (see
//! `HttpReviewService`), keeping this module deterministic and free of I/O.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{merge_headers, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AddReview, Review, ReviewList};
use crate::wire::{AddReviewBody, AddReviewRequest, ListReviewsBody, ReviewDto};

const REVIEWS_PATH: &str = "/reviews";
const JSON: &str = "application/json";

/// Longest excerpt of a text error body kept in a status error.
const ERROR_EXCERPT_CHARS: usize = 300;

/// Request builder and response parser for `GET`/`POST /reviews`.
#[derive(Debug, Clone, Default)]
pub struct ReviewClient {
    base_url: Option<String>,
    headers: Vec<(String, String)>,
}

impl ReviewClient {
    /// A client that prefixes every path with `base_url` (one trailing slash
    /// stripped). An empty base URL means paths are used as-is.
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
        Self {
            base_url: (!base_url.is_empty()).then(|| base_url.to_string()),
            headers: Vec::new(),
        }
    }

    /// Headers sent with every request. Per-request headers override these.
    pub fn with_default_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn build_list_reviews(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(REVIEWS_PATH),
            headers: merge_headers(&self.headers, &[("Accept", JSON)]),
            body: None,
        }
    }

    pub fn build_add_review(&self, input: &AddReview) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&AddReviewRequest::from(input))
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(REVIEWS_PATH),
            headers: merge_headers(&self.headers, &[("Accept", JSON), ("Content-Type", JSON)]),
            body: Some(body),
        })
    }

    pub fn parse_list_reviews(&self, response: HttpResponse) -> Result<ReviewList, ApiError> {
        check_status(&response)?;
        match ListReviewsBody::from_value(parse_body(&response)?)? {
            ListReviewsBody::Bare(items) => Ok(ReviewList::from_reviews(map_reviews(items)?)),
            ListReviewsBody::Envelope {
                reviews,
                total_count,
                errors,
            } => {
                if !errors.is_empty() {
                    return Err(ApiError::Server(errors));
                }
                let reviews = map_reviews(reviews)?;
                let total_count = total_count.unwrap_or(reviews.len() as f64);
                Ok(ReviewList { reviews, total_count })
            }
        }
    }

    pub fn parse_add_review(&self, response: HttpResponse) -> Result<Review, ApiError> {
        check_status(&response)?;
        let body = AddReviewBody::from_value(parse_body(&response)?);
        if !body.errors.is_empty() {
            return Err(ApiError::Server(body.errors));
        }
        let review = body.review.ok_or(ApiError::MalformedAddResponse)?;
        ReviewDto::from_value(Value::Object(review))?.into_review()
    }

    fn url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{base}{path}"),
            None => path.to_string(),
        }
    }
}

/// Map every entry; the first bad one fails the whole batch.
fn map_reviews(items: Vec<Value>) -> Result<Vec<Review>, ApiError> {
    items
        .into_iter()
        .map(|item| ReviewDto::from_value(item)?.into_review())
        .collect()
}

/// An empty body reads as `{}`.
fn parse_body(response: &HttpResponse) -> Result<Value, ApiError> {
    if response.body.is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(&response.body).map_err(|_| ApiError::InvalidJson)
}

/// Turn a non-2xx response into `ApiError::Status`, enriched with whatever
/// the body says about the failure.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Status {
        status: response.status,
        status_text: response.status_text.clone(),
        detail: error_detail(response),
    })
}

fn error_detail(response: &HttpResponse) -> Option<String> {
    if response.content_type().contains(JSON) {
        let body: Value = serde_json::from_str(&response.body).ok()?;
        ["message", "error"]
            .iter()
            .find_map(|key| detail_text(body.get(key)?))
    } else if response.body.is_empty() {
        None
    } else {
        Some(response.body.chars().take(ERROR_EXCERPT_CHARS).collect())
    }
}

/// Strings are used as-is. Falsy values (`null`, `false`, zero, `""`) give
/// nothing; anything else is rendered as JSON.
fn detail_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn client() -> ReviewClient {
        ReviewClient::new("http://localhost:3000")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("content-type".to_string(), JSON.to_string())],
            body: body.to_string(),
        }
    }

    fn failed(status: u16, status_text: &str, content_type: &str, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: status_text.to_string(),
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body: body.to_string(),
        }
    }

    fn input() -> AddReview {
        AddReview {
            rating: 4.0,
            title: "Good".to_string(),
            comment: "Nice".to_string(),
        }
    }

    const REVIEW_9: &str = r#"{"id":"r_9","rating":4,"title":"Good","comment":"Nice",
        "createdAt":"2024-01-01T00:00:00Z"}"#;

    #[test]
    fn build_list_reviews_produces_correct_request() {
        let req = client().build_list_reviews();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/reviews");
        assert_eq!(req.header("accept"), Some(JSON));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_add_review_produces_correct_request() {
        let req = client().build_add_review(&input()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/reviews");
        assert_eq!(req.header("Accept"), Some(JSON));
        assert_eq!(req.header("Content-Type"), Some(JSON));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Good");
        assert_eq!(body["comment"], "Nice");
        assert_eq!(body["rating"].as_f64(), Some(4.0));
        assert!(body.get("id").is_none());
        assert!(body.get("createdAt").is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ReviewClient::new("http://localhost:3000/");
        assert_eq!(client.build_list_reviews().url, "http://localhost:3000/reviews");
    }

    #[test]
    fn empty_base_url_uses_bare_path() {
        let client = ReviewClient::new("");
        assert_eq!(client.base_url(), None);
        assert_eq!(client.build_list_reviews().url, "/reviews");
    }

    #[test]
    fn default_headers_are_merged_and_overridable() {
        let client = client().with_default_headers(vec![
            ("X-Api-Key".to_string(), "k".to_string()),
            ("accept".to_string(), "text/html".to_string()),
        ]);
        let req = client.build_list_reviews();
        assert_eq!(req.header("x-api-key"), Some("k"));
        assert_eq!(req.header("accept"), Some(JSON));
        assert_eq!(req.headers.len(), 2);
    }

    #[test]
    fn parse_list_envelope_uses_declared_count() {
        let body = format!(r#"{{"reviews":[{REVIEW_9}],"totalCount":42}}"#);
        let list = client().parse_list_reviews(ok(&body)).unwrap();
        assert_eq!(list.reviews.len(), 1);
        assert_eq!(list.reviews[0].id, "r_9");
        assert_eq!(list.reviews[0].rating, 4.0);
        assert_eq!(
            list.reviews[0].created_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(list.total_count, 42.0);
    }

    #[test]
    fn parse_list_bare_array_counts_entries() {
        let body = format!("[{REVIEW_9},{REVIEW_9}]");
        let list = client().parse_list_reviews(ok(&body)).unwrap();
        assert_eq!(list.total_count, 2.0);
    }

    #[test]
    fn parse_list_envelope_without_count_counts_entries() {
        let body = format!(r#"{{"reviews":[{REVIEW_9}]}}"#);
        let list = client().parse_list_reviews(ok(&body)).unwrap();
        assert_eq!(list.total_count, 1.0);
    }

    #[test]
    fn parse_list_empty_body_is_empty_list() {
        let list = client().parse_list_reviews(ok("")).unwrap();
        assert!(list.reviews.is_empty());
        assert_eq!(list.total_count, 0.0);
    }

    #[test]
    fn parse_list_declared_errors_win_over_reviews() {
        let body = format!(r#"{{"reviews":[{REVIEW_9}],"totalCount":1,"errors":["a","b"]}}"#);
        let err = client().parse_list_reviews(ok(&body)).unwrap_err();
        assert_eq!(err.to_string(), "a; b");
    }

    #[test]
    fn parse_list_empty_errors_are_ignored() {
        let body = format!(r#"{{"reviews":[{REVIEW_9}],"errors":[]}}"#);
        assert!(client().parse_list_reviews(ok(&body)).is_ok());
    }

    #[test]
    fn parse_list_one_bad_date_fails_everything() {
        let body = format!(
            r#"[{REVIEW_9},{{"id":"r_2","rating":1,"title":"t","comment":"c",
                "createdAt":"not a date"}}]"#
        );
        let err = client().parse_list_reviews(ok(&body)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidCreatedAt));
        assert_eq!(err.to_string(), "invalid createdAt date");
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client().parse_list_reviews(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson));
        assert_eq!(err.to_string(), "invalid JSON response");
    }

    #[test]
    fn parse_list_null_body_is_invalid_json() {
        let err = client().parse_list_reviews(ok("null")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson));
    }

    #[test]
    fn parse_list_keeps_negative_and_fractional_counts() {
        let body = format!(r#"{{"reviews":[{REVIEW_9}],"totalCount":-1}}"#);
        assert_eq!(client().parse_list_reviews(ok(&body)).unwrap().total_count, -1.0);
        let body = format!(r#"{{"reviews":[{REVIEW_9}],"totalCount":4.5}}"#);
        assert_eq!(client().parse_list_reviews(ok(&body)).unwrap().total_count, 4.5);
    }

    #[test]
    fn parse_list_accepts_loose_timestamps() {
        let entry = |id: &str, at: &str| {
            format!(r#"{{"id":"{id}","rating":3,"title":"t","comment":"c","createdAt":"{at}"}}"#)
        };
        let body = format!(
            "[{},{},{}]",
            entry("a", "2024-01-01T00:00Z"),
            entry("b", "2024-01"),
            entry("c", "2024-01-01T00:00:00.000+0000")
        );
        let list = client().parse_list_reviews(ok(&body)).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(list.reviews.iter().all(|r| r.created_at == midnight));
    }

    #[test]
    fn parse_add_review_success() {
        let review = client()
            .parse_add_review(ok(&format!(r#"{{"review":{REVIEW_9}}}"#)))
            .unwrap();
        assert_eq!(review.id, "r_9");
        assert_eq!(review.title, "Good");
    }

    #[test]
    fn parse_add_review_declared_error_message_is_exact() {
        let err = client()
            .parse_add_review(ok(r#"{"errors":["rating required"]}"#))
            .unwrap_err();
        assert_eq!(err.to_string(), "rating required");
    }

    #[test]
    fn parse_add_review_without_review_is_malformed() {
        for body in ["", "{}", r#"{"review":null}"#, r#"{"review":"r_1"}"#, "[]"] {
            let err = client().parse_add_review(ok(body)).unwrap_err();
            assert!(matches!(err, ApiError::MalformedAddResponse), "{body:?}");
        }
    }

    #[test]
    fn status_error_with_json_message() {
        let res = failed(500, "Internal Server Error", JSON, r#"{"message":"db down"}"#);
        let err = client().parse_list_reviews(res).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("Internal Server Error"));
        assert!(msg.contains("db down"));
    }

    #[test]
    fn status_error_falls_back_to_error_field() {
        let content_type = "application/json; charset=utf-8";
        let res = failed(403, "Forbidden", content_type, r#"{"error":"nope"}"#);
        let err = client().parse_add_review(res).unwrap_err();
        assert_eq!(err.to_string(), "403 Forbidden - nope");
    }

    #[test]
    fn status_error_renders_structured_message_as_json() {
        let res = failed(500, "Internal Server Error", JSON, r#"{"message":{"code":7}}"#);
        let err = client().parse_list_reviews(res).unwrap_err();
        assert_eq!(err.to_string(), r#"500 Internal Server Error - {"code":7}"#);
    }

    #[test]
    fn status_error_skips_falsy_message() {
        let res = failed(500, "Internal Server Error", JSON, r#"{"message":false,"error":"e"}"#);
        let err = client().parse_list_reviews(res).unwrap_err();
        assert_eq!(err.to_string(), "500 Internal Server Error - e");

        let res = failed(500, "Internal Server Error", JSON, r#"{"message":null,"error":0}"#);
        let err = client().parse_list_reviews(res).unwrap_err();
        assert_eq!(err.to_string(), "500 Internal Server Error");
    }

    #[test]
    fn status_error_with_unparseable_json_keeps_base_message() {
        let res = failed(502, "Bad Gateway", JSON, "<html>oops</html>");
        let err = client().parse_list_reviews(res).unwrap_err();
        assert_eq!(err.to_string(), "502 Bad Gateway");
    }

    #[test]
    fn status_error_truncates_text_body() {
        let body = "x".repeat(1000);
        let res = failed(503, "Service Unavailable", "text/plain", &body);
        let err = client().parse_list_reviews(res).unwrap_err();
        match &err {
            ApiError::Status { status, detail, .. } => {
                assert_eq!(*status, 503);
                assert_eq!(detail.as_deref().map(str::len), Some(300));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("503 Service Unavailable - xxx"));
    }

    #[test]
    fn status_error_is_raised_even_with_success_shaped_body() {
        let res = failed(404, "Not Found", JSON, &format!("[{REVIEW_9}]"));
        let err = client().parse_list_reviews(res).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }
}

//! Client core for the product review API.
//!
//! # Overview
//! Lists and submits reviews through the `ReviewService` capability, with an
//! HTTP-backed implementation for production and an in-memory one for
//! development. Use cases turn service errors into values, and
//! `ReviewsState` publishes UI-ready snapshots.
//!
//! # Design
//! - `ReviewClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`, and no I/O happens in between.
//! - `Transport` is the only network seam; `HttpReviewService` composes it
//!   with the client.
//! - Response bodies are decoded defensively (`wire`), since the server may
//!   answer `GET /reviews` with a bare array or an envelope.
//! - Every failure is an `ApiError`; the use-case layer is the only place
//!   that converts errors into results.

pub mod client;
pub mod config;
pub mod error;
pub mod fake;
pub mod http;
pub mod http_service;
pub mod seed;
pub mod service;
pub mod state;
pub mod transport;
pub mod types;
pub mod use_case;
pub mod wire;

pub use client::ReviewClient;
pub use config::{Backend, ServiceConfig};
pub use error::ApiError;
pub use fake::FakeReviewService;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use http_service::{HttpReviewService, HttpReviewServiceBuilder};
pub use service::ReviewService;
pub use state::{ReviewsSnapshot, ReviewsState};
pub use transport::Transport;
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{AddReview, Review, ReviewList};
pub use use_case::{Outcome, ReviewUses};

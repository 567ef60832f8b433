//! Error types for the review API client.
//!
//! # Design
//! Every failure the adapter can hit lands in one `ApiError`, and each variant
//! renders a human-readable message. The use-case layer turns these messages
//! into failure results; nothing below it recovers from an error.

use thiserror::Error;

/// Errors returned by the review client, transports and services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status. `detail` carries the
    /// `message`/`error` field of a JSON body, or an excerpt of a text body.
    #[error("{}", status_message(.status, .status_text, .detail))]
    Status {
        status: u16,
        status_text: String,
        detail: Option<String>,
    },

    /// A non-empty body that is not valid JSON.
    #[error("invalid JSON response")]
    InvalidJson,

    /// The body declared one or more errors in its `errors` field.
    #[error("{}", .0.join("; "))]
    Server(Vec<String>),

    /// The add-review response has no `review` object.
    #[error("malformed add review response")]
    MalformedAddResponse,

    /// A review entry does not have the expected wire shape.
    #[error("malformed review entry: {0}")]
    MalformedReview(String),

    /// A review's `createdAt` is not a valid point in time.
    #[error("invalid createdAt date")]
    InvalidCreatedAt,

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The service could not be constructed.
    #[error("configuration error: {0}")]
    Configuration(String),
}

fn status_message(status: &u16, status_text: &str, detail: &Option<String>) -> String {
    let base = format!("{status} {status_text}");
    let base = base.trim_end();
    match detail {
        Some(detail) => format!("{base} - {detail}"),
        None => base.to_string(),
    }
}

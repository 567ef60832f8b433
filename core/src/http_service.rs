//! `ReviewService` backed by a remote HTTP endpoint.
//!
//! Each call is `build_*` on the `ReviewClient`, one `Transport::send`, then
//! `parse_*`. The service itself holds only immutable configuration.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::ReviewClient;
use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::service::ReviewService;
use crate::transport::{default_transport, Transport};
use crate::types::{AddReview, Review, ReviewList};

#[derive(Clone)]
pub struct HttpReviewService {
    client: ReviewClient,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for HttpReviewService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpReviewService")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl HttpReviewService {
    pub fn builder() -> HttpReviewServiceBuilder {
        HttpReviewServiceBuilder::default()
    }

    /// Build from configuration using the default transport.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ApiError> {
        let mut builder = Self::builder().headers(config.header_pairs());
        if let Some(base_url) = &config.base_url {
            builder = builder.base_url(base_url);
        }
        builder.build()
    }

    pub fn client(&self) -> &ReviewClient {
        &self.client
    }
}

#[async_trait]
impl ReviewService for HttpReviewService {
    async fn list_reviews(&self) -> Result<ReviewList, ApiError> {
        let request = self.client.build_list_reviews();
        debug!(method = request.method.as_str(), url = %request.url, "listing reviews");
        let result = match self.transport.send(request).await {
            Ok(response) => self.client.parse_list_reviews(response),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            warn!(error = %e, "list reviews failed");
        }
        result
    }

    async fn add_review(&self, input: &AddReview) -> Result<Review, ApiError> {
        let request = self.client.build_add_review(input)?;
        debug!(method = request.method.as_str(), url = %request.url, "adding review");
        let result = match self.transport.send(request).await {
            Ok(response) => self.client.parse_add_review(response),
            Err(e) => Err(e),
        };
        match &result {
            Ok(review) => debug!(id = %review.id, "review created"),
            Err(e) => warn!(error = %e, "add review failed"),
        }
        result
    }
}

/// Collects configuration for an `HttpReviewService`.
#[derive(Default)]
pub struct HttpReviewServiceBuilder {
    base_url: Option<String>,
    headers: Vec<(String, String)>,
    transport: Option<Arc<dyn Transport>>,
}

impl HttpReviewServiceBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add one default header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Use `transport` instead of the bundled HTTP implementation.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Fails with `ApiError::Configuration` when no transport was given and
    /// none is bundled.
    pub fn build(self) -> Result<HttpReviewService, ApiError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport()?,
        };
        let client = ReviewClient::new(self.base_url.as_deref().unwrap_or_default())
            .with_default_headers(self.headers);
        Ok(HttpReviewService { client, transport })
    }
}

//! The seam where `HttpRequest` values become network round-trips.
//!
//! # Design
//! `Transport` is the only async I/O boundary in the crate. Anything that can
//! turn an `HttpRequest` into an `HttpResponse` qualifies, including a plain
//! closure returning a future, which is how tests script server behavior.
//! A non-2xx status is a normal response here; only failures that produce no
//! response at all surface as `ApiError::Transport`.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[async_trait]
impl<F, Fut> Transport for F
where
    F: Fn(HttpRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse, ApiError>> + Send + 'static,
{
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (self)(request).await
    }
}

/// The transport used when none is injected.
///
/// Fails when the crate was built without a bundled HTTP implementation.
pub fn default_transport() -> Result<Arc<dyn Transport>, ApiError> {
    #[cfg(feature = "ureq-transport")]
    {
        Ok(Arc::new(UreqTransport::new()))
    }
    #[cfg(not(feature = "ureq-transport"))]
    {
        Err(ApiError::Configuration("no HTTP transport available".to_string()))
    }
}

#[cfg(feature = "ureq-transport")]
pub use self::ureq_impl::UreqTransport;

#[cfg(feature = "ureq-transport")]
mod ureq_impl {
    use async_trait::async_trait;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking ureq agent driven from tokio's blocking pool.
    ///
    /// Disables ureq's status-code-as-error behavior so 4xx/5xx responses
    /// come back as data and the client decides what they mean.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Transport for UreqTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let agent = self.agent.clone();
                    handle
                        .spawn_blocking(move || execute(&agent, request))
                        .await
                        .map_err(|e| ApiError::Transport(e.to_string()))?
                }
                // Outside a runtime there is no pool to hand off to.
                Err(_) => execute(&self.agent, request),
            }
        }
    }

    fn execute(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get => headers
                .iter()
                .fold(agent.get(url.as_str()), |b, (k, v)| b.header(k.as_str(), v.as_str()))
                .call(),
            HttpMethod::Post => {
                let builder = headers
                    .iter()
                    .fold(agent.post(url.as_str()), |b, (k, v)| b.header(k.as_str(), v.as_str()));
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

//! Construction-time configuration for review services.

use std::collections::BTreeMap;
use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const BACKEND_ENV: &str = "REVIEWS_BACKEND";
pub const BASE_URL_ENV: &str = "REVIEWS_BASE_URL";

/// Which `ReviewService` implementation to compose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Http,
    Fake,
}

impl std::str::FromStr for Backend {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Backend::Http),
            "fake" => Ok(Backend::Fake),
            other => Err(ApiError::Configuration(format!("unknown review backend: {other}"))),
        }
    }
}

/// Settings read once when a service is built; immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    pub backend: Backend,
    pub base_url: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl ServiceConfig {
    /// Read `REVIEWS_BACKEND` and `REVIEWS_BASE_URL`. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let backend = match lookup(BACKEND_ENV) {
            Some(raw) => raw.parse()?,
            None => Backend::default(),
        };
        Ok(Self {
            backend,
            base_url: lookup(BASE_URL_ENV).filter(|url| !url.is_empty()),
            headers: BTreeMap::new(),
        })
    }

    pub(crate) fn header_pairs(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

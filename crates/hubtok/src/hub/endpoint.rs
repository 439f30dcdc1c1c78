//! # Hub Endpoint

use std::env;

use crate::hub::{ModelId, Revision};

/// Environment variable key to override the default hub endpoint.
pub const HF_ENDPOINT: &str = "HF_ENDPOINT";

/// The public hub.
pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";

/// Base URL of a model hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubEndpoint {
    base: String,
}

impl Default for HubEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_ENDPOINT)
    }
}

impl HubEndpoint {
    /// Create an endpoint from a base URL.
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the hub endpoint.
    ///
    /// Resolution Order:
    /// 1. `base`, if present.
    /// 2. ``env[$HF_ENDPOINT]``, if set and non-empty.
    /// 3. [`DEFAULT_HUB_ENDPOINT`].
    pub fn resolve(base: Option<&str>) -> Self {
        if let Some(base) = base {
            return Self::new(base);
        }
        match env::var(HF_ENDPOINT) {
            Ok(base) if !base.trim().is_empty() => Self::new(&base),
            _ => Self::default(),
        }
    }

    /// The base URL, without a trailing `/`.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The model-info URL, which lists every file at `revision`.
    pub fn listing_url(
        &self,
        model: &ModelId,
        revision: &Revision,
    ) -> String {
        format!(
            "{}/api/models/{}/revision/{}",
            self.base,
            model,
            revision.url_segment()
        )
    }

    /// The download URL for a single repository file.
    pub fn file_url(
        &self,
        model: &ModelId,
        revision: &Revision,
        file: &str,
    ) -> String {
        format!(
            "{}/{}/resolve/{}/{}",
            self.base,
            model,
            revision.url_segment(),
            file
        )
    }
}

//! Published-package baseline.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_LENGTH;
use serde_json::Value;

use crate::config::SmokeConfig;
use crate::error::{PlatkitError, Result};

/// Reads package metadata and artifact sizes from the registry.
pub struct RegistryClient {
    client: Client,
    config: SmokeConfig,
}

impl RegistryClient {
    /// Create a client for the package named in `config`.
    pub fn new(client: Client, config: &SmokeConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// The version the registry tags as `latest`.
    pub fn latest_version(&self) -> Result<String> {
        let url = self.config.metadata_url();
        tracing::debug!("Fetching {}", url);
        let metadata: Value = self.client.get(&url).send()?.error_for_status()?.json()?;

        metadata["dist-tags"]["latest"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| PlatkitError::BadResponse {
                url,
                message: "no dist-tags.latest in package metadata".to_string(),
            })
    }

    /// Size in bytes of the published artifact for `version`, read from the
    /// headers of a HEAD request.
    pub fn artifact_size(&self, version: &str) -> Result<u64> {
        let url = self.config.artifact_url(version);
        tracing::debug!("Fetching headers of {}", url);
        let response = self.client.head(&url).send()?.error_for_status()?;

        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .ok_or_else(|| PlatkitError::BadResponse {
                url,
                message: "missing or invalid content-length".to_string(),
            })
    }

    /// Latest published version and its artifact size.
    pub fn baseline(&self) -> Result<(String, u64)> {
        let version = self.latest_version()?;
        let size = self.artifact_size(&version)?;
        tracing::info!("Baseline is {} at {} bytes", version, size);
        Ok((version, size))
    }
}

/// Check that `size` is within `baseline * (1 ± tolerance)`, inclusive.
///
/// Bounds are rounded to whole bytes.
pub fn check_size(size: u64, baseline: u64, tolerance: f64) -> Result<()> {
    let lower = (baseline as f64 * (1.0 - tolerance)).round() as u64;
    let upper = (baseline as f64 * (1.0 + tolerance)).round() as u64;

    if (lower..=upper).contains(&size) {
        return Ok(());
    }
    Err(PlatkitError::SizeRegression {
        size,
        baseline,
        lower,
        upper,
    })
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package registry clients (MCP servers and skills).
//!
//! Registries return normalized search hits and resolved descriptors; the
//! HTTP shape is registry-specific and kept out of the core.

use agx_core::RegistryKind;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Timeout for the background update probe; failures are silent.
pub const UPDATE_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry '{0}' is not configured")]
    Unknown(String),
    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("package '{0}' not found")]
    NotFound(String),
}

/// One normalized search result.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// A resolved installable package descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedPackage {
    pub name: String,
    pub kind: RegistryKind,
    /// Download or repo URL for the package contents.
    pub url: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn search(
        &self,
        kind: RegistryKind,
        registry_url: &str,
        query: &str,
        api_key: Option<&str>,
    ) -> Result<Vec<SearchHit>, RegistryError>;

    async fn resolve(
        &self,
        kind: RegistryKind,
        registry_url: &str,
        name: &str,
        api_key: Option<&str>,
    ) -> Result<ResolvedPackage, RegistryError>;

    /// Latest published CLI version, for the startup update hint.
    /// Failures are swallowed by the caller; keep the timeout short.
    async fn latest_cli_version(&self) -> Option<String>;
}

/// JSON-over-HTTP client.
#[derive(Debug, Clone)]
pub struct HttpRegistryClient {
    client: reqwest::Client,
}

impl HttpRegistryClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpRegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn search(
        &self,
        _kind: RegistryKind,
        registry_url: &str,
        query: &str,
        api_key: Option<&str>,
    ) -> Result<Vec<SearchHit>, RegistryError> {
        let url = format!("{}/search", registry_url.trim_end_matches('/'));
        let mut req = self.client.get(url).query(&[("q", query)]);
        if let Some(key) = api_key {
            req = req.bearer_auth(key);
        }
        let response: SearchResponse = req.send().await?.error_for_status()?.json().await?;
        Ok(response.results)
    }

    async fn resolve(
        &self,
        _kind: RegistryKind,
        registry_url: &str,
        name: &str,
        api_key: Option<&str>,
    ) -> Result<ResolvedPackage, RegistryError> {
        let url = format!(
            "{}/packages/{name}",
            registry_url.trim_end_matches('/')
        );
        let mut req = self.client.get(url);
        if let Some(key) = api_key {
            req = req.bearer_auth(key);
        }
        let response = req.send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        Ok(response.error_for_status()?.json().await?)
    }

    async fn latest_cli_version(&self) -> Option<String> {
        #[derive(Deserialize)]
        struct DistTags {
            latest: Option<String>,
        }
        #[derive(Deserialize)]
        struct PackageDoc {
            #[serde(rename = "dist-tags")]
            dist_tags: Option<DistTags>,
        }
        let response = self
            .client
            .get("https://registry.npmjs.org/agx-cli")
            .timeout(UPDATE_PROBE_TIMEOUT)
            .send()
            .await
            .ok()?;
        let doc: PackageDoc = response.json().await.ok()?;
        doc.dist_tags?.latest
    }
}

/// Scripted registry for tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct FakeRegistryClient {
    hits: std::sync::Arc<parking_lot::Mutex<Vec<SearchHit>>>,
    packages:
        std::sync::Arc<parking_lot::Mutex<std::collections::HashMap<String, ResolvedPackage>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeRegistryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hit(self, name: &str, description: &str) -> Self {
        self.hits.lock().push(SearchHit {
            name: name.to_string(),
            description: description.to_string(),
            version: None,
        });
        self
    }

    pub fn with_package(self, pkg: ResolvedPackage) -> Self {
        self.packages.lock().insert(pkg.name.clone(), pkg);
        self
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl RegistryClient for FakeRegistryClient {
    async fn search(
        &self,
        _kind: RegistryKind,
        _registry_url: &str,
        query: &str,
        _api_key: Option<&str>,
    ) -> Result<Vec<SearchHit>, RegistryError> {
        Ok(self
            .hits
            .lock()
            .iter()
            .filter(|h| h.name.contains(query) || h.description.contains(query))
            .cloned()
            .collect())
    }

    async fn resolve(
        &self,
        _kind: RegistryKind,
        _registry_url: &str,
        name: &str,
        _api_key: Option<&str>,
    ) -> Result<ResolvedPackage, RegistryError> {
        self.packages
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    async fn latest_cli_version(&self) -> Option<String> {
        None
    }
}

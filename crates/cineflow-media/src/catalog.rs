//! Asset, template and workflow catalog.
//!
//! Reads never fail: network errors, non-OK responses and empty payloads all
//! fall back to the built-in lists in [`crate::fallback`].

use std::future::Future;

use cineflow_timeline::{Asset, ProjectTemplate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{MediaError, Result};
use crate::fallback;

// ── Catalog types ──────────────────────────────────────────────

/// A node type offered by the workflow builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// A saved workflow: an ordered chain of node templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Node template IDs in execution order.
    #[serde(default)]
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

/// Handle for a submitted workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub run_id: Uuid,
    pub workflow_id: String,
    pub status: RunStatus,
}

// ── Backend ────────────────────────────────────────────────────

/// Where catalog data comes from.
pub trait CatalogBackend {
    fn fetch_assets(&self) -> impl Future<Output = Result<Vec<Asset>>> + Send;
    fn fetch_templates(&self) -> impl Future<Output = Result<Vec<ProjectTemplate>>> + Send;
    fn fetch_node_templates(&self) -> impl Future<Output = Result<Vec<NodeTemplate>>> + Send;
    fn fetch_workflows(&self) -> impl Future<Output = Result<Vec<Workflow>>> + Send;
}

/// Catalog served over HTTP as JSON arrays under `<base>/api/...`.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        debug!(%url, "Fetching catalog");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Http {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }
}

impl CatalogBackend for HttpCatalog {
    async fn fetch_assets(&self) -> Result<Vec<Asset>> {
        self.get_json("api/assets").await
    }

    async fn fetch_templates(&self) -> Result<Vec<ProjectTemplate>> {
        self.get_json("api/templates").await
    }

    async fn fetch_node_templates(&self) -> Result<Vec<NodeTemplate>> {
        self.get_json("api/node-templates").await
    }

    async fn fetch_workflows(&self) -> Result<Vec<Workflow>> {
        self.get_json("api/workflows").await
    }
}

// ── Catalog ────────────────────────────────────────────────────

/// Catalog reads with fallback data.
#[derive(Debug, Clone)]
pub struct Catalog<B = HttpCatalog> {
    backend: B,
}

impl Catalog<HttpCatalog> {
    /// HTTP catalog rooted at `base_url`.
    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(HttpCatalog::new(base_url))
    }
}

impl<B: CatalogBackend> Catalog<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn get_assets(&self) -> Vec<Asset> {
        or_fallback("assets", self.backend.fetch_assets().await, fallback::assets)
    }

    pub async fn get_templates(&self) -> Vec<ProjectTemplate> {
        or_fallback("templates", self.backend.fetch_templates().await, fallback::templates)
    }

    pub async fn get_node_templates(&self) -> Vec<NodeTemplate> {
        or_fallback(
            "node templates",
            self.backend.fetch_node_templates().await,
            fallback::node_templates,
        )
    }

    pub async fn get_all_workflows(&self) -> Vec<Workflow> {
        or_fallback("workflows", self.backend.fetch_workflows().await, fallback::workflows)
    }

    /// Submit a workflow. Runs are only queued; nothing executes.
    pub fn execute_workflow(&self, workflow_id: &str) -> WorkflowRun {
        let run = WorkflowRun {
            run_id: Uuid::new_v4(),
            workflow_id: workflow_id.to_owned(),
            status: RunStatus::Queued,
        };
        info!(workflow = workflow_id, run = %run.run_id, "Workflow queued");
        run
    }
}

fn or_fallback<T>(what: &str, fetched: Result<Vec<T>>, fallback: fn() -> Vec<T>) -> Vec<T> {
    match fetched {
        Ok(items) if !items.is_empty() => items,
        Ok(_) => {
            warn!(what, "Catalog returned no items, using fallback data");
            fallback()
        }
        Err(e) => {
            warn!(what, error = %e, "Catalog fetch failed, using fallback data");
            fallback()
        }
    }
}

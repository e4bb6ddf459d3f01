//! AI edit service client.
//!
//! A request carries a free-text instruction and optional source media. When the
//! service cannot be reached, [`edit_or_fallback`] returns a synthetic result so
//! the editor can keep going.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{MediaError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiEditRequest {
    /// What to do, e.g. "remove the background".
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl AiEditRequest {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            image_url: None,
            video_url: None,
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_video(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    /// Source media the edit applies to, preferring video.
    pub fn source(&self) -> Option<&str> {
        self.video_url.as_deref().or(self.image_url.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiEditResult {
    pub id: String,
    /// Edited media, if the service produced any.
    #[serde(default)]
    pub output_url: Option<String>,
    #[serde(default)]
    pub summary: String,
    /// Set on results made up locally after a failed call.
    #[serde(default)]
    pub synthetic: bool,
}

impl AiEditResult {
    /// Stand-in result: echoes the source media back unchanged.
    pub fn synthetic(request: &AiEditRequest) -> Self {
        Self {
            id: format!("local-{}", Uuid::new_v4()),
            output_url: request.source().map(str::to_owned),
            summary: format!("AI edit unavailable; \"{}\" was not applied", request.instruction),
            synthetic: true,
        }
    }
}

pub trait AiEditService {
    fn edit(&self, request: &AiEditRequest) -> impl Future<Output = Result<AiEditResult>> + Send;
}

/// Service reached by POSTing the request as JSON to a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpAiEdit {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAiEdit {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl AiEditService for HttpAiEdit {
    async fn edit(&self, request: &AiEditRequest) -> Result<AiEditResult> {
        if request.instruction.trim().is_empty() {
            return Err(MediaError::Payload("empty instruction".into()));
        }
        debug!(endpoint = %self.endpoint, instruction = %request.instruction, "Sending AI edit");
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Http {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }
        Ok(response.json().await?)
    }
}

/// Run an edit, substituting [`AiEditResult::synthetic`] on any failure.
pub async fn edit_or_fallback<S: AiEditService>(
    service: &S,
    request: &AiEditRequest,
) -> AiEditResult {
    match service.edit(request).await {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "AI edit failed, returning synthetic result");
            AiEditResult::synthetic(request)
        }
    }
}

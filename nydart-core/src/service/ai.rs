//! HTTP client for the AI analysis service.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::http::{body_text, build_client, reject_unauthorized};
use super::AnalysisService;
use crate::analysis::AnalysisRequest;
use crate::config::endpoint;
use crate::error::{AdvisorError, Result};

const SERVICE: &str = "AI analysis service";

/// AI analysis service over HTTP.
///
/// - `GET {base}/health`: 2xx means alive
/// - `POST {base}/api/ai/analyze`: multipart `image` + `analysis_type`, bearer auth
pub struct HttpAnalysisService {
    client: Client,
    base_url: String,
    health_url: String,
    analyze_url: String,
}

impl HttpAnalysisService {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let client = build_client(SERVICE)?;
        debug!(base_url = %base_url, "Created AI analysis client");
        Ok(Self {
            client,
            health_url: endpoint(&base_url, "/health"),
            analyze_url: endpoint(&base_url, "/api/ai/analyze"),
            base_url,
        })
    }

    pub fn health_url(&self) -> &str {
        &self.health_url
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    #[instrument(level = "debug", skip(self), fields(url = %self.health_url))]
    async fn probe_health(&self) -> bool {
        let start = Instant::now();
        match self.client.get(&self.health_url).send().await {
            Ok(response) => {
                let healthy = response.status().is_success();
                debug!(
                    status = %response.status(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    healthy,
                    "Health probe answered"
                );
                healthy
            }
            Err(e) => {
                warn!(
                    error = %e,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Health probe failed"
                );
                false
            }
        }
    }

    #[instrument(
        level = "info",
        skip(self, request),
        fields(
            file = %request.image.file_name,
            analysis_type = %request.analysis_type,
            bytes = request.image.size()
        )
    )]
    async fn upload(&self, request: &AnalysisRequest) -> Result<Value> {
        let start = Instant::now();

        let image = Part::bytes(request.image.bytes.clone())
            .file_name(request.image.file_name.clone())
            .mime_str(request.image.mime_type())?;
        let form = Form::new()
            .part("image", image)
            .text("analysis_type", request.analysis_type.as_str());

        let response = self
            .client
            .post(&self.analyze_url)
            .bearer_auth(&request.credential)
            .multipart(form)
            .send()
            .await?;

        reject_unauthorized(&response, SERVICE)?;

        let status = response.status();
        if !status.is_success() {
            let detail = body_text(response).await;
            warn!(
                status = %status,
                latency_ms = start.elapsed().as_millis() as u64,
                "Analysis request rejected"
            );
            return Err(AdvisorError::AnalysisRequest {
                status: status.as_u16(),
                detail,
            });
        }

        let payload: Value = response.json().await?;
        info!(
            latency_ms = start.elapsed().as_millis() as u64,
            "Analysis received"
        );
        Ok(payload)
    }

    fn service_url(&self) -> &str {
        &self.base_url
    }
}

//! HTTP client for the persistence service's analysis endpoints.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use super::http::{body_text, build_client, reject_unauthorized};
use super::HistoryService;
use crate::config::endpoint;
use crate::error::{AdvisorError, Result};
use crate::history::{AnalysisDetail, AnalysisList, RemoteAnalysis};

const SERVICE: &str = "persistence service";

/// Persistence service over HTTP.
pub struct HttpHistoryService {
    client: Client,
    base_url: String,
}

impl HttpHistoryService {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(SERVICE)?,
            base_url: base_url.into(),
        })
    }

    /// `GET /api/analyses/user`, with `?limit=N` when bounded.
    pub fn list_url(&self, limit: Option<u32>) -> String {
        let url = endpoint(&self.base_url, "/api/analyses/user");
        match limit {
            Some(limit) => format!("{url}?limit={limit}"),
            None => url,
        }
    }

    pub fn analysis_url(&self, id: &str) -> String {
        endpoint(&self.base_url, &format!("/api/analyses/{id}"))
    }
}

#[async_trait]
impl HistoryService for HttpHistoryService {
    #[instrument(level = "debug", skip(self, credential))]
    async fn list_recent(
        &self,
        limit: Option<u32>,
        credential: &str,
    ) -> Result<Vec<RemoteAnalysis>> {
        let start = Instant::now();
        let response = self
            .client
            .get(self.list_url(limit))
            .bearer_auth(credential)
            .send()
            .await?;

        reject_unauthorized(&response, SERVICE)?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Failed to fetch analyses");
            return Err(AdvisorError::History(format!(
                "Failed to fetch analyses ({status})"
            )));
        }

        let list: AnalysisList = response
            .json()
            .await
            .map_err(|e| AdvisorError::History(format!("Unreadable analysis list: {e}")))?;

        debug!(
            count = list.analyses.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Fetched analyses"
        );
        Ok(list.analyses)
    }

    #[instrument(level = "debug", skip(self, credential))]
    async fn get_analysis(&self, id: &str, credential: &str) -> Result<AnalysisDetail> {
        let response = self
            .client
            .get(self.analysis_url(id))
            .bearer_auth(credential)
            .send()
            .await?;

        reject_unauthorized(&response, SERVICE)?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "Analysis lookup failed");
            return Err(AdvisorError::History("Analysis not found".into()));
        }

        response
            .json()
            .await
            .map_err(|e| AdvisorError::History(format!("Unreadable analysis: {e}")))
    }

    #[instrument(level = "debug", skip(self, credential))]
    async fn delete_analysis(&self, id: &str, credential: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.analysis_url(id))
            .bearer_auth(credential)
            .send()
            .await?;

        reject_unauthorized(&response, SERVICE)?;
        let status = response.status();
        if !status.is_success() {
            let detail = body_text(response).await;
            warn!(status = %status, detail = %detail, "Failed to delete analysis");
            return Err(AdvisorError::History("Failed to delete analysis".into()));
        }

        debug!("Deleted analysis");
        Ok(())
    }
}

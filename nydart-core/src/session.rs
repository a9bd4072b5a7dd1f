//! End-to-end analysis workflow for one signed-in user.
//!
//! ```no_run
//! use nydart_core::{AdvisorConfig, AnalysisSession, AnalysisType, FileStore, SourceImage};
//!
//! # async fn example() -> nydart_core::Result<()> {
//! let config = AdvisorConfig::from_env()?;
//! let session = AnalysisSession::from_config(&config, FileStore::new("/tmp/nydart"))?;
//! session.mount().await;
//!
//! let source = SourceImage::from_path("painting.png")
//!     .map_err(|e| nydart_core::AdvisorError::Processing(e.to_string()))?;
//! let image = session.prepare_image(&source)?;
//! let submission = session.analyze(image, AnalysisType::General).await?;
//! println!("{}", submission.result.technical_assessment);
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};

use chrono::Local;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::analysis::{AnalysisRequest, AnalysisResult, AnalysisType, RecentAnalysisEntry};
use crate::compress::{CompressedImage, ImageNormalizer, SourceImage};
use crate::config::{AdvisorConfig, DEFAULT_HISTORY_LIMIT};
use crate::error::{AdvisorError, Result};
use crate::health::HealthCache;
use crate::history::{
    AnalysisDetail, HistoryView, KeyValueStore, LocalHistory, RemoteAnalysis,
};
use crate::normalize::{normalize, UpstreamAnalysis};
use crate::service::{HistoryService, HttpAnalysisService, HttpHistoryService};
use crate::submit::Submitter;

/// Outcome of a successful analysis.
#[derive(Debug)]
pub struct Submission {
    pub result: AnalysisResult,
    /// The entry written to the local history.
    pub entry: RecentAnalysisEntry,
    /// Background refresh of the remote list, if one was started. The result
    /// is usable before it finishes.
    pub refresh: Option<JoinHandle<()>>,
}

/// Wires image normalization, submission, normalization and both history
/// views together.
pub struct AnalysisSession<S> {
    submitter: Submitter,
    normalizer: ImageNormalizer,
    history_service: Arc<dyn HistoryService>,
    local: LocalHistory<S>,
    remote: Arc<Mutex<Vec<RemoteAnalysis>>>,
    credential: Option<String>,
    history_limit: u32,
}

impl<S: KeyValueStore> AnalysisSession<S> {
    pub fn new(submitter: Submitter, history_service: Arc<dyn HistoryService>, store: S) -> Self {
        Self {
            submitter,
            normalizer: ImageNormalizer::default(),
            history_service,
            local: LocalHistory::new(store),
            remote: Arc::new(Mutex::new(Vec::new())),
            credential: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Build a session talking to the services named in `config`.
    pub fn from_config(config: &AdvisorConfig, store: S) -> Result<Self> {
        config.validate()?;
        let analysis = Arc::new(HttpAnalysisService::new(config.ai_service_url.clone())?);
        let history = Arc::new(HttpHistoryService::new(config.db_service_url.clone())?);
        let submitter = Submitter::new(analysis, Arc::new(HealthCache::new(config.health_ttl)))
            .with_upload_timeout(config.upload_timeout);

        Ok(Self::new(submitter, history, store)
            .with_credential(config.token.clone())
            .with_history_limit(config.history_limit))
    }

    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_history_limit(mut self, limit: u32) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    pub fn submitter(&self) -> &Submitter {
        &self.submitter
    }

    fn credential(&self) -> Result<&str> {
        self.credential
            .as_deref()
            .ok_or(AdvisorError::NotAuthenticated)
    }

    /// Bound and re-encode a user-selected image.
    pub fn prepare_image(&self, source: &SourceImage) -> Result<CompressedImage> {
        self.normalizer.normalize(source)
    }

    /// Initial load: fetch the remote list when signed in. Failures are logged
    /// and leave the remote list empty, so the local list is shown.
    pub async fn mount(&self) -> HistoryView {
        if self.is_authenticated() {
            if let Err(e) = self.refresh_remote().await {
                warn!(error = %e, "Failed to fetch remote analyses");
            }
        }
        self.history_view()
    }

    /// Replace the in-memory remote list with the newest server entries.
    pub async fn refresh_remote(&self) -> Result<usize> {
        let credential = self.credential()?;
        let analyses = self
            .history_service
            .list_recent(Some(self.history_limit), credential)
            .await?;
        let count = analyses.len();
        *self.remote.lock().unwrap_or_else(|e| e.into_inner()) = analyses;
        debug!(count, "Remote history replaced");
        Ok(count)
    }

    /// Submit `image` for analysis.
    ///
    /// On success the normalized result is recorded in the local history and
    /// a remote refresh is started in the background.
    #[instrument(level = "info", skip(self, image), fields(file = %image.file_name))]
    pub async fn analyze(
        &self,
        image: CompressedImage,
        analysis_type: AnalysisType,
    ) -> Result<Submission> {
        let credential = self.credential()?.to_string();

        let request = AnalysisRequest {
            image,
            analysis_type,
            credential: credential.clone(),
        };
        let payload = self.submitter.submit(&request).await?;
        drop(request);

        let result = normalize(&UpstreamAnalysis::from(&payload));
        let entry = RecentAnalysisEntry::new(analysis_type, result.clone(), Local::now());
        let entry = match self.local.record(entry.clone()) {
            Ok(entries) => entries.into_iter().next().unwrap_or(entry),
            Err(e) => {
                warn!(error = %e, "Failed to persist local history");
                entry
            }
        };

        info!(entry_id = entry.id, "Analysis complete");

        let refresh = Some(self.spawn_remote_refresh(credential));
        Ok(Submission {
            result,
            entry,
            refresh,
        })
    }

    fn spawn_remote_refresh(&self, credential: String) -> JoinHandle<()> {
        let service = Arc::clone(&self.history_service);
        let remote = Arc::clone(&self.remote);
        let limit = self.history_limit;

        tokio::spawn(async move {
            match service.list_recent(Some(limit), &credential).await {
                Ok(analyses) => {
                    debug!(count = analyses.len(), "Remote history refreshed");
                    *remote.lock().unwrap_or_else(|e| e.into_inner()) = analyses;
                }
                Err(e) => warn!(error = %e, "Failed to refresh remote analyses"),
            }
        })
    }

    pub fn local_entries(&self) -> Vec<RecentAnalysisEntry> {
        self.local.load()
    }

    pub fn remote_entries(&self) -> Vec<RemoteAnalysis> {
        self.remote.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The list that should be rendered right now.
    pub fn history_view(&self) -> HistoryView {
        HistoryView::select(&self.remote_entries(), &self.local_entries())
    }

    /// Normalized result for a rendered history entry.
    pub fn select(&self, id: &str) -> Option<AnalysisResult> {
        self.history_view().resolve(id)
    }

    /// Every stored analysis of the user, without the page-size bound.
    pub async fn list_all_remote(&self) -> Result<Vec<RemoteAnalysis>> {
        let credential = self.credential()?;
        self.history_service.list_recent(None, credential).await
    }

    pub async fn fetch_detail(&self, id: &str) -> Result<AnalysisDetail> {
        let credential = self.credential()?;
        self.history_service.get_analysis(id, credential).await
    }

    /// Delete a stored analysis and drop it from the in-memory remote list.
    pub async fn delete_remote(&self, id: &str) -> Result<()> {
        let credential = self.credential()?;
        self.history_service.delete_analysis(id, credential).await?;
        self.remote
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|a| a.id != id);
        info!(id, "Deleted analysis");
        Ok(())
    }

    pub fn clear_local(&self) -> Result<()> {
        self.local.clear()
    }
}

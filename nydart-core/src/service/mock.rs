//! Scripted in-memory services for testing.
//! WARNING: Do not use in production - responses are canned!

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{AnalysisService, HistoryService};
use crate::analysis::{AnalysisRequest, AnalysisType};
use crate::error::{AdvisorError, Result};
use crate::history::{AnalysisDetail, RemoteAnalysis};

/// How the mock answers an upload.
#[derive(Debug, Clone)]
pub enum UploadBehavior {
    /// 2xx with this JSON body.
    Respond(Value),
    /// Non-2xx with this status and text body.
    Fail { status: u16, detail: String },
    /// 401.
    Unauthorized,
    /// Never answers.
    Hang,
}

/// What the mock saw for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub file_name: String,
    pub analysis_type: AnalysisType,
    pub credential: String,
    pub bytes: usize,
}

/// Mock AI analysis service.
pub struct MockAnalysisService {
    healthy: AtomicBool,
    behavior: Mutex<UploadBehavior>,
    health_probes: AtomicUsize,
    uploads: Mutex<Vec<RecordedUpload>>,
}

impl MockAnalysisService {
    pub fn new(healthy: bool, behavior: UploadBehavior) -> Self {
        Self {
            healthy: AtomicBool::new(healthy),
            behavior: Mutex::new(behavior),
            health_probes: AtomicUsize::new(0),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Healthy service answering every upload with `body`.
    pub fn responding(body: Value) -> Self {
        Self::new(true, UploadBehavior::Respond(body))
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn set_behavior(&self, behavior: UploadBehavior) {
        *self.behavior.lock().unwrap_or_else(|e| e.into_inner()) = behavior;
    }

    pub fn health_probe_count(&self) -> usize {
        self.health_probes.load(Ordering::SeqCst)
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisService {
    async fn probe_health(&self) -> bool {
        self.health_probes.fetch_add(1, Ordering::SeqCst);
        self.healthy.load(Ordering::SeqCst)
    }

    async fn upload(&self, request: &AnalysisRequest) -> Result<Value> {
        self.uploads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedUpload {
                file_name: request.image.file_name.clone(),
                analysis_type: request.analysis_type,
                credential: request.credential.clone(),
                bytes: request.image.size(),
            });

        let behavior = self
            .behavior
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        match behavior {
            UploadBehavior::Respond(body) => Ok(body),
            UploadBehavior::Fail { status, detail } => {
                Err(AdvisorError::AnalysisRequest { status, detail })
            }
            UploadBehavior::Unauthorized => Err(AdvisorError::Unauthorized {
                service: "mock AI service".into(),
            }),
            UploadBehavior::Hang => std::future::pending().await,
        }
    }

    fn service_url(&self) -> &str {
        "mock://ai-service"
    }
}

/// Mock persistence service holding analyses newest first.
#[derive(Default)]
pub struct MockHistoryService {
    analyses: Mutex<Vec<RemoteAnalysis>>,
    failing: AtomicBool,
    list_calls: AtomicUsize,
    limits: Mutex<Vec<Option<u32>>>,
}

impl MockHistoryService {
    pub fn new(analyses: Vec<RemoteAnalysis>) -> Self {
        Self {
            analyses: Mutex::new(analyses),
            ..Default::default()
        }
    }

    /// Make every call fail with a history error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_analyses(&self, analyses: Vec<RemoteAnalysis>) {
        *self.analyses.lock().unwrap_or_else(|e| e.into_inner()) = analyses;
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Limits requested by each list call, in order.
    pub fn requested_limits(&self) -> Vec<Option<u32>> {
        self.limits.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn check(&self, credential: &str) -> Result<()> {
        if credential.is_empty() {
            return Err(AdvisorError::Unauthorized {
                service: "mock persistence service".into(),
            });
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(AdvisorError::History("Failed to fetch analyses".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryService for MockHistoryService {
    async fn list_recent(
        &self,
        limit: Option<u32>,
        credential: &str,
    ) -> Result<Vec<RemoteAnalysis>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.limits
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(limit);
        self.check(credential)?;

        let analyses = self.analyses.lock().unwrap_or_else(|e| e.into_inner());
        let take = limit.map_or(analyses.len(), |l| l as usize);
        Ok(analyses.iter().take(take).cloned().collect())
    }

    async fn get_analysis(&self, id: &str, credential: &str) -> Result<AnalysisDetail> {
        self.check(credential)?;
        let analyses = self.analyses.lock().unwrap_or_else(|e| e.into_inner());
        analyses
            .iter()
            .find(|a| a.id == id)
            .map(|a| AnalysisDetail {
                analysis: a.clone(),
                artwork: None,
            })
            .ok_or_else(|| AdvisorError::History("Analysis not found".into()))
    }

    async fn delete_analysis(&self, id: &str, credential: &str) -> Result<()> {
        self.check(credential)?;
        let mut analyses = self.analyses.lock().unwrap_or_else(|e| e.into_inner());
        let before = analyses.len();
        analyses.retain(|a| a.id != id);
        if analyses.len() == before {
            return Err(AdvisorError::History("Failed to delete analysis".into()));
        }
        Ok(())
    }
}

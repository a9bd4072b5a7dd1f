//! Health-gated submission of analysis requests.
//!
//! Ordering within one submission: health check, then upload. The upload is
//! the only cancellable step; it is dropped (aborting the request) once the
//! deadline passes. Nothing is retried automatically.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::analysis::AnalysisRequest;
use crate::config::DEFAULT_UPLOAD_TIMEOUT;
use crate::error::{AdvisorError, Result};
use crate::health::HealthCache;
use crate::service::AnalysisService;

/// Submits requests to the AI service when its cached liveness allows it.
pub struct Submitter {
    service: Arc<dyn AnalysisService>,
    health: Arc<HealthCache>,
    upload_timeout: Duration,
}

impl Submitter {
    pub fn new(service: Arc<dyn AnalysisService>, health: Arc<HealthCache>) -> Self {
        Self {
            service,
            health,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
        }
    }

    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    pub fn upload_timeout(&self) -> Duration {
        self.upload_timeout
    }

    /// Whether the service is reachable, reusing a fresh cached answer.
    ///
    /// Every probe outcome is cached, including failures.
    pub async fn check_health(&self) -> bool {
        if let Some(healthy) = self.health.get() {
            debug!(healthy, "Using cached health result");
            return healthy;
        }

        let healthy = self.service.probe_health().await;
        self.health.record(healthy);
        debug!(healthy, "Probed service health");
        healthy
    }

    /// Upload `request` and return the raw JSON payload.
    ///
    /// Fails with [`AdvisorError::BackendUnavailable`] without uploading when
    /// the health check is negative, and with [`AdvisorError::Timeout`] when
    /// the upload outlives the deadline.
    #[instrument(
        level = "info",
        skip(self, request),
        fields(analysis_type = %request.analysis_type, file = %request.image.file_name)
    )]
    pub async fn submit(&self, request: &AnalysisRequest) -> Result<Value> {
        if !self.check_health().await {
            warn!(service_url = %self.service.service_url(), "Analysis service unavailable");
            return Err(AdvisorError::BackendUnavailable {
                service_url: self.service.service_url().to_string(),
            });
        }

        match tokio::time::timeout(self.upload_timeout, self.service.upload(request)).await {
            Ok(result) => {
                if result.is_ok() {
                    info!("Upload completed");
                }
                result
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.upload_timeout.as_millis() as u64,
                    "Upload aborted at deadline"
                );
                Err(AdvisorError::Timeout(self.upload_timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisType;
    use crate::compress::CompressedImage;
    use crate::service::{MockAnalysisService, UploadBehavior};
    use chrono::Utc;
    use serde_json::json;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            image: CompressedImage {
                file_name: "sketch.jpg".into(),
                bytes: vec![0xFF, 0xD8, 0xFF],
                width: 10,
                height: 10,
                last_modified: Utc::now(),
            },
            analysis_type: AnalysisType::Technical,
            credential: "token-123".into(),
        }
    }

    fn submitter(mock: &Arc<MockAnalysisService>) -> Submitter {
        Submitter::new(mock.clone(), Arc::new(HealthCache::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_success() {
        let mock = Arc::new(MockAnalysisService::responding(json!({"style": "Cubism"})));
        let payload = submitter(&mock).submit(&request()).await.unwrap();

        assert_eq!(payload["style"], "Cubism");
        let uploads = mock.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].credential, "token-123");
        assert_eq!(uploads[0].analysis_type, AnalysisType::Technical);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unhealthy_blocks_upload() {
        let mock = Arc::new(MockAnalysisService::new(false, UploadBehavior::Respond(json!({}))));
        let err = submitter(&mock).submit(&request()).await.unwrap_err();

        assert!(matches!(err, AdvisorError::BackendUnavailable { .. }));
        assert_eq!(mock.upload_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_health_cached_within_ttl() {
        let mock = Arc::new(MockAnalysisService::responding(json!({})));
        let submitter = submitter(&mock);

        assert!(submitter.check_health().await);
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(submitter.check_health().await);
        assert_eq!(mock.health_probe_count(), 1);

        tokio::time::advance(Duration::from_secs(21)).await;
        assert!(submitter.check_health().await);
        assert_eq!(mock.health_probe_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_negative_health_short_circuits() {
        let mock = Arc::new(MockAnalysisService::new(false, UploadBehavior::Respond(json!({}))));
        let submitter = submitter(&mock);

        assert!(!submitter.check_health().await);
        // Service recovers, but the cached failure still holds
        mock.set_healthy(true);
        assert!(!submitter.check_health().await);
        assert_eq!(mock.health_probe_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_upload_times_out() {
        let mock = Arc::new(MockAnalysisService::new(true, UploadBehavior::Hang));
        let submitter = submitter(&mock).with_upload_timeout(Duration::from_secs(30));

        let err = submitter.submit(&request()).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Timeout(d) if d == Duration::from_secs(30)));
        assert_eq!(mock.upload_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_error_passes_through() {
        let mock = Arc::new(MockAnalysisService::new(
            true,
            UploadBehavior::Fail {
                status: 413,
                detail: "Image too large".into(),
            },
        ));
        let err = submitter(&mock).submit(&request()).await.unwrap_err();
        match err {
            AdvisorError::AnalysisRequest { status, detail } => {
                assert_eq!(status, 413);
                assert_eq!(detail, "Image too large");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! Remote collaborators of the analysis pipeline.
//!
//! - **AI analysis service** ([`AnalysisService`]): liveness probe and image upload
//! - **Persistence service** ([`HistoryService`]): stored analyses per user
//!
//! Both come with an HTTP implementation and a scripted mock for tests.
//!
//! ## Example
//!
//! ```no_run
//! use nydart_core::service::{AnalysisService, HttpAnalysisService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = HttpAnalysisService::new("http://localhost:5000")?;
//! println!("healthy: {}", service.probe_health().await);
//! # Ok(())
//! # }
//! ```

mod ai;
mod db;
mod http;
mod mock;

pub use ai::HttpAnalysisService;
pub use db::HttpHistoryService;
pub use mock::{MockAnalysisService, MockHistoryService, UploadBehavior};

use async_trait::async_trait;
use serde_json::Value;

use crate::analysis::AnalysisRequest;
use crate::error::Result;
use crate::history::{AnalysisDetail, RemoteAnalysis};

/// The AI analysis service.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Liveness probe. Any failure reads as unhealthy.
    async fn probe_health(&self) -> bool;

    /// Upload an image for analysis and return the raw JSON payload.
    ///
    /// Callers enforce the upload deadline; dropping the returned future
    /// aborts the request.
    async fn upload(&self, request: &AnalysisRequest) -> Result<Value>;

    /// Base URL, for diagnostics.
    fn service_url(&self) -> &str;
}

/// The persistence service holding a user's past analyses.
#[async_trait]
pub trait HistoryService: Send + Sync {
    /// Most recent analyses for the credential's user, server-ordered.
    /// `None` lists every analysis.
    async fn list_recent(&self, limit: Option<u32>, credential: &str)
        -> Result<Vec<RemoteAnalysis>>;

    /// One analysis with its artwork.
    async fn get_analysis(&self, id: &str, credential: &str) -> Result<AnalysisDetail>;

    async fn delete_analysis(&self, id: &str, credential: &str) -> Result<()>;
}

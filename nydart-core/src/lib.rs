//! NydArt Core - artwork analysis client library
//!
//! This crate implements the client side of the NydArt Advisor analysis
//! workflow: a user-selected image is bounded and re-encoded, submitted to
//! the AI analysis service behind a cached liveness check and an upload
//! deadline, and the loosely-structured critique that comes back is
//! normalized into a fixed display shape and recorded in history.
//!
//! # Features
//!
//! - Image normalization: longest edge at most 1200px, JPEG quality 80
//! - Health-gated submission with a 30s liveness cache and a 30s upload deadline
//! - Total result normalization over every known upstream shape
//! - Bounded local history plus the authoritative remote list, remote first
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use nydart_core::{
//!     AnalysisSession, AnalysisType, HealthCache, MemoryStore, MockAnalysisService,
//!     MockHistoryService, SourceImage, Submitter,
//! };
//!
//! # async fn example() -> nydart_core::Result<()> {
//! let service = Arc::new(MockAnalysisService::responding(serde_json::json!({})));
//! let submitter = Submitter::new(service, Arc::new(HealthCache::default()));
//! let session = AnalysisSession::new(
//!     submitter,
//!     Arc::new(MockHistoryService::default()),
//!     MemoryStore::new(),
//! )
//! .with_credential(Some("token".into()));
//!
//! let bytes = std::fs::read("painting.jpg").unwrap();
//! let image = session.prepare_image(&SourceImage::new("painting.jpg", bytes))?;
//! let submission = session.analyze(image, AnalysisType::General).await?;
//! assert!(submission.result.improvements.len() >= 3);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod compress;
pub mod config;
pub mod error;
pub mod history;
mod lenient;
pub mod normalize;
pub mod report;

#[cfg(feature = "network")]
pub mod health;
#[cfg(feature = "network")]
pub mod service;
#[cfg(feature = "network")]
pub mod session;
#[cfg(feature = "network")]
pub mod submit;

// Re-export main types for convenience
pub use analysis::{
    AnalysisRequest, AnalysisResult, AnalysisType, LearningResource, RecentAnalysisEntry,
};
pub use compress::{CompressedImage, ImageNormalizer, SourceImage};
pub use config::AdvisorConfig;
pub use error::{AdvisorError, ErrorBanner, Result};
pub use history::{
    FileStore, HistoryItem, HistorySource, HistoryView, KeyValueStore, LocalHistory,
    MemoryStore, RemoteAnalysis,
};
pub use normalize::{normalize, RawAnalysis, UpstreamAnalysis};
pub use report::{render_report, ArtworkDraft};

// Network-dependent exports
#[cfg(feature = "network")]
pub use health::HealthCache;
#[cfg(feature = "network")]
pub use service::{
    AnalysisService, HistoryService, HttpAnalysisService, HttpHistoryService,
    MockAnalysisService, MockHistoryService, UploadBehavior,
};
#[cfg(feature = "network")]
pub use session::{AnalysisSession, Submission};
#[cfg(feature = "network")]
pub use submit::Submitter;

use std::time::Duration;

use thiserror::Error;

/// Substring that marks a backend-unavailable message; banners carrying it get
/// the extra "start the backend" hint.
pub const BACKEND_UNAVAILABLE_MARKER: &str = "Cannot connect to backend server";

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Failed to process image: {0}")]
    Processing(String),

    #[error("Cannot connect to backend server at {service_url}. Please ensure it is running")]
    BackendUnavailable { service_url: String },

    #[error("Analysis request timed out after {}s. Please try again", .0.as_secs())]
    Timeout(Duration),

    #[error("Analysis request failed ({status}): {detail}")]
    AnalysisRequest { status: u16, detail: String },

    #[error("Please log in to analyze images")]
    NotAuthenticated,

    #[error("Authentication rejected by {service}: session expired or invalid")]
    Unauthorized { service: String },

    #[error("History error: {0}")]
    History(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[cfg(feature = "network")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Inline error banner shown next to the action that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub hint: Option<&'static str>,
}

impl ErrorBanner {
    pub const BACKEND_HINT: &'static str =
        "Please make sure the backend server is running locally before analyzing.";

    pub fn from_error(err: &AdvisorError) -> Self {
        let message = match err {
            AdvisorError::AnalysisRequest { detail, .. } if detail.trim().is_empty() => {
                "Failed to analyze image. Please try again.".to_string()
            }
            AdvisorError::AnalysisRequest { detail, .. } => detail.clone(),
            other => other.to_string(),
        };
        let hint = message
            .contains(BACKEND_UNAVAILABLE_MARKER)
            .then_some(Self::BACKEND_HINT);
        Self { message, hint }
    }
}

impl std::fmt::Display for ErrorBanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(hint) = self.hint {
            write!(f, "\n{hint}")?;
        }
        Ok(())
    }
}

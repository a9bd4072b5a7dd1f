//! Exit codes following sysexits.h conventions.
//!
//! Scripts can tell a missing file apart from an unreachable backend or an
//! expired login without parsing stderr.

use nydart_core::AdvisorError;

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Image could not be decoded or re-encoded.
/// Maps to EX_DATAERR from sysexits.h.
pub const PROCESSING_ERROR: i32 = 65;

/// Cannot open input file.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// Service unavailable (unhealthy backend, timeout, upstream failure).
/// Maps to EX_UNAVAILABLE from sysexits.h.
pub const NETWORK_ERROR: i32 = 69;

/// Missing or rejected credential.
/// Maps to EX_NOPERM from sysexits.h.
pub const AUTH_ERROR: i32 = 77;

/// Process exit status for a command outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode {
    pub code: i32,
}

impl ExitCode {
    pub const fn success() -> Self {
        Self { code: SUCCESS }
    }

    /// Classify an error by the first typed cause found in its chain.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let code = err
            .chain()
            .find_map(|cause| {
                if let Some(advisor) = cause.downcast_ref::<AdvisorError>() {
                    Some(Self::from_advisor(advisor))
                } else if cause.downcast_ref::<std::io::Error>().is_some() {
                    Some(INPUT_ERROR)
                } else {
                    None
                }
            })
            .unwrap_or(GENERAL_ERROR);

        Self { code }
    }

    fn from_advisor(err: &AdvisorError) -> i32 {
        match err {
            AdvisorError::Processing(_) => PROCESSING_ERROR,
            AdvisorError::BackendUnavailable { .. }
            | AdvisorError::Timeout(_)
            | AdvisorError::AnalysisRequest { .. }
            | AdvisorError::Http(_) => NETWORK_ERROR,
            AdvisorError::NotAuthenticated | AdvisorError::Unauthorized { .. } => AUTH_ERROR,
            AdvisorError::History(_) | AdvisorError::Storage(_) | AdvisorError::Config(_) => {
                GENERAL_ERROR
            }
        }
    }
}

//! Health command implementation.

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use nydart_core::{AdvisorError, HealthCache, HttpAnalysisService, Submitter};
use tracing::info;

use crate::utils::GlobalOptions;

/// Execute the health command.
pub async fn execute(global: &GlobalOptions) -> Result<()> {
    let config = global.config()?;
    let service = Arc::new(HttpAnalysisService::new(config.ai_service_url.clone())?);
    let submitter = Submitter::new(service, Arc::new(HealthCache::new(config.health_ttl)));

    if submitter.check_health().await {
        info!(url = %config.ai_service_url, "Analysis service healthy");
        if !global.quiet {
            println!("{} {}", "Healthy:".green().bold(), config.ai_service_url);
        }
        Ok(())
    } else {
        Err(AdvisorError::BackendUnavailable {
            service_url: config.ai_service_url,
        }
        .into())
    }
}

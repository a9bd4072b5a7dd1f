//! Analyze command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use nydart_core::AnalysisType;
use tracing::{info, warn};

use crate::utils::{format_size, load_source, print_result, GlobalOptions};

/// Execute the analyze command.
pub async fn execute(
    file: PathBuf,
    analysis_type: AnalysisType,
    json: bool,
    global: &GlobalOptions,
) -> Result<()> {
    let (_, session) = global.session()?;

    let source = load_source(&file)?;
    info!(path = %file.display(), bytes = source.size(), "Read image");

    let image = session.prepare_image(&source)?;
    info!(
        width = image.width,
        height = image.height,
        bytes = image.size(),
        "Compressed image"
    );

    if !global.quiet && !json {
        eprintln!(
            "{} {} ({}x{}, {}) as {}",
            "Analyzing".cyan(),
            image.file_name,
            image.width,
            image.height,
            format_size(image.size()),
            analysis_type
        );
    }

    let submission = session.analyze(image, analysis_type).await?;

    // The local list is already updated; the remote list refresh finishes
    // before the process exits.
    if let Some(refresh) = submission.refresh {
        if let Err(e) = refresh.await {
            warn!(error = %e, "Remote history refresh did not complete");
        }
    }

    if json {
        let out = serde_json::to_string_pretty(&submission.result)
            .context("Failed to serialize analysis result")?;
        println!("{out}");
    } else if !global.quiet {
        println!();
        println!(
            "{} {}",
            "Analysis complete".green().bold(),
            format!("(id {})", submission.entry.id).dimmed()
        );
        println!();
        print_result(&submission.result);
    }

    Ok(())
}

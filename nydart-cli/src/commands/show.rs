//! Show command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use nydart_core::{
    normalize, render_report, AnalysisResult, AnalysisSession, ArtworkDraft, FileStore,
    HistoryView, RemoteAnalysis,
};
use tracing::{debug, info};

use crate::utils::{print_result, GlobalOptions};

/// A history entry resolved for display.
struct ShownEntry {
    result: AnalysisResult,
    title: Option<String>,
    analysis_type: Option<String>,
    date: String,
    /// Stored record, absent for entries from the local history.
    record: Option<RemoteAnalysis>,
}

/// Execute the show command.
pub async fn execute(
    id: String,
    report: Option<PathBuf>,
    draft: bool,
    global: &GlobalOptions,
) -> Result<()> {
    let (_, session) = global.session()?;
    let view = session.mount().await;

    let entry = match resolve_in_view(&view, &id) {
        Some(found) => found,
        None => fetch_remote(&session, &id).await?,
    };

    if !global.quiet {
        println!(
            "{} {}",
            entry.title.as_deref().unwrap_or("Analysis").bold(),
            format!(
                "({} • {})",
                entry.analysis_type.as_deref().unwrap_or("general"),
                entry.date
            )
            .dimmed()
        );
        println!();
        print_result(&entry.result);
    }

    if let Some(path) = report {
        let Some(record) = entry.record.as_ref() else {
            bail!("Reports are available for stored analyses only; log in to export {id}");
        };
        std::fs::write(&path, render_report(record, entry.title.as_deref()))
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!(path = %path.display(), "Wrote report");
        if !global.quiet {
            println!();
            println!("{} {}", "Report:".green().bold(), path.display());
        }
    }

    if draft {
        let file_name = entry.record.as_ref().and_then(RemoteAnalysis::draft_file_name);
        let draft = ArtworkDraft::from_result(file_name, &entry.result);
        println!();
        println!("{}", "Artwork draft".cyan().bold());
        println!("   {} {}", "Title:".dimmed(), draft.title);
        println!("   {} {}", "Description:".dimmed(), draft.description);
    }

    Ok(())
}

fn from_record(record: RemoteAnalysis, title: Option<String>) -> ShownEntry {
    ShownEntry {
        result: normalize(&record.to_upstream()),
        title: title.or_else(|| record.artwork_title.clone()),
        analysis_type: record.analysis_type.clone(),
        date: record.display_date(),
        record: Some(record),
    }
}

fn resolve_in_view(view: &HistoryView, id: &str) -> Option<ShownEntry> {
    match view {
        HistoryView::Remote(entries) => {
            let record = entries.iter().find(|a| a.id == id)?;
            Some(from_record(record.clone(), None))
        }
        HistoryView::Local(entries) => {
            let entry = entries.iter().find(|e| e.id.to_string() == id)?;
            Some(ShownEntry {
                result: entry.result.clone(),
                title: None,
                analysis_type: Some(entry.analysis_type.to_string()),
                date: entry.timestamp.clone(),
                record: None,
            })
        }
    }
}

/// Entries outside the rendered page are looked up on the server.
async fn fetch_remote(session: &AnalysisSession<FileStore>, id: &str) -> Result<ShownEntry> {
    if !session.is_authenticated() {
        bail!("No analysis with id {id} in the local history");
    }
    debug!(id, "Entry not in rendered history, fetching from server");

    let detail = session
        .fetch_detail(id)
        .await
        .with_context(|| format!("Failed to load analysis {id}"))?;
    let title = detail.artwork_title().map(str::to_string);
    Ok(from_record(detail.analysis, title))
}

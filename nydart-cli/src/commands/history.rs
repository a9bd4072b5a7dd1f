//! History command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use nydart_core::{HistoryItem, HistorySource, HistoryView};
use tracing::info;

use crate::utils::GlobalOptions;

/// Execute the history command.
pub async fn execute(
    limit: Option<u32>,
    clear_local: bool,
    all: bool,
    global: &GlobalOptions,
) -> Result<()> {
    let (_, session) = global.session()?;
    let session = match limit {
        Some(limit) if limit > 0 => session.with_history_limit(limit),
        _ => session,
    };

    if clear_local {
        session.clear_local().context("Failed to clear local history")?;
        info!("Local history cleared");
        if !global.quiet {
            println!("{}", "Local history cleared".green());
        }
        return Ok(());
    }

    if all {
        let analyses = session.list_all_remote().await?;
        let view = HistoryView::Remote(analyses);
        print_items("All analyses", &view.items());
        return Ok(());
    }

    let view = session.mount().await;
    let heading = match view.source() {
        HistorySource::Remote => "Recent analyses",
        HistorySource::Local => "Recent analyses (local)",
    };
    print_items(heading, &view.items());
    Ok(())
}

fn print_items(heading: &str, items: &[HistoryItem]) {
    println!("{}", heading.bold());
    if items.is_empty() {
        println!("   {}", "No analyses yet".dimmed());
        return;
    }
    for item in items {
        println!(
            "   {}  {}  {}",
            item.id.yellow(),
            item.title,
            item.subtitle.dimmed()
        );
    }
}

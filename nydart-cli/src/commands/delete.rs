//! Delete command implementation.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::utils::GlobalOptions;

/// Execute the delete command.
pub async fn execute(id: String, global: &GlobalOptions) -> Result<()> {
    let (_, session) = global.session()?;
    session
        .delete_remote(&id)
        .await
        .with_context(|| format!("Failed to delete analysis {id}"))?;

    if !global.quiet {
        println!("{} {id}", "Deleted:".green().bold());
    }
    Ok(())
}

//! Compress command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use nydart_core::ImageNormalizer;
use tracing::info;

use crate::utils::{build_compressed_path, format_size, load_source, GlobalOptions};

/// Execute the compress command.
pub fn execute(file: PathBuf, output: Option<PathBuf>, global: &GlobalOptions) -> Result<()> {
    let source = load_source(&file)?;
    info!(
        path = %file.display(),
        bytes = source.size(),
        mime = source.mime_type.as_deref().unwrap_or("unknown"),
        "Read image"
    );

    let compressed = ImageNormalizer::default()
        .normalize(&source)
        .context("Failed to compress image")?;

    let out_path = output.unwrap_or_else(|| build_compressed_path(&file));
    std::fs::write(&out_path, &compressed.bytes)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    info!(
        path = %out_path.display(),
        width = compressed.width,
        height = compressed.height,
        bytes = compressed.size(),
        "Wrote compressed image"
    );

    if !global.quiet {
        println!("{} {}", "Compressed:".green().bold(), out_path.display());
        println!(
            "   {} {}x{}",
            "Dimensions:".dimmed(),
            compressed.width,
            compressed.height
        );
        println!(
            "   {} {} -> {}",
            "Size:".dimmed(),
            format_size(source.size()),
            format_size(compressed.size())
        );
    }

    Ok(())
}

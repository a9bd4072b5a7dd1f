//! Common utility functions shared across CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nydart_core::{AdvisorConfig, AnalysisResult, AnalysisSession, FileStore, SourceImage};
use tracing::debug;

/// Flags accepted by every subcommand.
pub struct GlobalOptions {
    pub token: Option<String>,
    pub store_dir: Option<PathBuf>,
    pub quiet: bool,
}

impl GlobalOptions {
    /// Environment configuration with command-line overrides applied.
    pub fn config(&self) -> Result<AdvisorConfig> {
        let mut config = AdvisorConfig::from_env().context("Invalid configuration")?;
        if let Some(token) = self.token.as_ref().filter(|t| !t.trim().is_empty()) {
            config.token = Some(token.clone());
        }
        if let Some(dir) = &self.store_dir {
            config.store_dir = Some(dir.clone());
        }
        Ok(config)
    }

    /// A session backed by the on-disk local history.
    pub fn session(&self) -> Result<(AdvisorConfig, AnalysisSession<FileStore>)> {
        let config = self.config()?;
        let dir = resolve_store_dir(config.store_dir.clone())?;
        debug!(store = %dir.display(), "Using local history store");
        let session = AnalysisSession::from_config(&config, FileStore::new(dir))
            .context("Failed to set up analysis session")?;
        Ok((config, session))
    }
}

/// Explicit directory, or `<platform data dir>/nydart`.
pub fn resolve_store_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => dirs::data_dir()
            .map(|d| d.join("nydart"))
            .context("Could not determine a data directory; pass --store-dir"),
    }
}

/// Build the compressed output path from the original file path.
///
/// Transforms `file.ext` into `file.compressed.jpg`.
pub fn build_compressed_path(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    file.with_file_name(format!("{stem}.compressed.jpg"))
}

/// Read an input image from disk.
pub fn load_source(file: &Path) -> Result<SourceImage> {
    SourceImage::from_path(file).with_context(|| format!("Failed to read file: {}", file.display()))
}

/// Human-readable byte count.
pub fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < KIB * KIB {
        format!("{:.1} KiB", bytes / KIB)
    } else {
        format!("{:.1} MiB", bytes / (KIB * KIB))
    }
}

/// Print a normalized result with section headings.
pub fn print_result(result: &AnalysisResult) {
    use colored::Colorize;

    println!("   {} {}", "Style:".dimmed(), result.style.bold());
    for (heading, body) in [
        ("Technical Assessment", &result.technical_assessment),
        ("Composition", &result.composition),
        ("Color Theory", &result.color_theory),
        ("Style & Context", &result.style_and_context),
    ] {
        println!();
        println!("{}", heading.cyan().bold());
        println!("{body}");
    }

    println!();
    println!("{}", "Suggested Improvements".cyan().bold());
    for (i, improvement) in result.improvements.iter().enumerate() {
        println!("  {}. {improvement}", i + 1);
    }

    if !result.learning_resources.is_empty() {
        println!();
        println!("{}", "Learning Resources".cyan().bold());
        for resource in &result.learning_resources {
            println!(
                "  - {} {}",
                resource.title.bold(),
                format!("({}, {})", resource.kind, resource.difficulty).dimmed()
            );
            if !resource.description.is_empty() {
                println!("    {}", resource.description);
            }
        }
    }
}

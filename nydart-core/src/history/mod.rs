//! Analysis history: a bounded local cache and the authoritative remote list.
//!
//! The two lists are independent views. [`HistoryView::select`] renders the
//! remote list when it has any entry and falls back to the local list
//! otherwise; the two are never interleaved.

mod local;
mod remote;
mod store;

pub use local::LocalHistory;
pub use remote::{AnalysisDetail, AnalysisList, ArtworkSummary, RemoteAnalysis};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use crate::analysis::{AnalysisResult, RecentAnalysisEntry};
use crate::normalize::normalize;

/// Key of the serialized local list in the key-value store.
pub const RECENT_ANALYSES_KEY: &str = "recentAnalyses";

/// Entries kept in the local list.
pub const LOCAL_HISTORY_LIMIT: usize = 5;

/// Entries rendered from whichever list is shown.
pub const DISPLAY_LIMIT: usize = 5;

/// Which list a rendered row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySource {
    Remote,
    Local,
}

/// One rendered history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub source: HistorySource,
}

/// The history list actually shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    Remote(Vec<RemoteAnalysis>),
    Local(Vec<RecentAnalysisEntry>),
}

impl HistoryView {
    /// Remote entries if there are any, local entries otherwise, each capped
    /// at [`DISPLAY_LIMIT`].
    pub fn select(remote: &[RemoteAnalysis], local: &[RecentAnalysisEntry]) -> Self {
        if remote.is_empty() {
            Self::Local(local.iter().take(DISPLAY_LIMIT).cloned().collect())
        } else {
            Self::Remote(remote.iter().take(DISPLAY_LIMIT).cloned().collect())
        }
    }

    pub fn source(&self) -> HistorySource {
        match self {
            Self::Remote(_) => HistorySource::Remote,
            Self::Local(_) => HistorySource::Local,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Remote(entries) => entries.len(),
            Self::Local(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> Vec<HistoryItem> {
        match self {
            Self::Remote(entries) => entries
                .iter()
                .map(|a| HistoryItem {
                    id: a.id.clone(),
                    title: a.title().to_string(),
                    subtitle: format!(
                        "{} • {}",
                        a.display_date(),
                        a.analysis_type.as_deref().unwrap_or("general")
                    ),
                    source: HistorySource::Remote,
                })
                .collect(),
            Self::Local(entries) => entries
                .iter()
                .map(|e| HistoryItem {
                    id: e.id.to_string(),
                    title: format!("{} Analysis", capitalize(e.analysis_type.as_str())),
                    subtitle: e.timestamp.clone(),
                    source: HistorySource::Local,
                })
                .collect(),
        }
    }

    /// Normalized result of the rendered entry with this id.
    ///
    /// Local entries already hold a normalized result; remote entries go
    /// through the same normalizer used for fresh submissions.
    pub fn resolve(&self, id: &str) -> Option<AnalysisResult> {
        match self {
            Self::Remote(entries) => entries
                .iter()
                .find(|a| a.id == id)
                .map(|a| normalize(&a.to_upstream())),
            Self::Local(entries) => entries
                .iter()
                .find(|e| e.id.to_string() == id)
                .map(|e| e.result.clone()),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

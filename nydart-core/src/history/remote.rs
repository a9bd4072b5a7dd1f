//! Analysis records as returned by the persistence service.
//!
//! Parsing is type-tolerant: a field of an unexpected type reads as absent,
//! and list entries that are not records are skipped, so one malformed record
//! never hides the rest of the list.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::analysis::LearningResource;
use crate::lenient;
use crate::normalize::{NestedAnalysis, RemoteResults, TextAnalysis, UpstreamAnalysis};

/// File name used for drafts when the record has an image but no file name.
pub const DEFAULT_DRAFT_FILE_NAME: &str = "artwork.jpg";

/// A persisted analysis. Every field except the id is optional upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteAnalysis {
    #[serde(alias = "_id", deserialize_with = "lenient::de_id")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "lenient::de_string")]
    pub analysis_type: Option<String>,
    #[serde(deserialize_with = "lenient::de_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient::de_string")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient::de_string")]
    pub filename: Option<String>,
    #[serde(deserialize_with = "lenient::de_string")]
    pub artwork_title: Option<String>,
    #[serde(deserialize_with = "lenient::de_string")]
    pub model_used: Option<String>,
    #[serde(deserialize_with = "lenient::de_object")]
    pub results: Option<RemoteResults>,
    #[serde(deserialize_with = "lenient::de_string")]
    pub analysis: Option<String>,
    #[serde(deserialize_with = "lenient::de_strings")]
    pub suggestions: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::de_objects")]
    pub learning_resources: Option<Vec<LearningResource>>,
}

impl RemoteAnalysis {
    /// Classify this record into one of the known upstream shapes.
    ///
    /// Records with a nested technical quality are `Nested`; otherwise a bare
    /// `analysis` string makes them `Text`. Anything else is treated as a
    /// nested record with whatever sections exist.
    pub fn to_upstream(&self) -> UpstreamAnalysis {
        let nested_quality = self
            .results
            .as_ref()
            .and_then(|r| r.technical_quality.as_deref())
            .is_some_and(|q| !q.trim().is_empty());

        match self.analysis.as_deref() {
            Some(text) if !nested_quality && !text.trim().is_empty() => {
                UpstreamAnalysis::Text(TextAnalysis {
                    model_used: self.model_used.clone(),
                    analysis: text.to_string(),
                    results: self.results.clone(),
                    suggestions: self.suggestions.clone(),
                    learning_resources: self.learning_resources.clone(),
                })
            }
            _ => UpstreamAnalysis::Nested(NestedAnalysis {
                model_used: self.model_used.clone(),
                results: self.results.clone().unwrap_or_default(),
                suggestions: self.suggestions.clone(),
                learning_resources: self.learning_resources.clone(),
            }),
        }
    }

    pub fn title(&self) -> &str {
        self.artwork_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Untitled Artwork")
    }

    /// File name to title an artwork draft with.
    ///
    /// Only records that still reference their image have one; the name
    /// falls back to [`DEFAULT_DRAFT_FILE_NAME`].
    pub fn draft_file_name(&self) -> Option<&str> {
        self.image_url
            .as_ref()
            .map(|_| self.filename.as_deref().unwrap_or(DEFAULT_DRAFT_FILE_NAME))
    }

    /// Record date as `YYYY-MM-DD` when it parses as RFC 3339, raw otherwise.
    pub fn display_date(&self) -> String {
        match self.date.as_deref() {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|_| raw.to_string()),
            None => "unknown date".to_string(),
        }
    }
}

/// Body of `GET /api/analyses/user`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisList {
    #[serde(default, deserialize_with = "lenient::de_object_list")]
    pub analyses: Vec<RemoteAnalysis>,
}

/// Artwork an analysis belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtworkSummary {
    #[serde(alias = "_id", deserialize_with = "lenient::de_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient::de_string")]
    pub title: Option<String>,
}

/// Body of `GET /api/analyses/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDetail {
    pub analysis: RemoteAnalysis,
    #[serde(deserialize_with = "lenient::de_object")]
    pub artwork: Option<ArtworkSummary>,
}

impl AnalysisDetail {
    /// Artwork title, falling back to the title stored on the record.
    pub fn artwork_title(&self) -> Option<&str> {
        self.artwork
            .as_ref()
            .and_then(|a| a.title.as_deref())
            .or(self.analysis.artwork_title.as_deref())
    }
}

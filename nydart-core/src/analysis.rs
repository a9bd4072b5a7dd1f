//! Analysis data model: requests, normalized results and history entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::compress::CompressedImage;
use crate::lenient;

/// Flavor of critique requested from the AI service, forwarded verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    General,
    Technical,
    Style,
    Composition,
    Color,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 5] = [
        Self::General,
        Self::Technical,
        Self::Style,
        Self::Composition,
        Self::Color,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Technical => "technical",
            Self::Style => "style",
            Self::Composition => "composition",
            Self::Color => "color",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown analysis type '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// One submission: the compressed image, the analysis type and the caller's
/// bearer credential. Built once per submit action.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image: CompressedImage,
    pub analysis_type: AnalysisType,
    pub credential: String,
}

/// Learning material suggested alongside a critique.
///
/// Fields missing upstream, or of an unexpected type, read as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningResource {
    #[serde(default, deserialize_with = "lenient::de_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::de_text")]
    pub description: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::de_text")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::de_text")]
    pub difficulty: String,
}

/// The fixed display shape every upstream payload is normalized into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub style: String,
    pub technical_assessment: String,
    pub composition: String,
    pub color_theory: String,
    pub style_and_context: String,
    /// Always 3 or 4 entries.
    pub improvements: Vec<String>,
    pub learning_resources: Vec<LearningResource>,
}

/// A locally cached past analysis.
///
/// Holds metadata and the normalized result only. No image reference is
/// stored: a renderable reference would not survive a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentAnalysisEntry {
    /// Millisecond timestamp, unique within the local list.
    pub id: i64,
    /// Human-readable creation time.
    pub timestamp: String,
    #[serde(rename = "type")]
    pub analysis_type: AnalysisType,
    #[serde(rename = "results")]
    pub result: AnalysisResult,
}

impl RecentAnalysisEntry {
    pub fn new(analysis_type: AnalysisType, result: AnalysisResult, at: DateTime<Local>) -> Self {
        Self {
            id: at.timestamp_millis(),
            timestamp: at.format("%Y-%m-%d %H:%M:%S").to_string(),
            analysis_type,
            result,
        }
    }
}

//! Result normalization.
//!
//! The AI service and the persistence service return loosely-structured
//! critiques in three known shapes. [`normalize`] maps any of them into the
//! fixed [`AnalysisResult`] display shape, filling every missing section from
//! the table in [`defaults`]. It is total: no input makes it fail or panic.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::{AnalysisResult, LearningResource};
use crate::lenient;

/// Minimum number of improvement entries after normalization.
pub const MIN_IMPROVEMENTS: usize = 3;
/// Maximum number of improvement entries after normalization.
pub const MAX_IMPROVEMENTS: usize = 4;

/// Separator between the parts of the technical assessment.
pub const SECTION_SEPARATOR: &str = "\n\n";

/// Built-in content used when an upstream field is absent.
pub mod defaults {
    use crate::analysis::LearningResource;

    pub const STYLE: &str = "AI Analysis Results";
    pub const TECHNICAL_QUALITY: &str =
        "The artwork shows good technical execution with attention to detail.";
    pub const STRENGTHS: &str =
        "The piece demonstrates strong fundamentals in composition and technique.";
    pub const AREAS_FOR_IMPROVEMENT: &str =
        "Consider focusing on enhancing depth and contrast in future works.";
    pub const COMPOSITION: &str = "The composition shows thoughtful arrangement of elements.";
    pub const COLOR_THEORY: &str = "The color palette effectively conveys the intended mood.";
    pub const STYLE_CONTEXT: &str = "The artwork demonstrates a clear artistic vision.";

    pub const IMPROVEMENTS: [&str; 4] = [
        "Consider experimenting with different techniques to add more depth to your work",
        "Try exploring varied color palettes to enhance the overall mood",
        "Focus on developing more contrast in key areas",
        "Practice different styles to expand your artistic range",
    ];

    pub fn learning_resource() -> LearningResource {
        LearningResource {
            title: "Fundamental Art Techniques".into(),
            description: "Learn essential techniques to improve your artistic skills".into(),
            kind: "Tutorial".into(),
            difficulty: "Intermediate".into(),
        }
    }
}

/// Fresh AI service payload: snake_case fields, every one optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAnalysis {
    pub style: Option<String>,
    pub technical_quality: Option<String>,
    pub analysis: Option<String>,
    pub strengths: Option<String>,
    pub areas_for_improvement: Option<String>,
    pub composition: Option<String>,
    pub color_theory: Option<String>,
    pub style_context: Option<String>,
    pub suggestions: Option<Vec<String>>,
    pub learning_resources: Option<Vec<LearningResource>>,
}

impl RawAnalysis {
    /// Extract the known fields from an arbitrary JSON value.
    ///
    /// Fields with an unexpected type are treated as absent, so this never
    /// fails. Non-object values yield an empty payload.
    pub fn from_json(value: &Value) -> Self {
        Self {
            style: text(value, "style"),
            technical_quality: text(value, "technical_quality"),
            analysis: text(value, "analysis"),
            strengths: text(value, "strengths"),
            areas_for_improvement: text(value, "areas_for_improvement"),
            composition: text(value, "composition"),
            color_theory: text(value, "color_theory"),
            style_context: text(value, "style_context"),
            suggestions: string_list(value, "suggestions"),
            learning_resources: resource_list(value, "learning_resources"),
        }
    }
}

/// Section texts of a persisted analysis record.
///
/// Fields of an unexpected type read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteResults {
    #[serde(deserialize_with = "lenient::de_string")]
    pub technical_quality: Option<String>,
    #[serde(deserialize_with = "lenient::de_string")]
    pub strengths: Option<String>,
    #[serde(deserialize_with = "lenient::de_string")]
    pub areas_for_improvement: Option<String>,
    #[serde(deserialize_with = "lenient::de_string")]
    pub composition: Option<String>,
    #[serde(deserialize_with = "lenient::de_string")]
    pub color_theory: Option<String>,
    #[serde(deserialize_with = "lenient::de_string")]
    pub style_context: Option<String>,
    #[serde(deserialize_with = "lenient::de_strings")]
    pub suggestions: Option<Vec<String>>,
}

/// Persisted record whose sections live in a nested `results` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedAnalysis {
    pub model_used: Option<String>,
    pub results: RemoteResults,
    pub suggestions: Option<Vec<String>>,
    pub learning_resources: Option<Vec<LearningResource>>,
}

/// Persisted record carrying its critique as a bare `analysis` string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextAnalysis {
    pub model_used: Option<String>,
    pub analysis: String,
    pub results: Option<RemoteResults>,
    pub suggestions: Option<Vec<String>>,
    pub learning_resources: Option<Vec<LearningResource>>,
}

/// The three upstream shapes a critique can arrive in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamAnalysis {
    Flat(RawAnalysis),
    Nested(NestedAnalysis),
    Text(TextAnalysis),
}

impl From<&Value> for UpstreamAnalysis {
    fn from(value: &Value) -> Self {
        Self::Flat(RawAnalysis::from_json(value))
    }
}

/// Per-field view shared by every shape.
struct Fields<'a> {
    style: Option<&'a str>,
    quality: Option<&'a str>,
    strengths: Option<&'a str>,
    areas_for_improvement: Option<&'a str>,
    composition: Option<&'a str>,
    color_theory: Option<&'a str>,
    style_context: Option<&'a str>,
    suggestions: Option<&'a [String]>,
    learning_resources: Option<&'a [LearningResource]>,
}

impl UpstreamAnalysis {
    fn fields(&self) -> Fields<'_> {
        match self {
            Self::Flat(raw) => Fields {
                style: present(&raw.style),
                quality: present(&raw.technical_quality).or(present(&raw.analysis)),
                strengths: present(&raw.strengths),
                areas_for_improvement: present(&raw.areas_for_improvement),
                composition: present(&raw.composition),
                color_theory: present(&raw.color_theory),
                style_context: present(&raw.style_context),
                suggestions: raw.suggestions.as_deref(),
                learning_resources: raw.learning_resources.as_deref(),
            },
            Self::Nested(nested) => Fields {
                style: present(&nested.model_used),
                quality: present(&nested.results.technical_quality),
                strengths: present(&nested.results.strengths),
                areas_for_improvement: present(&nested.results.areas_for_improvement),
                composition: present(&nested.results.composition),
                color_theory: present(&nested.results.color_theory),
                style_context: present(&nested.results.style_context),
                suggestions: nested
                    .suggestions
                    .as_deref()
                    .or(nested.results.suggestions.as_deref()),
                learning_resources: nested.learning_resources.as_deref(),
            },
            Self::Text(text) => {
                let results = text.results.as_ref();
                Fields {
                    style: present(&text.model_used),
                    quality: Some(text.analysis.as_str()).filter(|s| !s.trim().is_empty()),
                    strengths: results.and_then(|r| present(&r.strengths)),
                    areas_for_improvement: results.and_then(|r| present(&r.areas_for_improvement)),
                    composition: results.and_then(|r| present(&r.composition)),
                    color_theory: results.and_then(|r| present(&r.color_theory)),
                    style_context: results.and_then(|r| present(&r.style_context)),
                    suggestions: text
                        .suggestions
                        .as_deref()
                        .or(results.and_then(|r| r.suggestions.as_deref())),
                    learning_resources: text.learning_resources.as_deref(),
                }
            }
        }
    }
}

/// Normalize any upstream shape into the display shape.
pub fn normalize(upstream: &UpstreamAnalysis) -> AnalysisResult {
    let fields = upstream.fields();

    let technical_assessment = [
        fields.quality.unwrap_or(defaults::TECHNICAL_QUALITY),
        fields.strengths.unwrap_or(defaults::STRENGTHS),
        fields
            .areas_for_improvement
            .unwrap_or(defaults::AREAS_FOR_IMPROVEMENT),
    ]
    .join(SECTION_SEPARATOR);

    let learning_resources = match fields.learning_resources {
        Some(resources) if !resources.is_empty() => resources.to_vec(),
        _ => vec![defaults::learning_resource()],
    };

    AnalysisResult {
        style: fields.style.unwrap_or(defaults::STYLE).to_string(),
        technical_assessment,
        composition: fields
            .composition
            .unwrap_or(defaults::COMPOSITION)
            .to_string(),
        color_theory: fields
            .color_theory
            .unwrap_or(defaults::COLOR_THEORY)
            .to_string(),
        style_and_context: fields
            .style_context
            .unwrap_or(defaults::STYLE_CONTEXT)
            .to_string(),
        improvements: bounded_improvements(fields.suggestions.unwrap_or_default()),
        learning_resources,
    }
}

/// Pad `suggestions` from the default list up to [`MIN_IMPROVEMENTS`], then cap
/// at [`MAX_IMPROVEMENTS`].
///
/// Blank suggestions are dropped before padding, so they never count toward
/// the minimum.
pub fn bounded_improvements(suggestions: &[String]) -> Vec<String> {
    let mut improvements: Vec<String> = suggestions
        .iter()
        .filter(|s| !s.trim().is_empty())
        .take(MAX_IMPROVEMENTS)
        .cloned()
        .collect();

    let missing = MIN_IMPROVEMENTS.saturating_sub(improvements.len());
    improvements.extend(
        defaults::IMPROVEMENTS
            .iter()
            .take(missing)
            .map(|s| s.to_string()),
    );

    improvements
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(lenient::string)
}

fn string_list(value: &Value, key: &str) -> Option<Vec<String>> {
    value.get(key).and_then(lenient::strings)
}

fn resource_list(value: &Value, key: &str) -> Option<Vec<LearningResource>> {
    value.get(key).and_then(lenient::objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(value: Value) -> AnalysisResult {
        normalize(&UpstreamAnalysis::from(&value))
    }

    #[test]
    fn test_empty_payload_uses_defaults() {
        let result = flat(json!({}));

        assert_eq!(result.style, defaults::STYLE);
        assert_eq!(result.composition, defaults::COMPOSITION);
        assert_eq!(result.color_theory, defaults::COLOR_THEORY);
        assert_eq!(result.style_and_context, defaults::STYLE_CONTEXT);
        assert_eq!(
            result.technical_assessment,
            format!(
                "{}\n\n{}\n\n{}",
                defaults::TECHNICAL_QUALITY,
                defaults::STRENGTHS,
                defaults::AREAS_FOR_IMPROVEMENT
            )
        );
        assert_eq!(result.improvements, defaults::IMPROVEMENTS[..3].to_vec());
        assert_eq!(result.learning_resources, vec![defaults::learning_resource()]);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        assert_eq!(flat(json!({})), flat(json!({})));
    }

    #[test]
    fn test_quality_falls_back_to_analysis_field() {
        let result = flat(json!({"analysis": "Loose brushwork."}));
        assert!(result.technical_assessment.starts_with("Loose brushwork.\n\n"));

        let result = flat(json!({
            "technical_quality": "Precise linework.",
            "analysis": "ignored"
        }));
        assert!(result.technical_assessment.starts_with("Precise linework.\n\n"));
        assert!(!result.technical_assessment.contains("ignored"));
    }

    #[test]
    fn test_full_payload_passes_through() {
        let result = flat(json!({
            "style": "Baroque",
            "technical_quality": "Q",
            "strengths": "S",
            "areas_for_improvement": "A",
            "composition": "C",
            "color_theory": "CT",
            "style_context": "SC",
            "suggestions": ["one", "two", "three", "four", "five"],
            "learning_resources": [
                {"title": "Chiaroscuro", "description": "Light", "type": "Book", "difficulty": "Advanced"}
            ]
        }));

        assert_eq!(result.style, "Baroque");
        assert_eq!(result.technical_assessment, "Q\n\nS\n\nA");
        assert_eq!(result.composition, "C");
        assert_eq!(result.color_theory, "CT");
        assert_eq!(result.style_and_context, "SC");
        assert_eq!(result.improvements, vec!["one", "two", "three", "four"]);
        assert_eq!(result.learning_resources.len(), 1);
        assert_eq!(result.learning_resources[0].title, "Chiaroscuro");
    }

    #[test]
    fn test_improvement_bounds_for_any_length() {
        for len in 0..=10 {
            let suggestions: Vec<String> = (0..len).map(|i| format!("s{i}")).collect();
            let result = flat(json!({ "suggestions": suggestions }));
            assert!(
                (MIN_IMPROVEMENTS..=MAX_IMPROVEMENTS).contains(&result.improvements.len()),
                "len {len} gave {}",
                result.improvements.len()
            );
        }
    }

    #[test]
    fn test_short_suggestions_padded_in_order() {
        let result = flat(json!({"suggestions": ["Mine"]}));
        assert_eq!(
            result.improvements,
            vec![
                "Mine".to_string(),
                defaults::IMPROVEMENTS[0].to_string(),
                defaults::IMPROVEMENTS[1].to_string(),
            ]
        );
    }

    #[test]
    fn test_wrong_types_are_ignored() {
        let result = flat(json!({
            "style": 42,
            "suggestions": "not a list",
            "learning_resources": [1, "two", {"title": "Kept"}],
            "composition": ""
        }));
        assert_eq!(result.style, defaults::STYLE);
        assert_eq!(result.improvements.len(), 3);
        assert_eq!(result.composition, defaults::COMPOSITION);
        assert_eq!(result.learning_resources.len(), 1);
        assert_eq!(result.learning_resources[0].title, "Kept");
    }

    #[test]
    fn test_non_object_payloads() {
        for value in [json!(null), json!([1, 2]), json!("text"), json!(3.5)] {
            let result = flat(value);
            assert_eq!(result.improvements.len(), 3);
            assert_eq!(result.learning_resources.len(), 1);
        }
    }

    #[test]
    fn test_empty_learning_resources_use_default() {
        let result = flat(json!({"learning_resources": []}));
        assert_eq!(result.learning_resources, vec![defaults::learning_resource()]);
    }

    #[test]
    fn test_nested_shape() {
        let upstream = UpstreamAnalysis::Nested(NestedAnalysis {
            model_used: Some("gpt-vision".into()),
            results: RemoteResults {
                technical_quality: Some("Strong values.".into()),
                composition: Some("Rule of thirds.".into()),
                ..Default::default()
            },
            suggestions: Some(vec!["Vary edges".into()]),
            learning_resources: None,
        });
        let result = normalize(&upstream);

        assert_eq!(result.style, "gpt-vision");
        assert!(result.technical_assessment.starts_with("Strong values.\n\n"));
        assert_eq!(result.composition, "Rule of thirds.");
        assert_eq!(result.color_theory, defaults::COLOR_THEORY);
        assert_eq!(result.improvements[0], "Vary edges");
        assert_eq!(result.improvements.len(), 3);
    }

    #[test]
    fn test_text_shape() {
        let upstream = UpstreamAnalysis::Text(TextAnalysis {
            analysis: "A moody seascape.".into(),
            results: Some(RemoteResults {
                color_theory: Some("Cool blues.".into()),
                ..Default::default()
            }),
            ..Default::default()
        });
        let result = normalize(&upstream);

        assert_eq!(result.style, defaults::STYLE);
        assert!(result.technical_assessment.starts_with("A moody seascape.\n\n"));
        assert_eq!(result.color_theory, "Cool blues.");
        assert_eq!(result.improvements.len(), 3);
        assert_eq!(result.learning_resources.len(), 1);
    }

    #[test]
    fn test_blank_suggestions_are_dropped() {
        let improvements = bounded_improvements(&["".into(), "  ".into(), "Real".into()]);
        assert_eq!(improvements[0], "Real");
        assert_eq!(improvements.len(), 3);
    }
}

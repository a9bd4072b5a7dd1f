//! Plain-text exports of analyses.

use std::fmt::Write;

use crate::analysis::AnalysisResult;
use crate::history::RemoteAnalysis;

/// Characters of the technical assessment kept in an artwork draft.
pub const DRAFT_DESCRIPTION_CHARS: usize = 200;

/// Render a downloadable text report of a stored analysis.
///
/// Sections come straight from the stored record, so a field the service
/// never produced prints as `N/A` rather than a default critique.
pub fn render_report(record: &RemoteAnalysis, artwork_title: Option<&str>) -> String {
    fn or_na(value: Option<&str>) -> &str {
        value.filter(|v| !v.trim().is_empty()).unwrap_or("N/A")
    }

    fn section(out: &mut String, heading: &str, body: Option<&str>) {
        let _ = write!(out, "\n{heading}:\n{}\n", or_na(body));
    }

    let results = record.results.clone().unwrap_or_default();
    let suggestions = results.suggestions.as_ref().map(|items| items.join("\n"));
    let resources = record.learning_resources.as_ref().map(|items| {
        items
            .iter()
            .map(|r| format!("- {}: {}", r.title, r.description))
            .collect::<Vec<_>>()
            .join("\n")
    });
    let date = record.date.as_ref().map(|_| record.display_date());

    let mut out = String::new();
    out.push_str("Analysis Report\n");
    out.push_str("===============\n\n");
    let _ = writeln!(
        out,
        "Artwork: {}",
        or_na(artwork_title.or(record.artwork_title.as_deref()))
    );
    let _ = writeln!(out, "Type: {}", or_na(record.analysis_type.as_deref()));
    let _ = writeln!(out, "Date: {}", or_na(date.as_deref()));

    section(&mut out, "Technical Quality", results.technical_quality.as_deref());
    section(&mut out, "Strengths", results.strengths.as_deref());
    section(&mut out, "Areas for Improvement", results.areas_for_improvement.as_deref());
    section(&mut out, "Suggestions", suggestions.as_deref());
    section(&mut out, "Composition", results.composition.as_deref());
    section(&mut out, "Color Theory", results.color_theory.as_deref());
    section(&mut out, "Style Context", results.style_context.as_deref());
    section(&mut out, "Learning Resources", resources.as_deref());

    out
}

/// Pre-filled data for saving an analyzed image as an artwork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkDraft {
    pub title: String,
    pub description: String,
}

impl ArtworkDraft {
    /// `file_name` is the analyzed image, if it is still around.
    pub fn from_result(file_name: Option<&str>, result: &AnalysisResult) -> Self {
        let title = match file_name {
            Some(name) if !name.is_empty() => format!("Analysis of {name}"),
            _ => "Analysis from Previous Work".to_string(),
        };

        let excerpt: String = result
            .technical_assessment
            .chars()
            .take(DRAFT_DESCRIPTION_CHARS)
            .collect();
        let description = if excerpt.trim().is_empty() {
            "Analysis results".to_string()
        } else {
            format!("{excerpt}...")
        };

        Self { title, description }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, RawAnalysis, UpstreamAnalysis};
    use serde_json::json;

    fn default_result() -> AnalysisResult {
        normalize(&UpstreamAnalysis::Flat(RawAnalysis::default()))
    }

    #[test]
    fn test_report_sections() {
        let record: RemoteAnalysis = serde_json::from_value(json!({
            "id": "a1",
            "type": "general",
            "date": "2024-03-05T10:00:00Z",
            "results": {
                "technicalQuality": "Confident brushwork",
                "strengths": "Bold palette",
                "areasForImprovement": "Edges",
                "suggestions": ["Soften edges", "Cool the shadows"],
                "composition": "Rule of thirds",
                "colorTheory": "Warm dominant",
                "styleContext": "Impressionist"
            },
            "learningResources": [{"title": "Edges", "description": "Lost and found edges"}]
        }))
        .unwrap();

        let report = render_report(&record, Some("Harbor at Dawn"));
        assert!(report.starts_with("Analysis Report\n"));
        assert!(report.contains("Artwork: Harbor at Dawn"));
        assert!(report.contains("Type: general"));
        assert!(report.contains("Date: 2024-03-05"));
        assert!(report.contains("\nTechnical Quality:\nConfident brushwork\n"));
        assert!(report.contains("\nStrengths:\nBold palette\n"));
        assert!(report.contains("\nAreas for Improvement:\nEdges\n"));
        assert!(report.contains("\nSuggestions:\nSoften edges\nCool the shadows\n"));
        assert!(report.contains("\nStyle Context:\nImpressionist\n"));
        assert!(report.contains("- Edges: Lost and found edges"));
    }

    #[test]
    fn test_sparse_record_prints_na() {
        let record: RemoteAnalysis = serde_json::from_value(json!({
            "id": "a2",
            "results": {"composition": "Centered subject"}
        }))
        .unwrap();

        let report = render_report(&record, None);
        assert!(report.contains("Artwork: N/A"));
        assert!(report.contains("Type: N/A"));
        assert!(report.contains("Date: N/A"));
        assert!(report.contains("\nComposition:\nCentered subject\n"));
        for heading in [
            "Technical Quality",
            "Strengths",
            "Areas for Improvement",
            "Suggestions",
            "Color Theory",
            "Style Context",
            "Learning Resources",
        ] {
            assert!(
                report.contains(&format!("\n{heading}:\nN/A\n")),
                "{heading} should print N/A"
            );
        }
        assert!(!report.contains("Fundamental Art Techniques"));
    }

    #[test]
    fn test_report_falls_back_to_stored_title() {
        let record = RemoteAnalysis {
            artwork_title: Some("Stored".into()),
            ..Default::default()
        };
        assert!(render_report(&record, None).contains("Artwork: Stored"));
    }

    #[test]
    fn test_draft_with_file_name() {
        let draft = ArtworkDraft::from_result(Some("sunset.jpg"), &default_result());
        assert_eq!(draft.title, "Analysis of sunset.jpg");
        assert!(draft.description.ends_with("..."));
        assert_eq!(
            draft.description.chars().count(),
            DRAFT_DESCRIPTION_CHARS + 3
        );
    }

    #[test]
    fn test_draft_titles_follow_stored_image() {
        let mut record = RemoteAnalysis {
            image_url: Some("https://cdn.example/a.jpg".into()),
            artwork_title: Some("Harbor at Dawn".into()),
            ..Default::default()
        };
        let result = normalize(&record.to_upstream());

        let draft = ArtworkDraft::from_result(record.draft_file_name(), &result);
        assert_eq!(draft.title, "Analysis of artwork.jpg");

        record.filename = Some("harbor.png".into());
        let draft = ArtworkDraft::from_result(record.draft_file_name(), &result);
        assert_eq!(draft.title, "Analysis of harbor.png");

        record.image_url = None;
        let draft = ArtworkDraft::from_result(record.draft_file_name(), &result);
        assert_eq!(draft.title, "Analysis from Previous Work");
    }

    #[test]
    fn test_draft_without_file() {
        let mut result = default_result();
        result.technical_assessment = "Short.".into();
        let draft = ArtworkDraft::from_result(None, &result);
        assert_eq!(draft.title, "Analysis from Previous Work");
        assert_eq!(draft.description, "Short....");
    }
}

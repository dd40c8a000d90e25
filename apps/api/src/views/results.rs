use std::sync::Arc;

use dioxus::prelude::*;
use uuid::Uuid;

use crate::models::analysis::{AnalysisResult, Impact};

/// ≥80 green, ≥60 yellow, otherwise red.
pub fn score_class(score: u32) -> &'static str {
    if score >= 80 {
        "score-green"
    } else if score >= 60 {
        "score-yellow"
    } else {
        "score-red"
    }
}

pub fn impact_class(impact: Impact) -> &'static str {
    match impact {
        Impact::High => "impact-high",
        Impact::Medium => "impact-medium",
        Impact::Low => "impact-low",
    }
}

/// Results dashboard. Numbers are displayed as the model returned them.
#[component]
pub fn ResultsDashboard(
    session_id: Uuid,
    result: Arc<AnalysisResult>,
    target_role: String,
) -> Element {
    let overall_class = score_class(result.overall_score);
    let bar_width = result.match_percentage.min(100);

    rsx! {
        section { class: "card",
            header { class: "report-header",
                h2 { "Analysis Report" }
                p { "Target: {target_role}" }
                form { method: "post", action: "/sessions/{session_id}/reset",
                    button { r#type: "submit", "Analyze Another" }
                }
            }
            div { class: "overall",
                span { class: "overall-score {overall_class}", "{result.overall_score}" }
                span { " Score " }
                span { class: "badge", "{result.overall_label}" }
            }
            h3 { "Executive Summary" }
            p { "{result.summary}" }
            h4 { "Match for {target_role}" }
            div { class: "bar", div { style: "width:{bar_width}%" } }
            p { class: "match", "{result.match_percentage}% Match" }
        }
        div { class: "columns",
            section { class: "card",
                h3 { "Section Breakdown" }
                for section in result.section_scores.iter() {
                    div { class: "section-score",
                        div {
                            span { "{section.name}" }
                            span { class: score_class(section.score), "{section.score}/100" }
                        }
                        div { class: "bar", div { style: "width:{section.score.min(100)}%" } }
                        p { "{section.feedback}" }
                    }
                }
                h3 { "Missing Keywords" }
                div {
                    if result.missing_keywords.is_empty() {
                        p { "No critical keywords missing!" }
                    }
                    for keyword in result.missing_keywords.iter() {
                        span { class: "keyword", "{keyword}" }
                    }
                }
            }
            section { class: "card",
                h3 { "Actionable Suggestions" }
                ul {
                    for suggestion in result.suggestions.iter() {
                        li {
                            span {
                                class: "badge {impact_class(suggestion.impact)}",
                                "{suggestion.impact.as_str()} Impact"
                            }
                            span { class: "category", "{suggestion.category.as_str()}" }
                            p { "{suggestion.text}" }
                        }
                    }
                }
                h3 { "Bangladesh Market Context" }
                ul {
                    for advice in result.bangla_context.iter() {
                        li {
                            strong { "{advice.topic}" }
                            if advice.is_optimized {
                                span { class: "optimized", "✓ Looks good" }
                            } else {
                                span { class: "needs-action", "! Needs attention" }
                            }
                            p { "{advice.advice}" }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::mock::mock_result;

    fn render(session_id: Uuid, result: AnalysisResult, target_role: &str) -> String {
        let target_role = target_role.to_string();
        dioxus_ssr::render_element(rsx! {
            ResultsDashboard { session_id, result: Arc::new(result), target_role }
        })
    }

    #[test]
    fn test_score_class_thresholds() {
        assert_eq!(score_class(100), "score-green");
        assert_eq!(score_class(80), "score-green");
        assert_eq!(score_class(79), "score-yellow");
        assert_eq!(score_class(60), "score-yellow");
        assert_eq!(score_class(59), "score-red");
        assert_eq!(score_class(0), "score-red");
    }

    #[test]
    fn test_mock_result_dashboard() {
        let html = render(Uuid::new_v4(), mock_result(), "Backend Engineer");
        assert!(html.contains(r#"<span class="overall-score score-yellow">72</span>"#));
        assert!(html.contains(r#"<span class="badge">Good</span>"#));
        assert!(html.contains("65% Match"));
        assert!(html.contains("Match for Backend Engineer"));
        for keyword in ["React.js", "Tailwind CSS", "Git Workflow", "REST API"] {
            assert!(html.contains(&format!(r#"<span class="keyword">{keyword}</span>"#)));
        }
        assert!(html.contains(r#"<span class="badge impact-high">High Impact</span>"#));
        assert!(html.contains("Structure &amp; Formatting"));
        assert_eq!(html.matches("needs-action").count(), 1);
    }

    #[test]
    fn test_section_scores_use_their_own_colour_band() {
        let html = render(Uuid::new_v4(), mock_result(), "Backend Engineer");
        // Structure & Formatting 80, Skills & Keywords 60
        assert!(html.contains(r#"<span class="score-green">80/100</span>"#));
        assert!(html.contains(r#"<span class="score-yellow">60/100</span>"#));
    }

    #[test]
    fn test_no_missing_keywords_message() {
        let mut result = mock_result();
        result.missing_keywords.clear();
        let html = render(Uuid::new_v4(), result, "Analyst");
        assert!(html.contains("No critical keywords missing!"));
        assert!(!html.contains(r#"class="keyword""#));
    }

    #[test]
    fn test_out_of_range_match_bar_is_capped() {
        let mut result = mock_result();
        result.match_percentage = 140;
        let html = render(Uuid::new_v4(), result, "Analyst");
        assert!(html.contains("140% Match"));
        assert!(html.contains("width:100%"));
    }

    #[test]
    fn test_model_text_is_escaped() {
        let mut result = mock_result();
        result.summary = "<script>steal()</script>".to_string();
        let html = render(Uuid::new_v4(), result, "<i>Analyst</i>");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<i>"));
    }

    #[test]
    fn test_reset_action_targets_session() {
        let id = Uuid::new_v4();
        let html = render(id, mock_result(), "Analyst");
        assert!(html.contains(&format!("/sessions/{id}/reset")));
        assert!(html.contains("Analyze Another"));
    }
}

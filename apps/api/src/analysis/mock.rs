use std::time::Duration;

use crate::models::analysis::{
    AnalysisResult, BanglaContextAdvice, Impact, OverallLabel, SectionScore, Suggestion,
    SuggestionCategory,
};

/// How long mock mode pretends to think before answering.
pub const MOCK_LATENCY: Duration = Duration::from_millis(2000);

/// The fixed analysis served in mock mode and substituted when a live call fails.
/// Fully populated so it doubles as the worked example of the response schema.
pub fn mock_result() -> AnalysisResult {
    AnalysisResult {
        overall_score: 72,
        overall_label: OverallLabel::Good,
        summary: "A solid foundation for a fresher. Your academic background is clear, but you \
                  need to emphasize specific technical skills and quantify your project impact. \
                  Great potential for Junior roles."
            .to_string(),
        match_percentage: 65,
        section_scores: vec![
            section(
                "Structure & Formatting",
                80,
                "Clean layout, but consider moving Education to the top for a fresher resume.",
            ),
            section(
                "Skills & Keywords",
                60,
                "Missing some key tools required for the target role.",
            ),
            section(
                "Projects & Achievements",
                70,
                "Projects are listed but lack 'results' or 'outcomes'.",
            ),
            section(
                "Language & Clarity",
                85,
                "English is professional. Good use of bullet points.",
            ),
        ],
        missing_keywords: ["React.js", "Tailwind CSS", "Git Workflow", "REST API"]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        suggestions: vec![
            suggestion(
                "1",
                "Add a 'Skills' section specifically listing programming languages and frameworks relevant to the job.",
                Impact::High,
                SuggestionCategory::Skills,
            ),
            suggestion(
                "2",
                "For your 'Library Management System' project, mention how many users it supported or if it reduced manual work.",
                Impact::High,
                SuggestionCategory::Content,
            ),
            suggestion(
                "3",
                "Ensure your LinkedIn profile link is clickable.",
                Impact::Low,
                SuggestionCategory::Formatting,
            ),
            suggestion(
                "4",
                "Use strong action verbs like 'Developed', 'Orchestrated', 'Designed' instead of 'Worked on'.",
                Impact::Medium,
                SuggestionCategory::Grammar,
            ),
        ],
        bangla_context: vec![
            advice(
                "Academic Projects / Thesis",
                "Your thesis is mentioned, but treating it like a 'job' with roles and technologies used would make it stronger.",
                false,
            ),
            advice(
                "HSC/SSC vs University",
                "University info is clear. You can reduce the detail on SSC/HSC GPA if your University CGPA is strong.",
                true,
            ),
            advice(
                "Coaching/Tuition",
                "If you have private tuition experience, list it under 'Leadership' or 'Communication' rather than 'Work Experience' unless relevant to the job.",
                true,
            ),
        ],
    }
}

fn section(name: &str, score: u32, feedback: &str) -> SectionScore {
    SectionScore {
        name: name.to_string(),
        score,
        feedback: feedback.to_string(),
    }
}

fn suggestion(id: &str, text: &str, impact: Impact, category: SuggestionCategory) -> Suggestion {
    Suggestion {
        id: id.to_string(),
        text: text.to_string(),
        impact,
        category,
    }
}

fn advice(topic: &str, advice: &str, is_optimized: bool) -> BanglaContextAdvice {
    BanglaContextAdvice {
        topic: topic.to_string(),
        advice: advice.to_string(),
        is_optimized,
    }
}

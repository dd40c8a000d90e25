use std::sync::OnceLock;

use serde_json::{json, Value};

use crate::models::analysis::{Impact, OverallLabel, SuggestionCategory};

/// The Gemini `responseSchema` describing `AnalysisResult`.
pub fn analysis_response_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(build_schema)
}

fn build_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overallScore": { "type": "NUMBER" },
            "overallLabel": { "type": "STRING", "enum": OverallLabel::ALL },
            "summary": { "type": "STRING" },
            "matchPercentage": { "type": "NUMBER" },
            "sectionScores": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "score": { "type": "NUMBER" },
                        "feedback": { "type": "STRING" }
                    },
                    "required": ["name", "score", "feedback"]
                }
            },
            "missingKeywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "suggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "text": { "type": "STRING" },
                        "impact": { "type": "STRING", "enum": Impact::ALL },
                        "category": { "type": "STRING", "enum": SuggestionCategory::ALL }
                    },
                    "required": ["id", "text", "impact", "category"]
                }
            },
            "banglaContext": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "topic": { "type": "STRING" },
                        "advice": { "type": "STRING" },
                        "isOptimized": { "type": "BOOLEAN" }
                    },
                    "required": ["topic", "advice", "isOptimized"]
                }
            }
        },
        "required": [
            "overallScore",
            "overallLabel",
            "summary",
            "matchPercentage",
            "sectionScores",
            "missingKeywords",
            "suggestions",
            "banglaContext"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_match_result_types() {
        let schema = analysis_response_schema();
        let props = &schema["properties"];
        assert_eq!(
            props["overallLabel"]["enum"],
            json!(["Needs Work", "Good", "Strong"])
        );
        assert_eq!(
            props["suggestions"]["items"]["properties"]["impact"]["enum"],
            json!(["High", "Medium", "Low"])
        );
        assert_eq!(
            props["suggestions"]["items"]["properties"]["category"]["enum"],
            json!(["Content", "Formatting", "Skills", "Grammar"])
        );
        assert_eq!(
            props["banglaContext"]["items"]["properties"]["isOptimized"]["type"],
            "BOOLEAN"
        );
    }

    #[test]
    fn test_every_result_field_is_described_and_required() {
        let schema = analysis_response_schema();
        let props = schema["properties"].as_object().unwrap();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();

        let mock = serde_json::to_value(crate::analysis::mock::mock_result()).unwrap();
        for field in mock.as_object().unwrap().keys() {
            assert!(props.contains_key(field), "schema lacks {field}");
            assert!(required.contains(&field.as_str()), "{field} not required");
        }
        assert_eq!(props.len(), mock.as_object().unwrap().len());
    }
}

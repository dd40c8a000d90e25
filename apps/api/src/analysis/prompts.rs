// Prompt text for the resume analysis call.

/// Analysis prompt template. Replace `{target_role}`, then append the resume text.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Act as an expert technical recruiter for the Bangladeshi job market.
Analyze the following resume text for a fresher/student applying for the role of: "{target_role}".

Focus on:
1. ATS friendliness.
2. Relevance to the target role.
3. How well they highlight academic projects (Thesis, Lab projects) as experience.
4. Common mistakes Bangladeshi students make (e.g., too much focus on father's name/religion, weak project descriptions).

Resume Text:
"#;

/// Builds the analysis prompt. The resume goes last so nothing inside it is
/// ever treated as a placeholder.
pub fn build_analysis_prompt(resume_text: &str, target_role: &str) -> String {
    let mut prompt = ANALYSIS_PROMPT_TEMPLATE.replace("{target_role}", target_role.trim());
    prompt.push_str(resume_text);
    prompt
}

// Prompt text for the practice-interview coach.

pub const QUESTIONS_PERSONA: &str = "You are a seasoned hiring manager who writes realistic, \
    role-specific interview questions.";

/// Replace `{role}` and `{company_context}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Write 5 interview questions for a {role} candidate{company_context}.

Mix the following:
- technical questions about the core skills of the role
- behavioural questions suited to the seniority of the role
- at least one question about challenges specific to the company, if a company is named

Each question must be a single sentence ending with a question mark.

Return a JSON object with this EXACT schema:
{
  "questions": ["question 1?", "question 2?", "question 3?", "question 4?", "question 5?"]
}"#;

/// Replace `{role_context}` before use.
pub const FEEDBACK_PERSONA_TEMPLATE: &str = "You are an interview coach reviewing a \
    candidate's answer{role_context}. Be encouraging but honest, and prefer concrete, \
    actionable advice over general praise.";

/// Replace `{question}` and `{answer}` before sending.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"Question: "{question}"

Answer: "{answer}"

Score the answer and return a JSON object with this EXACT schema:
{
  "clarity": 1,
  "relevance": 1,
  "suggestions": ["tip 1", "tip 2"],
  "overall": "one or two sentence summary"
}

Rules:
- clarity (integer 1-5): how well structured and easy to follow the answer is
- relevance (integer 1-5): how directly the answer addresses the question
- suggestions: 2 or 3 specific improvements
- overall: a short summary of the strengths and the main thing to improve"#;

pub fn questions_prompt(role: &str, company: Option<&str>) -> String {
    let company_context = company.map(|c| format!(" at {c}")).unwrap_or_default();
    QUESTIONS_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{company_context}", &company_context)
}

pub fn feedback_persona(role: Option<&str>) -> String {
    let role_context = role
        .map(|r| format!(" for a {r} position"))
        .unwrap_or_default();
    FEEDBACK_PERSONA_TEMPLATE.replace("{role_context}", &role_context)
}

pub fn feedback_prompt(question: &str, answer: &str) -> String {
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

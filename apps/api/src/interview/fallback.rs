//! Deterministic stand-ins used whenever the AI is missing, slow or wrong.

use std::collections::HashSet;

use crate::models::Feedback;

const DETAILED_ANSWER_LEN: usize = 100;
const ADEQUATE_ANSWER_LEN: usize = 50;
const MIN_KEYWORD_LEN: usize = 4;

const STOP_WORDS: &[&str] = &[
    "about", "after", "before", "could", "describe", "does", "from", "have", "into", "more",
    "most", "tell", "that", "their", "them", "there", "these", "they", "this", "what", "when",
    "where", "which", "while", "with", "would", "your", "you've",
];

pub fn fallback_questions(role: &str, company: Option<&str>) -> Vec<String> {
    let role = role.trim().to_lowercase();
    let position = match company.map(str::trim).filter(|c| !c.is_empty()) {
        Some(company) => format!("this {role} position at {company}"),
        None => format!("this {role} position"),
    };

    vec![
        format!("Tell me about your experience with {role} responsibilities."),
        format!("What interests you most about {position}?"),
        "Describe a challenging project you've worked on recently.".to_string(),
        "How do you stay updated with industry trends and best practices?".to_string(),
        "What are your career goals in the next 2-3 years?".to_string(),
    ]
}

/// Scores an answer from its length and its overlap with the question's
/// keywords. Always returns at least one suggestion.
pub fn fallback_feedback(question: &str, answer: &str) -> Feedback {
    let length = answer.trim().chars().count();

    let clarity = if length > DETAILED_ANSWER_LEN {
        3
    } else if length > ADEQUATE_ANSWER_LEN {
        2
    } else {
        1
    };

    let overlap = keyword_overlap(question, answer);
    let relevance = if overlap >= 0.5 {
        4
    } else if overlap > 0.0 {
        3
    } else {
        2
    };

    let mut suggestions = Vec::with_capacity(3);
    if length < ADEQUATE_ANSWER_LEN {
        suggestions.push("Try to provide more detailed examples in your answer".to_string());
    }
    suggestions.push(
        "Consider using the STAR method (Situation, Task, Action, Result) for behavioral questions"
            .to_string(),
    );
    suggestions.push("Connect your answer back to the specific requirements of the role".to_string());

    let overall = if length < ADEQUATE_ANSWER_LEN {
        "Your answer could benefit from more detail and specific examples. \
         Try to elaborate on your experience and provide concrete instances."
    } else {
        "Good foundation for an answer. Consider adding more specific examples \
         and connecting your response directly to the role requirements."
    };

    Feedback {
        clarity,
        relevance,
        suggestions,
        overall: overall.to_string(),
    }
}

fn keywords(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN && !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Share of the question's keywords that appear in the answer, from 0.0 to 1.0.
fn keyword_overlap(question: &str, answer: &str) -> f64 {
    let wanted = keywords(question);
    if wanted.is_empty() {
        return 0.0;
    }
    let present = keywords(answer);
    let hits = wanted.iter().filter(|w| present.contains(*w)).count();
    hits as f64 / wanted.len() as f64
}

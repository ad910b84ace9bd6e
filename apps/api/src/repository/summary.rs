use crate::models::{InterviewSession, SessionSummary};

/// Condenses a session into the record kept on its application.
pub fn summarize(session: &InterviewSession) -> SessionSummary {
    let count = session.questions.len();
    let (clarity, relevance) = session.questions.iter().fold((0u32, 0u32), |(c, r), q| {
        (
            c + u32::from(q.feedback.clarity),
            r + u32::from(q.feedback.relevance),
        )
    });

    SessionSummary {
        session_id: session.id,
        question_count: count as u32,
        average_clarity: average(clarity, count),
        average_relevance: average(relevance, count),
        created_at: session.created_at,
    }
}

/// Mean rounded to one decimal place; 0 for an empty session.
fn average(sum: u32, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (f64::from(sum) / count as f64 * 10.0).round() / 10.0
}

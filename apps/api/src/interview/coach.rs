use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::interview::fallback::{fallback_feedback, fallback_questions};
use crate::interview::model::InterviewModel;
use crate::models::Feedback;

/// Practice-interview coach. Never fails: when no model is configured, or the
/// model errors or exceeds `timeout`, the local fallback answers instead.
#[derive(Clone)]
pub struct InterviewCoach {
    model: Option<Arc<dyn InterviewModel>>,
    timeout: Duration,
}

impl InterviewCoach {
    pub fn new(model: Option<Arc<dyn InterviewModel>>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// A coach that always uses the local fallback.
    pub fn offline() -> Self {
        Self::new(None, Duration::ZERO)
    }

    pub fn is_ai_enabled(&self) -> bool {
        self.model.is_some()
    }

    pub async fn questions(&self, role: &str, company: Option<&str>) -> Vec<String> {
        let Some(model) = &self.model else {
            return fallback_questions(role, company);
        };

        match tokio::time::timeout(self.timeout, model.generate_questions(role, company)).await {
            Ok(Ok(questions)) => questions,
            Ok(Err(e)) => {
                warn!("Question generation failed, using fallback: {e}");
                fallback_questions(role, company)
            }
            Err(_) => {
                warn!(
                    "Question generation timed out after {}s, using fallback",
                    self.timeout.as_secs()
                );
                fallback_questions(role, company)
            }
        }
    }

    pub async fn feedback(&self, question: &str, answer: &str, role: Option<&str>) -> Feedback {
        let Some(model) = &self.model else {
            return fallback_feedback(question, answer);
        };

        match tokio::time::timeout(self.timeout, model.evaluate_answer(question, answer, role))
            .await
        {
            Ok(Ok(feedback)) if feedback.scores_in_range() && !feedback.suggestions.is_empty() => {
                feedback
            }
            Ok(Ok(_)) => {
                warn!("Answer feedback was out of range, using fallback");
                fallback_feedback(question, answer)
            }
            Ok(Err(e)) => {
                warn!("Answer feedback failed, using fallback: {e}");
                fallback_feedback(question, answer)
            }
            Err(_) => {
                warn!(
                    "Answer feedback timed out after {}s, using fallback",
                    self.timeout.as_secs()
                );
                fallback_feedback(question, answer)
            }
        }
    }
}

// Practice interviews: AI question generation and answer feedback.
// Every call goes through InterviewCoach, which falls back to local
// heuristics so the practice flow never fails on AI errors.

pub mod coach;
pub mod fallback;
pub mod handlers;
pub mod model;
pub mod prompts;

pub use coach::InterviewCoach;
pub use model::InterviewModel;

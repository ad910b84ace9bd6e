pub mod application;
pub mod session;

pub use application::{
    Application, ApplicationChanges, ApplicationPatch, ApplicationRow, NewApplication,
    SessionSummary, Status, Tag,
};
pub use session::{Feedback, InterviewSession, NewSession, QuestionWithAnswer, SessionRow};

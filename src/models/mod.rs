pub mod assessment;
pub mod question;
pub mod session;

pub use assessment::{AssessmentRequest, AssessmentResult, QuestionRequest};
pub use question::{AnswerOption, Question, QuestionId, QuestionPayload, LIKERT_SCALE};
pub use session::{Progress, Session};

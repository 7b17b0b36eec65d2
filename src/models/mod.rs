mod history;
mod quiz;

pub use history::{GeneratedAt, HistoryEntry, MISSING_DATE_PLACEHOLDER};
pub use quiz::{QuestionRecord, QuizRecord, DEFAULT_DIFFICULTY};

use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_DIFFICULTY: &str = "medium";

/// A quiz as the UI renders it, independent of which field names the service used.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuizRecord {
    pub title: String,
    pub summary: String,
    pub key_entities: Vec<String>,
    pub related_topics: Vec<String>,
    pub questions: Vec<QuestionRecord>,
    /// Fields the client does not interpret, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub difficulty: String,
}

impl Default for QuestionRecord {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: Vec::new(),
            correct_answer: String::new(),
            explanation: String::new(),
            difficulty: DEFAULT_DIFFICULTY.to_string(),
        }
    }
}

impl QuizRecord {
    pub fn into_value(self) -> Value {
        // A struct of strings, vectors and a JSON map always serializes
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl QuestionRecord {
    /// Trimmed comparison against the correct answer, used for highlighting.
    pub fn is_correct(&self, option: &str) -> bool {
        let answer = self.correct_answer.trim();
        !answer.is_empty() && answer == option.trim()
    }

    /// True when the answer matches exactly one option.
    pub fn is_well_formed(&self) -> bool {
        self.options.iter().filter(|o| self.is_correct(o)).count() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(options: &[&str], answer: &str) -> QuestionRecord {
        QuestionRecord {
            question: "Capital of France?".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: answer.to_string(),
            ..QuestionRecord::default()
        }
    }

    #[test]
    fn test_is_correct_trims_both_sides() {
        let q = question(&["Paris ", "Lyon"], " Paris");
        assert!(q.is_correct("Paris "));
        assert!(!q.is_correct("Lyon"));
        assert!(q.is_well_formed());
    }

    #[test]
    fn test_empty_answer_never_matches() {
        let q = question(&["", "Lyon"], "");
        assert!(!q.is_correct(""));
        assert!(!q.is_well_formed());
    }

    #[test]
    fn test_duplicate_options_not_well_formed() {
        let q = question(&["Paris", "Paris"], "Paris");
        assert!(!q.is_well_formed());
    }

    #[test]
    fn test_serializes_with_service_names_and_extras() {
        let mut extra = Map::new();
        extra.insert("url".to_string(), json!("https://en.wikipedia.org/wiki/Paris"));
        let record = QuizRecord {
            title: "Paris".to_string(),
            key_entities: vec!["France".to_string()],
            questions: vec![question(&["Paris"], "Paris")],
            extra,
            ..QuizRecord::default()
        };

        let value = record.into_value();
        assert_eq!(value["key_entities"], json!(["France"]));
        assert_eq!(value["related_topics"], json!([]));
        assert_eq!(value["questions"][0]["correct_answer"], json!("Paris"));
        assert_eq!(value["questions"][0]["difficulty"], json!("medium"));
        assert_eq!(value["url"], json!("https://en.wikipedia.org/wiki/Paris"));
    }
}

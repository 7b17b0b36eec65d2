use serde_json::{Map, Value};

use crate::models::{QuestionRecord, QuizRecord, DEFAULT_DIFFICULTY};

use super::fields::{first_present, option_list, string_list, text_field};

const QUESTION_LIST_KEYS: &[&str] = &["questions", "quiz", "data"];
const RELATED_TOPIC_KEYS: &[&str] = &["related_topics", "relatedTopics", "related"];
const KEY_ENTITY_KEYS: &[&str] = &["key_entities", "keyEntities", "entities"];

const QUESTION_TEXT_KEYS: &[&str] = &["question", "q", "prompt"];
const OPTION_KEYS: &[&str] = &["options", "choices", "answers"];
const CORRECT_ANSWER_KEYS: &[&str] = &["correct_answer", "answer", "correct"];
const EXPLANATION_KEYS: &[&str] = &["explanation", "explain", "explanations"];
const DIFFICULTY_KEYS: &[&str] = &["difficulty"];

/// Keys the canonical record writes itself; everything else passes through.
const CANONICAL_KEYS: &[&str] = &["title", "summary", "questions", "related_topics", "key_entities"];

/// Builds a [`QuizRecord`] from whatever the quiz service returned.
///
/// `null` has no record and comes back as `None`. Any other value yields a
/// record: missing or malformed fields become empty, never an error.
pub fn normalize_quiz(raw: &Value) -> Option<QuizRecord> {
    if raw.is_null() {
        return None;
    }

    let empty = Map::new();
    let object = raw.as_object().unwrap_or(&empty);

    let questions = match first_present(object, QUESTION_LIST_KEYS) {
        Some(Value::Array(items)) => items.iter().map(normalize_question).collect(),
        _ => Vec::new(),
    };

    let related_topics = first_present(object, RELATED_TOPIC_KEYS)
        .map(string_list)
        .unwrap_or_default();

    let key_entities = first_present(object, KEY_ENTITY_KEYS)
        .map(string_list)
        .unwrap_or_default();

    let extra = object
        .iter()
        .filter(|(key, _)| !CANONICAL_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Some(QuizRecord {
        title: text_field(object, &["title"]),
        summary: text_field(object, &["summary"]),
        key_entities,
        related_topics,
        questions,
        extra,
    })
}

/// JSON-in, JSON-out form of [`normalize_quiz`]: `null` passes through as `null`.
pub fn normalize_quiz_value(raw: &Value) -> Value {
    normalize_quiz(raw).map_or(Value::Null, QuizRecord::into_value)
}

fn normalize_question(raw: &Value) -> QuestionRecord {
    let empty = Map::new();
    let object = raw.as_object().unwrap_or(&empty);

    let difficulty = text_field(object, DIFFICULTY_KEYS);

    QuestionRecord {
        question: text_field(object, QUESTION_TEXT_KEYS),
        options: first_present(object, OPTION_KEYS)
            .map(option_list)
            .unwrap_or_default(),
        correct_answer: text_field(object, CORRECT_ANSWER_KEYS),
        explanation: text_field(object, EXPLANATION_KEYS),
        difficulty: if difficulty.is_empty() {
            DEFAULT_DIFFICULTY.to_string()
        } else {
            difficulty
        },
    }
}

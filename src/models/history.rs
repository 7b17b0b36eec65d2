use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

pub const MISSING_DATE_PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub date_generated: GeneratedAt,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// When a quiz was generated, as far as the service payload lets us tell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GeneratedAt {
    /// No timestamp field, or an empty one.
    Missing,
    At(DateTime<Utc>),
    /// Unparseable value, kept verbatim for display.
    Raw(String),
}

impl GeneratedAt {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            GeneratedAt::At(at) => Some(*at),
            _ => None,
        }
    }

    /// Display form for the history table, in the user's local time zone.
    pub fn label(&self) -> String {
        match self {
            GeneratedAt::Missing => MISSING_DATE_PLACEHOLDER.to_string(),
            GeneratedAt::At(at) => at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            GeneratedAt::Raw(raw) => raw.clone(),
        }
    }
}

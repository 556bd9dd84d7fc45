use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Answers given so far in the current questionnaire session, keyed by
/// question id. Absence of a key means the question is unanswered, which the
/// evaluator treats as distinct from every answer value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSnapshot {
    answers: BTreeMap<String, String>,
}

impl AnswerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from a JSON object of answers, coercing scalar
    /// values to comparison tokens: booleans become `"yes"`/`"no"` (matching
    /// the synthesized boolean options), numbers their display form. Nulls
    /// and non-scalar values are treated as unanswered.
    pub fn from_json(value: &Value) -> Self {
        let mut snapshot = Self::new();
        if let Some(object) = value.as_object() {
            for (question_id, answer) in object {
                let token = match answer {
                    Value::String(text) => Some(text.clone()),
                    Value::Bool(true) => Some("yes".into()),
                    Value::Bool(false) => Some("no".into()),
                    Value::Number(number) => Some(number.to_string()),
                    _ => None,
                };
                if let Some(token) = token {
                    snapshot.set(question_id.clone(), token);
                }
            }
        }
        snapshot
    }

    pub fn set(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.answers.insert(question_id.into(), value.into());
    }

    pub fn clear(&mut self, question_id: &str) {
        self.answers.remove(question_id);
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl FromIterator<(String, String)> for AnswerSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::question::{Question, QuestionType};

/// One selectable answer for a `select`/`multiple_choice` question.
///
/// `text` is the display label; `value` is the canonical comparison token
/// that conditional rules and answer snapshots use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerOption {
    pub id: String,
    pub question_id: String,
    pub text: String,
    pub value: String,
    pub order_index: i64,
}

/// Derives the canonical comparison token from an option's display text:
/// trimmed, lowercased, whitespace runs collapsed to `_`.
///
/// This happens once at authoring time. Evaluation compares tokens with exact
/// string equality and never re-canonicalizes.
pub fn canonical_value(text: &str) -> String {
    let whitespace = Regex::new(r"\s+").expect("static pattern");
    whitespace
        .replace_all(text.trim(), "_")
        .to_lowercase()
}

/// Answer options for a question, synthesizing the fixed yes/no pair for
/// boolean questions (which never store options).
pub fn options_for(question: &Question, stored: &[AnswerOption]) -> Vec<AnswerOption> {
    if question.kind == QuestionType::Boolean {
        return boolean_options(&question.id);
    }
    stored
        .iter()
        .filter(|option| option.question_id == question.id)
        .cloned()
        .collect()
}

fn boolean_options(question_id: &str) -> Vec<AnswerOption> {
    vec![
        AnswerOption {
            id: "yes".into(),
            question_id: question_id.to_string(),
            text: "Yes".into(),
            value: "yes".into(),
            order_index: 0,
        },
        AnswerOption {
            id: "no".into(),
            question_id: question_id.to_string(),
            text: "No".into(),
            value: "no".into(),
            order_index: 1,
        },
    ]
}

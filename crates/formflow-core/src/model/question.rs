use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Answer input style of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Select,
    MultipleChoice,
    Boolean,
    Number,
}

impl QuestionType {
    /// Whether answers to this question have a bounded value space that a
    /// conditional rule can compare against. Free text and numbers do not.
    pub fn supports_conditions(&self) -> bool {
        matches!(
            self,
            QuestionType::Select | QuestionType::MultipleChoice | QuestionType::Boolean
        )
    }

    /// Whether answer options for this question live in the catalog. Boolean
    /// questions synthesize their yes/no pair instead.
    pub fn has_stored_options(&self) -> bool {
        matches!(self, QuestionType::Select | QuestionType::MultipleChoice)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Select => "select",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Boolean => "boolean",
            QuestionType::Number => "number",
        }
    }
}

/// A single authored question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub required: bool,
    pub order_index: i64,
    /// Short human-readable tag, assigned once on first load and immutable
    /// thereafter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
    /// Owning section; `None` means the question is unsectioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
}

impl Question {
    /// Display label used in authoring views: `[SHORT] text` when a short id
    /// has been assigned.
    pub fn label(&self) -> String {
        match &self.short_id {
            Some(short_id) => format!("[{}] {}", short_id, self.text),
            None => self.text.clone(),
        }
    }
}

use thiserror::Error;
use uuid::Uuid;

use crate::model::Question;
use crate::rule::{Rule, RuleKind, RuleTarget};

/// Authoring-time comparison choice for a new rule, before it is bound to a
/// dependent question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionSpec {
    /// The dependent answer must equal this token.
    Equals { value: String },
    /// The dependent question must merely have an answer.
    Exists,
}

/// User-correctable authoring mistakes. These block the action locally and
/// are shown to the author; nothing reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("select a question for the condition to depend on")]
    MissingDependentQuestion,
    #[error("a question cannot depend on its own answer")]
    SelfReference,
    #[error("select an answer value to compare against")]
    MissingAnswerValue,
    #[error("{kind} questions cannot be used as a condition source")]
    IneligibleDependentType { kind: &'static str },
}

/// Validates the authoring inputs for a new rule and constructs it. Pure:
/// persisting the result is the store's job.
///
/// `questions` is the known question set; the dependent question must be in
/// it and must have a bounded answer space (select, multiple choice, or
/// boolean).
pub fn validate_rule(
    questions: &[Question],
    target: RuleTarget,
    dependent_question_id: &str,
    condition: ConditionSpec,
    negated: bool,
) -> Result<Rule, ValidationError> {
    if dependent_question_id.is_empty() {
        return Err(ValidationError::MissingDependentQuestion);
    }
    let dependent = questions
        .iter()
        .find(|question| question.id == dependent_question_id)
        .ok_or(ValidationError::MissingDependentQuestion)?;

    if let RuleTarget::Question(target_id) = &target
        && target_id == dependent_question_id
    {
        return Err(ValidationError::SelfReference);
    }

    if !dependent.kind.supports_conditions() {
        return Err(ValidationError::IneligibleDependentType {
            kind: dependent.kind.as_str(),
        });
    }

    let kind = match condition {
        ConditionSpec::Equals { value } => {
            if value.is_empty() {
                return Err(ValidationError::MissingAnswerValue);
            }
            RuleKind::Equals {
                dependent_question_id: dependent_question_id.to_string(),
                value,
            }
        }
        ConditionSpec::Exists => RuleKind::Exists {
            dependent_question_id: dependent_question_id.to_string(),
        },
    };

    Ok(Rule {
        id: Uuid::new_v4().to_string(),
        target,
        kind,
        negated,
        banner_message: None,
    })
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Legacy sentinel meaning "test whether the dependent question is answered
/// at all", stored in `dependent_answer_value` by older authoring builds.
pub const EXISTS_SENTINEL: &str = "__EXISTS__";

/// Legacy sentinel used by banner-only rows that carried a fake comparison
/// value so the row would pass the old insert path.
pub const DUMMY_VALUE_SENTINEL: &str = "dummy_value";

/// The entity a rule gates. Questions and sections live in distinct id
/// spaces; a rule targets exactly one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTarget {
    Question(String),
    Section(String),
}

impl RuleTarget {
    pub fn id(&self) -> &str {
        match self {
            RuleTarget::Question(id) | RuleTarget::Section(id) => id,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, RuleTarget::Section(_))
    }
}

/// What a rule actually tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// The dependent question's answer equals `value` (exact token match).
    Equals {
        dependent_question_id: String,
        value: String,
    },
    /// The dependent question has been answered at all; the answer value is
    /// irrelevant.
    Exists { dependent_question_id: String },
    /// No usable comparison. The row exists only to carry a banner message
    /// and never participates in visibility evaluation.
    BannerOnly,
}

impl RuleKind {
    pub fn dependent_question_id(&self) -> Option<&str> {
        match self {
            RuleKind::Equals {
                dependent_question_id,
                ..
            }
            | RuleKind::Exists {
                dependent_question_id,
            } => Some(dependent_question_id),
            RuleKind::BannerOnly => None,
        }
    }
}

/// A conditional-visibility rule in its typed, validated form.
///
/// A target entity owns zero or more rules; it is visible iff every
/// non-banner-only rule it owns is satisfied. `negated` inverts the test
/// (`is_not` conditions, "hidden when answered" existence checks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleRow", into = "RuleRow")]
pub struct Rule {
    pub id: String,
    pub target: RuleTarget,
    pub kind: RuleKind,
    pub negated: bool,
    /// Only meaningful for section targets: free text shown when the section
    /// is hidden by its rules.
    pub banner_message: Option<String>,
}

impl Rule {
    pub fn is_banner_only(&self) -> bool {
        matches!(self.kind, RuleKind::BannerOnly)
    }

    /// Human rendering for authoring views, e.g. `shown when Q1 is "yes"`.
    pub fn describe(&self) -> String {
        match &self.kind {
            RuleKind::Equals {
                dependent_question_id,
                value,
            } => {
                let verb = if self.negated { "is not" } else { "is" };
                format!("shown when {} {} \"{}\"", dependent_question_id, verb, value)
            }
            RuleKind::Exists {
                dependent_question_id,
            } => {
                let state = if self.negated { "unanswered" } else { "answered" };
                format!("shown when {} is {}", dependent_question_id, state)
            }
            RuleKind::BannerOnly => match &self.banner_message {
                Some(message) => format!("banner only: \"{}\"", message),
                None => "banner only (no message)".into(),
            },
        }
    }
}

/// Stored shape of a rule row, matching the legacy `conditional_logic` table:
/// a string discriminator plus two nullable target columns, and several
/// incompatible historical encodings of "existence check" and "banner only".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RuleRow {
    pub id: String,
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_question_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_answer_value: Option<String>,
    #[serde(default)]
    pub not_condition: bool,
    #[serde(default)]
    pub check_answer_existence: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_message: Option<String>,
}

/// A rule row the store cannot interpret. Callers log these and treat the
/// owning entity as having one fewer rule; they never abort evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRule {
    #[error("rule {id}: entity_type \"{entity_type}\" is not question or section")]
    UnknownEntityType { id: String, entity_type: String },
    #[error("rule {id}: both question_id and section_id are set")]
    BothTargetsSet { id: String },
    #[error("rule {id}: neither question_id nor section_id is set")]
    NoTargetSet { id: String },
    #[error("rule {id}: {column} does not match entity_type \"{entity_type}\"")]
    TargetMismatch {
        id: String,
        entity_type: String,
        column: &'static str,
    },
}

impl TryFrom<RuleRow> for Rule {
    type Error = MalformedRule;

    fn try_from(row: RuleRow) -> Result<Self, Self::Error> {
        let target = resolve_target(&row)?;
        let kind = resolve_kind(&row);
        Ok(Rule {
            id: row.id,
            target,
            kind,
            negated: row.not_condition,
            banner_message: row.banner_message,
        })
    }
}

fn resolve_target(row: &RuleRow) -> Result<RuleTarget, MalformedRule> {
    if row.question_id.is_some() && row.section_id.is_some() {
        return Err(MalformedRule::BothTargetsSet { id: row.id.clone() });
    }
    match row.entity_type.as_str() {
        "question" => match &row.question_id {
            Some(question_id) => Ok(RuleTarget::Question(question_id.clone())),
            None if row.section_id.is_some() => Err(MalformedRule::TargetMismatch {
                id: row.id.clone(),
                entity_type: row.entity_type.clone(),
                column: "section_id",
            }),
            None => Err(MalformedRule::NoTargetSet { id: row.id.clone() }),
        },
        "section" => match &row.section_id {
            Some(section_id) => Ok(RuleTarget::Section(section_id.clone())),
            None if row.question_id.is_some() => Err(MalformedRule::TargetMismatch {
                id: row.id.clone(),
                entity_type: row.entity_type.clone(),
                column: "question_id",
            }),
            None => Err(MalformedRule::NoTargetSet { id: row.id.clone() }),
        },
        other => Err(MalformedRule::UnknownEntityType {
            id: row.id.clone(),
            entity_type: other.to_string(),
        }),
    }
}

/// Classifies the row's comparison. There is no single canonical legacy shape
/// for banner-only rows, so the test is simply whether the row carries a
/// usable comparison at all.
fn resolve_kind(row: &RuleRow) -> RuleKind {
    let dependent = row
        .dependent_question_id
        .as_deref()
        .filter(|id| !id.is_empty());
    let Some(dependent_question_id) = dependent else {
        return RuleKind::BannerOnly;
    };

    let value = row
        .dependent_answer_value
        .as_deref()
        .filter(|value| !value.is_empty());

    if row.check_answer_existence || value == Some(EXISTS_SENTINEL) {
        return RuleKind::Exists {
            dependent_question_id: dependent_question_id.to_string(),
        };
    }

    match value {
        Some(DUMMY_VALUE_SENTINEL) | None => RuleKind::BannerOnly,
        Some(value) => RuleKind::Equals {
            dependent_question_id: dependent_question_id.to_string(),
            value: value.to_string(),
        },
    }
}

impl From<Rule> for RuleRow {
    fn from(rule: Rule) -> Self {
        let (entity_type, question_id, section_id) = match rule.target {
            RuleTarget::Question(id) => ("question", Some(id), None),
            RuleTarget::Section(id) => ("section", None, Some(id)),
        };
        let (dependent_question_id, dependent_answer_value, check_answer_existence) =
            match rule.kind {
                RuleKind::Equals {
                    dependent_question_id,
                    value,
                } => (Some(dependent_question_id), Some(value), false),
                RuleKind::Exists {
                    dependent_question_id,
                } => (Some(dependent_question_id), None, true),
                RuleKind::BannerOnly => (None, None, false),
            };
        RuleRow {
            id: rule.id,
            entity_type: entity_type.to_string(),
            question_id,
            section_id,
            dependent_question_id,
            dependent_answer_value,
            not_condition: rule.negated,
            check_answer_existence,
            banner_message: rule.banner_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(json: serde_json::Value) -> RuleRow {
        serde_json::from_value(json).expect("rule row")
    }

    #[test]
    fn exists_sentinel_decodes_like_the_boolean_flag() {
        let legacy = Rule::try_from(row(serde_json::json!({
            "id": "r1",
            "entity_type": "question",
            "question_id": "q2",
            "dependent_question_id": "q1",
            "dependent_answer_value": "__EXISTS__"
        })))
        .expect("legacy row");
        let modern = Rule::try_from(row(serde_json::json!({
            "id": "r2",
            "entity_type": "question",
            "question_id": "q2",
            "dependent_question_id": "q1",
            "check_answer_existence": true
        })))
        .expect("modern row");
        assert_eq!(legacy.kind, modern.kind);
        assert!(matches!(legacy.kind, RuleKind::Exists { .. }));
    }

    #[test]
    fn dummy_value_rows_are_banner_only() {
        let rule = Rule::try_from(row(serde_json::json!({
            "id": "r1",
            "entity_type": "section",
            "section_id": "s1",
            "dependent_question_id": "q1",
            "dependent_answer_value": "dummy_value",
            "not_condition": true,
            "banner_message": "Not applicable"
        })))
        .expect("banner row");
        assert!(rule.is_banner_only());
        assert_eq!(rule.banner_message.as_deref(), Some("Not applicable"));
    }

    #[test]
    fn null_field_banner_rows_are_banner_only() {
        let rule = Rule::try_from(row(serde_json::json!({
            "id": "r1",
            "entity_type": "section",
            "section_id": "s1",
            "not_condition": true,
            "banner_message": "Section hidden"
        })))
        .expect("banner row");
        assert!(rule.is_banner_only());
    }

    #[test]
    fn conflicting_target_columns_are_malformed() {
        let err = Rule::try_from(row(serde_json::json!({
            "id": "r1",
            "entity_type": "question",
            "question_id": "q1",
            "section_id": "s1",
            "dependent_question_id": "q2",
            "dependent_answer_value": "yes"
        })))
        .unwrap_err();
        assert_eq!(err, MalformedRule::BothTargetsSet { id: "r1".into() });
    }

    #[test]
    fn round_trip_keeps_the_modern_encoding() {
        let rule = Rule::try_from(row(serde_json::json!({
            "id": "r1",
            "entity_type": "question",
            "question_id": "q2",
            "dependent_question_id": "q1",
            "dependent_answer_value": "__EXISTS__",
            "not_condition": true
        })))
        .expect("rule");
        let encoded = RuleRow::from(rule.clone());
        assert!(encoded.check_answer_existence);
        assert_eq!(encoded.dependent_answer_value, None);
        assert_eq!(Rule::try_from(encoded).expect("reparse"), rule);
    }
}

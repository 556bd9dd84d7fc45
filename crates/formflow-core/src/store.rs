use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{AnswerOption, Question, QuestionType, Section, canonical_value, options_for};
use crate::rule::{Rule, RuleRow, RuleTarget};
use crate::short_id::generate_short_id;

/// Persisted shape of a questionnaire catalog: the four tables, exactly as
/// they serialize to disk or a relational store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Catalog {
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answer_options: Vec<AnswerOption>,
    #[serde(default)]
    pub conditional_logic: Vec<RuleRow>,
}

/// Failures of store mutations. Surfaced to the author as a retryable
/// notification; callers must refetch rather than assume partial state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("rule {rule_id} references missing {kind} {reference_id}")]
    MissingReference {
        rule_id: String,
        kind: &'static str,
        reference_id: String,
    },
    #[error("rule {id} targets a question; banner messages apply to section rules only")]
    BannerOnQuestionRule { id: String },
    #[error("question {id} does not store answer options")]
    OptionsNotStored { id: String },
}

/// Fields the author supplies when creating a question; ids, short ids, and
/// order indices are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub text: String,
    pub kind: QuestionType,
    pub required: bool,
    pub section_id: Option<String>,
}

/// In-memory working set of one catalog. Constructed once per session and
/// passed by reference to the evaluator and any UI layer; `load` replaces the
/// ambient refetch-on-mount behavior of the old authoring client.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    sections: Vec<Section>,
    questions: Vec<Question>,
    options: Vec<AnswerOption>,
    rules: Vec<Rule>,
}

impl CatalogStore {
    /// Builds a store from persisted rows.
    ///
    /// Rule rows that cannot be interpreted are logged and skipped, leaving
    /// their entity with one fewer rule. Questions missing a `short_id` are
    /// backfilled here, on first load only; nothing else about them changes.
    pub fn load(catalog: Catalog) -> Self {
        let Catalog {
            sections,
            mut questions,
            answer_options,
            conditional_logic,
        } = catalog;

        for question in &mut questions {
            if question.short_id.is_none() {
                question.short_id = Some(generate_short_id());
            }
        }

        let rules = conditional_logic
            .into_iter()
            .filter_map(|row| match Rule::try_from(row) {
                Ok(rule) => Some(rule),
                Err(error) => {
                    tracing::warn!("skipping malformed conditional rule: {error}");
                    None
                }
            })
            .collect();

        let mut store = Self {
            sections,
            questions,
            options: answer_options,
            rules,
        };
        store.resort();
        store
    }

    /// Serializes the working set back to its persisted shape.
    pub fn to_catalog(&self) -> Catalog {
        Catalog {
            sections: self.sections.clone(),
            questions: self.questions.clone(),
            answer_options: self.options.clone(),
            conditional_logic: self.rules.iter().cloned().map(RuleRow::from).collect(),
        }
    }

    fn resort(&mut self) {
        self.sections.sort_by_key(|section| section.order_index);
        self.questions.sort_by_key(|question| question.order_index);
        self.options.sort_by_key(|option| option.order_index);
    }

    /// Sections in display order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All questions in `order_index` order, across sections.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Questions in one sibling scope, in display order. `None` is the
    /// unsectioned scope.
    pub fn questions_in_section(&self, section_id: Option<&str>) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.section_id.as_deref() == section_id)
            .collect()
    }

    /// Answer options for a question, with the boolean yes/no pair
    /// synthesized. Unknown questions have no options.
    pub fn options_for_question(&self, question_id: &str) -> Vec<AnswerOption> {
        match self.question(question_id) {
            Some(question) => options_for(question, &self.options),
            None => Vec::new(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The unordered AND-set of rules gating one entity.
    pub fn rules_for(&self, target: &RuleTarget) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|rule| &rule.target == target)
            .collect()
    }

    pub fn create_section(&mut self, title: impl Into<String>) -> &Section {
        let order_index = next_order_index(self.sections.iter().map(|section| section.order_index));
        self.sections.push(Section {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            order_index,
        });
        self.sections.last().expect("just pushed")
    }

    pub fn create_question(&mut self, new: NewQuestion) -> &Question {
        let order_index = next_order_index(
            self.questions_in_section(new.section_id.as_deref())
                .iter()
                .map(|question| question.order_index),
        );
        self.questions.push(Question {
            id: Uuid::new_v4().to_string(),
            text: new.text,
            kind: new.kind,
            required: new.required,
            order_index,
            short_id: Some(generate_short_id()),
            section_id: new.section_id,
        });
        self.questions.last().expect("just pushed")
    }

    pub fn update_question(
        &mut self,
        id: &str,
        text: impl Into<String>,
        required: bool,
    ) -> Result<(), PersistenceError> {
        let question = self
            .questions
            .iter_mut()
            .find(|question| question.id == id)
            .ok_or_else(|| PersistenceError::NotFound {
                kind: "question",
                id: id.to_string(),
            })?;
        question.text = text.into();
        question.required = required;
        Ok(())
    }

    /// Adds an answer option, deriving its comparison `value` from the
    /// display text. Boolean questions never store options.
    pub fn add_answer_option(
        &mut self,
        question_id: &str,
        text: impl Into<String>,
    ) -> Result<&AnswerOption, PersistenceError> {
        let question =
            self.question(question_id)
                .ok_or_else(|| PersistenceError::NotFound {
                    kind: "question",
                    id: question_id.to_string(),
                })?;
        if !question.kind.has_stored_options() {
            return Err(PersistenceError::OptionsNotStored {
                id: question_id.to_string(),
            });
        }
        let text = text.into();
        let order_index = next_order_index(
            self.options
                .iter()
                .filter(|option| option.question_id == question_id)
                .map(|option| option.order_index),
        );
        self.options.push(AnswerOption {
            id: Uuid::new_v4().to_string(),
            question_id: question_id.to_string(),
            value: canonical_value(&text),
            text,
            order_index,
        });
        Ok(self.options.last().expect("just pushed"))
    }

    /// Deletes a question with its cascades: the question's answer options
    /// and every rule *targeting* it are removed. Rules that *depend* on it
    /// are kept as dangling references so the author's intent stays on
    /// record; the evaluator resolves them fail-open.
    pub fn delete_question(&mut self, id: &str) -> Result<(), PersistenceError> {
        let before = self.questions.len();
        self.questions.retain(|question| question.id != id);
        if self.questions.len() == before {
            return Err(PersistenceError::NotFound {
                kind: "question",
                id: id.to_string(),
            });
        }
        self.options.retain(|option| option.question_id != id);
        let target = RuleTarget::Question(id.to_string());
        self.rules.retain(|rule| rule.target != target);
        Ok(())
    }

    /// Deletes a section with its cascades: rules targeting it are removed
    /// and its questions become unsectioned.
    pub fn delete_section(&mut self, id: &str) -> Result<(), PersistenceError> {
        let before = self.sections.len();
        self.sections.retain(|section| section.id != id);
        if self.sections.len() == before {
            return Err(PersistenceError::NotFound {
                kind: "section",
                id: id.to_string(),
            });
        }
        let target = RuleTarget::Section(id.to_string());
        self.rules.retain(|rule| rule.target != target);
        for question in &mut self.questions {
            if question.section_id.as_deref() == Some(id) {
                question.section_id = None;
            }
        }
        Ok(())
    }

    /// Persists a validated rule. Foreign keys are re-checked here as defense
    /// in depth beyond the authoring validator.
    pub fn create_rule(&mut self, rule: Rule) -> Result<&Rule, PersistenceError> {
        match &rule.target {
            RuleTarget::Question(id) if self.question(id).is_none() => {
                return Err(PersistenceError::MissingReference {
                    rule_id: rule.id.clone(),
                    kind: "question",
                    reference_id: id.clone(),
                });
            }
            RuleTarget::Section(id) if self.section(id).is_none() => {
                return Err(PersistenceError::MissingReference {
                    rule_id: rule.id.clone(),
                    kind: "section",
                    reference_id: id.clone(),
                });
            }
            _ => {}
        }
        if let Some(dependent_id) = rule.kind.dependent_question_id()
            && self.question(dependent_id).is_none()
        {
            return Err(PersistenceError::MissingReference {
                rule_id: rule.id.clone(),
                kind: "question",
                reference_id: dependent_id.to_string(),
            });
        }
        self.rules.push(rule);
        Ok(self.rules.last().expect("just pushed"))
    }

    pub fn delete_rule(&mut self, id: &str) -> Result<(), PersistenceError> {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.id != id);
        if self.rules.len() == before {
            return Err(PersistenceError::NotFound {
                kind: "rule",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Edits the banner text on a section rule.
    pub fn update_banner_message(
        &mut self,
        rule_id: &str,
        message: impl Into<String>,
    ) -> Result<(), PersistenceError> {
        let rule = self
            .rules
            .iter_mut()
            .find(|rule| rule.id == rule_id)
            .ok_or_else(|| PersistenceError::NotFound {
                kind: "rule",
                id: rule_id.to_string(),
            })?;
        if !rule.target.is_section() {
            return Err(PersistenceError::BannerOnQuestionRule {
                id: rule_id.to_string(),
            });
        }
        rule.banner_message = Some(message.into());
        Ok(())
    }

    /// Overwrites one question's `order_index`. Used by the ordering service
    /// as one half of a swap; not part of the authoring surface.
    pub(crate) fn set_question_order(
        &mut self,
        id: &str,
        order_index: i64,
    ) -> Result<(), PersistenceError> {
        let question = self
            .questions
            .iter_mut()
            .find(|question| question.id == id)
            .ok_or_else(|| PersistenceError::NotFound {
                kind: "question",
                id: id.to_string(),
            })?;
        question.order_index = order_index;
        self.resort();
        Ok(())
    }

    pub(crate) fn set_section_order(
        &mut self,
        id: &str,
        order_index: i64,
    ) -> Result<(), PersistenceError> {
        let section = self
            .sections
            .iter_mut()
            .find(|section| section.id == id)
            .ok_or_else(|| PersistenceError::NotFound {
                kind: "section",
                id: id.to_string(),
            })?;
        section.order_index = order_index;
        self.resort();
        Ok(())
    }
}

fn next_order_index(existing: impl Iterator<Item = i64>) -> i64 {
    existing.max().map_or(0, |max| max + 1)
}

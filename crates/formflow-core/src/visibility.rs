use std::collections::BTreeMap;

use serde::Serialize;

use crate::answers::AnswerSnapshot;
use crate::rule::{Rule, RuleKind, RuleTarget};
use crate::store::CatalogStore;

/// Which kind of entity a visibility query is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Question,
    Section,
}

/// The evaluator's output for one entity. `banner_message` is only ever set
/// for hidden sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_message: Option<String>,
}

impl Verdict {
    pub fn visible() -> Self {
        Verdict {
            visible: true,
            banner_message: None,
        }
    }
}

/// Verdict for every section and question in the catalog, keyed by entity id.
/// Sections and questions share the map; their id spaces are distinct.
pub type VerdictMap = BTreeMap<String, Verdict>;

/// Evaluates the whole catalog against one answer snapshot. Pure and cheap
/// (linear in rule count); re-run it whenever the snapshot changes.
pub fn resolve_visibility(store: &CatalogStore, answers: &AnswerSnapshot) -> VerdictMap {
    let mut map = VerdictMap::new();
    for section in store.sections() {
        map.insert(
            section.id.clone(),
            evaluate_visibility(store, &section.id, EntityType::Section, answers),
        );
    }
    for question in store.questions() {
        map.insert(
            question.id.clone(),
            evaluate_visibility(store, &question.id, EntityType::Question, answers),
        );
    }
    map
}

/// Verdict for a single entity: visible iff every enforceable rule gating it
/// is satisfied. An entity with no rules is always visible.
pub fn evaluate_visibility(
    store: &CatalogStore,
    entity_id: &str,
    entity_type: EntityType,
    answers: &AnswerSnapshot,
) -> Verdict {
    let target = match entity_type {
        EntityType::Question => RuleTarget::Question(entity_id.to_string()),
        EntityType::Section => RuleTarget::Section(entity_id.to_string()),
    };
    let rules = store.rules_for(&target);

    let visible = rules
        .iter()
        .filter(|rule| !rule.is_banner_only())
        .all(|rule| rule_satisfied(rule, store, answers));

    // Banner text belongs to hidden sections only. Banner-only rules are
    // excluded from the AND-set above but still carry a candidate message.
    let banner_message = if !visible && entity_type == EntityType::Section {
        rules.iter().find_map(|rule| rule.banner_message.clone())
    } else {
        None
    };

    Verdict {
        visible,
        banner_message,
    }
}

/// One rule against one snapshot.
///
/// A rule whose dependent question no longer exists is always satisfied:
/// hiding content over a dangling reference would punish the end user for
/// authoring-side data corruption. This fail-open policy is deliberate.
fn rule_satisfied(rule: &Rule, store: &CatalogStore, answers: &AnswerSnapshot) -> bool {
    let satisfied = match &rule.kind {
        RuleKind::Equals {
            dependent_question_id,
            value,
        } => {
            if store.question(dependent_question_id).is_none() {
                tracing::warn!(
                    rule = %rule.id,
                    dependent = %dependent_question_id,
                    "rule depends on a missing question; treating as satisfied"
                );
                return true;
            }
            // Unanswered is distinct from every answer value: an `is` rule
            // fails and an `is_not` rule holds when nothing was answered.
            answers.answer_for(dependent_question_id) == Some(value.as_str())
        }
        RuleKind::Exists {
            dependent_question_id,
        } => {
            if store.question(dependent_question_id).is_none() {
                tracing::warn!(
                    rule = %rule.id,
                    dependent = %dependent_question_id,
                    "rule depends on a missing question; treating as satisfied"
                );
                return true;
            }
            answers.is_answered(dependent_question_id)
        }
        // Filtered out by the caller; a banner row on its own never hides.
        RuleKind::BannerOnly => return true,
    };

    satisfied != rule.negated
}

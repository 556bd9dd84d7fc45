#![allow(missing_docs)]

pub mod answers;
pub mod model;
pub mod ordering;
pub mod rule;
pub mod short_id;
pub mod store;
pub mod validate;
pub mod visibility;

pub use answers::AnswerSnapshot;
pub use model::{AnswerOption, Question, QuestionType, Section, canonical_value, options_for};
pub use ordering::{Direction, MoveOutcome, ReorderError, SiblingScope, move_entity};
pub use rule::{MalformedRule, Rule, RuleKind, RuleRow, RuleTarget};
pub use short_id::generate_short_id;
pub use store::{Catalog, CatalogStore, NewQuestion, PersistenceError};
pub use validate::{ConditionSpec, ValidationError, validate_rule};
pub use visibility::{
    EntityType, Verdict, VerdictMap, evaluate_visibility, resolve_visibility,
};

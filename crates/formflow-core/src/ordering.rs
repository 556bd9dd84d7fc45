use thiserror::Error;

use crate::store::{CatalogStore, PersistenceError};

/// Which sibling list a move operates on: questions are scoped to their
/// section (`None` is the unsectioned scope), sections are ordered globally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiblingScope {
    Sections,
    Questions { section_id: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Result of a successful move request. A move at either end of the sibling
/// list is a reported no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Boundary,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("{0}")]
    NotFound(PersistenceError),
    /// The first half of the two-row swap was applied but the second failed.
    /// The caller must refetch authoritative state rather than trust its
    /// local ordering.
    #[error("order swap partially applied (row {applied_id} updated): {source}")]
    Partial {
        applied_id: String,
        source: PersistenceError,
    },
}

/// Moves an entity one place up or down among its siblings by swapping
/// `order_index` with its immediate neighbor.
pub fn move_entity(
    store: &mut CatalogStore,
    scope: &SiblingScope,
    id: &str,
    direction: Direction,
) -> Result<MoveOutcome, ReorderError> {
    let siblings: Vec<(String, i64)> = match scope {
        SiblingScope::Sections => store
            .sections()
            .iter()
            .map(|section| (section.id.clone(), section.order_index))
            .collect(),
        SiblingScope::Questions { section_id } => store
            .questions_in_section(section_id.as_deref())
            .iter()
            .map(|question| (question.id.clone(), question.order_index))
            .collect(),
    };

    let position = siblings
        .iter()
        .position(|(sibling_id, _)| sibling_id == id)
        .ok_or_else(|| {
            ReorderError::NotFound(PersistenceError::NotFound {
                kind: match scope {
                    SiblingScope::Sections => "section",
                    SiblingScope::Questions { .. } => "question",
                },
                id: id.to_string(),
            })
        })?;

    let neighbor = match direction {
        Direction::Up if position == 0 => return Ok(MoveOutcome::Boundary),
        Direction::Down if position + 1 == siblings.len() => return Ok(MoveOutcome::Boundary),
        Direction::Up => position - 1,
        Direction::Down => position + 1,
    };

    let (current_id, current_index) = siblings[position].clone();
    let (neighbor_id, neighbor_index) = siblings[neighbor].clone();

    let set_order = |store: &mut CatalogStore, id: &str, index: i64| match scope {
        SiblingScope::Sections => store.set_section_order(id, index),
        SiblingScope::Questions { .. } => store.set_question_order(id, index),
    };

    set_order(store, &current_id, neighbor_index).map_err(ReorderError::NotFound)?;
    set_order(store, &neighbor_id, current_index).map_err(|source| ReorderError::Partial {
        applied_id: current_id.clone(),
        source,
    })?;

    Ok(MoveOutcome::Moved)
}

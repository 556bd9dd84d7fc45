use serde_json::json;

use formflow_core::{
    Catalog, CatalogStore, Direction, MoveOutcome, ReorderError, SiblingScope, move_entity,
};

fn make_store() -> CatalogStore {
    let catalog: Catalog = serde_json::from_value(json!({
        "sections": [
            {"id": "s1", "title": "First", "order_index": 0},
            {"id": "s2", "title": "Second", "order_index": 1}
        ],
        "questions": [
            {"id": "q1", "text": "One", "type": "text", "required": false,
             "order_index": 0, "short_id": "AAAA1", "section_id": "s1"},
            {"id": "q2", "text": "Two", "type": "text", "required": false,
             "order_index": 1, "short_id": "AAAA2", "section_id": "s1"},
            {"id": "q3", "text": "Three", "type": "text", "required": false,
             "order_index": 0, "short_id": "AAAA3", "section_id": "s2"},
            {"id": "q4", "text": "Loose", "type": "text", "required": false,
             "order_index": 0, "short_id": "AAAA4"}
        ],
        "answer_options": [],
        "conditional_logic": []
    }))
    .expect("catalog");
    CatalogStore::load(catalog)
}

fn question_ids(store: &CatalogStore, section_id: Option<&str>) -> Vec<String> {
    store
        .questions_in_section(section_id)
        .iter()
        .map(|question| question.id.clone())
        .collect()
}

#[test]
fn boundary_moves_are_reported_no_ops() {
    let mut store = make_store();
    let scope = SiblingScope::Questions {
        section_id: Some("s1".into()),
    };

    assert_eq!(
        move_entity(&mut store, &scope, "q1", Direction::Up).expect("move"),
        MoveOutcome::Boundary
    );
    assert_eq!(
        move_entity(&mut store, &scope, "q2", Direction::Down).expect("move"),
        MoveOutcome::Boundary
    );
    assert_eq!(question_ids(&store, Some("s1")), vec!["q1", "q2"]);
}

#[test]
fn moving_a_question_swaps_order_with_its_neighbor() {
    let mut store = make_store();
    let scope = SiblingScope::Questions {
        section_id: Some("s1".into()),
    };

    assert_eq!(
        move_entity(&mut store, &scope, "q1", Direction::Down).expect("move"),
        MoveOutcome::Moved
    );
    assert_eq!(question_ids(&store, Some("s1")), vec!["q2", "q1"]);
    assert_eq!(store.question("q1").unwrap().order_index, 1);
    assert_eq!(store.question("q2").unwrap().order_index, 0);

    // Other scopes are untouched.
    assert_eq!(question_ids(&store, Some("s2")), vec!["q3"]);
    assert_eq!(question_ids(&store, None), vec!["q4"]);
}

#[test]
fn question_scope_is_its_own_section() {
    let mut store = make_store();
    // q3 is the only question in s2; it cannot move even though other
    // sections have neighbors at adjacent indices.
    let scope = SiblingScope::Questions {
        section_id: Some("s2".into()),
    };
    assert_eq!(
        move_entity(&mut store, &scope, "q3", Direction::Up).expect("move"),
        MoveOutcome::Boundary
    );
    assert_eq!(
        move_entity(&mut store, &scope, "q3", Direction::Down).expect("move"),
        MoveOutcome::Boundary
    );
}

#[test]
fn sections_reorder_globally() {
    let mut store = make_store();
    assert_eq!(
        move_entity(&mut store, &SiblingScope::Sections, "s2", Direction::Up).expect("move"),
        MoveOutcome::Moved
    );
    let titles: Vec<&str> = store
        .sections()
        .iter()
        .map(|section| section.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
}

#[test]
fn unknown_ids_are_reorder_errors() {
    let mut store = make_store();
    let error = move_entity(&mut store, &SiblingScope::Sections, "s-missing", Direction::Up)
        .unwrap_err();
    assert!(matches!(error, ReorderError::NotFound(_)));
}

#[test]
fn short_id_backfill_is_lazy_and_idempotent() {
    let catalog: Catalog = serde_json::from_value(json!({
        "sections": [],
        "questions": [
            {"id": "q1", "text": "Tagged", "type": "text", "required": false,
             "order_index": 0, "short_id": "KEEP1"},
            {"id": "q2", "text": "Untagged", "type": "text", "required": true,
             "order_index": 1}
        ],
        "answer_options": [],
        "conditional_logic": []
    }))
    .expect("catalog");
    let store = CatalogStore::load(catalog);

    // Existing tags are immutable; missing ones are assigned in place.
    assert_eq!(store.question("q1").unwrap().short_id.as_deref(), Some("KEEP1"));
    let assigned = store
        .question("q2")
        .unwrap()
        .short_id
        .clone()
        .expect("backfilled");
    assert_eq!(assigned.len(), 5);
    assert!(
        assigned
            .bytes()
            .all(|byte| byte.is_ascii_digit() || byte.is_ascii_uppercase())
    );
    // Nothing else about the question changed.
    assert_eq!(store.question("q2").unwrap().order_index, 1);
    assert!(store.question("q2").unwrap().required);

    // A second load keeps the assigned tag untouched.
    let reloaded = CatalogStore::load(store.to_catalog());
    assert_eq!(
        reloaded.question("q2").unwrap().short_id.as_deref(),
        Some(assigned.as_str())
    );
}

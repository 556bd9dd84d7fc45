use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

const CATALOG: &str = r#"{
  "sections": [
    {"id": "s-profile", "title": "Profile", "order_index": 0},
    {"id": "s-details", "title": "Damage details", "order_index": 1}
  ],
  "questions": [
    {"id": "q-has-damage", "text": "Is there damage?", "type": "boolean",
     "required": true, "order_index": 0, "short_id": "HDMG1", "section_id": "s-profile"},
    {"id": "q-severity", "text": "How severe is it?", "type": "select",
     "required": true, "order_index": 0, "short_id": "SEV01", "section_id": "s-details"},
    {"id": "q-notes", "text": "Anything else?", "type": "text",
     "required": false, "order_index": 1, "short_id": "NOTE1", "section_id": "s-details"}
  ],
  "answer_options": [
    {"id": "opt-minor", "question_id": "q-severity", "text": "Minor", "value": "minor", "order_index": 0},
    {"id": "opt-major", "question_id": "q-severity", "text": "Major", "value": "major", "order_index": 1}
  ],
  "conditional_logic": [
    {"id": "r-details", "entity_type": "section", "section_id": "s-details",
     "dependent_question_id": "q-has-damage", "dependent_answer_value": "yes",
     "banner_message": "Hidden because damage was not reported"}
  ]
}"#;

fn formflow() -> Command {
    Command::cargo_bin("formflow").expect("binary")
}

#[test]
fn evaluate_reports_hidden_section_with_banner() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = dir.child("catalog.json");
    catalog.write_str(CATALOG).expect("fixture");
    let answers = dir.child("answers.json");
    answers
        .write_str(r#"{"q-has-damage": false}"#)
        .expect("fixture");

    formflow()
        .arg("evaluate")
        .arg("--catalog")
        .arg(catalog.path())
        .arg("--answers")
        .arg(answers.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Section: Damage details (hidden)"))
        .stdout(predicate::str::contains(
            "banner: Hidden because damage was not reported",
        ));
}

#[test]
fn evaluate_json_emits_a_verdict_per_entity() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = dir.child("catalog.json");
    catalog.write_str(CATALOG).expect("fixture");
    let answers = dir.child("answers.json");
    answers
        .write_str(r#"{"q-has-damage": "yes"}"#)
        .expect("fixture");

    let output = formflow()
        .arg("evaluate")
        .arg("--catalog")
        .arg(catalog.path())
        .arg("--answers")
        .arg(answers.path())
        .arg("--format")
        .arg("json")
        .output()
        .expect("run");
    assert!(output.status.success());

    let verdicts: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json verdicts");
    assert_eq!(verdicts["s-details"]["visible"], true);
    assert_eq!(verdicts["s-details"].get("banner_message"), None);
    assert_eq!(verdicts["q-severity"]["visible"], true);
}

#[test]
fn inspect_lists_rules_and_synthesized_options() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = dir.child("catalog.json");
    catalog.write_str(CATALOG).expect("fixture");

    formflow()
        .arg("inspect")
        .arg("--catalog")
        .arg(catalog.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[SEV01] How severe is it?"))
        .stdout(predicate::str::contains(
            "rule: shown when q-has-damage is \"yes\"",
        ))
        // Boolean questions expose the synthesized yes/no pair.
        .stdout(predicate::str::contains("option: yes = \"Yes\""));
}

#[test]
fn schema_describes_the_four_tables() {
    let output = formflow().arg("schema").output().expect("run");
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).expect("schema json");
    let properties = schema["properties"].as_object().expect("properties");
    for table in ["sections", "questions", "answer_options", "conditional_logic"] {
        assert!(properties.contains_key(table), "missing {table}");
    }
}

#[test]
fn reorder_swaps_and_rewrites_the_catalog_file() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = dir.child("catalog.json");
    catalog.write_str(CATALOG).expect("fixture");

    formflow()
        .arg("reorder")
        .arg("--catalog")
        .arg(catalog.path())
        .arg("--id")
        .arg("q-severity")
        .arg("--direction")
        .arg("down")
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved q-severity"));

    let rewritten: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(catalog.path()).expect("reread"))
            .expect("rewritten catalog");
    let questions = rewritten["questions"].as_array().expect("questions");
    let severity = questions
        .iter()
        .find(|question| question["id"] == "q-severity")
        .expect("q-severity");
    assert_eq!(severity["order_index"], 1);
}

#[test]
fn reorder_at_a_boundary_leaves_the_file_untouched() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = dir.child("catalog.json");
    catalog.write_str(CATALOG).expect("fixture");

    formflow()
        .arg("reorder")
        .arg("--catalog")
        .arg(catalog.path())
        .arg("--id")
        .arg("s-profile")
        .arg("--direction")
        .arg("up")
        .arg("--scope")
        .arg("section")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to do"));

    let contents = std::fs::read_to_string(catalog.path()).expect("reread");
    assert_eq!(contents, CATALOG);
}

//! Integration tests for the modelgen CLI
//!
//! These tests exercise the binary end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCENARIO: &str = r#"
models:
  - name: Person
    export: true
    fields:
      - name: name
        type: string
      - name: age
        type: integer
      - name: email
        type: string?
        default: null
  - name: Address
    export: true
    fields:
      - name: street
        type: string
      - name: city
        type: string
      - name: zip_code
        type: string
  - name: Company
    export: true
    fields:
      - name: name
        type: string
      - name: address
        type: Address
      - name: employees
        type: list[Person]
        default: []
  - name: Internal
    fields:
      - name: secret
        type: string
"#;

const WITH_EXAMPLES: &str = r#"
models:
  - name: City
    export: true
    fields:
      - name: name
        type: string
      - name: population
        type: integer
    example:
      name: Zürich
      population: 421878
  - name: Tag
    export: true
    fields:
      - name: label
        type: string
"#;

/// Helper to get a modelgen command isolated from the user's config
fn modelgen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("modelgen").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("MODELGEN_SOURCE")
        .env_remove("MODELGEN_SCHEMA_OUTPUT")
        .env_remove("MODELGEN_DATA_OUTPUT");
    cmd
}

/// Helper to create a workspace holding a definitions file
fn setup(definitions: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("models.yaml"), definitions).unwrap();
    tmp
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn object_keys(value: &Value) -> Vec<String> {
    value.as_object().unwrap().keys().cloned().collect()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    modelgen(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("JSON Schema"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    modelgen(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("modelgen"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    modelgen(tmp.path())
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Generate: early endings
// ============================================================================

#[test]
fn test_missing_source_writes_nothing() {
    let tmp = TempDir::new().unwrap();

    modelgen(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Definitions file not found"));

    assert!(!tmp.path().join("generated_schemas.json").exists());
    assert!(!tmp.path().join("generated_data.json").exists());
}

#[test]
fn test_no_exported_models_writes_nothing() {
    let tmp = setup("models:\n  - name: Hidden\n    fields: []\n");

    modelgen(tmp.path())
        .write_stdin("all\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No models marked with `export: true`"));

    assert!(!tmp.path().join("generated_schemas.json").exists());
}

#[test]
fn test_empty_selection_writes_nothing() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No models selected, exiting."));

    assert!(!tmp.path().join("generated_schemas.json").exists());
}

#[test]
fn test_end_of_input_cancels() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation cancelled."));

    assert!(!tmp.path().join("generated_schemas.json").exists());
}

#[test]
fn test_invalid_yaml_fails() {
    let tmp = setup("models: [\n");

    modelgen(tmp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid definitions file"));
}

// ============================================================================
// Generate: selection and output
// ============================================================================

#[test]
fn test_generate_all_writes_keyed_schema_document() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .write_stdin("all\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Person"))
        .stdout(predicate::str::contains("--- Schema for 'Company' ---"))
        .stdout(predicate::str::contains("Model 'Person' does not define an example"))
        .stdout(predicate::str::contains("Internal").not());

    let doc = read_json(&tmp.path().join("generated_schemas.json"));
    assert_eq!(object_keys(&doc), vec!["Person", "Address", "Company"]);

    let person = &doc["Person"];
    assert_eq!(person["title"], "Person");
    assert_eq!(person["required"], serde_json::json!(["name", "age"]));
    assert_eq!(person["properties"]["email"]["default"], Value::Null);

    let address = &doc["Address"];
    assert_eq!(address["properties"]["zip_code"]["title"], "Zip Code");

    let company = &doc["Company"];
    assert_eq!(company["properties"]["address"]["$ref"], "#/$defs/Address");
    assert_eq!(
        company["properties"]["employees"]["items"]["$ref"],
        "#/$defs/Person"
    );
    assert!(company["$defs"]["Address"].is_object());
    assert!(company["$defs"]["Person"].is_object());

    // No model defines an example
    assert!(!tmp.path().join("generated_data.json").exists());
}

#[test]
fn test_single_selection_writes_bare_schema() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .write_stdin("2\n")
        .assert()
        .success();

    let doc = read_json(&tmp.path().join("generated_schemas.json"));
    assert_eq!(doc["title"], "Address");
    assert_eq!(doc["type"], "object");
    assert_eq!(doc["required"], serde_json::json!(["street", "city", "zip_code"]));
}

#[test]
fn test_duplicate_indices_keep_first_occurrence_order() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .write_stdin("3, 1,3\n")
        .assert()
        .success();

    let doc = read_json(&tmp.path().join("generated_schemas.json"));
    assert_eq!(object_keys(&doc), vec!["Company", "Person"]);
}

#[test]
fn test_out_of_range_index_is_reported_and_skipped() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .write_stdin("1,7\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid selection: 7"));

    let doc = read_json(&tmp.path().join("generated_schemas.json"));
    assert_eq!(doc["title"], "Person");
}

#[test]
fn test_oversized_index_is_out_of_range_not_malformed() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .write_stdin("1,99999999999999999999\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid selection: 99999999999999999999"))
        .stdout(predicate::str::contains("Invalid input").not());

    let doc = read_json(&tmp.path().join("generated_schemas.json"));
    assert_eq!(doc["title"], "Person");
}

#[test]
fn test_all_out_of_range_asks_again() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .write_stdin("0,9\n2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid selection: 0"))
        .stdout(predicate::str::contains("No valid selection."));

    let doc = read_json(&tmp.path().join("generated_schemas.json"));
    assert_eq!(doc["title"], "Address");
}

#[test]
fn test_malformed_input_asks_again() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .write_stdin("one, two\nALL\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid input 'one, two'"));

    let doc = read_json(&tmp.path().join("generated_schemas.json"));
    assert_eq!(object_keys(&doc).len(), 3);
}

#[test]
fn test_select_flag_skips_prompt() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .args(["generate", "--select", "all", "--schema-out", "out/schemas.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Schemas saved to"));

    let doc = read_json(&tmp.path().join("out/schemas.json"));
    assert_eq!(object_keys(&doc), vec!["Person", "Address", "Company"]);
}

#[test]
fn test_malformed_select_flag_fails() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .args(["generate", "--select", "x"])
        .assert()
        .failure();

    assert!(!tmp.path().join("generated_schemas.json").exists());
}

#[test]
fn test_quiet_still_emits_documents() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .args(["generate", "--select", "1", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- JSON Schemas ---"))
        .stdout(predicate::str::contains("Loading models").not());
}

// ============================================================================
// Generate: examples
// ============================================================================

#[test]
fn test_examples_are_written_with_unicode_intact() {
    let tmp = setup(WITH_EXAMPLES);

    modelgen(tmp.path())
        .write_stdin("all\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Example for 'City' ---"))
        .stdout(predicate::str::contains("Zürich"))
        .stdout(predicate::str::contains("Model 'Tag' does not define an example"));

    let raw = fs::read_to_string(tmp.path().join("generated_data.json")).unwrap();
    assert!(raw.contains("Zürich"));

    // A single example is written as the document itself
    let doc: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["name"], "Zürich");
    assert_eq!(doc["population"], 421878);
}

#[test]
fn test_nonconforming_example_fails_the_run() {
    let tmp = setup(
        r#"
models:
  - name: City
    export: true
    fields:
      - name: population
        type: integer
    example:
      population: lots
"#,
    );

    modelgen(tmp.path())
        .args(["generate", "--select", "all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("City"));

    // The schema still lands; the rejected example does not
    assert!(tmp.path().join("generated_schemas.json").exists());
    assert!(!tmp.path().join("generated_data.json").exists());
}

#[test]
fn test_no_validate_keeps_nonconforming_example() {
    let tmp = setup(
        r#"
models:
  - name: City
    export: true
    fields:
      - name: population
        type: integer
    example:
      population: lots
"#,
    );

    modelgen(tmp.path())
        .args(["generate", "--select", "all", "--no-validate"])
        .assert()
        .success();

    let doc = read_json(&tmp.path().join("generated_data.json"));
    assert_eq!(doc["population"], "lots");
}

#[test]
fn test_unknown_type_skips_only_that_model() {
    let tmp = setup(
        r#"
models:
  - name: Good
    export: true
    fields:
      - name: id
        type: integer
  - name: Bad
    export: true
    fields:
      - name: owner
        type: Nobody
"#,
    );

    modelgen(tmp.path())
        .write_stdin("all\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown type 'Nobody'"));

    let doc = read_json(&tmp.path().join("generated_schemas.json"));
    assert_eq!(doc["title"], "Good");
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_project_config_overrides_paths() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("defs.yaml"), SCENARIO).unwrap();
    fs::write(
        tmp.path().join(".modelgen.yaml"),
        "source: defs.yaml\nschema_output: custom.json\n",
    )
    .unwrap();

    modelgen(tmp.path())
        .args(["generate", "--select", "1"])
        .assert()
        .success();

    assert!(tmp.path().join("custom.json").exists());
    assert!(!tmp.path().join("generated_schemas.json").exists());
}

#[test]
fn test_env_overrides_project_config() {
    let tmp = setup(SCENARIO);
    fs::write(
        tmp.path().join(".modelgen.yaml"),
        "schema_output: from_config.json\n",
    )
    .unwrap();

    modelgen(tmp.path())
        .env("MODELGEN_SCHEMA_OUTPUT", "from_env.json")
        .args(["generate", "--select", "1"])
        .assert()
        .success();

    assert!(tmp.path().join("from_env.json").exists());
    assert!(!tmp.path().join("from_config.json").exists());
}

// ============================================================================
// List / Check / Init / Completions
// ============================================================================

#[test]
fn test_list_shows_exported_models() {
    let tmp = setup(SCENARIO);

    modelgen(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Person"))
        .stdout(predicate::str::contains("Company"))
        .stdout(predicate::str::contains("Internal").not())
        .stdout(predicate::str::contains("3 models found"));
}

#[test]
fn test_list_missing_source_fails() {
    let tmp = TempDir::new().unwrap();

    modelgen(tmp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("models.yaml"));
}

#[test]
fn test_check_reports_every_model() {
    let tmp = setup(WITH_EXAMPLES);

    modelgen(tmp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("City (schema, example)"))
        .stdout(predicate::str::contains("Tag (schema)"))
        .stdout(predicate::str::contains("Checked 2 models: 2 ok, 0 failed"));

    assert!(!tmp.path().join("generated_schemas.json").exists());
}

#[test]
fn test_check_fails_on_bad_example() {
    let tmp = setup(
        r#"
models:
  - name: City
    export: true
    fields:
      - name: population
        type: integer
    example:
      population: lots
"#,
    );

    modelgen(tmp.path())
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 failed"));
}

#[test]
fn test_init_then_generate() {
    let tmp = TempDir::new().unwrap();

    modelgen(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created definitions file"));
    assert!(tmp.path().join("models.yaml").exists());

    modelgen(tmp.path())
        .args(["generate", "--select", "all"])
        .assert()
        .success();

    let schemas = read_json(&tmp.path().join("generated_schemas.json"));
    assert_eq!(
        object_keys(&schemas),
        vec!["Person", "Address", "Company", "Order"]
    );
    let data = read_json(&tmp.path().join("generated_data.json"));
    assert_eq!(data["status"], "shipped");
}

#[test]
fn test_init_does_not_overwrite_without_force() {
    let tmp = setup("models: []\n");

    modelgen(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("models.yaml")).unwrap(),
        "models: []\n"
    );

    modelgen(tmp.path()).args(["init", "--force"]).assert().success();
    assert!(fs::read_to_string(tmp.path().join("models.yaml"))
        .unwrap()
        .contains("Person"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    modelgen(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modelgen"));
}

//! The fixture plugin manifests must satisfy the published manifest
//! contract, so third-party plugin authors can rely on the schema.

mod common;

use common::TestEnv;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

fn load_schema(name: &str) -> Value {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let raw = fs::read_to_string(root.join("docs/contracts").join(name)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn validate(schema_name: &str, data: &Value) {
    let schema = load_schema(schema_name);
    let validator = JSONSchema::compile(&schema).expect("compile schema");
    let msgs: Vec<String> = match validator.validate(data) {
        Ok(()) => return,
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    };
    panic!("schema validation failed: {}", msgs.join(" | "));
}

#[test]
fn fixture_manifests_match_the_plugin_contract() {
    let env = TestEnv::new();
    let mut checked = 0;
    for entry in fs::read_dir(&env.plugins).unwrap() {
        let manifest = entry.unwrap().path().join("plugin.json");
        if !manifest.is_file() {
            continue;
        }
        let raw = fs::read_to_string(&manifest).unwrap();
        let data: Value = serde_json::from_str(&raw).unwrap();
        validate("plugin.schema.json", &data);
        checked += 1;
    }
    assert_eq!(checked, 2, "both fixture plugins validated");
}

#[test]
fn schema_rejects_a_command_without_a_program() {
    let schema = load_schema("plugin.schema.json");
    let validator = JSONSchema::compile(&schema).expect("compile schema");
    let bad = serde_json::json!({
        "name": "broken",
        "commands": [{
            "name": "broken",
            "summary": "s",
            "synopsis": "broken",
            "description": "d",
            "run": {}
        }]
    });
    assert!(validator.validate(&bad).is_err());
}

//! Snapshot tests for CLI output
//!
//! Each test renders a command against an in-memory manifest and compares the
//! text the CLI would print with an inline snapshot.
//!
//! Run with: `cargo test --test cli_snapshot_tests`
//! Review changes: `cargo insta review`

use classlens::cli::commands::{render_marked_fields, render_method_names, render_new_instance, render_types};
use classlens::manifest::{Manifest, parse_arg};
use classlens::{InspectConfig, MatchPolicy, TypeInspector};
use classlens_core::TypeRegistry;

const MANIFEST: &str = r#"{
  "types": [
    { "name": "Named", "kind": "contract", "methods": [{ "name": "name" }, { "name": "rename", "params": ["String"] }] },
    { "name": "Aged", "kind": "contract", "implements": ["Named"], "methods": [{ "name": "age" }] },
    { "name": "Person", "fields": [{ "name": "id", "type": "long", "markers": ["Important"] }] },
    {
      "name": "Villager",
      "extends": "Person",
      "implements": ["Named", "Aged"],
      "fields": [
        { "name": "name", "type": "String", "markers": ["Important"] },
        { "name": "title", "type": "String", "markers": ["Important", "Display"] },
        { "name": "description", "type": "String" }
      ],
      "methods": [{ "name": "greet" }, { "name": "name" }],
      "constructors": [
        { "params": [] },
        { "visibility": "private", "params": [{ "name": "name", "type": "String" }, { "name": "description", "type": "String" }] },
        { "visibility": "private", "params": [{ "name": "name", "type": "Object" }, { "name": "age", "type": "int" }] },
        { "visibility": "private", "params": [{ "name": "name", "type": "String" }, { "name": "age", "type": "int" }] }
      ]
    }
  ]
}"#;

fn registry() -> TypeRegistry {
    Manifest::from_json(MANIFEST).unwrap().into_registry().unwrap()
}

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_types_listing() {
    insta::assert_snapshot!(render_types(&registry()), @r"
    Aged (contract) implements Named
    Named (contract)
    Person (class)
    Villager (class) extends Person implements Named, Aged
    ");
}

#[test]
fn test_marked_fields() {
    let registry = registry();
    insta::assert_snapshot!(render_marked_fields(&registry, "Villager", "Important").unwrap(), @r"
    name
    title
    ");
    insta::assert_snapshot!(render_marked_fields(&registry, "Villager", "Display").unwrap(), @"title");
    insta::assert_snapshot!(render_marked_fields(&registry, "Villager", "Missing").unwrap(), @"");
}

#[test]
fn test_method_names() {
    insta::assert_snapshot!(render_method_names(&registry(), "Villager").unwrap(), @r"
    age
    greet
    name
    rename
    ");
}

#[test]
fn test_new_instance_private_constructor() {
    let output = render_new_instance(&registry(), "Villager", &args(&["Tom", "Farmer"]), MatchPolicy::FirstDeclared);
    insta::assert_snapshot!(output.unwrap(), @r#"
    {
      "type": "Villager",
      "fields": {
        "description": "Farmer",
        "name": "Tom"
      }
    }
    "#);
}

#[test]
fn test_new_instance_first_declared_vs_most_specific() {
    let registry = registry();
    let first = render_new_instance(&registry, "Villager", &args(&["Tom", "42"]), MatchPolicy::FirstDeclared);
    insta::assert_snapshot!(first.unwrap(), @r#"
    {
      "type": "Villager",
      "fields": {
        "age": 42,
        "name": "Tom"
      }
    }
    "#);

    // (Object, int) and (String, int) both match and build the same shape, so compare the chosen signatures.
    let villager = registry.get("Villager").unwrap();
    let call = vec![parse_arg("Tom"), parse_arg("42")];
    let chosen = |policy| {
        TypeInspector::with_config(InspectConfig::new().with_match_policy(policy))
            .find_matching_constructor(villager, &call)
            .unwrap()
            .signature()
    };
    insta::assert_snapshot!(chosen(MatchPolicy::FirstDeclared), @"Villager(Object, int)");
    insta::assert_snapshot!(chosen(MatchPolicy::MostSpecific), @"Villager(String, int)");
}

#[test]
fn test_new_instance_not_found() {
    let err = render_new_instance(&registry(), "Villager", &args(&["42"]), MatchPolicy::FirstDeclared).unwrap_err();
    insta::assert_snapshot!(err.message, @"Error: matching constructor not found: `Villager` declares none accepting the 1 supplied argument(s)");
}

#[test]
fn test_unknown_type() {
    let err = render_method_names(&registry(), "Nobody").unwrap_err();
    insta::assert_snapshot!(err.message, @"Error: unknown type `Nobody` (known types: Aged, Named, Person, Villager)");
}

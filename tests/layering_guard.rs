//! Layering guardrails to keep the type model free of front-end concerns.
//!
//! `classlens_core` is the runtime type model only: the CLI, manifest parsing, diagnostics rendering and
//! logging setup live in the `classlens` crate. This test scans `crates/classlens_core/Cargo.toml` and fails
//! if one of those front-end crates appears in its `[dependencies]`.

const FRONT_END_CRATES: &[&str] = &["clap", "serde", "serde_json", "miette", "tracing-subscriber"];

#[test]
fn type_model_does_not_depend_on_front_end_crates() {
    let manifest = include_str!("../crates/classlens_core/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            if line == "[dependencies]" {
                in_dependencies = true;
                continue;
            }
            // Any new section after `[dependencies]` ends the scan window.
            if in_dependencies {
                break;
            }
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        let name = line_no_comment.split(['=', ' ']).next().unwrap_or("");
        if FRONT_END_CRATES.contains(&name) {
            panic!("`{name}` must not appear in classlens_core's [dependencies]; keep it in the `classlens` crate");
        }
    }
}

#[test]
fn root_crate_reaches_model_through_path_dependency() {
    let manifest = include_str!("../Cargo.toml");
    assert!(
        manifest
            .lines()
            .any(|line| line.trim_start().starts_with("classlens_core") && line.contains("path")),
        "`classlens` should depend on `classlens_core` by path"
    );
}

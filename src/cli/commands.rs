//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.
//!
//! Each command has a `render_*` counterpart that works on an already loaded
//! registry and returns the text to print, so output can be tested without files.

use std::path::Path;

use classlens_core::{Marker, TypeDescriptor, TypeRegistry};

use crate::config::{InspectConfig, MatchPolicy};
use crate::inspector::TypeInspector;
use crate::manifest::{DynamicObject, Manifest, ManifestError, parse_arg};

use super::{CliError, CliResult, ExitCode};

// ============================================================================
// Manifest loading (shared by all commands)
// ============================================================================

/// Read and resolve a manifest, rendering failures as miette diagnostics.
pub fn load_registry(path: &Path) -> CliResult<TypeRegistry> {
    let registry = Manifest::from_path(path)
        .and_then(Manifest::into_registry)
        .map_err(manifest_error)?;
    tracing::debug!(path = %path.display(), types = registry.len(), "loaded manifest");
    Ok(registry)
}

fn manifest_error(err: ManifestError) -> CliError {
    CliError::failure(format!("{:?}", miette::Report::new(err)))
}

fn lookup<'r>(registry: &'r TypeRegistry, type_name: &str) -> CliResult<&'r TypeDescriptor> {
    registry.get(type_name).map(|ty| &**ty).ok_or_else(|| {
        let known = registry.names().collect::<Vec<_>>().join(", ");
        CliError::failure(format!("Error: unknown type `{type_name}` (known types: {known})"))
    })
}

fn emit(output: String) -> CliResult<ExitCode> {
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Commands
// ============================================================================

pub fn list_types(manifest: &Path) -> CliResult<ExitCode> {
    let registry = load_registry(manifest)?;
    emit(render_types(&registry))
}

pub fn marked_fields(manifest: &Path, type_name: &str, marker: &str) -> CliResult<ExitCode> {
    let registry = load_registry(manifest)?;
    emit(render_marked_fields(&registry, type_name, marker)?)
}

pub fn method_names(manifest: &Path, type_name: &str) -> CliResult<ExitCode> {
    let registry = load_registry(manifest)?;
    emit(render_method_names(&registry, type_name)?)
}

pub fn new_instance(manifest: &Path, type_name: &str, args: &[String], policy: MatchPolicy) -> CliResult<ExitCode> {
    let registry = load_registry(manifest)?;
    emit(render_new_instance(&registry, type_name, args, policy)?)
}

// ============================================================================
// Rendering
// ============================================================================

/// One `name (kind)` line per type, with `extends`/`implements` when present.
pub fn render_types(registry: &TypeRegistry) -> String {
    registry
        .iter()
        .map(|ty| {
            let mut line = format!("{} ({})", ty.name(), ty.kind().as_str());
            if let Some(parent) = ty.supertype() {
                line.push_str(&format!(" extends {}", parent.name()));
            }
            if !ty.contracts().is_empty() {
                let contracts: Vec<_> = ty.contracts().iter().map(|c| c.name()).collect();
                line.push_str(&format!(" implements {}", contracts.join(", ")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_marked_fields(registry: &TypeRegistry, type_name: &str, marker: &str) -> CliResult<String> {
    let ty = lookup(registry, type_name)?;
    let names = TypeInspector::new().annotated_field_names(ty, &Marker::new(marker.to_string()));
    Ok(names.into_iter().collect::<Vec<_>>().join("\n"))
}

pub fn render_method_names(registry: &TypeRegistry, type_name: &str) -> CliResult<String> {
    let ty = lookup(registry, type_name)?;
    let names = TypeInspector::new().all_method_names(ty);
    Ok(names.into_iter().collect::<Vec<_>>().join("\n"))
}

/// Construct `type_name` from command-line tokens and render the object as pretty JSON.
pub fn render_new_instance(
    registry: &TypeRegistry,
    type_name: &str,
    args: &[String],
    policy: MatchPolicy,
) -> CliResult<String> {
    let ty = lookup(registry, type_name)?;
    let inspector = TypeInspector::with_config(InspectConfig::new().with_match_policy(policy));
    let args = args.iter().map(|token| parse_arg(token)).collect();

    let instance = inspector
        .create_instance(ty, args)
        .map_err(|e| CliError::failure(format!("Error: {e}")))?;
    let object = instance
        .downcast::<DynamicObject>()
        .map_err(|i| CliError::failure(format!("Error: `{}` did not produce a manifest object", i.type_name())))?;

    serde_json::to_string_pretty(&object).map_err(|e| CliError::failure(format!("Error: {e}")))
}

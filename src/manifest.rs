//! JSON manifests describing dynamic types.
//!
//! A manifest declares classes and contracts as data. [`Manifest::into_registry`] turns it into a
//! [`TypeRegistry`] whose constructors produce [`DynamicObject`]s, one field per constructor parameter.
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "Named", "kind": "contract", "methods": [{ "name": "name" }] },
//!     {
//!       "name": "Villager",
//!       "implements": ["Named"],
//!       "fields": [{ "name": "name", "type": "String", "markers": ["Important"] }],
//!       "constructors": [
//!         { "params": [] },
//!         { "visibility": "private", "params": [{ "name": "name", "type": "String" }] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! `extends` and `implements` may name types declared anywhere in the file.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use classlens_core::{
    Arg, FieldDescriptor, InvokeError, MethodDescriptor, ParamType, TypeBuilder, TypeDescriptor, TypeRegistry, Value,
    Visibility, arg,
};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Errors raised while reading or resolving a manifest.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("failed to read manifest `{}`", path.display())]
    #[diagnostic(code(classlens::manifest::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    #[diagnostic(
        code(classlens::manifest::parse),
        help("a manifest is a JSON object with a `types` array")
    )]
    Parse(#[from] serde_json::Error),

    #[error("type `{0}` is declared more than once")]
    #[diagnostic(code(classlens::manifest::duplicate_type))]
    DuplicateType(String),

    #[error("`{owner}` refers to unknown type `{name}`")]
    #[diagnostic(
        code(classlens::manifest::unknown_type),
        help("declare `{name}` in the manifest's `types` array")
    )]
    UnknownType { owner: String, name: String },

    #[error("`{owner}` uses unknown parameter type `{name}`")]
    #[diagnostic(
        code(classlens::manifest::unknown_param_type),
        help("use int, long, double, boolean, String, Object or a type declared in the manifest")
    )]
    UnknownParamType { owner: String, name: String },

    #[error("`{owner}` cannot {relation} `{name}`, which is a {kind}")]
    #[diagnostic(code(classlens::manifest::invalid_kind))]
    InvalidKind {
        owner: String,
        name: String,
        relation: &'static str,
        kind: &'static str,
    },

    #[error("contract `{0}` uses `extends`")]
    #[diagnostic(
        code(classlens::manifest::contract_extends),
        help("list a contract's parent contracts under `implements`")
    )]
    ContractExtends(String),

    #[error("contract `{0}` declares constructors")]
    #[diagnostic(code(classlens::manifest::contract_constructor))]
    ContractConstructor(String),

    #[error("inheritance cycle through `{0}`")]
    #[diagnostic(code(classlens::manifest::cycle))]
    Cycle(String),
}

/// Root of a manifest file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub types: Vec<TypeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSpec {
    pub name: String,
    #[serde(default)]
    pub kind: KindSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<ConstructorSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindSpec {
    #[default]
    Class,
    #[serde(alias = "interface")]
    Contract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilitySpec {
    Public,
    #[serde(alias = "package", alias = "protected")]
    Crate,
    Private,
}

impl VisibilitySpec {
    fn public() -> Self {
        VisibilitySpec::Public
    }

    fn private() -> Self {
        VisibilitySpec::Private
    }
}

impl From<VisibilitySpec> for Visibility {
    fn from(spec: VisibilitySpec) -> Self {
        match spec {
            VisibilitySpec::Public => Visibility::Public,
            VisibilitySpec::Crate => Visibility::Crate,
            VisibilitySpec::Private => Visibility::Private,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub type_name: String,
    #[serde(default = "VisibilitySpec::private")]
    pub visibility: VisibilitySpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<String>,
}

fn default_field_type() -> String {
    "Object".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    #[serde(default = "VisibilitySpec::public")]
    pub visibility: VisibilitySpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstructorSpec {
    #[serde(default = "VisibilitySpec::public")]
    pub visibility: VisibilitySpec,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Instance of a manifest-declared type: the constructor's arguments keyed by parameter name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicObject {
    #[serde(rename = "type")]
    pub type_name: String,
    pub fields: BTreeMap<String, JsonValue>,
    /// Supertypes and contracts of `type_name`, transitively.
    #[serde(skip)]
    lineage: Arc<BTreeSet<String>>,
}

impl DynamicObject {
    /// Check whether this object may be passed where `type_name` is declared: it is of that type, or the type
    /// extends or implements it (directly or transitively).
    pub fn conforms_to(&self, type_name: &str) -> bool {
        self.type_name == type_name || self.lineage.contains(type_name)
    }
}

impl Manifest {
    pub fn from_json(source: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let source = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    /// Resolve every declared type into a registry.
    #[tracing::instrument(skip_all, fields(type_count = self.types.len()))]
    pub fn into_registry(self) -> Result<TypeRegistry, ManifestError> {
        let mut specs: BTreeMap<String, TypeSpec> = BTreeMap::new();
        for spec in self.types {
            if specs.contains_key(&spec.name) {
                return Err(ManifestError::DuplicateType(spec.name));
            }
            specs.insert(spec.name.clone(), spec);
        }

        let mut resolver = Resolver {
            specs: &specs,
            built: BTreeMap::new(),
            in_progress: BTreeSet::new(),
        };
        for name in specs.keys() {
            resolver.resolve(name, name)?;
        }

        let mut registry = TypeRegistry::new();
        for ty in resolver.built.into_values() {
            registry.insert(ty);
        }
        tracing::debug!(types = registry.len(), "manifest resolved");
        Ok(registry)
    }
}

/// Builds descriptors depth-first so parents exist before their children.
struct Resolver<'m> {
    specs: &'m BTreeMap<String, TypeSpec>,
    built: BTreeMap<String, Arc<TypeDescriptor>>,
    in_progress: BTreeSet<String>,
}

impl<'m> Resolver<'m> {
    fn resolve(&mut self, name: &str, owner: &str) -> Result<Arc<TypeDescriptor>, ManifestError> {
        if let Some(ty) = self.built.get(name) {
            return Ok(Arc::clone(ty));
        }
        let specs = self.specs;
        let spec = specs.get(name).ok_or_else(|| ManifestError::UnknownType {
            owner: owner.to_string(),
            name: name.to_string(),
        })?;
        if !self.in_progress.insert(name.to_string()) {
            return Err(ManifestError::Cycle(name.to_string()));
        }

        let ty = Arc::new(self.build(spec)?);
        self.in_progress.remove(name);
        self.built.insert(name.to_string(), Arc::clone(&ty));
        Ok(ty)
    }

    fn build(&mut self, spec: &'m TypeSpec) -> Result<TypeDescriptor, ManifestError> {
        let mut builder = match spec.kind {
            KindSpec::Class => TypeBuilder::new(&spec.name),
            KindSpec::Contract => TypeBuilder::contract(&spec.name),
        };

        if let Some(parent) = &spec.extends {
            if spec.kind == KindSpec::Contract {
                return Err(ManifestError::ContractExtends(spec.name.clone()));
            }
            let parent = self.resolve(parent, &spec.name)?;
            if parent.is_contract() {
                return Err(self.invalid_kind(spec, &parent, "extend"));
            }
            builder = builder.extends(parent);
        }

        for contract in &spec.implements {
            let contract = self.resolve(contract, &spec.name)?;
            if !contract.is_contract() {
                return Err(self.invalid_kind(spec, &contract, "implement"));
            }
            builder = builder.implements(contract);
        }

        for field in &spec.fields {
            builder = builder.field(
                FieldDescriptor::new(&field.name, &field.type_name)
                    .with_visibility(field.visibility.into())
                    .with_markers(field.markers.iter().cloned()),
            );
        }

        for method in &spec.methods {
            let params = method
                .params
                .iter()
                .map(|p| self.param_type(&spec.name, p))
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.method(
                MethodDescriptor::new(&method.name)
                    .with_params(params)
                    .with_visibility(method.visibility.into()),
            );
        }

        if spec.kind == KindSpec::Contract && !spec.constructors.is_empty() {
            return Err(ManifestError::ContractConstructor(spec.name.clone()));
        }
        for constructor in &spec.constructors {
            let params = constructor
                .params
                .iter()
                .map(|p| self.param_type(&spec.name, &p.type_name))
                .collect::<Result<Vec<_>, _>>()?;
            let names: Vec<String> = constructor.params.iter().map(|p| p.name.clone()).collect();
            let type_name = spec.name.clone();
            let lineage = Arc::new(self.lineage(&spec.name));
            builder = builder.constructor(constructor.visibility.into(), params, move |args| {
                let fields = names
                    .iter()
                    .cloned()
                    .zip(args.into_inner().into_iter().map(arg_to_json))
                    .map(|(name, value)| value.map(|value| (name, value)))
                    .collect::<Result<BTreeMap<_, _>, _>>()?;
                Ok(Box::new(DynamicObject {
                    type_name: type_name.clone(),
                    fields,
                    lineage: Arc::clone(&lineage),
                }) as Value)
            });
        }

        Ok(builder.build())
    }

    fn param_type(&self, owner: &str, name: &str) -> Result<ParamType, ManifestError> {
        let param = match name {
            "int" | "long" => ParamType::named::<i64>(name.to_string()),
            "double" => ParamType::named::<f64>("double"),
            "boolean" => ParamType::named::<bool>("boolean"),
            "String" => ParamType::of::<String>(),
            "Object" => ParamType::object(),
            declared if self.specs.contains_key(declared) => {
                let target = declared.to_string();
                ParamType::nominal::<DynamicObject, _>(target.clone(), self.lineage(declared), move |object| {
                    object.conforms_to(&target)
                })
            }
            unknown => {
                return Err(ManifestError::UnknownParamType {
                    owner: owner.to_string(),
                    name: unknown.to_string(),
                });
            }
        };
        Ok(param)
    }

    /// Names `name` extends or implements, transitively, excluding `name` itself.
    ///
    /// Walks declarations rather than built descriptors, so it works for types still being resolved.
    fn lineage(&self, name: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut pending = vec![name];
        while let Some(current) = pending.pop() {
            let Some(spec) = self.specs.get(current) else {
                continue;
            };
            for parent in spec.extends.iter().chain(&spec.implements) {
                if seen.insert(parent.clone()) {
                    pending.push(parent);
                }
            }
        }
        seen.remove(name);
        seen
    }

    fn invalid_kind(&self, spec: &TypeSpec, target: &TypeDescriptor, relation: &'static str) -> ManifestError {
        ManifestError::InvalidKind {
            owner: spec.name.clone(),
            name: target.name().to_string(),
            relation,
            kind: target.kind().as_str(),
        }
    }
}

/// Convert a JSON value into a constructor argument.
///
/// Integers become `i64`, other numbers `f64`, strings `String`, booleans `bool`; arrays and objects stay
/// `serde_json::Value` and only fit `Object` parameters.
///
/// Integers outside the `i64` range (above `i64::MAX`) have no `int`/`long` representation: they become `f64`
/// and therefore only fit `double` or `Object` parameters.
pub fn json_to_arg(value: JsonValue) -> Arg {
    match value {
        JsonValue::Null => None,
        JsonValue::Bool(b) => arg(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => arg(i),
            None => arg(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => arg(s),
        other => arg(other),
    }
}

/// Parse one command-line token as a constructor argument.
///
/// Valid JSON is decoded with [`json_to_arg`]; anything else is taken as a plain string.
pub fn parse_arg(token: &str) -> Arg {
    match serde_json::from_str::<JsonValue>(token) {
        Ok(value) => json_to_arg(value),
        Err(_) => arg(token.to_string()),
    }
}

fn arg_to_json(arg: Arg) -> Result<JsonValue, InvokeError> {
    let Some(value) = arg else {
        return Ok(JsonValue::Null);
    };
    let value = match value.downcast::<i64>() {
        Ok(i) => return Ok(JsonValue::from(*i)),
        Err(value) => value,
    };
    let value = match value.downcast::<f64>() {
        Ok(f) => return Ok(JsonValue::from(*f)),
        Err(value) => value,
    };
    let value = match value.downcast::<bool>() {
        Ok(b) => return Ok(JsonValue::Bool(*b)),
        Err(value) => value,
    };
    let value = match value.downcast::<String>() {
        Ok(s) => return Ok(JsonValue::String(*s)),
        Err(value) => value,
    };
    let value = match value.downcast::<JsonValue>() {
        Ok(json) => return Ok(*json),
        Err(value) => value,
    };
    match value.downcast::<DynamicObject>() {
        Ok(object) => serde_json::to_value(*object).map_err(|e| InvokeError::custom(e.to_string())),
        Err(_) => Err(InvokeError::custom(
            "argument cannot be stored in a manifest object (expected a number, bool, string, JSON or object)",
        )),
    }
}

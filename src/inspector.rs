//! Runtime type introspection over the `classlens_core` type model.
//!
//! [`TypeInspector`] answers three independent questions about a [`TypeDescriptor`]:
//!
//! - which fields declared on the type carry a given marker ([`TypeInspector::annotated_field_names`]);
//! - which method names the type exposes through its own declarations and the contracts it implements
//!   directly ([`TypeInspector::all_method_names`]);
//! - how to build an instance from an argument list, whatever the matching constructor's visibility
//!   ([`TypeInspector::create_instance`]).
//!
//! The inspector keeps no state between calls and never mutates the descriptors it is given.

use std::collections::BTreeSet;

use classlens_core::{Arg, ConstructorDescriptor, Instance, InvokeError, Marker, ParamType, TypeDescriptor};
use thiserror::Error;

use crate::config::{InspectConfig, MatchPolicy};

/// Errors returned by [`TypeInspector::create_instance`].
#[derive(Debug, Error)]
pub enum InspectError {
    /// No declared constructor has the argument count and accepts every argument.
    #[error("matching constructor not found: `{type_name}` declares none accepting the {arity} supplied argument(s)")]
    NotFound { type_name: String, arity: usize },

    /// The matched constructor ran and failed; passed through as raised.
    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

impl InspectError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, InspectError::NotFound { .. })
    }
}

/// Stateless introspection over type descriptors.
#[derive(Debug, Clone, Default)]
pub struct TypeInspector {
    config: InspectConfig,
}

impl TypeInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InspectConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InspectConfig {
        &self.config
    }

    /// Names of the fields declared directly on `ty` that carry `marker`.
    ///
    /// Fields inherited from a supertype are not considered. No match yields an empty set.
    #[tracing::instrument(skip_all, fields(type_name = ty.name(), marker = %marker))]
    pub fn annotated_field_names(&self, ty: &TypeDescriptor, marker: &Marker) -> BTreeSet<String> {
        ty.declared_fields()
            .iter()
            .filter(|field| field.has_marker(marker))
            .map(|field| field.name().to_string())
            .collect()
    }

    /// Unique method names declared on `ty` or on a contract `ty` implements directly.
    ///
    /// Contracts are walked one level deep: parents of those contracts are not visited. Overloads collapse
    /// into one name.
    #[tracing::instrument(skip_all, fields(type_name = ty.name(), contracts = ty.contracts().len()))]
    pub fn all_method_names(&self, ty: &TypeDescriptor) -> BTreeSet<String> {
        let own = ty.declared_methods().iter();
        let from_contracts = ty
            .contracts()
            .iter()
            .flat_map(|contract| contract.declared_methods().iter());

        own.chain(from_contracts).map(|method| method.name().to_string()).collect()
    }

    /// Construct an instance of `ty` from `args`, bypassing the constructor's declared visibility.
    ///
    /// ## Errors
    /// - [`InspectError::NotFound`] when no declared constructor matches the argument shape.
    /// - [`InspectError::Invoke`] when the matched constructor's body fails.
    #[tracing::instrument(skip_all, fields(type_name = ty.name(), arity = args.len()))]
    pub fn create_instance(&self, ty: &TypeDescriptor, args: Vec<Arg>) -> Result<Instance, InspectError> {
        let constructor = self.find_matching_constructor(ty, &args)?;
        Ok(construct_privileged(constructor, args)?)
    }

    /// Pick the declared constructor `create_instance` would invoke for `args`.
    pub fn find_matching_constructor<'t>(
        &self,
        ty: &'t TypeDescriptor,
        args: &[Arg],
    ) -> Result<&'t ConstructorDescriptor, InspectError> {
        let mut candidates = ty.declared_constructors().iter().filter(|constructor| {
            let matched = is_matching_arguments(constructor.params(), args);
            if !matched {
                tracing::trace!(signature = %constructor.signature(), "constructor rejected");
            }
            matched
        });

        let chosen = match self.config.match_policy {
            MatchPolicy::FirstDeclared => candidates.next(),
            MatchPolicy::MostSpecific => most_specific(candidates.collect()),
        };

        match chosen {
            Some(constructor) => {
                tracing::debug!(
                    signature = %constructor.signature(),
                    visibility = %constructor.visibility(),
                    "matched constructor"
                );
                Ok(constructor)
            }
            None => Err(InspectError::NotFound {
                type_name: ty.name().to_string(),
                arity: args.len(),
            }),
        }
    }
}

/// Check that `args` has the same length as `params` and each argument is assignable to its parameter.
pub fn is_matching_arguments(params: &[ParamType], args: &[Arg]) -> bool {
    params.len() == args.len() && params.iter().zip(args).all(|(param, arg)| param.accepts(arg))
}

fn most_specific(matches: Vec<&ConstructorDescriptor>) -> Option<&ConstructorDescriptor> {
    matches
        .iter()
        .copied()
        .find(|candidate| matches.iter().all(|other| is_at_least_as_specific(candidate, other)))
        .or_else(|| matches.first().copied())
}

// Both constructors matched the same arguments, so their arities agree.
fn is_at_least_as_specific(a: &ConstructorDescriptor, b: &ConstructorDescriptor) -> bool {
    a.params()
        .iter()
        .zip(b.params())
        .all(|(pa, pb)| pa.is_at_least_as_specific_as(pb))
}

/// Invoke `constructor` regardless of its declared visibility.
///
/// Access is elevated on a handle owned by this call; the shared descriptor is left untouched.
fn construct_privileged(constructor: &ConstructorDescriptor, args: Vec<Arg>) -> Result<Instance, InvokeError> {
    let mut handle = constructor.handle();
    if !handle.is_accessible() {
        tracing::debug!(visibility = %constructor.visibility(), "elevating constructor access");
        handle.set_accessible(true);
    }
    handle.new_instance(args)
}

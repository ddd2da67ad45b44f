//! Provide the runtime type model that the `classlens` inspector queries.
//!
//! Rust has no reflective host runtime, so this crate plays that role: it describes types as plain data
//! ([`TypeDescriptor`]) together with their declared fields, methods, constructors and directly implemented
//! contracts. Descriptors are built once (by hand with [`TypeBuilder`], with `#[derive(Reflect)]`, or from a
//! manifest in the `classlens` crate) and are read-only afterwards.
//!
//! ## Notes
//!
//! - No IO, no global state. Every descriptor is `Send + Sync`.
//! - The only mutable state in the model is the accessibility flag of a [`ConstructorHandle`], which is owned
//!   by whoever created it. Shared descriptors are never mutated.
//! - Assignability lives on [`ParamType::accepts`]; markers are queried with [`FieldDescriptor::has_marker`].

#![deny(clippy::unwrap_used)]

pub mod constructor;
pub mod descriptor;
pub mod errors;
pub mod marker;
pub mod param;
pub mod reflect;
pub mod registry;
pub mod types;
pub mod value;

pub use constructor::{ConstructorDescriptor, ConstructorFn, ConstructorHandle};
pub use descriptor::{FieldDescriptor, MethodDescriptor, Visibility};
pub use errors::InvokeError;
pub use marker::Marker;
pub use param::{ConformsFn, ParamType};
pub use reflect::Reflect;
pub use registry::TypeRegistry;
pub use types::{TypeBuilder, TypeDescriptor, TypeKind};
pub use value::{Arg, Args, Instance, Value, arg, null};

// Derive macro lives in the macro namespace, so it can share the trait's name.
pub use classlens_derive::Reflect;

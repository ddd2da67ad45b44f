//! Reflection support for Rust structs.
//!
//! The `Reflect` trait turns a Rust type into a [`TypeBuilder`] seeded with its name and declared fields, so
//! that methods, contracts and constructors can be added before building the final descriptor.

use crate::types::{TypeBuilder, TypeDescriptor};

/// Provides a runtime description of a type.
///
/// This trait is typically derived using `#[derive(Reflect)]`; `#[marker(...)]` on a field attaches markers.
///
/// # Examples
///
/// ```rust
/// use classlens_core::{Marker, Reflect};
///
/// #[derive(Reflect)]
/// #[allow(dead_code)]
/// struct Person {
///     #[marker(Important)]
///     pub name: String,
///     age: i64,
/// }
///
/// let person = Person::type_descriptor();
/// assert_eq!(person.name(), "Person");
/// assert!(person.declared_field("name").unwrap().has_marker(&Marker::from("Important")));
/// assert_eq!(person.declared_field("age").unwrap().type_name(), "i64");
/// ```
pub trait Reflect {
    /// Returns a builder holding this type's name and declared fields.
    fn describe() -> TypeBuilder;

    /// Returns the finished descriptor, without constructors.
    fn type_descriptor() -> TypeDescriptor
    where
        Self: Sized,
    {
        Self::describe().build()
    }
}

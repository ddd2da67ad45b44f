//! Field and method descriptors.

use std::fmt;

use crate::marker::Marker;
use crate::param::ParamType;

/// Declared visibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    Public,
    /// Visible inside the declaring unit only (`pub(crate)`, `pub(super)`, package-private).
    Crate,
    #[default]
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Crate => "crate-visible",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field declared on a type.
///
/// ## Examples
/// ```rust
/// use classlens_core::{FieldDescriptor, Marker, Visibility};
///
/// let field = FieldDescriptor::new("name", "String").with_marker(Marker::from("Important"));
/// assert_eq!(field.visibility(), Visibility::Private);
/// assert!(field.has_marker(&Marker::from("Important")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    type_name: String,
    visibility: Visibility,
    markers: Vec<Marker>,
}

impl FieldDescriptor {
    /// A private, unmarked field.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            visibility: Visibility::Private,
            markers: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<Marker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn with_markers<M: Into<Marker>>(mut self, markers: impl IntoIterator<Item = M>) -> Self {
        self.markers.extend(markers.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type, as written in the declaration.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn has_marker(&self, marker: &Marker) -> bool {
        self.markers.contains(marker)
    }
}

/// One method declared on a type or contract. Only the shape is modelled; methods are never invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    params: Vec<ParamType>,
    visibility: Visibility,
}

impl MethodDescriptor {
    /// A public method without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            visibility: Visibility::Public,
        }
    }

    pub fn with_param(mut self, param: ParamType) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = ParamType>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// `name(T1, T2)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, join_params(&self.params))
    }
}

pub(crate) fn join_params(params: &[ParamType]) -> String {
    params.iter().map(ParamType::name).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_defaults() {
        let field = FieldDescriptor::new("a", "String");
        assert_eq!(field.name(), "a");
        assert_eq!(field.type_name(), "String");
        assert_eq!(field.visibility(), Visibility::Private);
        assert!(field.markers().is_empty());
    }

    #[test]
    fn test_field_markers() {
        let field = FieldDescriptor::new("a", "String").with_markers(["Important", "Audited"]);
        assert!(field.has_marker(&Marker::from("Audited")));
        assert!(!field.has_marker(&Marker::from("Ignored")));
        assert_eq!(field.markers().len(), 2);
    }

    #[test]
    fn test_method_signature() {
        let method = MethodDescriptor::new("greet")
            .with_param(ParamType::of::<String>())
            .with_param(ParamType::named::<i64>("int"));
        assert_eq!(method.signature(), "greet(String, int)");
        assert_eq!(method.arity(), 2);
        assert!(method.visibility().is_public());
    }

    #[test]
    fn test_visibility_display() {
        assert_eq!(Visibility::Crate.to_string(), "crate-visible");
        assert_eq!(Visibility::default(), Visibility::Private);
    }
}

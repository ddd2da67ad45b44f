//! Field markers.
//!
//! A [`Marker`] is a label attached to a field declaration. It carries no behavior; two markers are the same
//! marker when their names are equal.

use std::borrow::Cow;
use std::fmt;

/// A tag attached to field declarations, compared by name.
///
/// ## Examples
/// ```rust
/// use classlens_core::Marker;
///
/// const IMPORTANT: Marker = Marker::from_static("Important");
/// assert_eq!(IMPORTANT, Marker::new(String::from("Important")));
/// assert_eq!(IMPORTANT.name(), "Important");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker(Cow<'static, str>);

impl Marker {
    /// Create a marker from a static name (usable in `const` items).
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Create a marker from any owned or static name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<&'static str> for Marker {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for Marker {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

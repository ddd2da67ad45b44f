//! Declared parameter types and the assignability test.
//!
//! A [`ParamType`] is what a constructor or method declares at one parameter position. Whether a runtime
//! argument may be passed there is decided by [`ParamType::accepts`]:
//!
//! - an absent argument (`None`, the model's null) is accepted only by non-primitive parameter types;
//! - an exact parameter type accepts a value whose runtime type is exactly that type;
//! - a nominal parameter type additionally requires the value to conform to the declared type name
//!   (used for types that share one Rust representation, such as manifest objects);
//! - the `Object` parameter type accepts every non-null value.
//!
//! There is no numeric widening, no boxing and no varargs expansion.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::value::Arg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Accepts {
    Exact(TypeId),
    AnyValue,
}

/// Predicate deciding whether a value of the exact runtime type conforms to a nominal parameter type.
pub type ConformsFn = dyn Fn(&dyn Any) -> bool + Send + Sync;

/// Nominal refinement of an exact parameter type.
#[derive(Clone)]
struct Nominal {
    /// The declared type name and every name it is assignable to.
    lineage: Arc<BTreeSet<String>>,
    conforms: Arc<ConformsFn>,
}

/// The declared type of one parameter.
///
/// ## Examples
/// ```rust
/// use classlens_core::{ParamType, arg, null};
///
/// let text = ParamType::of::<String>();
/// assert!(text.accepts(&arg(String::from("Tom"))));
/// assert!(text.accepts(&null()));
/// assert!(!text.accepts(&arg(42_i32)));
///
/// let number = ParamType::of::<i32>();
/// assert!(number.is_primitive());
/// assert!(!number.accepts(&null()));
/// ```
#[derive(Clone)]
pub struct ParamType {
    name: Cow<'static, str>,
    accepts: Accepts,
    primitive: bool,
    nominal: Option<Nominal>,
}

impl ParamType {
    /// Exact parameter type `T`, named after the last path segment of `T`'s type name.
    ///
    /// Primitive-ness is derived from `T` (see [`is_primitive_type`]).
    pub fn of<T: Any>() -> Self {
        let id = TypeId::of::<T>();
        Self {
            name: Cow::Borrowed(short_type_name(std::any::type_name::<T>())),
            accepts: Accepts::Exact(id),
            primitive: is_primitive_type(id),
            nominal: None,
        }
    }

    /// Exact parameter type `T` displayed under a custom name (e.g. `int` for `i64`).
    pub fn named<T: Any>(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::of::<T>()
        }
    }

    /// Parameter type `name`, represented at runtime by `T` and accepting only the `T` values for which
    /// `conforms` holds.
    ///
    /// `lineage` lists the names `name` is assignable to (its supertypes and contracts); `name` itself is
    /// always included. It orders nominal types for [`ParamType::is_at_least_as_specific_as`].
    ///
    /// ## Examples
    /// ```rust
    /// use classlens_core::{ParamType, arg};
    ///
    /// let even = ParamType::nominal::<u32, _>("Even", ["Number"], |n: &u32| n % 2 == 0);
    /// let number = ParamType::nominal::<u32, _>("Number", Vec::<String>::new(), |_: &u32| true);
    /// assert!(even.accepts(&arg(4_u32)));
    /// assert!(!even.accepts(&arg(3_u32)));
    /// assert!(even.is_at_least_as_specific_as(&number));
    /// assert!(!number.is_at_least_as_specific_as(&even));
    /// ```
    pub fn nominal<T, F>(
        name: impl Into<Cow<'static, str>>,
        lineage: impl IntoIterator<Item = impl Into<String>>,
        conforms: F,
    ) -> Self
    where
        T: Any,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let mut names: BTreeSet<String> = lineage.into_iter().map(Into::into).collect();
        names.insert(name.to_string());
        let conforms: Arc<ConformsFn> =
            Arc::new(move |value: &dyn Any| value.downcast_ref::<T>().is_some_and(&conforms));
        Self {
            nominal: Some(Nominal {
                lineage: Arc::new(names),
                conforms,
            }),
            ..Self::named::<T>(name)
        }
    }

    /// The top type: accepts any non-null value.
    pub fn object() -> Self {
        Self {
            name: Cow::Borrowed("Object"),
            accepts: Accepts::AnyValue,
            primitive: false,
            nominal: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive
    }

    pub fn is_object(&self) -> bool {
        self.accepts == Accepts::AnyValue
    }

    pub fn is_nominal(&self) -> bool {
        self.nominal.is_some()
    }

    /// Runtime type required by an exact parameter type; `None` for `Object`.
    pub fn type_id(&self) -> Option<TypeId> {
        match self.accepts {
            Accepts::Exact(id) => Some(id),
            Accepts::AnyValue => None,
        }
    }

    /// Check whether `arg` may be passed where this type is declared.
    pub fn accepts(&self, arg: &Arg) -> bool {
        match arg {
            None => !self.primitive,
            Some(value) => {
                let value: &dyn Any = &**value;
                match self.accepts {
                    Accepts::Exact(id) => {
                        value.type_id() == id
                            && self.nominal.as_ref().is_none_or(|nominal| (nominal.conforms)(value))
                    }
                    Accepts::AnyValue => true,
                }
            }
        }
    }

    /// Check whether both declarations denote the same type, ignoring display names of non-nominal types.
    pub fn same_type(&self, other: &ParamType) -> bool {
        self.accepts == other.accepts
            && self.primitive == other.primitive
            && self.nominal_name() == other.nominal_name()
    }

    /// Check whether every value this type accepts is also accepted by `other`.
    ///
    /// An exact type is more specific than `Object`. Two exact types are comparable only when they share a
    /// runtime type; then a nominal type is more specific than the plain one, and a nominal subtype more
    /// specific than its supertypes.
    pub fn is_at_least_as_specific_as(&self, other: &ParamType) -> bool {
        match (self.accepts, other.accepts) {
            (_, Accepts::AnyValue) => true,
            (Accepts::Exact(a), Accepts::Exact(b)) if a == b => match (&self.nominal, &other.nominal) {
                (_, None) => true,
                (None, Some(_)) => false,
                (Some(mine), Some(_)) => mine.lineage.contains(other.name()),
            },
            _ => false,
        }
    }

    fn nominal_name(&self) -> Option<&str> {
        self.nominal.as_ref().map(|_| self.name())
    }

    fn lineage(&self) -> Option<&BTreeSet<String>> {
        self.nominal.as_ref().map(|nominal| &*nominal.lineage)
    }
}

// Nominal predicates are compared through their declared name and lineage.
impl PartialEq for ParamType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.accepts == other.accepts
            && self.primitive == other.primitive
            && self.lineage() == other.lineage()
    }
}

impl Eq for ParamType {}

impl Hash for ParamType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.accepts.hash(state);
        self.primitive.hash(state);
        self.lineage().hash(state);
    }
}

impl fmt::Debug for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamType")
            .field("name", &self.name)
            .field("accepts", &self.accepts)
            .field("primitive", &self.primitive)
            .field("lineage", &self.lineage())
            .finish()
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Check whether `id` is one of Rust's primitive scalar types.
///
/// Primitive parameters never accept null.
pub fn is_primitive_type(id: TypeId) -> bool {
    [
        TypeId::of::<bool>(),
        TypeId::of::<char>(),
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<i128>(),
        TypeId::of::<isize>(),
        TypeId::of::<u8>(),
        TypeId::of::<u16>(),
        TypeId::of::<u32>(),
        TypeId::of::<u64>(),
        TypeId::of::<u128>(),
        TypeId::of::<usize>(),
        TypeId::of::<f32>(),
        TypeId::of::<f64>(),
    ]
    .contains(&id)
}

// `alloc::string::String` -> `String`, `alloc::vec::Vec<alloc::string::String>` -> `Vec<alloc::string::String>`.
// Tuples, arrays and slices have no outer path and keep their full name.
fn short_type_name(full: &'static str) -> &'static str {
    let head = full.split(['<', '(', '[', ';']).next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

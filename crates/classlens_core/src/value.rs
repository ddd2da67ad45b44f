//! Runtime values flowing into constructors and out of them.

use std::any::{Any, type_name};
use std::fmt;

use crate::errors::InvokeError;

/// A type-erased runtime value.
pub type Value = Box<dyn Any + Send + Sync>;

/// One constructor argument; `None` is the model's null.
pub type Arg = Option<Value>;

/// Wrap a value as a non-null argument.
pub fn arg<T: Any + Send + Sync>(value: T) -> Arg {
    Some(Box::new(value))
}

/// The null argument.
pub fn null() -> Arg {
    None
}

/// Arguments handed to a constructor body, consumed by position.
pub struct Args {
    values: Vec<Arg>,
}

impl Args {
    pub fn new(values: Vec<Arg>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Take the non-null argument at `index` as a `T`.
    ///
    /// ## Errors
    /// - [`InvokeError::MissingArgument`] when `index` is out of range.
    /// - [`InvokeError::ArgumentType`] when the argument is null (or already taken) or not a `T`.
    pub fn take<T: Any>(&mut self, index: usize) -> Result<T, InvokeError> {
        match self.take_opt::<T>(index)? {
            Some(value) => Ok(value),
            None => Err(InvokeError::ArgumentType {
                index,
                expected: type_name::<T>().to_string(),
                found: "null".to_string(),
            }),
        }
    }

    /// Take the argument at `index` as an optional `T`; null yields `Ok(None)`.
    pub fn take_opt<T: Any>(&mut self, index: usize) -> Result<Option<T>, InvokeError> {
        match self.take_raw(index)? {
            None => Ok(None),
            Some(value) => {
                let value: Box<dyn Any> = value;
                value
                    .downcast::<T>()
                    .map(|boxed| Some(*boxed))
                    .map_err(|_| InvokeError::ArgumentType {
                        index,
                        expected: type_name::<T>().to_string(),
                        found: "a value of another type".to_string(),
                    })
            }
        }
    }

    /// Take the argument at `index` without inspecting it.
    pub fn take_raw(&mut self, index: usize) -> Result<Arg, InvokeError> {
        self.values
            .get_mut(index)
            .map(Option::take)
            .ok_or(InvokeError::MissingArgument { index })
    }

    pub fn into_inner(self) -> Vec<Arg> {
        self.values
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.values.iter().map(|v| if v.is_some() { "<value>" } else { "null" }))
            .finish()
    }
}

/// An object produced by a constructor, tagged with the name of the type that declared it.
pub struct Instance {
    type_name: String,
    value: Value,
}

impl Instance {
    pub fn new(type_name: impl Into<String>, value: Value) -> Self {
        Self {
            type_name: type_name.into(),
            value,
        }
    }

    /// Name of the type whose constructor produced this instance.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Unwrap the instance as a `T`, giving it back unchanged on mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Self { type_name, value } = self;
        match value.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(value) => Err(Self { type_name, value }),
        }
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance").field("type_name", &self.type_name).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_typed_argument() {
        let mut args = Args::new(vec![arg(String::from("Tom")), arg(7_i32)]);
        assert_eq!(args.take::<String>(0).unwrap(), "Tom");
        assert_eq!(args.take::<i32>(1).unwrap(), 7);
    }

    #[test]
    fn test_take_wrong_type_is_error() {
        let mut args = Args::new(vec![arg(7_i32)]);
        let err = args.take::<String>(0).unwrap_err();
        assert!(matches!(err, InvokeError::ArgumentType { index: 0, .. }));
    }

    #[test]
    fn test_take_null() {
        let mut args = Args::new(vec![null(), null()]);
        assert_eq!(args.take_opt::<String>(0).unwrap(), None);
        assert!(matches!(
            args.take::<String>(1),
            Err(InvokeError::ArgumentType { index: 1, ref found, .. }) if found == "null"
        ));
    }

    #[test]
    fn test_take_out_of_range() {
        let mut args = Args::new(vec![]);
        assert_eq!(args.take_raw(0).unwrap_err(), InvokeError::MissingArgument { index: 0 });
    }

    #[test]
    fn test_instance_downcast_roundtrip() {
        let instance = Instance::new("Counter", Box::new(3_u32));
        assert!(instance.is::<u32>());
        assert_eq!(instance.downcast_ref::<u32>(), Some(&3));
        let instance = instance.downcast::<String>().unwrap_err();
        assert_eq!(instance.type_name(), "Counter");
        assert_eq!(instance.downcast::<u32>().unwrap(), 3);
    }

    #[test]
    fn test_args_debug_hides_values() {
        let args = Args::new(vec![arg(1_u8), null()]);
        assert_eq!(format!("{args:?}"), r#"["<value>", "null"]"#);
    }
}

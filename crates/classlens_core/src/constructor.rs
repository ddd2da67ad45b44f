//! Constructor descriptors and invocation handles.
//!
//! A [`ConstructorDescriptor`] is shared, immutable metadata. Invoking it always goes through a
//! [`ConstructorHandle`], a short-lived value owned by the caller that carries the accessibility flag. A fresh
//! handle is accessible only when the constructor is public; callers that deliberately bypass visibility
//! call [`ConstructorHandle::set_accessible`] on their own handle, which never affects other callers.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::{Visibility, join_params};
use crate::errors::InvokeError;
use crate::param::ParamType;
use crate::value::{Arg, Args, Instance, Value};

/// Body of a constructor: consumes the arguments and produces the new value.
pub type ConstructorFn = dyn Fn(Args) -> Result<Value, InvokeError> + Send + Sync;

/// One constructor declared on a type.
#[derive(Clone)]
pub struct ConstructorDescriptor {
    declaring_type: String,
    params: Vec<ParamType>,
    visibility: Visibility,
    body: Arc<ConstructorFn>,
}

impl ConstructorDescriptor {
    pub fn new(
        declaring_type: impl Into<String>,
        visibility: Visibility,
        params: Vec<ParamType>,
        body: Arc<ConstructorFn>,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            params,
            visibility,
            body,
        }
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
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

    /// `Type(T1, T2)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.declaring_type, join_params(&self.params))
    }

    /// Check whether the parameter list is exactly `params` (by runtime type).
    pub fn has_params(&self, params: &[ParamType]) -> bool {
        self.params.len() == params.len() && self.params.iter().zip(params).all(|(a, b)| a.same_type(b))
    }

    /// Create an invocation handle honoring the declared visibility.
    pub fn handle(&self) -> ConstructorHandle<'_> {
        ConstructorHandle {
            constructor: self,
            accessible: self.visibility.is_public(),
        }
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("signature", &self.signature())
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// A caller-owned handle used to invoke a constructor.
#[derive(Debug)]
pub struct ConstructorHandle<'a> {
    constructor: &'a ConstructorDescriptor,
    accessible: bool,
}

impl<'a> ConstructorHandle<'a> {
    pub fn descriptor(&self) -> &'a ConstructorDescriptor {
        self.constructor
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    /// Override the declared visibility for this handle only.
    pub fn set_accessible(&mut self, accessible: bool) {
        self.accessible = accessible;
    }

    /// Run the constructor.
    ///
    /// ## Errors
    /// - [`InvokeError::Inaccessible`] if the handle is not accessible.
    /// - [`InvokeError::ArityMismatch`] / [`InvokeError::ArgumentType`] if `args` does not fit the parameters.
    /// - Whatever the constructor body returns.
    pub fn new_instance(&self, args: Vec<Arg>) -> Result<Instance, InvokeError> {
        let ctor = self.constructor;
        if !self.accessible {
            return Err(InvokeError::Inaccessible {
                signature: ctor.signature(),
                visibility: ctor.visibility,
            });
        }
        if args.len() != ctor.params.len() {
            return Err(InvokeError::ArityMismatch {
                signature: ctor.signature(),
                expected: ctor.params.len(),
                found: args.len(),
            });
        }
        if let Some(index) = ctor.params.iter().zip(&args).position(|(param, arg)| !param.accepts(arg)) {
            return Err(InvokeError::ArgumentType {
                index,
                expected: ctor.params[index].name().to_string(),
                found: String::from(if args[index].is_none() { "null" } else { "a value of another type" }),
            });
        }

        let value = (ctor.body)(Args::new(args))?;
        Ok(Instance::new(ctor.declaring_type.clone(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::arg;

    fn greeting_ctor(visibility: Visibility) -> ConstructorDescriptor {
        ConstructorDescriptor::new(
            "Greeting",
            visibility,
            vec![ParamType::of::<String>()],
            Arc::new(|mut args: Args| {
                let text = args.take::<String>(0)?;
                Ok(Box::new(format!("hello {text}")) as Value)
            }),
        )
    }

    #[test]
    fn test_public_handle_is_accessible() {
        let ctor = greeting_ctor(Visibility::Public);
        let handle = ctor.handle();
        assert!(handle.is_accessible());
        let instance = handle.new_instance(vec![arg(String::from("tom"))]).unwrap();
        assert_eq!(instance.type_name(), "Greeting");
        assert_eq!(instance.downcast::<String>().unwrap(), "hello tom");
    }

    #[test]
    fn test_private_handle_refuses_until_elevated() {
        let ctor = greeting_ctor(Visibility::Private);
        let mut handle = ctor.handle();
        let err = handle.new_instance(vec![arg(String::from("tom"))]).unwrap_err();
        assert!(matches!(err, InvokeError::Inaccessible { visibility: Visibility::Private, .. }));

        handle.set_accessible(true);
        assert!(handle.new_instance(vec![arg(String::from("tom"))]).is_ok());

        // Elevation does not leak into new handles.
        assert!(!ctor.handle().is_accessible());
    }

    #[test]
    fn test_arity_and_type_checks() {
        let ctor = greeting_ctor(Visibility::Public);
        let handle = ctor.handle();
        assert!(matches!(
            handle.new_instance(vec![]),
            Err(InvokeError::ArityMismatch { expected: 1, found: 0, .. })
        ));
        assert!(matches!(
            handle.new_instance(vec![arg(3_i32)]),
            Err(InvokeError::ArgumentType { index: 0, .. })
        ));
    }

    #[test]
    fn test_signature_and_has_params() {
        let ctor = greeting_ctor(Visibility::Crate);
        assert_eq!(ctor.signature(), "Greeting(String)");
        assert!(ctor.has_params(&[ParamType::named::<String>("text")]));
        assert!(!ctor.has_params(&[ParamType::object()]));
        assert!(format!("{ctor:?}").contains("Greeting(String)"));
    }
}

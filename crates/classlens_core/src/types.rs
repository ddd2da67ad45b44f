//! Type descriptors and their builder.

use std::sync::Arc;

use crate::constructor::{ConstructorDescriptor, ConstructorFn};
use crate::descriptor::{FieldDescriptor, MethodDescriptor, Visibility};
use crate::errors::InvokeError;
use crate::param::ParamType;
use crate::value::{Args, Value};

/// What kind of type a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeKind {
    /// A concrete type with fields and constructors.
    #[default]
    Class,
    /// A set of method signatures other types commit to implementing.
    Contract,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Contract => "contract",
        }
    }
}

/// Shape of a type as known to the runtime.
///
/// All lists hold what is declared *on this type only*. Inherited members are reachable through
/// [`TypeDescriptor::supertype`], and each contract in [`TypeDescriptor::contracts`] carries its own
/// (super-)contracts.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    supertype: Option<Arc<TypeDescriptor>>,
    contracts: Vec<Arc<TypeDescriptor>>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
}

impl TypeDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_contract(&self) -> bool {
        self.kind == TypeKind::Contract
    }

    pub fn supertype(&self) -> Option<&Arc<TypeDescriptor>> {
        self.supertype.as_ref()
    }

    /// Contracts this type implements directly, in declaration order.
    pub fn contracts(&self) -> &[Arc<TypeDescriptor>] {
        &self.contracts
    }

    pub fn declared_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Declared fields followed by those of every supertype, nearest first.
    pub fn fields(&self) -> Vec<&FieldDescriptor> {
        let mut out: Vec<&FieldDescriptor> = self.fields.iter().collect();
        let mut parent = self.supertype.as_deref();
        while let Some(ty) = parent {
            out.extend(ty.fields.iter());
            parent = ty.supertype.as_deref();
        }
        out
    }

    pub fn declared_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn declared_methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Constructors in declaration order.
    pub fn declared_constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// Look up the constructor with exactly these parameter types.
    pub fn declared_constructor(&self, params: &[ParamType]) -> Option<&ConstructorDescriptor> {
        self.constructors.iter().find(|c| c.has_params(params))
    }

    /// Check whether `contract` is this type's direct contract (by name).
    pub fn implements(&self, contract: &str) -> bool {
        self.contracts.iter().any(|c| c.name == contract)
    }
}

/// Incrementally assemble a [`TypeDescriptor`].
///
/// ## Examples
/// ```rust
/// use classlens_core::{FieldDescriptor, ParamType, TypeBuilder, Value, Visibility};
///
/// let point = TypeBuilder::new("Point")
///     .field(FieldDescriptor::new("x", "i64"))
///     .constructor(Visibility::Public, [ParamType::of::<i64>()], |mut args| {
///         Ok(Box::new(args.take::<i64>(0)?) as Value)
///     })
///     .build();
///
/// assert_eq!(point.declared_fields().len(), 1);
/// assert_eq!(point.declared_constructors()[0].signature(), "Point(i64)");
/// ```
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    name: String,
    kind: TypeKind,
    supertype: Option<Arc<TypeDescriptor>>,
    contracts: Vec<Arc<TypeDescriptor>>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
}

impl TypeBuilder {
    /// Start a class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            supertype: None,
            contracts: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Start a contract.
    pub fn contract(name: impl Into<String>) -> Self {
        Self::new(name).kind(TypeKind::Contract)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn extends(mut self, supertype: Arc<TypeDescriptor>) -> Self {
        self.supertype = Some(supertype);
        self
    }

    /// Add a directly implemented contract (for a contract: a parent contract).
    pub fn implements(mut self, contract: Arc<TypeDescriptor>) -> Self {
        self.contracts.push(contract);
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn constructor<F>(mut self, visibility: Visibility, params: impl IntoIterator<Item = ParamType>, body: F) -> Self
    where
        F: Fn(Args) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        let body: Arc<ConstructorFn> = Arc::new(body);
        self.constructors.push(ConstructorDescriptor::new(
            self.name.clone(),
            visibility,
            params.into_iter().collect(),
            body,
        ));
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            name: self.name,
            kind: self.kind,
            supertype: self.supertype,
            contracts: self.contracts,
            fields: self.fields,
            methods: self.methods,
            constructors: self.constructors,
        }
    }
}

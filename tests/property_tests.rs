//! Property-based tests for classlens
//!
//! These tests use proptest to verify invariants across many randomly
//! generated type shapes, catching edge cases that hand-written tests might miss.

use std::collections::BTreeSet;
use std::sync::Arc;

use classlens::{InspectConfig, MatchPolicy, TypeInspector, is_matching_arguments};
use classlens_core::{
    Arg, FieldDescriptor, Marker, MethodDescriptor, ParamType, TypeBuilder, TypeDescriptor, Value, Visibility, arg,
    null,
};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn ident() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

/// A small fixed universe of parameter types: two exact reference types, one primitive and `Object`.
#[derive(Debug, Clone, Copy)]
enum Kind {
    Text,
    Bytes,
    Int,
    Object,
}

fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![Just(Kind::Text), Just(Kind::Bytes), Just(Kind::Int), Just(Kind::Object)]
}

/// Argument shapes, including null.
#[derive(Debug, Clone, Copy)]
enum ArgKind {
    Text,
    Int,
    Float,
    Null,
}

fn arg_kind() -> impl Strategy<Value = ArgKind> {
    prop_oneof![Just(ArgKind::Text), Just(ArgKind::Int), Just(ArgKind::Float), Just(ArgKind::Null)]
}

fn param(kind: Kind) -> ParamType {
    match kind {
        Kind::Text => ParamType::of::<String>(),
        Kind::Bytes => ParamType::of::<Vec<u8>>(),
        Kind::Int => ParamType::of::<i32>(),
        Kind::Object => ParamType::object(),
    }
}

fn make_arg(kind: ArgKind) -> Arg {
    match kind {
        ArgKind::Text => arg(String::from("text")),
        ArgKind::Int => arg(7_i32),
        ArgKind::Float => arg(1.5_f64),
        ArgKind::Null => null(),
    }
}

fn visibility() -> impl Strategy<Value = Visibility> {
    prop_oneof![Just(Visibility::Public), Just(Visibility::Crate), Just(Visibility::Private)]
}

/// A type whose constructors each return their own declaration index.
fn indexed_type(constructors: &[(Visibility, Vec<Kind>)]) -> TypeDescriptor {
    constructors
        .iter()
        .enumerate()
        .fold(TypeBuilder::new("Generated"), |builder, (index, (visibility, kinds))| {
            builder.constructor(*visibility, kinds.iter().copied().map(param), move |_| {
                Ok(Box::new(index) as Value)
            })
        })
        .build()
}

fn constructors() -> impl Strategy<Value = Vec<(Visibility, Vec<Kind>)>> {
    prop::collection::vec((visibility(), prop::collection::vec(kind(), 0..3)), 0..6)
}

fn args() -> impl Strategy<Value = Vec<ArgKind>> {
    prop::collection::vec(arg_kind(), 0..3)
}

// =============================================================================
// Construction Properties
// =============================================================================

proptest! {
    /// Property: FirstDeclared invokes the lowest-index matching constructor, or reports NotFound when none match
    #[test]
    fn first_declared_picks_first_match(ctors in constructors(), call in args()) {
        let ty = indexed_type(&ctors);
        let expected = ctors.iter().position(|(_, kinds)| {
            let params: Vec<_> = kinds.iter().copied().map(param).collect();
            let call: Vec<_> = call.iter().copied().map(make_arg).collect();
            is_matching_arguments(&params, &call)
        });

        let result = TypeInspector::new().create_instance(&ty, call.iter().copied().map(make_arg).collect());
        match expected {
            Some(index) => {
                prop_assert_eq!(result.unwrap().downcast::<usize>().unwrap(), index);
            }
            None => {
                prop_assert!(result.unwrap_err().is_not_found());
            }
        }
    }

    /// Property: the chosen constructor (under either policy) matches the arguments
    #[test]
    fn chosen_constructor_always_matches(ctors in constructors(), call in args(), most_specific in any::<bool>()) {
        let ty = indexed_type(&ctors);
        let policy = if most_specific { MatchPolicy::MostSpecific } else { MatchPolicy::FirstDeclared };
        let inspector = TypeInspector::with_config(InspectConfig::new().with_match_policy(policy));
        let call: Vec<_> = call.iter().copied().map(make_arg).collect();

        if let Ok(constructor) = inspector.find_matching_constructor(&ty, &call) {
            prop_assert!(is_matching_arguments(constructor.params(), &call));
        }
    }

    /// Property: both policies agree on whether a constructor exists
    #[test]
    fn policies_agree_on_existence(ctors in constructors(), call in args()) {
        let ty = indexed_type(&ctors);
        let call: Vec<_> = call.iter().copied().map(make_arg).collect();
        let first = TypeInspector::new().find_matching_constructor(&ty, &call).is_ok();
        let most = TypeInspector::with_config(InspectConfig::new().with_match_policy(MatchPolicy::MostSpecific))
            .find_matching_constructor(&ty, &call)
            .is_ok();
        prop_assert_eq!(first, most);
    }

    /// Property: null never matches a primitive parameter
    #[test]
    fn null_never_fits_primitive(kinds in prop::collection::vec(kind(), 1..4), slot in 0usize..4) {
        let slot = slot % kinds.len();
        let params: Vec<_> = kinds.iter().copied().map(param).collect();
        let call: Vec<_> = (0..kinds.len()).map(|i| if i == slot { null() } else { arg(0_u8) }).collect();

        if params[slot].is_primitive() {
            prop_assert!(!is_matching_arguments(&params, &call));
        }
    }

    /// Property: argument count must equal parameter count
    #[test]
    fn arity_mismatch_never_matches(kinds in prop::collection::vec(Just(Kind::Object), 0..4), extra in 1usize..3) {
        let params: Vec<_> = kinds.iter().copied().map(param).collect();
        let call: Vec<_> = (0..kinds.len() + extra).map(|_| arg(0_u8)).collect();
        prop_assert!(!is_matching_arguments(&params, &call));
    }
}

// =============================================================================
// Name Aggregation Properties
// =============================================================================

proptest! {
    /// Property: marker scan returns exactly the declared fields carrying the marker
    #[test]
    fn annotated_fields_are_exactly_the_marked_ones(fields in prop::collection::vec((ident(), any::<bool>()), 0..8)) {
        let important = Marker::from("Important");
        let ty = fields
            .iter()
            .fold(TypeBuilder::new("Generated"), |builder, (name, marked)| {
                let field = FieldDescriptor::new(name.as_str(), "String");
                builder.field(if *marked { field.with_marker(important.clone()) } else { field })
            })
            .build();

        let expected: BTreeSet<String> = fields
            .iter()
            .filter(|(_, marked)| *marked)
            .map(|(name, _)| name.clone())
            .collect();
        prop_assert_eq!(TypeInspector::new().annotated_field_names(&ty, &important), expected);
    }

    /// Property: method names are the union of own and directly implemented contract methods
    #[test]
    fn method_names_are_the_one_level_union(
        own in prop::collection::vec(ident(), 0..5),
        contracts in prop::collection::vec(prop::collection::vec(ident(), 0..4), 0..4),
        grand in prop::collection::vec(ident(), 0..4)
    ) {
        let grandparent = grand
            .iter()
            .fold(TypeBuilder::contract("Grand"), |b, m| b.method(MethodDescriptor::new(format!("g_{m}"))));
        let grandparent = Arc::new(grandparent.build());
        let ty = contracts
            .iter()
            .enumerate()
            .map(|(i, methods)| {
                let contract = methods
                    .iter()
                    .fold(TypeBuilder::contract(format!("C{i}")), |b, m| b.method(MethodDescriptor::new(m.as_str())))
                    .implements(Arc::clone(&grandparent));
                Arc::new(contract.build())
            })
            .fold(
                own.iter().fold(TypeBuilder::new("Generated"), |b, m| b.method(MethodDescriptor::new(m.as_str()))),
                TypeBuilder::implements,
            )
            .build();

        let expected: BTreeSet<String> = own.iter().chain(contracts.iter().flatten()).cloned().collect();
        let names = TypeInspector::new().all_method_names(&ty);
        prop_assert!(names.iter().all(|name| !name.starts_with("g_")));
        prop_assert_eq!(names, expected);
    }
}

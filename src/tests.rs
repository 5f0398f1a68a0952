#![cfg(test)]

use crate::*;

macro_rules! eq {
    ($mangled:literal => $demangled:literal) => {
        let symbol = Symbol::parse($mangled)
            .unwrap_or_else(|err| panic!("Decoding '{}' failed: {err}", $mangled));

        assert_eq!(symbol.to_string(), $demangled);
    };
}

macro_rules! err {
    ($mangled:literal => $error:pat) => {
        match Symbol::parse($mangled) {
            Ok(symbol) => panic!(
                "Decoding '{}' succeeded as '{symbol}' when it wasn't supposed to.",
                $mangled
            ),
            Err(err) => {
                assert!(matches!(err, $error), "'{}' failed with '{err}'.", $mangled)
            }
        }
    };
}

macro_rules! none {
    ($mangled:literal) => {
        if let Some(out) = demangle($mangled) {
            panic!("Demangling '{}' gave '{out}' when it wasn't supposed to.", $mangled);
        }
    };
}

fn entity(mangled: &str) -> DecomposedEntity {
    decompose(mangled).unwrap_or_else(|err| panic!("Decoding '{mangled}' failed: {err}"))
}

#[test]
fn prefixes() {
    err!("" => Error::UnrecognizedPrefix);
    err!("main" => Error::UnrecognizedPrefix);
    err!("_ZN4testE" => Error::UnrecognizedPrefix);
    none!("_ZN4testE");
    none!("__ZN5alloc9allocator6Layout9for_value17h02a996811f781011E");

    assert_eq!(Symbol::parse("_$s3foo6lonelyyyF").unwrap().scheme(), Scheme::V5);
    assert_eq!(Symbol::parse("$s3foo6lonelyyyF").unwrap().scheme(), Scheme::V5);
    assert_eq!(Symbol::parse("_T03foo6lonelyyyF").unwrap().scheme(), Scheme::V4);
    assert_eq!(Symbol::parse("_T3foo6lonelyyyF").unwrap().scheme(), Scheme::Legacy);

    let sym = Symbol::parse("_$s3foo6lonelyyyF").unwrap();
    assert_eq!(sym.raw(), "_$s3foo6lonelyyyF");
}

#[test]
fn lonely_function() {
    let ent = entity("_$s3foo6lonelyyyF");
    assert_eq!(ent.module().name, "foo");
    assert_eq!(ent.name.as_ref().unwrap().name, "lonely");
    assert_eq!(ent.kind, EntityKind::Function);

    match ent.signature.as_ref().unwrap() {
        SwiftType::Function(func) => {
            assert!(func.params.is_void());
            assert!(func.return_type.is_void());
            assert!(!func.can_throw());
        }
        other => panic!("not a plain function: {other:?}"),
    }

    eq!("_$s3foo6lonelyyyF" => "foo.lonely() -> ()");
}

#[test]
fn int_return() {
    let ent = entity("_$s3foo6nonameSiyF");
    match ent.signature.as_ref().unwrap() {
        SwiftType::Function(func) => {
            assert_eq!(*func.return_type, SwiftType::BuiltIn(BuiltinKind::Int));
            assert!(func.params.is_void());
        }
        other => panic!("not a plain function: {other:?}"),
    }

    eq!("_$s3foo6nonameSiyF" => "foo.noname() -> Swift.Int");
}

#[test]
fn array_parameter() {
    let ent = entity("_$s3foo6nonameyySaySiGF");
    match ent.signature.as_ref().unwrap() {
        SwiftType::Function(func) => {
            assert!(func.return_type.is_void());
            match func.params.as_ref() {
                SwiftType::BoundGeneric {
                    base,
                    args,
                    is_variadic,
                } => {
                    assert!(!is_variadic);
                    assert_eq!(args.as_slice(), &[SwiftType::BuiltIn(BuiltinKind::Int)]);
                    match base.as_ref() {
                        SwiftType::Nominal {
                            path,
                            kind,
                            is_reference,
                        } => {
                            assert_eq!(path.to_string(), "Swift.Array");
                            assert_eq!(*kind, NominalKind::Class);
                            assert!(is_reference);
                        }
                        other => panic!("not a nominal base: {other:?}"),
                    }
                }
                other => panic!("not a bound generic: {other:?}"),
            }
        }
        other => panic!("not a plain function: {other:?}"),
    }

    eq!("_$s3foo6nonameyySaySiGF" => "foo.noname(Swift.Array<Swift.Int>) -> ()");
}

#[test]
fn allocating_constructor() {
    let ent = entity("_$s17unitHelpFrawework7AStructVACycfC");
    assert_eq!(ent.module().name, "unitHelpFrawework");
    assert_eq!(ent.kind, EntityKind::Constructor);
    assert_eq!(ent.path.leaf().unwrap().name, "AStruct");

    match ent.signature.as_ref().unwrap() {
        SwiftType::Constructor {
            params,
            return_type,
            failable,
            allocating,
        } => {
            assert!(params.is_void());
            assert!(!failable);
            assert!(allocating);
            match return_type.as_ref() {
                SwiftType::Nominal { path, kind, .. } => {
                    assert_eq!(path.leaf().unwrap().name, "AStruct");
                    assert_eq!(*kind, NominalKind::Struct);
                }
                other => panic!("not a nominal return: {other:?}"),
            }
        }
        other => panic!("not a constructor: {other:?}"),
    }

    eq!("_$s17unitHelpFrawework7AStructVACycfC" =>
        "unitHelpFrawework.AStruct.init() -> unitHelpFrawework.AStruct");
}

#[test]
fn failable_constructor() {
    let ent = entity("_$s4main7AStructVACSgycfc");
    match ent.signature.as_ref().unwrap() {
        SwiftType::Constructor {
            failable,
            allocating,
            ..
        } => {
            assert!(failable);
            assert!(!allocating);
        }
        other => panic!("not a constructor: {other:?}"),
    }
}

#[test]
fn destructors() {
    let ent = entity("_$s4main3FooCfd");
    assert_eq!(ent.kind, EntityKind::Destructor);
    assert_eq!(
        ent.signature,
        Some(SwiftType::Destructor {
            deallocating: false
        })
    );
    eq!("_$s4main3FooCfd" => "main.Foo.deinit");

    let ent = entity("_$s4main3FooCfD");
    assert_eq!(
        ent.signature,
        Some(SwiftType::Destructor { deallocating: true })
    );
}

#[test]
fn instance_method() {
    let ent = entity("_$s4main3FooC3addSiSiF");
    match ent.signature.as_ref().unwrap() {
        SwiftType::UncurriedFunction { self_param, inner } => {
            match self_param.as_ref() {
                SwiftType::Nominal {
                    kind, is_reference, ..
                } => {
                    assert_eq!(*kind, NominalKind::Class);
                    assert!(is_reference);
                }
                other => panic!("self is not nominal: {other:?}"),
            }
            assert_eq!(*inner.params, SwiftType::BuiltIn(BuiltinKind::Int));
        }
        other => panic!("not an instance method: {other:?}"),
    }

    eq!("_$s4main3FooC3addSiSiF" => "main.Foo.add(Swift.Int) -> Swift.Int");
}

#[test]
fn nested_nominals() {
    eq!("_$s4main5OuterC5InnerV4nameSSvg" => "main.Outer.Inner.name.getter : Swift.String");

    let ent = entity("_$s4main5OuterC5InnerV4nameSSvg");
    let kinds: Vec<PathKind> = ent.path.components.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, [PathKind::Class, PathKind::Struct]);
}

#[test]
fn argument_labels() {
    eq!("_$s4main3foo1x1ySbSi_SStF" =>
        "main.foo(x: Swift.Int, y: Swift.String) -> Swift.Bool");

    // A label section of 'y' leaves every parameter unlabeled.
    eq!("_$s4main3fooyySi_SStF" => "main.foo(Swift.Int, Swift.String) -> ()");

    // An '_' slot skips one parameter.
    eq!("_$s4main3foo_1ySbSi_SStF" => "main.foo(Swift.Int, y: Swift.String) -> Swift.Bool");
}

#[test]
fn stdlib_module_shorthand() {
    eq!("_$ss8readLine16strippingNewlineSSSgSb_tF" =>
        "Swift.readLine(strippingNewline: Swift.Bool) -> Swift.Optional<Swift.String>");
}

#[test]
fn tuple_return() {
    eq!("_$s4main3fooSi_SStyF" => "main.foo() -> (Swift.Int, Swift.String)");
}

#[test]
fn variadic_parameter() {
    eq!("_$s4main3fooyySid_tF" => "main.foo(Swift.Int...) -> ()");

    let ent = entity("_$s4main3fooyySaySidGF");
    match ent.signature.as_ref().unwrap() {
        SwiftType::Function(func) => match func.params.as_ref() {
            SwiftType::BoundGeneric { is_variadic, .. } => assert!(is_variadic),
            other => panic!("not a bound generic: {other:?}"),
        },
        other => panic!("not a plain function: {other:?}"),
    }
}

#[test]
fn throwing_function() {
    let ent = entity("_$s4main5fetchSSyKF");
    match ent.signature.as_ref().unwrap() {
        SwiftType::Function(func) => assert!(func.can_throw()),
        other => panic!("not a plain function: {other:?}"),
    }

    eq!("_$s4main5fetchSSyKF" => "main.fetch() throws -> Swift.String");
}

#[test]
fn closure_parameters() {
    eq!("_$s4main3fooyyycF" => "main.foo(() -> ()) -> ()");
    eq!("_$s4main4execyyyXEF" => "main.exec(@escaping () -> ()) -> ()");
    eq!("_$s4main8callbackySiSiXCF" =>
        "main.callback(@convention(c) (Swift.Int) -> Swift.Int) -> ()");

    let ent = entity("_$s4main8callbackySiSiXCF");
    match ent.signature.as_ref().unwrap() {
        SwiftType::Function(func) => {
            assert!(matches!(
                func.params.as_ref(),
                SwiftType::CFunctionPointer { .. }
            ));
        }
        other => panic!("not a plain function: {other:?}"),
    }
}

#[test]
fn inout_parameter() {
    eq!("_$s4main4swapyySizF" => "main.swap(inout Swift.Int) -> ()");
}

#[test]
fn metatypes() {
    eq!("_$s4main3fooySimF" => "main.foo(Swift.Int.Type) -> ()");
    eq!("_$s4main3fooyAA1P_AA1QpXpF" => "main.foo((main.P & main.Q).Type) -> ()");
}

#[test]
fn protocol_composition() {
    let ent = entity("_$s4main3fooyAA1P_AA1QpF");
    match ent.signature.as_ref().unwrap() {
        SwiftType::Function(func) => match func.params.as_ref() {
            SwiftType::ProtocolList(protocols) => {
                assert_eq!(protocols.len(), 2);
                assert!(protocols.iter().all(SwiftType::is_protocol));
            }
            other => panic!("not a protocol list: {other:?}"),
        },
        other => panic!("not a plain function: {other:?}"),
    }

    eq!("_$s4main3fooyAA1P_AA1QpF" => "main.foo(main.P & main.Q) -> ()");
}

#[test]
fn enum_parameter() {
    eq!("_$s4main3fooyAA5ColorOF" => "main.foo(main.Color) -> ()");
}

#[test]
fn optional_sugar() {
    eq!("_$s4main4findSSSgSiF" =>
        "main.find(Swift.Int) -> Swift.Optional<Swift.String>");
}

#[test]
fn extension_member() {
    let ent = entity("_$s5Other4main3FooVE3baryyF");
    assert_eq!(ent.module().name, "Other");
    assert_eq!(ent.path.components[0].kind, PathKind::Extension);

    match ent.signature.as_ref().unwrap() {
        SwiftType::UncurriedFunction { inner, .. } => {
            let extended = inner.extension_on.as_deref().unwrap();
            match extended {
                SwiftType::Nominal { path, .. } => {
                    assert_eq!(path.to_string(), "main.Foo")
                }
                other => panic!("not a nominal: {other:?}"),
            }
        }
        other => panic!("not a method: {other:?}"),
    }

    eq!("_$s5Other4main3FooVE3baryyF" => "Other.Foo.bar() -> ()");
}

// Property and subscript entities.

#[test]
fn accessors() {
    eq!("_$s4main3FooC5countSivg" => "main.Foo.count.getter : Swift.Int");
    eq!("_$s4main3FooC5countSivs" => "main.Foo.count.setter : Swift.Int");
    eq!("_$s4main3FooC5countSivM" => "main.Foo.count.modify : Swift.Int");
    eq!("_$s4main3FooC5countSivW" => "main.Foo.count.willset : Swift.Int");
    eq!("_$s4main3FooC5countSivw" => "main.Foo.count.didset : Swift.Int");
    eq!("_$s4main9globalVarSdvp" => "main.globalVar : Swift.Double");

    let ent = entity("_$s4main9globalVarSdvp");
    assert_eq!(ent.kind, EntityKind::Variable);
    assert!(ent.path.is_top_level());
}

#[test]
fn materializers_are_refused() {
    err!("_$s4main3FooC5countSivr" => Error::UnsupportedConstruct("materializer accessor"));
}

#[test]
fn static_accessors() {
    let ent = entity("_$s4main3FooC5countSivsZ");
    assert!(ent.is_static());
    eq!("_$s4main3FooC5countSivsZ" => "static main.Foo.count.setter : Swift.Int");
}

#[test]
fn static_method() {
    let ent = entity("_$s4main3FooC4makeSiyFZ");
    assert!(ent.is_static());
    match ent.signature.as_ref().unwrap() {
        SwiftType::UncurriedFunction { inner, .. } => {
            assert!(inner.attrs.contains(FunctionAttrs::STATIC))
        }
        other => panic!("not a method: {other:?}"),
    }
}

#[test]
fn subscripts() {
    let ent = entity("_$s4main9ContainerCSiSicig");
    assert_eq!(ent.kind, EntityKind::Variable);
    match ent.signature.as_ref().unwrap() {
        SwiftType::Property {
            of_type,
            accessor,
            is_subscript,
        } => {
            assert!(is_subscript);
            assert_eq!(*accessor, AccessorKind::Getter);
            assert!(matches!(of_type.as_ref(), SwiftType::Function(_)));
        }
        other => panic!("not a property: {other:?}"),
    }

    eq!("_$s4main9ContainerCSiSicig" =>
        "main.Container.subscript.getter : (Swift.Int) -> Swift.Int");
}

#[test]
fn unsafe_mutable_addressor() {
    let ent = entity("_$s4main6sharedSivau");
    assert_eq!(ent.kind, EntityKind::UnsafeMutableAddressor);
    eq!("_$s4main6sharedSivau" => "unsafe mutable addressor of main.shared");
}

// Private discriminators.

const PRIVATE_GETTER: &str = "_$s4main3FooC33_0123456789abcdef0123456789ABCDEFLL5countSivg";

#[test]
fn private_discriminator() {
    let ent = entity(PRIVATE_GETTER);
    assert!(ent.is_private());
    assert_eq!(
        ent.private_name(),
        Some("_0123456789abcdef0123456789ABCDEF")
    );
    assert_eq!(ent.name.as_ref().unwrap().name, "count");

    let public = entity("_$s4main3FooC5countSivg");
    assert!(!public.is_private());
    assert_eq!(public.private_name(), None);
}

// Generic signatures.

#[test]
fn generic_function() {
    let ent = entity("_$s4main3fooyxAA1PRzlF");
    let args = ent.generic_arguments();
    assert_eq!(args.len(), 1);
    assert_eq!((args[0].depth, args[0].index), (0, 0));

    match args[0].constraints.as_slice() {
        [Constraint::Conforms(proto)] => assert_eq!(proto.to_string(), "main.P"),
        other => panic!("wrong constraints: {other:?}"),
    }

    eq!("_$s4main3fooyxAA1PRzlF" => "main.foo<A where A: main.P>(A) -> ()");
}

#[test]
fn multi_constraint_generics() {
    // zip<T: P, U: Q & R>(T, U), spelled as three clauses.
    let ent = entity("_$s4main3zipyyx_q_tAA1PRzAA1QR_AA1RR_lF");
    let args = ent.generic_arguments();
    assert_eq!(args.len(), 2);

    assert_eq!((args[0].depth, args[0].index), (0, 0));
    assert_eq!(args[0].constraints.len(), 1);

    assert_eq!((args[1].depth, args[1].index), (0, 1));
    match args[1].constraints.as_slice() {
        [Constraint::Conforms(first), Constraint::Conforms(second)] => {
            assert_eq!(first.to_string(), "main.Q");
            assert_eq!(second.to_string(), "main.R");
        }
        other => panic!("wrong constraints: {other:?}"),
    }
}

#[test]
fn distinct_reference_count() {
    // Every distinct (depth, index) reference shows up exactly once, in
    // first-use order, even when referenced repeatedly.
    let ent = entity("_$s4main4echoyxx_q_xtlF");
    let args = ent.generic_arguments();
    assert_eq!(args.len(), 2);
    assert_eq!((args[0].depth, args[0].index), (0, 0));
    assert_eq!((args[1].depth, args[1].index), (0, 1));
}

#[test]
fn associated_type_path() {
    let ent = entity("_$s4main3fooyx4ItemQalF");
    match ent.signature.as_ref().unwrap() {
        SwiftType::Function(func) => match func.params.as_ref() {
            SwiftType::GenericArgReference {
                depth,
                index,
                assoc_path,
            } => {
                assert_eq!((*depth, *index), (0, 0));
                assert_eq!(assoc_path.len(), 1);
                assert_eq!(assoc_path[0].name, "Item");
            }
            other => panic!("not a generic reference: {other:?}"),
        },
        other => panic!("not a plain function: {other:?}"),
    }

    eq!("_$s4main3fooyx4ItemQalF" => "main.foo<A>(A.Item) -> ()");
}

#[test]
fn superclass_constraint() {
    let ent = entity("_$s4main3fooyxAA4BaseCRbzlF");
    match ent.generic_arguments()[0].constraints.as_slice() {
        [Constraint::Superclass(class)] => assert_eq!(class.to_string(), "main.Base"),
        other => panic!("wrong constraints: {other:?}"),
    }
}

#[test]
fn same_type_constraint() {
    let ent = entity("_$s4main3fooyxAA1PRzSiRszlF");
    match ent.generic_arguments()[0].constraints.as_slice() {
        [Constraint::Conforms(_), Constraint::SameType(ty)] => {
            assert_eq!(*ty, SwiftType::BuiltIn(BuiltinKind::Int))
        }
        other => panic!("wrong constraints: {other:?}"),
    }
}

#[test]
fn malformed_signature() {
    err!("_$s4main3fooyxr2F" => Error::MalformedGenericSignature);
}

// Witness tables, metadata and descriptors.

#[test]
fn witness_tables() {
    let ent = entity("_$s4main3FooCAA1PAAWP");
    assert_eq!(ent.kind, EntityKind::WitnessTable(WitnessTableKind::Protocol));
    eq!("_$s4main3FooCAA1PAAWP" => "protocol witness table for main.Foo");

    eq!("_$s4main3FooCWV" => "value witness table for main.Foo");
    eq!("_$s4main3FooCAA1PWa" => "protocol witness table accessor for main.Foo");
}

#[test]
fn field_offset() {
    let ent = entity("_$s4main3FooC1xSivpWvd");
    assert_eq!(ent.kind, EntityKind::FieldOffset);
    eq!("_$s4main3FooC1xSivpWvd" => "field offset for main.Foo.x");

    err!("_$s4main3FooC1xSivpWvi" => Error::UnsupportedConstruct(_));
}

#[test]
fn enum_case() {
    let ent = entity("_$s4main5ColorO3redWC");
    assert_eq!(ent.kind, EntityKind::EnumCase);
    assert_eq!(ent.name.as_ref().unwrap().name, "red");
    eq!("_$s4main5ColorO3redWC" => "enum case for main.Color.red");
}

#[test]
fn metadata_family() {
    eq!("_$s4main3FooCMa" => "type metadata accessor for main.Foo");
    eq!("_$s4main3FooCMm" => "type metadata for main.Foo");
    eq!("_$s4main3FooCMn" => "nominal type descriptor for main.Foo");
    eq!("_$s4main3FooCMo" => "class metadata base offset for main.Foo");
    eq!("_$s4main3FooCMP" => "generic type metadata pattern for main.Foo");
    eq!("_$s4main3FooCML" => "lazy cache variable for main.Foo");
    eq!("_$s4main1PMp" => "protocol descriptor for main.P");
    eq!("_$s4mainMXM" => "module descriptor main");
    eq!("_$s4main3FooCMF" => "reflection metadata field descriptor main.Foo");
    eq!("_$s4main3FooCAA1PAAMc" => "protocol conformance descriptor for main.Foo");
    eq!("_$s4main3FooC1xSivpMV" => "property descriptor for main.Foo.x");

    let ent = entity("_$s4main3FooCMm");
    assert_eq!(ent.kind, EntityKind::DirectMetadata);
}

#[test]
fn protocol_descriptors() {
    eq!("_$s4main1PTL" => "protocol requirements base descriptor for main.P");
    eq!("_$s4main1P4ItemTl" => "associated type descriptor for main.P.Item");
    eq!("_$s4main1PAA4BaseTb" => "base conformance descriptor for main.P");
}

#[test]
fn thunks() {
    let ent = entity("_$s4main3fooyyFTc");
    assert_eq!(ent.kind, EntityKind::Thunk(ThunkKind::Curry));
    eq!("_$s4main3fooyyFTc" => "curry thunk of main.foo");

    eq!("_$s4main3fooyyFTj" => "dispatch thunk of main.foo");
    eq!("_$s4main3fooyyFTW" => "protocol witness for main.foo");

    let ent = entity("_$s4main3FooC3addSiSiFTq");
    assert_eq!(ent.kind, EntityKind::MethodDescriptor);
    eq!("_$s4main3FooC3addSiSiFTq" => "method descriptor for main.Foo.add");
}

#[test]
fn default_argument_initializers() {
    let ent = entity("_$s4main3fooyySiFfA_");
    assert_eq!(ent.kind, EntityKind::DefaultArgumentInitializer(0));
    eq!("_$s4main3fooyySiFfA_" => "default argument 0 of main.foo");

    let ent = entity("_$s4main3fooyySiFfA0_");
    assert_eq!(ent.kind, EntityKind::DefaultArgumentInitializer(1));
}

#[test]
fn variable_initializer() {
    let ent = entity("_$s4main1xSivpfi");
    assert_eq!(ent.kind, EntityKind::VariableInitializer);
    eq!("_$s4main1xSivpfi" => "variable initialization expression of main.x");
}

// Names: operators, punycode, builtin table.

#[test]
fn operator_names() {
    let ent = entity("_$s4main1poiySiSi_SitF");
    let name = ent.name.as_ref().unwrap();
    assert_eq!(name.name, "+");
    assert_eq!(name.fixity, Some(OperatorFixity::Infix));

    eq!("_$s4main1poiySiSi_SitF" => "main.+(Swift.Int, Swift.Int) -> Swift.Int");

    // '<=' spells as 'le', prefix '!' as 'n'.
    let ent = entity("_$s4main2leoiySbSi_SitF");
    assert_eq!(ent.name.as_ref().unwrap().name, "<=");

    let ent = entity("_$s4main1nopySbSbF");
    let name = ent.name.as_ref().unwrap();
    assert_eq!(name.name, "!");
    assert_eq!(name.fixity, Some(OperatorFixity::Prefix));
}

#[test]
fn punycode_identifiers() {
    let ent = entity("_$s4main008sren_graSivp");
    assert_eq!(ent.name.as_ref().unwrap().name, "søren");
    eq!("_$s4main008sren_graSivp" => "main.søren : Swift.Int");
}

#[test]
fn builtin_table_is_a_bijection() {
    // Total over the finite code set, in both directions.
    let mut seen = std::collections::BTreeSet::new();
    for (&code, &kind) in BUILTIN_TYPES.iter() {
        assert_eq!(code.len(), 2, "'{code}' is not a two-letter code");
        assert!(seen.insert(format!("{kind:?}")), "{kind:?} mapped twice");

        // Every code decodes to exactly its table entry.
        let mangled = format!("_$s4main1x{code}vp");
        let ent = decompose(&mangled).unwrap();
        match ent.signature.as_ref().unwrap() {
            SwiftType::Property { of_type, .. } => {
                assert_eq!(**of_type, SwiftType::BuiltIn(kind), "via {code}")
            }
            other => panic!("not a property: {other:?}"),
        }
    }
}

#[test]
fn shared_module_prefix() {
    let symbols = [
        "_$s3foo6lonelyyyF",
        "_$s3foo6nonameSiyF",
        "_$s3foo6nonameyySaySiGF",
        "_$s3foo1xSbvp",
    ];

    for mangled in symbols {
        assert_eq!(entity(mangled).module().name, "foo", "in {mangled}");
    }
}

// Failure paths: always a typed error, never a partial entity.

#[test]
fn unknown_type_codes() {
    err!("_$s4main3fooyS8F" => Error::UnknownTypeCode(b'8'));
    err!("_$s4main3fooyBQF" => Error::UnknownTypeCode(b'Q'));
}

#[test]
fn substitution_out_of_range() {
    err!("_$s4main3fooyAZF" => Error::SubstitutionIndexOutOfRange(25));
    err!("_$s4main3fooyA3CF" => Error::SubstitutionIndexOutOfRange(80));
}

#[test]
fn truncation() {
    err!("_$s" => Error::TruncatedInput);
    err!("_$s34main" => Error::TruncatedInput);
    err!("_$s4main3fooySaySiG" => Error::TruncatedInput);
}

#[test]
fn trailing_text() {
    err!("_$s4main3fooyyF3ext" => Error::UnexpectedText);
}

#[test]
fn unsupported_stays_unsupported() {
    // Word-substituted identifiers.
    err!("_$s4main0A3FooyyF" => Error::UnsupportedConstruct(_));
    // Unknown entity suffix families stay errors rather than guesses.
    err!("_$s4main3fooyyFTx" => Error::UnsupportedConstruct(_));
}

#[test]
fn lenient_entry_point() {
    assert_eq!(
        demangle("_$s3foo6lonelyyyF").as_deref(),
        Some("foo.lonely() -> ()")
    );
    assert_eq!(
        demangle("_$s3foo6lonelyyyF$got").as_deref(),
        Some("foo.lonely() -> ()")
    );
    assert_eq!(demangle("not a symbol"), None);
    // Decode failures are skips, not aborts.
    assert_eq!(demangle("_$s4main3fooyS8F"), None);
}

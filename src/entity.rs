//! Terminal-suffix dispatch.
//!
//! Once a declaration body has been decoded, a short suffix picks which
//! entity the symbol describes and which of the stacked nodes belong to it:
//!
//! ```text
//! 'F'              function                'fc' / 'fC'   ctor (+allocating)
//! 'fd' / 'fD'      dtor (+deallocating)    'fA' INDEX    default-arg init
//! 'fi'             variable initializer
//! 'vg' 'vs' 'vW' 'vw' 'vM'                 get/set/willSet/didSet/modify
//! 'vr'             materializer, refused   'vp'          the variable itself
//! 'vau'            unsafe mutable addressor
//! 'i' ACCESSOR     subscript accessors     trailing 'Z'  static
//! 'WP' 'WV' 'Wa'   witness tables          'Wvd'         field offset
//! 'WC'             enum case constructor
//! 'Ma' 'Mm' 'Mn' 'Mp' 'Mo' 'Mc' 'MP'       metadata family
//! 'MF' 'MB' 'MA'   reflection descriptors  'ML'          lazy cache variable
//! 'MXM'            module descriptor       'MV'          property descriptor
//! 'Tc' 'Tj' 'TW'   thunks                  'Tq'          method descriptor
//! 'Tl' 'TL' 'Tb'   protocol descriptors
//! ```
//!
//! Suffixes that are plausible but not in the table fail with
//! [`UnsupportedConstruct`](Error::UnsupportedConstruct) instead of guessing.

use crate::ast::{
    AccessorKind, DecomposedEntity, EntityFlags, EntityKind, FunctionAttrs, FunctionType,
    Identifier, InitializerKind, NestingPath, PathKind, ReflectionKind, SwiftType, ThunkKind,
    WitnessTableKind,
};
use crate::demangle::{Demangler, Node};
use crate::error::{Error, Result};
use crate::generics;

/// `F`: a free function or method.
pub(crate) fn plain_function(d: &mut Demangler) -> Result<()> {
    let requirements = d.pop_generic_signature()?;

    let mut attrs = FunctionAttrs::empty();
    if d.pop_throws() {
        attrs |= FunctionAttrs::THROWS;
    }

    let params = d.pop_type()?;
    let return_type = d.pop_type()?;
    let params = attach_labels(d, params)?;

    let name = d.pop_decl_name()?;
    let (path, self_ty, extension_on) = d.pop_context()?;

    let generic_args = generics::resolve(&params, &return_type, requirements)?;
    let func = FunctionType {
        params: Box::new(params),
        return_type: Box::new(return_type),
        attrs,
        generic_args,
        extension_on: extension_on.map(Box::new),
    };

    let signature = match self_ty {
        Some(self_param) => SwiftType::UncurriedFunction {
            self_param: Box::new(self_param),
            inner: func,
        },
        None => SwiftType::Function(func),
    };

    d.push(Node::Entity(DecomposedEntity {
        path,
        name: Some(name),
        kind: EntityKind::Function,
        signature: Some(signature),
        flags: EntityFlags::empty(),
    }))
}

/// Pop a function's argument-label section.
///
/// The section is `y` (every parameter unlabeled), absent (no parameters at
/// all), or, for tuple-shaped parameters, one node per parameter: an
/// identifier, or `_` for an unlabeled slot.
fn attach_labels(d: &mut Demangler, params: SwiftType) -> Result<SwiftType> {
    if let Some(Node::EmptyList) = d.top() {
        d.pop()?;
        return Ok(params);
    }

    let mut elements = match params {
        SwiftType::Tuple(elements) => elements,
        other => return Ok(other),
    };

    if elements.is_empty() {
        return Ok(SwiftType::Tuple(elements));
    }

    let mut labels = Vec::with_capacity(elements.len());
    for _ in 0..elements.len() {
        match d.top() {
            Some(Node::Ident(_)) => labels.push(Some(d.pop_ident()?)),
            Some(Node::FirstElem) => {
                d.pop()?;
                labels.push(None);
            }
            _ => return Err(Error::TruncatedInput),
        }
    }
    labels.reverse();

    for (element, label) in elements.iter_mut().zip(labels) {
        if label.is_some() {
            element.label = label;
        }
    }

    Ok(SwiftType::Tuple(elements))
}

/// `f`: constructors, destructors and initializer expressions.
pub(crate) fn function_family(d: &mut Demangler) -> Result<()> {
    match d.ctx.take()? {
        c @ (b'c' | b'C') => constructor(d, c == b'C'),
        c @ (b'd' | b'D') => destructor(d, c == b'D'),
        b'A' => {
            let index = d.ctx.index()?;
            let inner = pop_entity(d)?;
            let of = inner.signature.clone().unwrap_or(SwiftType::empty_tuple());
            d.push(Node::Entity(DecomposedEntity {
                kind: EntityKind::DefaultArgumentInitializer(index),
                signature: Some(SwiftType::Initializer {
                    of: Box::new(of),
                    kind: InitializerKind::DefaultArgument(index),
                }),
                ..inner
            }))
        }
        b'i' => {
            let inner = pop_entity(d)?;
            let of = inner.signature.clone().unwrap_or(SwiftType::empty_tuple());
            d.push(Node::Entity(DecomposedEntity {
                kind: EntityKind::VariableInitializer,
                signature: Some(SwiftType::Initializer {
                    of: Box::new(of),
                    kind: InitializerKind::Variable,
                }),
                ..inner
            }))
        }
        _ => Err(Error::UnsupportedConstruct("function suffix")),
    }
}

fn constructor(d: &mut Demangler, allocating: bool) -> Result<()> {
    let requirements = d.pop_generic_signature()?;

    let func = match d.pop_type()? {
        SwiftType::Function(func) => func,
        _ => return Err(Error::TruncatedInput),
    };

    let (path, _, _) = d.pop_context()?;

    // Validation only. The constructor signature has no slot for generics,
    // the few that carry them keep the parameter references in their types.
    generics::resolve(&func.params, &func.return_type, requirements)?;

    let failable = is_optional(&func.return_type);
    d.push(Node::Entity(DecomposedEntity {
        path,
        name: None,
        kind: EntityKind::Constructor,
        signature: Some(SwiftType::Constructor {
            params: func.params,
            return_type: func.return_type,
            failable,
            allocating,
        }),
        flags: EntityFlags::empty(),
    }))
}

fn destructor(d: &mut Demangler, deallocating: bool) -> Result<()> {
    let (path, _, _) = d.pop_context()?;

    d.push(Node::Entity(DecomposedEntity {
        path,
        name: None,
        kind: EntityKind::Destructor,
        signature: Some(SwiftType::Destructor { deallocating }),
        flags: EntityFlags::empty(),
    }))
}

fn is_optional(ty: &SwiftType) -> bool {
    match ty {
        SwiftType::BoundGeneric { base, .. } => match base.as_ref() {
            SwiftType::Nominal { path, .. } => {
                path.module.name == "Swift"
                    && path.leaf().is_some_and(|leaf| leaf.name == "Optional")
            }
            _ => false,
        },
        _ => false,
    }
}

/// `v`: property accessors, stored variables and addressors.
pub(crate) fn variable_family(d: &mut Demangler) -> Result<()> {
    let accessor = match d.ctx.take()? {
        b'g' => AccessorKind::Getter,
        b's' => AccessorKind::Setter,
        b'W' => AccessorKind::WillSet,
        b'w' => AccessorKind::DidSet,
        b'M' => AccessorKind::ModifyAccessor,
        b'p' => AccessorKind::Storage,
        // No toolchain we can validate against emits this encoding, so it
        // stays explicitly unimplemented.
        b'r' => return Err(Error::UnsupportedConstruct("materializer accessor")),
        b'a' => {
            if d.ctx.take()? != b'u' {
                return Err(Error::UnsupportedConstruct("addressor kind"));
            }
            return property(d, AccessorKind::Storage, EntityKind::UnsafeMutableAddressor);
        }
        _ => return Err(Error::UnsupportedConstruct("property accessor")),
    };

    property(d, accessor, EntityKind::Variable)
}

fn property(d: &mut Demangler, accessor: AccessorKind, kind: EntityKind) -> Result<()> {
    let of_type = d.pop_type()?;
    let name = d.pop_decl_name()?;
    let (path, _, _) = d.pop_context()?;

    d.push(Node::Entity(DecomposedEntity {
        path,
        name: Some(name),
        kind,
        signature: Some(SwiftType::Property {
            of_type: Box::new(of_type),
            accessor,
            is_subscript: false,
        }),
        flags: EntityFlags::empty(),
    }))
}

/// `i`: subscript accessors. Same accessor letters as properties, but the
/// preceding signature is a function from index to element and there is no
/// declaration name.
pub(crate) fn subscript_family(d: &mut Demangler) -> Result<()> {
    let accessor = match d.ctx.take()? {
        b'g' => AccessorKind::Getter,
        b's' => AccessorKind::Setter,
        b'M' => AccessorKind::ModifyAccessor,
        b'p' => AccessorKind::Storage,
        b'r' => return Err(Error::UnsupportedConstruct("materializer accessor")),
        _ => return Err(Error::UnsupportedConstruct("subscript accessor")),
    };

    let requirements = d.pop_generic_signature()?;
    let mut func = match d.pop_type()? {
        SwiftType::Function(func) => func,
        _ => return Err(Error::TruncatedInput),
    };

    func.params = Box::new(attach_labels(d, *func.params)?);
    func.generic_args = generics::resolve(&func.params, &func.return_type, requirements)?;

    let (path, _, _) = d.pop_context()?;

    d.push(Node::Entity(DecomposedEntity {
        path,
        name: None,
        kind: EntityKind::Variable,
        signature: Some(SwiftType::Property {
            of_type: Box::new(SwiftType::Function(func)),
            accessor,
            is_subscript: true,
        }),
        flags: EntityFlags::empty(),
    }))
}

/// `W`: witness tables, field offsets and enum cases.
pub(crate) fn witness_family(d: &mut Demangler) -> Result<()> {
    match d.ctx.take()? {
        b'P' => {
            // An optional trailing identifier names the module the
            // conformance was defined in.
            let conformance_module = match d.top() {
                Some(Node::Ident(_)) => Some(d.pop_ident()?),
                _ => None,
            };
            let _protocol = d.pop_protocol()?;
            let subject = d.pop_type()?;

            let mut path = path_of(&subject)?;
            if let Some(module) = conformance_module {
                path.module = module;
            }

            witness(d, path, WitnessTableKind::Protocol, subject)
        }
        b'V' => {
            let subject = d.pop_type()?;
            witness(d, path_of(&subject)?, WitnessTableKind::Value, subject)
        }
        b'a' => {
            let _protocol = d.pop_protocol()?;
            let subject = d.pop_type()?;
            witness(
                d,
                path_of(&subject)?,
                WitnessTableKind::ProtocolAccessor,
                subject,
            )
        }
        b'v' => match d.ctx.take()? {
            b'd' => {
                let inner = pop_entity(d)?;
                if inner.kind != EntityKind::Variable {
                    return Err(Error::TruncatedInput);
                }
                d.push(Node::Entity(DecomposedEntity {
                    kind: EntityKind::FieldOffset,
                    ..inner
                }))
            }
            _ => Err(Error::UnsupportedConstruct("indirect field offset")),
        },
        b'C' => {
            let name = d.pop_decl_name()?;
            let (path, self_ty, _) = d.pop_context()?;
            d.push(Node::Entity(DecomposedEntity {
                path,
                name: Some(name),
                kind: EntityKind::EnumCase,
                signature: self_ty,
                flags: EntityFlags::empty(),
            }))
        }
        _ => Err(Error::UnsupportedConstruct("witness table")),
    }
}

fn witness(
    d: &mut Demangler,
    path: NestingPath,
    kind: WitnessTableKind,
    subject: SwiftType,
) -> Result<()> {
    d.push(Node::Entity(DecomposedEntity {
        path,
        name: None,
        kind: EntityKind::WitnessTable(kind),
        signature: Some(SwiftType::WitnessTable {
            kind,
            subject: Box::new(subject),
        }),
        flags: EntityFlags::empty(),
    }))
}

/// `M`: the metadata and descriptor family.
pub(crate) fn metadata_family(d: &mut Demangler) -> Result<()> {
    let kind = match d.ctx.take()? {
        b'a' => EntityKind::MetaclassAccessor,
        b'm' => EntityKind::DirectMetadata,
        b'n' => EntityKind::NominalTypeDescriptor,
        b'o' => EntityKind::MetadataBaseOffset,
        b'P' => EntityKind::GenericMetadataPattern,
        b'L' => EntityKind::LazyCacheVariable,
        b'F' => EntityKind::ReflectionMetadataDescriptor(ReflectionKind::Field),
        b'B' => EntityKind::ReflectionMetadataDescriptor(ReflectionKind::Builtin),
        b'A' => EntityKind::ReflectionMetadataDescriptor(ReflectionKind::AssocType),
        b'p' => {
            let subject = d.pop_protocol()?;
            return descriptor(d, EntityKind::ProtocolTypeDescriptor, subject);
        }
        b'c' => {
            let conformance_module = match d.top() {
                Some(Node::Ident(_)) => Some(d.pop_ident()?),
                _ => None,
            };
            let _protocol = d.pop_protocol()?;
            let subject = d.pop_type()?;

            let mut path = path_of(&subject)?;
            if let Some(module) = conformance_module {
                path.module = module;
            }

            return d.push(Node::Entity(DecomposedEntity {
                path,
                name: None,
                kind: EntityKind::ProtocolConformanceDescriptor,
                signature: Some(subject),
                flags: EntityFlags::empty(),
            }));
        }
        b'V' => {
            let inner = pop_entity(d)?;
            if inner.kind != EntityKind::Variable {
                return Err(Error::TruncatedInput);
            }
            return d.push(Node::Entity(DecomposedEntity {
                kind: EntityKind::PropertyDescriptor,
                ..inner
            }));
        }
        b'X' => {
            if d.ctx.take()? != b'M' {
                return Err(Error::UnsupportedConstruct("context descriptor"));
            }
            let module = d.pop_ident()?;
            return d.push(Node::Entity(DecomposedEntity {
                path: NestingPath::top_level(module),
                name: None,
                kind: EntityKind::ModuleDescriptor,
                signature: None,
                flags: EntityFlags::empty(),
            }));
        }
        _ => return Err(Error::UnsupportedConstruct("metadata descriptor")),
    };

    let subject = d.pop_type()?;
    descriptor(d, kind, subject)
}

fn descriptor(d: &mut Demangler, kind: EntityKind, subject: SwiftType) -> Result<()> {
    d.push(Node::Entity(DecomposedEntity {
        path: path_of(&subject)?,
        name: None,
        kind,
        signature: Some(subject),
        flags: EntityFlags::empty(),
    }))
}

/// `T`: thunks and the global descriptor family.
pub(crate) fn global_family(d: &mut Demangler) -> Result<()> {
    let thunk = match d.ctx.take()? {
        b'c' => ThunkKind::Curry,
        b'j' => ThunkKind::Dispatch,
        b'W' => ThunkKind::ProtocolWitness,
        b'q' => {
            let inner = pop_entity(d)?;
            return d.push(Node::Entity(DecomposedEntity {
                kind: EntityKind::MethodDescriptor,
                ..inner
            }));
        }
        b'l' => {
            let name = d.pop_ident()?;
            let proto = d.pop_protocol()?;
            return d.push(Node::Entity(DecomposedEntity {
                path: path_of(&proto)?,
                name: Some(name),
                kind: EntityKind::AssociatedTypeDescriptor,
                signature: Some(proto),
                flags: EntityFlags::empty(),
            }));
        }
        b'L' => {
            let proto = d.pop_protocol()?;
            return descriptor(d, EntityKind::ProtocolRequirementsBaseDescriptor, proto);
        }
        b'b' => {
            let base = d.pop_protocol()?;
            let proto = d.pop_protocol()?;
            return d.push(Node::Entity(DecomposedEntity {
                path: path_of(&proto)?,
                name: None,
                kind: EntityKind::BaseConformanceDescriptor,
                signature: Some(base),
                flags: EntityFlags::empty(),
            }));
        }
        _ => return Err(Error::UnsupportedConstruct("thunk")),
    };

    let inner = pop_entity(d)?;
    d.push(Node::Entity(DecomposedEntity {
        kind: EntityKind::Thunk(thunk),
        ..inner
    }))
}

/// Trailing `Z`.
pub(crate) fn mark_static(d: &mut Demangler) -> Result<()> {
    let mut entity = pop_entity(d)?;
    entity.flags |= EntityFlags::STATIC;

    match &mut entity.signature {
        Some(SwiftType::Function(func))
        | Some(SwiftType::UncurriedFunction { inner: func, .. }) => {
            func.attrs |= FunctionAttrs::STATIC;
        }
        _ => {}
    }

    d.push(Node::Entity(entity))
}

fn pop_entity(d: &mut Demangler) -> Result<DecomposedEntity> {
    match d.pop()? {
        Node::Entity(entity) => Ok(entity),
        _ => Err(Error::TruncatedInput),
    }
}

/// The nesting path a type anchors its metadata entities at.
fn path_of(ty: &SwiftType) -> Result<NestingPath> {
    match ty {
        SwiftType::Nominal { path, .. } => Ok(path.clone()),
        SwiftType::BoundGeneric { base, .. } => path_of(base),
        SwiftType::ProtocolList(protocols) => match protocols.first() {
            Some(first) => path_of(first),
            None => Err(Error::TruncatedInput),
        },
        SwiftType::BuiltIn(kind) => {
            let (module, leaf) = kind.name().split_once('.').unwrap_or(("Swift", kind.name()));
            Ok(NestingPath::top_level(Identifier::new(module))
                .child(PathKind::Struct, Identifier::new(leaf)))
        }
        _ => Err(Error::UnsupportedConstruct("structural metadata subject")),
    }
}

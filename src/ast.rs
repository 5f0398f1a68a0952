//! The decoded representation of a mangled Swift symbol.
//!
//! Everything in here is a closed set of variants: the decoder builds these
//! exactly once per symbol and nothing mutates them afterwards. Consumers
//! dispatch with exhaustive matches rather than downcasts, so a new variant
//! is a compile error everywhere it matters.

use bitflags::bitflags;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use std::fmt;

/// Fixity of a user-defined operator declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorFixity {
    Infix,
    Prefix,
    Postfix,
}

/// A single name inside a symbol.
///
/// Non-ASCII names and operator glyphs arrive punycode-encoded and are stored
/// here fully decoded. Private declarations carry the per-file discriminator
/// the compiler appended to keep same-named declarations apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub discriminator: Option<String>,
    pub fixity: Option<OperatorFixity>,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier {
            name: name.into(),
            discriminator: None,
            fixity: None,
        }
    }

    /// Whether this came from a `private` declaration.
    pub fn is_private(&self) -> bool {
        self.discriminator.is_some()
    }

    pub fn is_operator(&self) -> bool {
        self.fixity.is_some()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// What kind of declaration a [`NestingPath`] component refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Class,
    Struct,
    Enum,
    Protocol,
    Extension,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathComponent {
    pub kind: PathKind,
    pub name: Identifier,
}

/// Where a declaration lives: its module plus the enclosing nominal types
/// from outermost to innermost. Top-level declarations have no components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingPath {
    pub module: Identifier,
    pub components: Vec<PathComponent>,
}

impl NestingPath {
    pub fn top_level(module: Identifier) -> Self {
        NestingPath {
            module,
            components: Vec::new(),
        }
    }

    pub fn child(mut self, kind: PathKind, name: Identifier) -> Self {
        self.components.push(PathComponent { kind, name });
        self
    }

    /// The innermost name, if any nesting exists.
    pub fn leaf(&self) -> Option<&Identifier> {
        self.components.last().map(|c| &c.name)
    }

    pub fn is_top_level(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for NestingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module.name)?;
        for component in &self.components {
            f.write_fmt(format_args!(".{}", component.name))?;
        }
        Ok(())
    }
}

/// The fixed set of primitive types with dedicated two-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Int,
    UInt,
    Bool,
    Float,
    Double,
    String,
    Character,
    RawPointer,
    OpaquePointer,
    NativeObject,
    Word,
}

impl BuiltinKind {
    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::Int => "Swift.Int",
            BuiltinKind::UInt => "Swift.UInt",
            BuiltinKind::Bool => "Swift.Bool",
            BuiltinKind::Float => "Swift.Float",
            BuiltinKind::Double => "Swift.Double",
            BuiltinKind::String => "Swift.String",
            BuiltinKind::Character => "Swift.Character",
            BuiltinKind::RawPointer => "Swift.UnsafeRawPointer",
            BuiltinKind::OpaquePointer => "Swift.OpaquePointer",
            BuiltinKind::NativeObject => "Builtin.NativeObject",
            BuiltinKind::Word => "Builtin.Word",
        }
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every supported built-in code. The decoder and the tests both walk this
/// table, so codes and kinds can't drift apart.
pub static BUILTIN_TYPES: Lazy<FxHashMap<&'static str, BuiltinKind>> = Lazy::new(|| {
    let mut table = FxHashMap::default();
    table.insert("Si", BuiltinKind::Int);
    table.insert("Su", BuiltinKind::UInt);
    table.insert("Sb", BuiltinKind::Bool);
    table.insert("Sf", BuiltinKind::Float);
    table.insert("Sd", BuiltinKind::Double);
    table.insert("SS", BuiltinKind::String);
    table.insert("SJ", BuiltinKind::Character);
    table.insert("SV", BuiltinKind::RawPointer);
    table.insert("Sc", BuiltinKind::OpaquePointer);
    table.insert("Bo", BuiltinKind::NativeObject);
    table.insert("Bw", BuiltinKind::Word);
    table
});

/// Stdlib nominals with shorthand codes, keyed by the letter after `S`.
///
/// The container types are surfaced with reference semantics, which is how
/// the binding layers downstream of the decomposer model them.
pub(crate) static KNOWN_TYPES: Lazy<FxHashMap<u8, (&'static str, NominalKind)>> =
    Lazy::new(|| {
        let mut table = FxHashMap::default();
        table.insert(b'a', ("Array", NominalKind::Class));
        table.insert(b'D', ("Dictionary", NominalKind::Class));
        table.insert(b'h', ("Set", NominalKind::Class));
        table.insert(b'q', ("Optional", NominalKind::Enum));
        table.insert(b's', ("Substring", NominalKind::Struct));
        table.insert(b'n', ("Range", NominalKind::Struct));
        table.insert(b'N', ("ClosedRange", NominalKind::Struct));
        table.insert(b'P', ("UnsafePointer", NominalKind::Struct));
        table.insert(b'p', ("UnsafeMutablePointer", NominalKind::Struct));
        table
    });

/// Operator glyphs and the letters they mangle to.
pub(crate) static OPERATOR_GLYPHS: Lazy<FxHashMap<u8, char>> = Lazy::new(|| {
    let mut table = FxHashMap::default();
    table.insert(b'a', '&');
    table.insert(b'c', '@');
    table.insert(b'd', '/');
    table.insert(b'e', '=');
    table.insert(b'g', '>');
    table.insert(b'l', '<');
    table.insert(b'm', '*');
    table.insert(b'n', '!');
    table.insert(b'o', '|');
    table.insert(b'p', '+');
    table.insert(b'q', '?');
    table.insert(b'r', '%');
    table.insert(b's', '-');
    table.insert(b't', '~');
    table.insert(b'x', '^');
    table.insert(b'z', '.');
    table
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NominalKind {
    Class,
    Struct,
    Enum,
    Protocol,
}

impl NominalKind {
    pub(crate) fn path_kind(self) -> PathKind {
        match self {
            NominalKind::Class => PathKind::Class,
            NominalKind::Struct => PathKind::Struct,
            NominalKind::Enum => PathKind::Enum,
            NominalKind::Protocol => PathKind::Protocol,
        }
    }
}

bitflags! {
    /// Attributes a function signature may carry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FunctionAttrs: u8 {
        const THROWS = 1;
        const ESCAPING = 1 << 1;
        const STATIC = 1 << 2;
    }
}

/// A function signature: parameter aggregate, return type and attributes.
///
/// Methods additionally wrap this in [`SwiftType::UncurriedFunction`] so the
/// `self` parameter keeps its class/struct/enum-ness.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub params: Box<SwiftType>,
    pub return_type: Box<SwiftType>,
    pub attrs: FunctionAttrs,
    pub generic_args: Vec<GenericArgument>,
    pub extension_on: Option<Box<SwiftType>>,
}

impl FunctionType {
    pub fn can_throw(&self) -> bool {
        self.attrs.contains(FunctionAttrs::THROWS)
    }

    pub fn is_escaping(&self) -> bool {
        self.attrs.contains(FunctionAttrs::ESCAPING)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleElement {
    pub label: Option<Identifier>,
    pub ty: SwiftType,
    pub variadic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WitnessTableKind {
    Protocol,
    Value,
    ProtocolAccessor,
}

/// Property accessor kinds, as encoded in the `v` suffix family.
///
/// `Materializer` is part of the model but the decoder refuses to build it:
/// no toolchain we can verify against emits the encoding, so it stays an
/// explicit [`UnsupportedConstruct`](crate::Error::UnsupportedConstruct).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    Setter,
    WillSet,
    DidSet,
    ModifyAccessor,
    Materializer,
    /// The stored variable itself rather than any of its accessors.
    Storage,
}

impl AccessorKind {
    pub(crate) fn describe(self) -> &'static str {
        match self {
            AccessorKind::Getter => "getter",
            AccessorKind::Setter => "setter",
            AccessorKind::WillSet => "willset",
            AccessorKind::DidSet => "didset",
            AccessorKind::ModifyAccessor => "modify",
            AccessorKind::Materializer => "materializer",
            AccessorKind::Storage => "storage",
        }
    }
}

/// What a variable initializer initializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerKind {
    Variable,
    DefaultArgument(usize),
}

/// A decoded Swift type.
///
/// Ownership is a plain tree: variants box their children and the grammar
/// cannot express a cycle within one symbol, so no arena is needed.
#[derive(Debug, Clone, PartialEq)]
pub enum SwiftType {
    BuiltIn(BuiltinKind),

    Nominal {
        path: NestingPath,
        kind: NominalKind,
        is_reference: bool,
    },

    Tuple(Vec<TupleElement>),

    /// A nominal with its generic arguments bound, `Array<Int>`.
    BoundGeneric {
        base: Box<SwiftType>,
        args: Vec<SwiftType>,
        is_variadic: bool,
    },

    Function(FunctionType),

    /// An instance method: the uncurried `self` plus the plain signature.
    UncurriedFunction {
        self_param: Box<SwiftType>,
        inner: FunctionType,
    },

    Constructor {
        params: Box<SwiftType>,
        return_type: Box<SwiftType>,
        failable: bool,
        allocating: bool,
    },

    Destructor {
        deallocating: bool,
    },

    /// The signature of a property or subscript entity.
    Property {
        of_type: Box<SwiftType>,
        accessor: AccessorKind,
        is_subscript: bool,
    },

    WitnessTable {
        kind: WitnessTableKind,
        subject: Box<SwiftType>,
    },

    MetaClass(Box<SwiftType>),

    /// `(P & Q).Type`.
    ExistentialMetaType(Vec<SwiftType>),

    /// An existential formed from one or more protocols.
    ProtocolList(Vec<SwiftType>),

    /// A reference to a generic parameter, optionally projected through a
    /// chain of associated types.
    GenericArgReference {
        depth: usize,
        index: usize,
        assoc_path: Vec<Identifier>,
    },

    CFunctionPointer {
        params: Box<SwiftType>,
        return_type: Box<SwiftType>,
    },

    /// The signature of a stored-variable or default-argument initializer.
    Initializer {
        of: Box<SwiftType>,
        kind: InitializerKind,
    },

    InOut(Box<SwiftType>),
}

impl SwiftType {
    pub fn empty_tuple() -> Self {
        SwiftType::Tuple(Vec::new())
    }

    /// Whether this is the empty tuple, Swift's `Void`.
    pub fn is_void(&self) -> bool {
        matches!(self, SwiftType::Tuple(elements) if elements.is_empty())
    }

    pub(crate) fn is_protocol(&self) -> bool {
        matches!(
            self,
            SwiftType::Nominal {
                kind: NominalKind::Protocol,
                ..
            }
        )
    }
}

/// One constraint attached to a generic parameter, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Conformance to a protocol or protocol composition.
    Conforms(SwiftType),
    /// A class upper bound.
    Superclass(SwiftType),
    /// An associated-type equality, recorded but never solved.
    SameType(SwiftType),
}

/// A generic parameter together with everything constraining it.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericArgument {
    pub depth: usize,
    pub index: usize,
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThunkKind {
    Curry,
    Dispatch,
    ProtocolWitness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionKind {
    Field,
    Builtin,
    AssocType,
}

/// The terminal classification of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Function,
    Variable,
    Constructor,
    Destructor,
    EnumCase,
    FieldOffset,
    UnsafeMutableAddressor,
    DirectMetadata,
    MetaclassAccessor,
    GenericMetadataPattern,
    NominalTypeDescriptor,
    ProtocolTypeDescriptor,
    ProtocolConformanceDescriptor,
    ProtocolRequirementsBaseDescriptor,
    BaseConformanceDescriptor,
    AssociatedTypeDescriptor,
    MethodDescriptor,
    ModuleDescriptor,
    PropertyDescriptor,
    ReflectionMetadataDescriptor(ReflectionKind),
    MetadataBaseOffset,
    LazyCacheVariable,
    WitnessTable(WitnessTableKind),
    Thunk(ThunkKind),
    DefaultArgumentInitializer(usize),
    VariableInitializer,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntityFlags: u8 {
        const STATIC = 1;
    }
}

/// The fully decoded description of one mangled symbol.
///
/// Built exactly once per decode call and immutable afterwards; the caller
/// owns the whole tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DecomposedEntity {
    /// Module plus enclosing-type nesting.
    pub path: NestingPath,
    /// The declaration's own name, where the kind has one.
    pub name: Option<Identifier>,
    pub kind: EntityKind,
    /// The decoded signature, where the kind carries one.
    pub signature: Option<SwiftType>,
    pub flags: EntityFlags,
}

impl DecomposedEntity {
    pub fn module(&self) -> &Identifier {
        &self.path.module
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(EntityFlags::STATIC)
    }

    pub fn is_private(&self) -> bool {
        self.name.as_ref().is_some_and(Identifier::is_private)
    }

    /// The discriminator token of a private declaration.
    pub fn private_name(&self) -> Option<&str> {
        self.name.as_ref()?.discriminator.as_deref()
    }

    /// The generic arguments of the signature, if it has any.
    pub fn generic_arguments(&self) -> &[GenericArgument] {
        match &self.signature {
            Some(SwiftType::Function(func))
            | Some(SwiftType::UncurriedFunction { inner: func, .. }) => &func.generic_args,
            _ => &[],
        }
    }
}

fn generic_param_name(depth: usize, index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    if depth == 0 {
        letter.to_string()
    } else {
        format!("{letter}{depth}")
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &SwiftType) -> fmt::Result {
    match params {
        SwiftType::Tuple(_) => fmt::Display::fmt(params, f),
        other => f.write_fmt(format_args!("({other})")),
    }
}

fn write_function(f: &mut fmt::Formatter<'_>, func: &FunctionType) -> fmt::Result {
    write_params(f, &func.params)?;
    if func.can_throw() {
        f.write_str(" throws")?;
    }
    f.write_fmt(format_args!(" -> {}", func.return_type))
}

fn write_generic_args(f: &mut fmt::Formatter<'_>, args: &[GenericArgument]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }

    f.write_str("<")?;
    for (idx, arg) in args.iter().enumerate() {
        if idx != 0 {
            f.write_str(", ")?;
        }
        f.write_str(&generic_param_name(arg.depth, arg.index))?;
    }

    let mut clause_prefix = " where ";
    for arg in args {
        let name = generic_param_name(arg.depth, arg.index);
        for constraint in &arg.constraints {
            f.write_str(clause_prefix)?;
            clause_prefix = ", ";
            match constraint {
                Constraint::Conforms(proto) => {
                    f.write_fmt(format_args!("{name}: {proto}"))?
                }
                Constraint::Superclass(class) => {
                    f.write_fmt(format_args!("{name}: {class}"))?
                }
                Constraint::SameType(ty) => f.write_fmt(format_args!("{name} == {ty}"))?,
            }
        }
    }

    f.write_str(">")
}

impl fmt::Display for SwiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwiftType::BuiltIn(kind) => kind.fmt(f),
            SwiftType::Nominal { path, .. } => path.fmt(f),
            SwiftType::Tuple(elements) => {
                f.write_str("(")?;
                for (idx, element) in elements.iter().enumerate() {
                    if idx != 0 {
                        f.write_str(", ")?;
                    }
                    if let Some(label) = &element.label {
                        f.write_fmt(format_args!("{label}: "))?;
                    }
                    element.ty.fmt(f)?;
                    if element.variadic {
                        f.write_str("...")?;
                    }
                }
                f.write_str(")")
            }
            SwiftType::BoundGeneric {
                base,
                args,
                is_variadic,
            } => {
                base.fmt(f)?;
                f.write_str("<")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx != 0 {
                        f.write_str(", ")?;
                    }
                    arg.fmt(f)?;
                }
                f.write_str(">")?;
                if *is_variadic {
                    f.write_str("...")?;
                }
                Ok(())
            }
            SwiftType::Function(func) => {
                if func.is_escaping() {
                    f.write_str("@escaping ")?;
                }
                write_function(f, func)
            }
            SwiftType::UncurriedFunction { self_param, inner } => {
                f.write_fmt(format_args!("({self_param}) -> "))?;
                write_function(f, inner)
            }
            SwiftType::Constructor {
                params,
                return_type,
                failable,
                ..
            } => {
                f.write_str(if *failable { "init?" } else { "init" })?;
                write_params(f, params)?;
                f.write_fmt(format_args!(" -> {return_type}"))
            }
            SwiftType::Destructor { .. } => f.write_str("deinit"),
            SwiftType::Property {
                of_type,
                accessor,
                is_subscript,
            } => {
                if *is_subscript {
                    f.write_fmt(format_args!("subscript.{} : {of_type}", accessor.describe()))
                } else {
                    f.write_fmt(format_args!("{} : {of_type}", accessor.describe()))
                }
            }
            SwiftType::WitnessTable { subject, .. } => subject.fmt(f),
            SwiftType::MetaClass(of) => f.write_fmt(format_args!("{of}.Type")),
            SwiftType::ExistentialMetaType(protocols) => {
                if let [single] = protocols.as_slice() {
                    f.write_fmt(format_args!("{single}.Type"))
                } else {
                    f.write_str("(")?;
                    for (idx, proto) in protocols.iter().enumerate() {
                        if idx != 0 {
                            f.write_str(" & ")?;
                        }
                        proto.fmt(f)?;
                    }
                    f.write_str(").Type")
                }
            }
            SwiftType::ProtocolList(protocols) => {
                for (idx, proto) in protocols.iter().enumerate() {
                    if idx != 0 {
                        f.write_str(" & ")?;
                    }
                    proto.fmt(f)?;
                }
                Ok(())
            }
            SwiftType::GenericArgReference {
                depth,
                index,
                assoc_path,
            } => {
                f.write_str(&generic_param_name(*depth, *index))?;
                for assoc in assoc_path {
                    f.write_fmt(format_args!(".{assoc}"))?;
                }
                Ok(())
            }
            SwiftType::CFunctionPointer {
                params,
                return_type,
            } => {
                f.write_str("@convention(c) ")?;
                write_params(f, params)?;
                f.write_fmt(format_args!(" -> {return_type}"))
            }
            SwiftType::Initializer { of, .. } => of.fmt(f),
            SwiftType::InOut(inner) => f.write_fmt(format_args!("inout {inner}")),
        }
    }
}

impl fmt::Display for DecomposedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static() {
            f.write_str("static ")?;
        }

        let write_qualified = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            self.path.fmt(f)?;
            if let Some(name) = &self.name {
                f.write_fmt(format_args!(".{name}"))?;
            }
            Ok(())
        };

        match &self.kind {
            EntityKind::Function => {
                write_qualified(f)?;
                match &self.signature {
                    Some(SwiftType::Function(func))
                    | Some(SwiftType::UncurriedFunction { inner: func, .. }) => {
                        write_generic_args(f, &func.generic_args)?;
                        write_function(f, func)
                    }
                    _ => Ok(()),
                }
            }
            EntityKind::Variable => {
                write_qualified(f)?;
                match &self.signature {
                    Some(SwiftType::Property {
                        of_type,
                        accessor,
                        is_subscript: true,
                    }) => f.write_fmt(format_args!(
                        ".subscript.{} : {of_type}",
                        accessor.describe()
                    )),
                    Some(SwiftType::Property {
                        of_type,
                        accessor: AccessorKind::Storage,
                        ..
                    }) => f.write_fmt(format_args!(" : {of_type}")),
                    Some(SwiftType::Property {
                        of_type, accessor, ..
                    }) => f.write_fmt(format_args!(".{} : {of_type}", accessor.describe())),
                    _ => Ok(()),
                }
            }
            EntityKind::Constructor | EntityKind::Destructor => {
                self.path.fmt(f)?;
                match &self.signature {
                    Some(sig) => f.write_fmt(format_args!(".{sig}")),
                    None => Ok(()),
                }
            }
            EntityKind::EnumCase => {
                f.write_str("enum case for ")?;
                write_qualified(f)
            }
            EntityKind::FieldOffset => {
                f.write_str("field offset for ")?;
                write_qualified(f)
            }
            EntityKind::UnsafeMutableAddressor => {
                f.write_str("unsafe mutable addressor of ")?;
                write_qualified(f)
            }
            EntityKind::DirectMetadata => {
                f.write_str("type metadata for ")?;
                write_qualified(f)
            }
            EntityKind::MetaclassAccessor => {
                f.write_str("type metadata accessor for ")?;
                write_qualified(f)
            }
            EntityKind::GenericMetadataPattern => {
                f.write_str("generic type metadata pattern for ")?;
                write_qualified(f)
            }
            EntityKind::NominalTypeDescriptor => {
                f.write_str("nominal type descriptor for ")?;
                write_qualified(f)
            }
            EntityKind::ProtocolTypeDescriptor => {
                f.write_str("protocol descriptor for ")?;
                write_qualified(f)
            }
            EntityKind::ProtocolConformanceDescriptor => {
                f.write_str("protocol conformance descriptor for ")?;
                write_qualified(f)
            }
            EntityKind::ProtocolRequirementsBaseDescriptor => {
                f.write_str("protocol requirements base descriptor for ")?;
                write_qualified(f)
            }
            EntityKind::BaseConformanceDescriptor => {
                f.write_str("base conformance descriptor for ")?;
                write_qualified(f)
            }
            EntityKind::AssociatedTypeDescriptor => {
                f.write_str("associated type descriptor for ")?;
                write_qualified(f)
            }
            EntityKind::MethodDescriptor => {
                f.write_str("method descriptor for ")?;
                write_qualified(f)
            }
            EntityKind::ModuleDescriptor => {
                f.write_str("module descriptor ")?;
                self.path.fmt(f)
            }
            EntityKind::PropertyDescriptor => {
                f.write_str("property descriptor for ")?;
                write_qualified(f)
            }
            EntityKind::ReflectionMetadataDescriptor(kind) => {
                let what = match kind {
                    ReflectionKind::Field => "reflection metadata field descriptor ",
                    ReflectionKind::Builtin => "reflection metadata builtin descriptor ",
                    ReflectionKind::AssocType => "reflection metadata associated type descriptor ",
                };
                f.write_str(what)?;
                write_qualified(f)
            }
            EntityKind::MetadataBaseOffset => {
                f.write_str("class metadata base offset for ")?;
                write_qualified(f)
            }
            EntityKind::LazyCacheVariable => {
                f.write_str("lazy cache variable for ")?;
                write_qualified(f)
            }
            EntityKind::WitnessTable(kind) => {
                let subject = match &self.signature {
                    Some(SwiftType::WitnessTable { subject, .. }) => Some(subject),
                    _ => None,
                };
                match (kind, subject) {
                    (WitnessTableKind::Value, Some(subject)) => {
                        f.write_fmt(format_args!("value witness table for {subject}"))
                    }
                    (WitnessTableKind::Protocol, Some(subject)) => {
                        f.write_fmt(format_args!("protocol witness table for {subject}"))
                    }
                    (WitnessTableKind::ProtocolAccessor, Some(subject)) => f.write_fmt(
                        format_args!("protocol witness table accessor for {subject}"),
                    ),
                    _ => f.write_str("witness table"),
                }
            }
            EntityKind::Thunk(kind) => {
                let what = match kind {
                    ThunkKind::Curry => "curry thunk of ",
                    ThunkKind::Dispatch => "dispatch thunk of ",
                    ThunkKind::ProtocolWitness => "protocol witness for ",
                };
                f.write_str(what)?;
                write_qualified(f)
            }
            EntityKind::DefaultArgumentInitializer(index) => {
                f.write_fmt(format_args!("default argument {index} of "))?;
                write_qualified(f)
            }
            EntityKind::VariableInitializer => {
                f.write_str("variable initialization expression of ")?;
                write_qualified(f)
            }
        }
    }
}

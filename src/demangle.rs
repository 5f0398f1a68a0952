//! The decoder proper.
//!
//! The grammar is consumed left to right in a single pass with no
//! backtracking: identifiers and types push nodes onto a stack, structural
//! operator characters combine the nodes beneath them. At most two characters
//! of lookahead pick every production.
//!
//! ```text
//! symbol         = prefix decl-context entity
//!
//! identifier     = NATURAL chars              // length-prefixed
//!                | '00' NATURAL '_'? punycode // non-ASCII, see punycode.rs
//! operator       = identifier ('oi'|'op'|'oP')
//! private-name   = identifier 'LL'            // discriminator
//!
//! substitution   = 'A' [A-Z]                  // back-reference 0..25
//!                | 'A' NATURAL [A-Z]          // n*26 + letter
//!
//! known-type     = 'S' LETTER                 // built-ins and stdlib types
//! builtin        = 'B' LETTER
//! nominal        = context identifier ('C'|'V'|'O'|'P')
//! extension      = module nominal 'E'
//!
//! empty-list     = 'y'
//! first-elem     = '_'
//! tuple-element  = type identifier? 'd'?      // label and variadic marker
//! tuple          = elem '_' elem* 't'
//! bound-generic  = nominal 'y' type* 'd'? 'G'
//! optional       = type 'Sg'
//! inout          = type 'z'
//! metatype       = type 'm'
//! function       = ret-type param-type 'K'? 'c'
//! protocol-list  = proto '_' proto* ('p' | 'Xp')
//!
//! generic-param  = 'x'                        // depth 0, index 0
//!                | 'q' INDEX                  // depth 0, index 1 + n
//!                | 'qd' INDEX INDEX           // outer depths
//! assoc-path     = generic-param (identifier 'Qa')+
//! requirement    = proto 'R' PARAM            // conformance
//!                | type 'Rb' PARAM            // superclass bound
//!                | type 'Rs' PARAM            // same-type, recorded only
//! generic-sig    = requirement* ('l' | 'r' NATURAL* 'l')
//! ```
//!
//! Entity suffixes are handled in `entity.rs`.

use crate::ast::{
    FunctionAttrs, FunctionType, Identifier, NestingPath, NominalKind, OperatorFixity, PathKind,
    SwiftType, TupleElement, BUILTIN_TYPES, KNOWN_TYPES, OPERATOR_GLYPHS,
};
use crate::context::Context;
use crate::entity;
use crate::error::{Error, Result};
use crate::generics::Requirement;
use crate::punycode;
use crate::subs::{Substitutable, SubstitutionTable};
use crate::DecomposedEntity;

/// Partial results and structural markers the decoder stacks up.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Type(SwiftType),
    Ident(Identifier),

    /// `y`: the empty tuple in type position, the list opener elsewhere.
    EmptyList,

    /// `_`: separates a list's first element from the rest.
    FirstElem,

    /// `K`
    Throws,

    /// `d`
    VariadicMarker,

    /// `LL`: a private discriminator waiting for its declaration name.
    Private(String),

    /// `E`: the defining module plus the extended type.
    Extension(Identifier, SwiftType),

    Requirement(Requirement),
    GenericSignature(Vec<Requirement>),
    Entity(DecomposedEntity),
}

pub(crate) struct Demangler<'a> {
    pub ctx: Context<'a>,
    pub subs: SubstitutionTable,
    stack: Vec<Node>,
}

impl<'a> Demangler<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        Demangler {
            ctx,
            subs: SubstitutionTable::new(),
            stack: Vec::with_capacity(16),
        }
    }

    /// Consume the whole remaining input and return the one entity it
    /// describes.
    pub fn run(mut self) -> Result<DecomposedEntity> {
        while !self.ctx.is_empty() {
            self.step()?;
        }

        match self.stack.pop() {
            Some(Node::Entity(entity)) if self.stack.is_empty() => Ok(entity),
            popped => {
                // Leftovers around a finished entity are trailing garbage,
                // anything else means the grammar never completed.
                let finished = matches!(popped, Some(Node::Entity(_)))
                    || self.stack.iter().any(|node| matches!(node, Node::Entity(_)));

                Err(if finished {
                    Error::UnexpectedText
                } else {
                    Error::TruncatedInput
                })
            }
        }
    }

    fn step(&mut self) -> Result<()> {
        let op = match self.ctx.peek() {
            Some(op) => op,
            None => return Ok(()),
        };

        if op.is_ascii_digit() {
            return self.demangle_identifier();
        }

        self.ctx.take()?;
        match op {
            b's' => {
                // The stdlib module has a one-letter spelling.
                self.ctx.trace(op, "module Swift");
                self.push_new_ident(Identifier::new("Swift"))
            }
            b'S' => self.demangle_known_type(),
            b'B' => self.demangle_builtin(),
            b'A' => self.demangle_substitution(),
            b'y' => self.push(Node::EmptyList),
            b'_' => self.push(Node::FirstElem),
            b'K' => self.push(Node::Throws),
            b'd' => self.push(Node::VariadicMarker),
            b'z' => {
                let inner = self.pop_type()?;
                self.push(Node::Type(SwiftType::InOut(Box::new(inner))))
            }
            b'm' => {
                let of = self.pop_type()?;
                self.push(Node::Type(SwiftType::MetaClass(Box::new(of))))
            }
            b'x' => self.push(Node::Type(SwiftType::GenericArgReference {
                depth: 0,
                index: 0,
                assoc_path: Vec::new(),
            })),
            b'q' => self.demangle_generic_param(),
            b'Q' => self.demangle_assoc_path(),
            b'o' => self.demangle_operator_name(),
            b'L' => self.demangle_private_discriminator(),
            b'C' => self.demangle_nominal(NominalKind::Class),
            b'V' => self.demangle_nominal(NominalKind::Struct),
            b'O' => self.demangle_nominal(NominalKind::Enum),
            b'P' => self.demangle_nominal(NominalKind::Protocol),
            b'E' => self.demangle_extension(),
            b'G' => self.demangle_bound_generic(),
            b't' => self.demangle_tuple(),
            b'c' => self.demangle_function_type(FunctionAttrs::empty()),
            b'p' => self.demangle_protocol_list(),
            b'X' => self.demangle_special_type(),
            b'R' => self.demangle_requirement(),
            b'r' | b'l' => self.demangle_generic_signature(op),
            b'F' => entity::plain_function(self),
            b'f' => entity::function_family(self),
            b'v' => entity::variable_family(self),
            b'i' => entity::subscript_family(self),
            b'W' => entity::witness_family(self),
            b'M' => entity::metadata_family(self),
            b'T' => entity::global_family(self),
            b'Z' => entity::mark_static(self),
            unknown => Err(Error::UnknownTypeCode(unknown)),
        }
    }

    // Stack plumbing. Underflow means a production was missing operands,
    // which reads the same as the symbol having been cut short.

    pub fn push(&mut self, node: Node) -> Result<()> {
        self.ctx.check_depth(self.stack.len())?;
        self.stack.push(node);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Node> {
        self.stack.pop().ok_or(Error::TruncatedInput)
    }

    pub fn top(&self) -> Option<&Node> {
        self.stack.last()
    }

    /// The node below the top of the stack.
    fn second(&self) -> Option<&Node> {
        self.stack.len().checked_sub(2).and_then(|i| self.stack.get(i))
    }

    pub fn pop_type(&mut self) -> Result<SwiftType> {
        match self.pop()? {
            Node::Type(ty) => Ok(ty),
            Node::EmptyList => Ok(SwiftType::empty_tuple()),
            _ => Err(Error::TruncatedInput),
        }
    }

    pub fn pop_ident(&mut self) -> Result<Identifier> {
        match self.pop()? {
            Node::Ident(ident) => Ok(ident),
            _ => Err(Error::TruncatedInput),
        }
    }

    /// Pop a declaration name, folding in a pending private discriminator.
    pub fn pop_decl_name(&mut self) -> Result<Identifier> {
        let mut name = self.pop_ident()?;
        if let Some(Node::Private(_)) = self.top() {
            match self.pop()? {
                Node::Private(discriminator) => name.discriminator = Some(discriminator),
                _ => unreachable!(),
            }
        }
        Ok(name)
    }

    /// Pop a protocol reference: either an already-built protocol nominal or
    /// a bare `context identifier` pair, which needs no kind character since
    /// the position implies protocol-ness.
    pub fn pop_protocol(&mut self) -> Result<SwiftType> {
        if let Some(Node::Ident(_)) = self.top() {
            let name = self.pop_ident()?;
            let path = match self.pop()? {
                Node::Ident(module) => NestingPath::top_level(module),
                Node::Type(SwiftType::Nominal { path, .. }) => path,
                _ => return Err(Error::TruncatedInput),
            };

            let proto = SwiftType::Nominal {
                path: path.child(PathKind::Protocol, name),
                kind: NominalKind::Protocol,
                is_reference: false,
            };
            self.subs.insert(Substitutable::Nominal(proto.clone()));
            return Ok(proto);
        }

        let is_protocol = matches!(self.top(), Some(Node::Type(ty)) if ty.is_protocol());
        if is_protocol {
            return self.pop_type();
        }

        Err(Error::TruncatedInput)
    }

    /// Pop the declaration context: the containing module, nominal type or
    /// extension. Returns the nesting path, the `self` type for members and
    /// the extended type for declarations inside extensions.
    pub fn pop_context(
        &mut self,
    ) -> Result<(NestingPath, Option<SwiftType>, Option<SwiftType>)> {
        match self.pop()? {
            Node::Ident(module) => Ok((NestingPath::top_level(module), None, None)),
            Node::Type(ty @ SwiftType::Nominal { .. }) => {
                let path = match &ty {
                    SwiftType::Nominal { path, .. } => path.clone(),
                    _ => unreachable!(),
                };
                Ok((path, Some(ty), None))
            }
            Node::Type(ty @ SwiftType::BoundGeneric { .. }) => {
                let path = match &ty {
                    SwiftType::BoundGeneric { base, .. } => match base.as_ref() {
                        SwiftType::Nominal { path, .. } => path.clone(),
                        _ => return Err(Error::TruncatedInput),
                    },
                    _ => unreachable!(),
                };
                Ok((path, Some(ty), None))
            }
            Node::Extension(module, extended) => {
                let mut path = NestingPath::top_level(module);
                if let SwiftType::Nominal { path: inner, .. } = &extended {
                    if let Some(leaf) = inner.leaf() {
                        path = path.child(PathKind::Extension, leaf.clone());
                    }
                }
                Ok((path, Some(extended.clone()), Some(extended)))
            }
            _ => Err(Error::TruncatedInput),
        }
    }

    /// Pop a pending generic signature, if the last clause closed one.
    pub fn pop_generic_signature(&mut self) -> Result<Vec<Requirement>> {
        if let Some(Node::GenericSignature(_)) = self.top() {
            match self.pop()? {
                Node::GenericSignature(requirements) => return Ok(requirements),
                _ => unreachable!(),
            }
        }
        Ok(Vec::new())
    }

    /// Pop a pending `K` marker.
    pub fn pop_throws(&mut self) -> bool {
        if let Some(Node::Throws) = self.top() {
            self.stack.pop();
            return true;
        }
        false
    }

    /// Record and push a freshly parsed identifier. Identifiers surfaced by
    /// back-references don't come through here and aren't re-recorded.
    fn push_new_ident(&mut self, ident: Identifier) -> Result<()> {
        self.subs.insert(Substitutable::Ident(ident.clone()));
        self.push(Node::Ident(ident))
    }

    // One production per method from here on.

    fn demangle_identifier(&mut self) -> Result<()> {
        if self.ctx.peek() == Some(b'0') {
            self.ctx.take()?;
            if !self.ctx.eat(b'0') {
                // '0' + letter is the word-substitution form, which the
                // compilers we decode for never emit for exported symbols.
                return Err(Error::UnsupportedConstruct("word-substituted identifier"));
            }

            let len = self.ctx.natural()?;
            // A separator keeps bodies that start with '_' or a digit from
            // running into the length.
            self.ctx.eat(b'_');
            let body = self.ctx.take_slice(len)?;

            let name = punycode::decode(body)
                .ok_or(Error::UnsupportedConstruct("malformed punycode identifier"))?;
            self.ctx.trace(b'0', "punycode identifier");
            return self.push_new_ident(Identifier::new(name));
        }

        let len = self.ctx.natural()?;
        if len == 0 {
            return Err(Error::TruncatedInput);
        }

        let name = self.ctx.take_slice(len)?;
        if !name.is_ascii() {
            return Err(Error::UnsupportedConstruct("raw non-ASCII identifier"));
        }

        self.ctx.trace(b'i', name);
        self.push_new_ident(Identifier::new(name))
    }

    fn demangle_known_type(&mut self) -> Result<()> {
        let c = self.ctx.take()?;

        let code = [b'S', c];
        if let Some(&builtin) = BUILTIN_TYPES.get(std::str::from_utf8(&code).unwrap()) {
            self.ctx.trace(c, "built-in");
            return self.push(Node::Type(SwiftType::BuiltIn(builtin)));
        }

        if let Some(&(name, kind)) = KNOWN_TYPES.get(&c) {
            self.ctx.trace(c, name);
            return self.push(Node::Type(known_nominal(name, kind)));
        }

        if c == b'g' {
            // Optional sugar wrapping the preceding type.
            let wrapped = self.pop_type()?;
            return self.push(Node::Type(SwiftType::BoundGeneric {
                base: Box::new(known_nominal("Optional", NominalKind::Enum)),
                args: vec![wrapped],
                is_variadic: false,
            }));
        }

        Err(Error::UnknownTypeCode(c))
    }

    fn demangle_builtin(&mut self) -> Result<()> {
        let c = self.ctx.take()?;
        let code = [b'B', c];
        match BUILTIN_TYPES.get(std::str::from_utf8(&code).unwrap()) {
            Some(&builtin) => self.push(Node::Type(SwiftType::BuiltIn(builtin))),
            None => Err(Error::UnknownTypeCode(c)),
        }
    }

    fn demangle_substitution(&mut self) -> Result<()> {
        let run = match self.ctx.peek() {
            Some(c) if c.is_ascii_digit() => self.ctx.natural()?,
            _ => 0,
        };

        let letter = self.ctx.take()?;
        if !letter.is_ascii_uppercase() {
            return Err(Error::UnknownTypeCode(letter));
        }

        let idx = run
            .checked_mul(26)
            .and_then(|n| n.checked_add((letter - b'A') as usize))
            .ok_or(Error::TruncatedInput)?;

        self.ctx.trace(b'A', "substitution");
        match self.subs.resolve(idx)?.clone() {
            Substitutable::Ident(ident) => self.push(Node::Ident(ident)),
            Substitutable::Nominal(ty) | Substitutable::ProtocolList(ty) => {
                self.push(Node::Type(ty))
            }
        }
    }

    fn demangle_generic_param(&mut self) -> Result<()> {
        let (depth, index) = if self.ctx.eat(b'd') {
            let depth = self.ctx.index()? + 1;
            let index = self.ctx.index()?;
            (depth, index)
        } else {
            (0, self.ctx.index()? + 1)
        };

        self.push(Node::Type(SwiftType::GenericArgReference {
            depth,
            index,
            assoc_path: Vec::new(),
        }))
    }

    fn demangle_assoc_path(&mut self) -> Result<()> {
        match self.ctx.take()? {
            b'a' => {
                let assoc = self.pop_ident()?;
                match self.pop_type()? {
                    SwiftType::GenericArgReference {
                        depth,
                        index,
                        mut assoc_path,
                    } => {
                        assoc_path.push(assoc);
                        self.push(Node::Type(SwiftType::GenericArgReference {
                            depth,
                            index,
                            assoc_path,
                        }))
                    }
                    _ => Err(Error::TruncatedInput),
                }
            }
            _ => Err(Error::UnsupportedConstruct("opaque result type")),
        }
    }

    fn demangle_operator_name(&mut self) -> Result<()> {
        let fixity = match self.ctx.take()? {
            b'i' => OperatorFixity::Infix,
            b'p' => OperatorFixity::Prefix,
            b'P' => OperatorFixity::Postfix,
            _ => return Err(Error::UnsupportedConstruct("operator fixity")),
        };

        let coded = self.pop_ident()?;
        let mut glyphs = String::with_capacity(coded.name.len());
        for c in coded.name.chars() {
            if !c.is_ascii() {
                // Already decoded from punycode, passes through untouched.
                glyphs.push(c);
                continue;
            }

            match OPERATOR_GLYPHS.get(&(c as u8)) {
                Some(&glyph) => glyphs.push(glyph),
                None => return Err(Error::UnsupportedConstruct("operator glyph")),
            }
        }

        self.push(Node::Ident(Identifier {
            name: glyphs,
            discriminator: coded.discriminator,
            fixity: Some(fixity),
        }))
    }

    fn demangle_private_discriminator(&mut self) -> Result<()> {
        if self.ctx.take()? != b'L' {
            return Err(Error::UnsupportedConstruct("local declaration"));
        }

        let discriminator = self.pop_ident()?;
        self.push(Node::Private(discriminator.name))
    }

    fn demangle_nominal(&mut self, kind: NominalKind) -> Result<()> {
        let name = self.pop_decl_name()?;

        let path = match self.pop()? {
            Node::Ident(module) => NestingPath::top_level(module),
            Node::Type(SwiftType::Nominal { path, .. }) => path,
            Node::Extension(module, extended) => {
                let mut path = NestingPath::top_level(module);
                if let SwiftType::Nominal { path: inner, .. } = &extended {
                    if let Some(leaf) = inner.leaf() {
                        path = path.child(PathKind::Extension, leaf.clone());
                    }
                }
                path
            }
            _ => return Err(Error::TruncatedInput),
        };

        let nominal = SwiftType::Nominal {
            path: path.child(kind.path_kind(), name),
            kind,
            is_reference: kind == NominalKind::Class,
        };

        self.subs.insert(Substitutable::Nominal(nominal.clone()));
        self.push(Node::Type(nominal))
    }

    fn demangle_extension(&mut self) -> Result<()> {
        let extended = self.pop_type()?;
        let module = self.pop_ident()?;
        self.push(Node::Extension(module, extended))
    }

    fn demangle_bound_generic(&mut self) -> Result<()> {
        let mut is_variadic = false;
        if let Some(Node::VariadicMarker) = self.top() {
            self.pop()?;
            is_variadic = true;
        }

        let mut args = Vec::new();
        loop {
            match self.pop()? {
                Node::Type(ty) => args.push(ty),
                Node::EmptyList => break,
                _ => return Err(Error::TruncatedInput),
            }
        }
        args.reverse();

        let base = self.pop_type()?;
        match base {
            SwiftType::Nominal { .. } => {}
            _ => return Err(Error::TruncatedInput),
        }

        self.push(Node::Type(SwiftType::BoundGeneric {
            base: Box::new(base),
            args,
            is_variadic,
        }))
    }

    fn demangle_tuple(&mut self) -> Result<()> {
        let mut elements = Vec::new();

        if let Some(Node::EmptyList) = self.top() {
            self.pop()?;
            return self.push(Node::Type(SwiftType::Tuple(elements)));
        }

        loop {
            let mut first = false;
            if let Some(Node::FirstElem) = self.top() {
                self.pop()?;
                first = true;
            }

            let mut variadic = false;
            if let Some(Node::VariadicMarker) = self.top() {
                self.pop()?;
                variadic = true;
            }

            // An identifier is this element's label only when the element's
            // type sits beneath it. Otherwise it belongs to the declaration.
            let mut label = None;
            if let (Some(Node::Ident(_)), Some(Node::Type(_) | Node::EmptyList)) =
                (self.top(), self.second())
            {
                label = Some(self.pop_ident()?);
            }

            let ty = self.pop_type()?;
            elements.push(TupleElement {
                label,
                ty,
                variadic,
            });

            if first {
                break;
            }
        }

        elements.reverse();
        self.push(Node::Type(SwiftType::Tuple(elements)))
    }

    pub(crate) fn demangle_function_type(&mut self, extra: FunctionAttrs) -> Result<()> {
        let mut attrs = extra;
        if self.pop_throws() {
            attrs |= FunctionAttrs::THROWS;
        }

        let params = self.pop_type()?;
        let return_type = self.pop_type()?;

        self.push(Node::Type(SwiftType::Function(FunctionType {
            params: Box::new(params),
            return_type: Box::new(return_type),
            attrs,
            generic_args: Vec::new(),
            extension_on: None,
        })))
    }

    fn demangle_protocol_list(&mut self) -> Result<()> {
        let list = self.pop_protocol_members()?;
        let list = SwiftType::ProtocolList(list);
        self.subs.insert(Substitutable::ProtocolList(list.clone()));
        self.push(Node::Type(list))
    }

    /// Pop the members of a protocol composition, first-element marker rules
    /// as for tuples.
    fn pop_protocol_members(&mut self) -> Result<Vec<SwiftType>> {
        let mut protocols = Vec::new();
        loop {
            let mut first = false;
            if let Some(Node::FirstElem) = self.top() {
                self.pop()?;
                first = true;
            }

            protocols.push(self.pop_protocol()?);

            if first {
                break;
            }
        }

        protocols.reverse();
        Ok(protocols)
    }

    fn demangle_special_type(&mut self) -> Result<()> {
        match self.ctx.take()? {
            // Existential metatype.
            b'p' => {
                let protocols = match self.top() {
                    Some(Node::Type(SwiftType::ProtocolList(_))) => match self.pop_type()? {
                        SwiftType::ProtocolList(protocols) => protocols,
                        _ => unreachable!(),
                    },
                    _ => vec![self.pop_protocol()?],
                };
                self.push(Node::Type(SwiftType::ExistentialMetaType(protocols)))
            }
            // An escaping function type.
            b'E' => self.demangle_function_type(FunctionAttrs::ESCAPING),
            // @convention(c).
            b'C' => {
                let params = self.pop_type()?;
                let return_type = self.pop_type()?;
                self.push(Node::Type(SwiftType::CFunctionPointer {
                    params: Box::new(params),
                    return_type: Box::new(return_type),
                }))
            }
            _ => Err(Error::UnsupportedConstruct("special type")),
        }
    }

    fn demangle_requirement(&mut self) -> Result<()> {
        let constraint_kind = match self.ctx.peek() {
            Some(b'b') | Some(b's') => self.ctx.take()?,
            _ => 0,
        };

        let (depth, index) = self.demangle_param_index()?;

        let constraint = match constraint_kind {
            b'b' => crate::ast::Constraint::Superclass(self.pop_type()?),
            b's' => crate::ast::Constraint::SameType(self.pop_type()?),
            _ => {
                let proto = match self.top() {
                    Some(Node::Type(SwiftType::ProtocolList(_))) => self.pop_type()?,
                    _ => self.pop_protocol()?,
                };
                crate::ast::Constraint::Conforms(proto)
            }
        };

        self.push(Node::Requirement(Requirement {
            depth,
            index,
            constraint,
        }))
    }

    /// The generic-parameter index of a requirement clause.
    fn demangle_param_index(&mut self) -> Result<(usize, usize)> {
        if self.ctx.eat(b'z') {
            return Ok((0, 0));
        }

        if self.ctx.eat(b'd') {
            let depth = self.ctx.index()? + 1;
            let index = self.ctx.index()?;
            return Ok((depth, index));
        }

        Ok((0, self.ctx.index()? + 1))
    }

    fn demangle_generic_signature(&mut self, op: u8) -> Result<()> {
        if op == b'r' {
            // Explicit per-depth parameter counts; the resolver re-derives
            // them from the references, so only the shape is validated.
            while matches!(self.ctx.peek(), Some(c) if c.is_ascii_digit()) {
                self.ctx.natural()?;
            }
            if self.ctx.take()? != b'l' {
                return Err(Error::MalformedGenericSignature);
            }
        }

        let mut requirements = Vec::new();
        while let Some(Node::Requirement(_)) = self.top() {
            match self.pop()? {
                Node::Requirement(requirement) => requirements.push(requirement),
                _ => unreachable!(),
            }
        }
        requirements.reverse();

        self.push(Node::GenericSignature(requirements))
    }
}

fn known_nominal(name: &str, kind: NominalKind) -> SwiftType {
    SwiftType::Nominal {
        path: NestingPath::top_level(Identifier::new("Swift"))
            .child(kind.path_kind(), Identifier::new(name)),
        kind,
        is_reference: kind == NominalKind::Class,
    }
}

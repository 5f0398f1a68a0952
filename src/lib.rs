//! Swift symbol demangler.
//!
//! The Swift compiler encodes every exported declaration into a compact
//! linker symbol: module, enclosing types, generic constraints, parameter and
//! return types and the exact declaration kind all get packed into one flat
//! string. This crate runs that encoding backwards, turning a symbol like
//! `_$s3foo6nonameSiyF` into a structured [`DecomposedEntity`] describing
//! `foo.noname() -> Swift.Int`.
//!
//! ```
//! let entity = swift_demangler::decompose("_$s3foo6nonameSiyF").unwrap();
//!
//! assert_eq!(entity.module().name, "foo");
//! assert_eq!(entity.to_string(), "foo.noname() -> Swift.Int");
//! ```
//!
//! Decoding is a pure function: each call owns its own cursor and
//! substitution table, so hammering it from a thread pool over every symbol
//! of a binary needs no synchronization. Failures come back as typed
//! [`Error`] values, never panics, and never as partially filled entities;
//! a batch caller records the failure and moves on to the next symbol.

mod ast;
mod context;
mod demangle;
mod entity;
mod error;
mod generics;
mod punycode;
mod subs;
mod tests;

pub use ast::{
    AccessorKind, BuiltinKind, Constraint, DecomposedEntity, EntityFlags, EntityKind,
    FunctionAttrs, FunctionType, GenericArgument, Identifier, InitializerKind, NestingPath,
    NominalKind, OperatorFixity, PathComponent, PathKind, ReflectionKind, SwiftType, ThunkKind,
    TupleElement, WitnessTableKind, BUILTIN_TYPES,
};
pub use error::{Error, Result};

use context::Context;
use demangle::Demangler;

/// Which mangling prefix a symbol carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `_T`, the pre-4.0 compilers.
    Legacy,
    /// `_T0`.
    V4,
    /// `$s`, with or without the extra underscore macOS adds.
    V5,
}

/// A mangled symbol that has been decoded into an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol<'a> {
    raw: &'a str,
    scheme: Scheme,
    entity: DecomposedEntity,
}

impl<'a> Symbol<'a> {
    /// Decode a mangled symbol.
    pub fn parse(raw: &'a str) -> Result<Symbol<'a>> {
        Self::parse_with(raw, false)
    }

    /// Decode a mangled symbol, optionally emitting a step-by-step trace at
    /// `log::trace!` level. The trace changes nothing about the result.
    pub fn parse_with(raw: &'a str, trace: bool) -> Result<Symbol<'a>> {
        if !raw.is_ascii() {
            return Err(Error::UnrecognizedPrefix);
        }

        let (scheme, rest) = strip_scheme(raw)?;
        let entity = Demangler::new(Context::new(rest, trace)).run()?;

        Ok(Symbol {
            raw,
            scheme,
            entity,
        })
    }

    /// The symbol exactly as it was handed in.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn entity(&self) -> &DecomposedEntity {
        &self.entity
    }

    /// Give up the borrow on the raw symbol, keeping only the entity.
    pub fn into_entity(self) -> DecomposedEntity {
        self.entity
    }
}

impl std::fmt::Display for Symbol<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.entity.fmt(f)
    }
}

/// Decode a mangled symbol into its entity.
pub fn decompose(s: &str) -> Result<DecomposedEntity> {
    Ok(Symbol::parse(s)?.into_entity())
}

/// Lenient entry point for batch callers: demangles to the human-readable
/// form, or reports the symbol as not-ours so the caller can fall back to
/// other demanglers or the raw string.
pub fn demangle(s: &str) -> Option<String> {
    // Linkers occasionally tack on table suffixes that aren't part of the
    // mangling itself.
    let s = s.strip_suffix("$got").unwrap_or(s);
    let s = s.strip_suffix("$plt").unwrap_or(s);

    match Symbol::parse(s) {
        Ok(sym) => Some(sym.to_string()),
        Err(Error::UnrecognizedPrefix) => None,
        Err(err) => {
            log::trace!("failed to demangle '{s}': {err}");
            None
        }
    }
}

/// Split off the version prefix. This is the only place that insists the
/// input has any length at all.
fn strip_scheme(s: &str) -> Result<(Scheme, &str)> {
    // macOS prefixes symbols with an extra underscore.
    if let Some(rest) = s.strip_prefix("_$s").or_else(|| s.strip_prefix("$s")) {
        return Ok((Scheme::V5, rest));
    }

    if let Some(rest) = s.strip_prefix("_T0") {
        return Ok((Scheme::V4, rest));
    }

    if let Some(rest) = s.strip_prefix("_T") {
        return Ok((Scheme::Legacy, rest));
    }

    Err(Error::UnrecognizedPrefix)
}

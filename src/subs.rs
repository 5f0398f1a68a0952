//! The per-symbol substitution table.
//!
//! Later parts of a symbol refer back to components that already appeared by
//! index instead of spelling them again, the same trick compression schemes
//! use. The table is owned by a single decode call, only ever appended to,
//! and back-references may only point at entries recorded before the current
//! position. Forward references are a hard error.
//!
//! Recording order is part of the grammar: identifiers are recorded as they
//! are parsed (never when a back-reference re-surfaces one), nominal types
//! and protocol compositions when they fully resolve. Structural types such
//! as tuples and functions are never recorded, mirroring the compiler's own
//! compression policy.

use crate::ast::{Identifier, SwiftType};
use crate::error::{Error, Result};

/// Everything eligible for back-reference.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Substitutable {
    /// A parsed identifier: module names, declaration names, labels alike.
    Ident(Identifier),

    /// A fully resolved nominal type.
    Nominal(SwiftType),

    /// A fully resolved protocol composition.
    ProtocolList(SwiftType),
}

/// Components recorded so far, indexed in order of first full resolution.
#[derive(Debug, Default)]
pub(crate) struct SubstitutionTable {
    entries: Vec<Substitutable>,
}

impl SubstitutionTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Record a component and return the index it now lives at.
    pub fn insert(&mut self, entry: Substitutable) -> usize {
        let idx = self.entries.len();
        self.entries.push(entry);
        idx
    }

    /// Look up a back-reference.
    pub fn resolve(&self, idx: usize) -> Result<&Substitutable> {
        self.entries
            .get(idx)
            .ok_or(Error::SubstitutionIndexOutOfRange(idx))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn out_of_range() {
        let mut table = SubstitutionTable::new();
        assert_eq!(
            table.resolve(0).unwrap_err(),
            Error::SubstitutionIndexOutOfRange(0)
        );

        let idx = table.insert(Substitutable::Ident(Identifier::new("foo")));
        assert_eq!(idx, 0);
        assert!(table.resolve(0).is_ok());
        assert_eq!(
            table.resolve(1).unwrap_err(),
            Error::SubstitutionIndexOutOfRange(1)
        );
    }
}

//! Generic-signature resolution.
//!
//! Requirement clauses arrive as a flat list tagged with `(depth, index)`
//! pairs. This module associates them with the generic parameters referenced
//! by the decoded signature: the resulting list holds one entry per distinct
//! pair, in first-use order, with multiple constraints on one parameter kept
//! in encounter order. Same-type constraints are recorded as-is, solving them
//! is someone else's job.

use crate::ast::{Constraint, GenericArgument, SwiftType};
use crate::error::{Error, Result};

/// One decoded requirement clause, not yet attached to its parameter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Requirement {
    pub depth: usize,
    pub index: usize,
    pub constraint: Constraint,
}

/// Build the ordered [`GenericArgument`] list for a function signature.
pub(crate) fn resolve(
    params: &SwiftType,
    return_type: &SwiftType,
    requirements: Vec<Requirement>,
) -> Result<Vec<GenericArgument>> {
    let mut order: Vec<(usize, usize)> = Vec::new();
    collect_references(params, &mut order);
    collect_references(return_type, &mut order);

    // A clause may constrain a parameter the parameter/return types never
    // spell out. The clause itself is a reference, so it still counts.
    for requirement in &requirements {
        note(requirement.depth, requirement.index, &mut order);
    }

    let mut args: Vec<GenericArgument> = order
        .into_iter()
        .map(|(depth, index)| GenericArgument {
            depth,
            index,
            constraints: Vec::new(),
        })
        .collect();

    for requirement in requirements {
        validate(&requirement.constraint)?;

        let arg = args
            .iter_mut()
            .find(|arg| arg.depth == requirement.depth && arg.index == requirement.index)
            .ok_or(Error::MalformedGenericSignature)?;

        arg.constraints.push(requirement.constraint);
    }

    Ok(args)
}

fn validate(constraint: &Constraint) -> Result<()> {
    match constraint {
        Constraint::Conforms(ty) => match ty {
            SwiftType::Nominal { .. } | SwiftType::ProtocolList(..) => Ok(()),
            _ => Err(Error::MalformedGenericSignature),
        },
        Constraint::Superclass(ty) => match ty {
            SwiftType::Nominal { .. } | SwiftType::BoundGeneric { .. } => Ok(()),
            _ => Err(Error::MalformedGenericSignature),
        },
        // Equality may relate a parameter to any type at all.
        Constraint::SameType(_) => Ok(()),
    }
}

fn note(depth: usize, index: usize, order: &mut Vec<(usize, usize)>) {
    if !order.contains(&(depth, index)) {
        order.push((depth, index));
    }
}

fn collect_references(ty: &SwiftType, order: &mut Vec<(usize, usize)>) {
    match ty {
        SwiftType::GenericArgReference { depth, index, .. } => note(*depth, *index, order),
        SwiftType::BuiltIn(..) | SwiftType::Nominal { .. } | SwiftType::Destructor { .. } => {}
        SwiftType::Tuple(elements) => {
            for element in elements {
                collect_references(&element.ty, order);
            }
        }
        SwiftType::BoundGeneric { base, args, .. } => {
            collect_references(base, order);
            for arg in args {
                collect_references(arg, order);
            }
        }
        SwiftType::Function(func) => {
            collect_references(&func.params, order);
            collect_references(&func.return_type, order);
        }
        SwiftType::UncurriedFunction { self_param, inner } => {
            collect_references(self_param, order);
            collect_references(&inner.params, order);
            collect_references(&inner.return_type, order);
        }
        SwiftType::Constructor {
            params,
            return_type,
            ..
        }
        | SwiftType::CFunctionPointer {
            params,
            return_type,
        } => {
            collect_references(params, order);
            collect_references(return_type, order);
        }
        SwiftType::Property { of_type, .. } => collect_references(of_type, order),
        SwiftType::WitnessTable { subject, .. } => collect_references(subject, order),
        SwiftType::MetaClass(of) => collect_references(of, order),
        SwiftType::ExistentialMetaType(protocols) | SwiftType::ProtocolList(protocols) => {
            for proto in protocols {
                collect_references(proto, order);
            }
        }
        SwiftType::Initializer { of, .. } => collect_references(of, order),
        SwiftType::InOut(inner) => collect_references(inner, order),
    }
}

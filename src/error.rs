use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a symbol fails to decompose.
///
/// Decoding is all-or-nothing: any of these aborts the decode of that one
/// symbol and nothing partial is ever returned. Callers enumerating many
/// symbols are expected to record the error and move on.
#[derive(Clone, PartialEq, Eq)]
pub enum Error {
    /// The symbol doesn't start with any known Swift mangling prefix.
    UnrecognizedPrefix,

    /// The grammar expected more input than the symbol provides.
    TruncatedInput,

    /// A type code that isn't in any of the supported tables.
    UnknownTypeCode(u8),

    /// A back-reference pointing past everything recorded so far.
    SubstitutionIndexOutOfRange(usize),

    /// Syntactically plausible but deliberately unimplemented grammar.
    UnsupportedConstruct(&'static str),

    /// A requirement clause that doesn't attach to any generic parameter.
    MalformedGenericSignature,

    /// Nesting deeper than the decoder is willing to follow.
    TooMuchRecursion,

    /// Input left over after the entity grammar completed.
    UnexpectedText,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedPrefix => f.write_str("Not a known Swift mangling prefix."),
            Self::TruncatedInput => f.write_str("Mangled symbol ended before the grammar did."),
            Self::UnknownTypeCode(code) => {
                f.write_fmt(format_args!("Unknown type code '{}'.", *code as char))
            }
            Self::SubstitutionIndexOutOfRange(idx) => {
                f.write_fmt(format_args!("Substitution ${idx} hasn't been recorded yet."))
            }
            Self::UnsupportedConstruct(what) => {
                f.write_fmt(format_args!("Unsupported construct: {what}."))
            }
            Self::MalformedGenericSignature => f.write_str("Malformed generic signature."),
            Self::TooMuchRecursion => f.write_str("Exceeded the maximum nesting depth."),
            Self::UnexpectedText => f.write_str("Trailing characters after the entity."),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

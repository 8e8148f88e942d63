//! Crate-level error taxonomy.

use thiserror::Error;

use crate::parser::ParseError;

/// Errors raised by declaration, derivation and invocation.
///
/// Failed declarations and derivations are logged at error level by the
/// catalog before the `Err` is returned; plain lookups of absent names
/// return `None` instead of an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Template text does not match the placeholder grammar.
    #[error("template error: {0}")]
    Template(#[from] ParseError),

    /// Template parsed but the declaration violates contract rules.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Declaration name is reserved or collides with an operator of
    /// another kind.
    #[error("operator name {name:?} clashes with a reserved or existing symbol")]
    NameClash { name: String },

    /// A `derive` call referenced something missing or unfit.
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    /// Invocation of a name the catalog does not know.
    #[error("unknown operator {name:?}")]
    UnknownOperator { name: String },
}

/// Declaration-time contract violations.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("defining {name}: command {command} is not executable")]
    ExecutableNotFound { name: String, command: String },

    #[error(
        "defining {name}: template must include ${{in}}, ${{ins}}, ${{mmin}} \
         or a ranked ${{in_N}} placeholder for the input filename(s)"
    )]
    NoInput { name: String },

    #[error("defining {name}: duplicate declaration for input #{rank}")]
    DuplicateInputRank { name: String, rank: u32 },

    #[error(
        "defining {name}: input ranks {ranks:?} must be exactly {{0}} \
         or a contiguous run starting at 1"
    )]
    BrokenInputSequence { name: String, ranks: Vec<u32> },

    #[error("defining {name}: output label in ${{out_}} must not be empty")]
    EmptyOutputLabel { name: String },

    #[error("defining {name}: naming rule {rule:?} for output {label:?} holds more than one %s")]
    AmbiguousOutputRule {
        name: String,
        label: String,
        rule: String,
    },
}

/// Problems registering a derived variable.
#[derive(Debug, Error)]
pub enum DerivationError {
    #[error("operator {operator:?} is not declared")]
    UnknownOperator { operator: String },

    #[error("operator {operator:?} is internal; derived variables need a script operator")]
    InternalOperator { operator: String },

    #[error("{label:?} is not a named output of operator {operator:?}")]
    UnknownOutput { operator: String, label: String },

    #[error("operator {operator:?} has no primary output")]
    MissingPrimaryOutput { operator: String },

    #[error("operator {operator} takes {expected} input variable(s), got {got}")]
    ArityMismatch {
        operator: String,
        expected: usize,
        got: usize,
    },
}

use strum::EnumIs;
use thiserror::Error;

/// Errors raised while building, typing, or rewriting terms.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum Error {
    /// A bounded type denotes no value and a concrete bound was required.
    #[error(
        "The bounded integer domain [{lo}, {hi}] is empty. Its bounds cannot be used to derive the type of an arithmetic result."
    )]
    EmptyDomain { lo: String, hi: String },

    /// A replacement references a wildcard its own pattern never binds.
    #[error(
        "Rule #{rule} of rule set `{rule_set}` is malformed: its replacement references wildcard `?{wildcard}` which does not occur in its pattern."
    )]
    MalformedRule {
        rule_set: String,
        rule: usize,
        wildcard: u8,
    },

    /// A replacement was instantiated with a binding lacking one of its wildcards.
    #[error("Wildcard `?{wildcard}` has no binding; the replacement cannot be instantiated.")]
    UnboundWildcard { wildcard: u8 },

    /// An integral operation received a logical operand.
    #[error("Operation `{operation}` expects an integral operand, but found a value of type `{found}`.")]
    TypeMismatch {
        operation: &'static str,
        found: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

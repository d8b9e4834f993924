//! Hyterm: typed integer terms with a canonicalizing rewrite engine.
//!
//! Terms are the arithmetic side of verification conditions: constants, variables, array
//! elements, uninterpreted function values, summations and `+ - *`. Two terms that are equal
//! up to commutativity, associativity, distribution and constant folding simplify to
//! structurally equal trees, so equality of normal forms decides such identities.
//!
//! Layers
//!  - [`dtype`]: the value-type lattice (`Integer`, `NaturalNumber`, bounded ranges, ...) and
//!    the result type of every arithmetic operation. Terms are typed when built.
//!  - [`term`]: construction, inspection, one-step evaluation, fingerprints, printing.
//!  - [`rewrite`]: wildcard patterns, rule sets, and the engine applying them to fixpoint.
//!  - [`linear`]: flattening, ordering and grouping of associative chains.
//!  - [`simplify`]: the normalization pipeline combining the two above.
//!  - [`substitute`]: capture-avoiding variable substitution.
//!
//! Example
//! ```
//! use hyterm::prelude::*;
//!
//! let (a, b, c) = (int("a"), int("b"), int("c"));
//! let left = add(add(a.clone(), b.clone()).unwrap(), c.clone()).unwrap();
//! let right = add(c, add(b, a).unwrap()).unwrap();
//! assert_ne!(left, right);
//! assert_eq!(left.simplified().unwrap(), right.simplified().unwrap());
//! ```

/// Value-type lattice and arithmetic result types.
pub mod dtype;
/// Error type shared by the whole crate.
pub mod error;
/// Canonical form of associative chains.
pub mod linear;
/// Pattern matching and rule-driven rewriting.
pub mod rewrite;
/// Normalization pipeline.
pub mod simplify;
/// Variable substitution.
pub mod substitute;
/// Terms and their elementary operations.
pub mod term;

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - `Term` and its free-function builders from `func::*`
    //! - Value types
    //! - Pretty-printing via `PrettyTerm`
    //! - Simplifier configuration
    pub use crate::dtype::ValueType;
    pub use crate::error::Error;
    pub use crate::simplify::{OrderingMode, Simplifier, SimplifierConfig};
    pub use crate::term::{
        BinaryOperator, HashLevel, Node, Term, TermType, func::*, pretty::PrettyTerm,
    };
}

mod ast;
mod eval;
mod lexical;
mod normalize;
mod op;
mod validate;

#[cfg(test)]
mod tests;

pub use ast::{CompareNode, GroupNode, QueryNode};
pub use normalize::{NormalizeError, NormalizeMode};
pub use op::{Arity, CompareOp, OperatorRegistry};
pub use validate::{ValidateError, ValidatePhase};

pub(crate) use eval::eval;
pub(crate) use normalize::normalize;
pub(crate) use validate::validate;

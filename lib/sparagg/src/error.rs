use oxrdf::Variable;
use sparvalue::{CastError, ValueError};

/// An error raised while evaluating an expression against a single solution.
///
/// Aggregates handle these errors following their own policy: they never reach the caller of
/// [`AggregateExpression::evaluate`](crate::AggregateExpression::evaluate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum EvaluationError {
    /// A value has not the type expected by the operation
    #[error(transparent)]
    Value(#[from] ValueError),
    /// A constructor function failed
    #[error(transparent)]
    Cast(#[from] CastError),
    /// The variable is not one of the variables of the solution sequence
    #[error("The variable {0} is not defined")]
    UnknownVariable(Variable),
    /// The solution does not exist
    #[error("The solution {0} does not exist")]
    UnknownRow(usize),
    #[error("The SPARQL evaluation has been cancelled")]
    Cancelled,
}

/// An error raised by an aggregate function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AggregateError {
    /// The aggregate uses a variable that can never be bound by the group pattern
    #[error("The variable {variable} used in {aggregate} is not bound by the query pattern")]
    QueryMalformed {
        aggregate: &'static str,
        variable: Variable,
    },
}

use crate::cast::CastTarget;
use crate::numeric::NumericType;

/// An error raised when a [`TypedValue`](crate::TypedValue) is read as a type it does not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValueError {
    /// The value is not numeric
    #[error("{0} is not a numeric value")]
    NotNumeric(String),
    /// The numeric value does not fit into the requested representation
    #[error("{value} does not fit into a {target:?} value")]
    Overflow { value: String, target: NumericType },
    /// The value is not of the expected kind
    #[error("{value} is not a {expected}")]
    TypeMismatch {
        value: String,
        expected: &'static str,
    },
}

/// An error raised by one of the XPath constructor functions.
///
/// Casts are explicit operator invocations: they never fall back to a default value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CastError {
    /// The cast is forbidden for the source kind (e.g. `xsd:dateTime` to `xsd:boolean`)
    #[error("Cannot cast {source_kind} to {target}")]
    IllegalCast {
        source_kind: &'static str,
        target: CastTarget,
    },
    /// The cast argument is unbound
    #[error("Cannot cast an unbound value to {0}")]
    CannotCastNull(CastTarget),
    /// The lexical form is not in the target lexical space
    #[error("Cannot cast the value '{value}' to {target}")]
    InvalidLexicalForm { value: String, target: CastTarget },
    /// The numeric value is out of the target value space (overflow, NaN or infinity)
    #[error("The value {value} is out of the {target} value space")]
    OutOfRange { value: String, target: CastTarget },
}

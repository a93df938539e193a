use crate::context::EvaluationContext;
use crate::error::EvaluationError;
use crate::solution::RowId;
use oxrdf::Variable;
use sparvalue::{CastTarget, TypedValue, cast};
use std::fmt;

/// An expression evaluated against a single solution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    Constant(TypedValue),
    Variable(Variable),
    /// A call to one of the XPath constructor functions
    Cast {
        target: CastTarget,
        expression: Box<Self>,
    },
    /// [BOUND](https://www.w3.org/TR/sparql11-query/#func-bound)
    Bound(Variable),
    /// [RAND](https://www.w3.org/TR/sparql11-query/#idp2130040)
    Rand,
}

impl Expression {
    #[inline]
    pub fn cast(target: CastTarget, expression: impl Into<Self>) -> Self {
        Self::Cast {
            target,
            expression: Box::new(expression.into()),
        }
    }

    /// Evaluates the expression node against a solution.
    ///
    /// Sub-expressions are evaluated with [`EvaluationContext::evaluate`].
    /// Returns `None` if the result is unbound.
    pub fn evaluate(
        &self,
        context: &dyn EvaluationContext,
        row: RowId,
    ) -> Result<Option<TypedValue>, EvaluationError> {
        match self {
            Self::Constant(value) => Ok(Some(value.clone())),
            Self::Variable(variable) => Ok(lookup(context, row, variable)?.cloned()),
            Self::Cast { target, expression } => {
                let value = context.evaluate(row, expression)?;
                Ok(Some(cast(value.as_ref(), *target)?))
            }
            Self::Bound(variable) => Ok(Some(lookup(context, row, variable)?.is_some().into())),
            Self::Rand => Ok(Some(context.random().into())),
        }
    }

    /// If the expression always returns the same value for the same solution.
    ///
    /// Evaluations of non deterministic expressions must be neither cached nor reordered.
    pub fn is_deterministic(&self) -> bool {
        match self {
            Self::Constant(_) | Self::Variable(_) | Self::Bound(_) => true,
            Self::Cast { expression, .. } => expression.is_deterministic(),
            Self::Rand => false,
        }
    }

    /// The variable if the expression is a bare variable.
    #[inline]
    pub fn as_variable(&self) -> Option<&Variable> {
        if let Self::Variable(variable) = self {
            Some(variable)
        } else {
            None
        }
    }
}

fn lookup<'a>(
    context: &'a dyn EvaluationContext,
    row: RowId,
    variable: &Variable,
) -> Result<Option<&'a TypedValue>, EvaluationError> {
    let solution = context
        .row(row)
        .ok_or(EvaluationError::UnknownRow(row.index()))?;
    let position = solution
        .position(variable)
        .ok_or_else(|| EvaluationError::UnknownVariable(variable.clone()))?;
    Ok(solution.values().get(position).and_then(Option::as_ref))
}

impl From<TypedValue> for Expression {
    #[inline]
    fn from(value: TypedValue) -> Self {
        Self::Constant(value)
    }
}

impl From<Variable> for Expression {
    #[inline]
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => value.fmt(f),
            Self::Variable(variable) => variable.fmt(f),
            Self::Cast { target, expression } => write!(f, "{}({expression})", target.datatype()),
            Self::Bound(variable) => write!(f, "BOUND({variable})"),
            Self::Rand => f.write_str("RAND()"),
        }
    }
}

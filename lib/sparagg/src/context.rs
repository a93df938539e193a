use crate::error::EvaluationError;
use crate::expression::Expression;
use crate::options::EvaluationOptions;
use crate::solution::{BindingRow, RowId, SolutionSequence};
use oxrdf::Variable;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rustc_hash::FxHashSet;
use sparvalue::TypedValue;
use std::sync::{Mutex, PoisonError};

/// What the aggregates need from the query evaluator.
pub trait EvaluationContext {
    /// Evaluates an expression against a solution, `None` meaning unbound.
    fn evaluate(
        &self,
        row: RowId,
        expression: &Expression,
    ) -> Result<Option<TypedValue>, EvaluationError>;

    /// The variables that the query pattern might bind.
    fn known_variables(&self) -> &FxHashSet<Variable>;

    fn row(&self, row: RowId) -> Option<&BindingRow>;

    /// A random number in `[0, 1)`.
    fn random(&self) -> f64;
}

/// An [`EvaluationContext`] over an in-memory [`SolutionSequence`].
///
/// ```
/// use oxrdf::Variable;
/// use sparagg::{EvaluationContext, EvaluationOptions, Expression, QueryContext, SolutionSequence};
/// use sparvalue::TypedValue;
///
/// let x = Variable::new("x")?;
/// let mut solutions = SolutionSequence::new([x.clone()]);
/// let row = solutions.push([Some(TypedValue::from("foo"))]);
/// let context = QueryContext::new(&solutions, EvaluationOptions::new());
/// assert_eq!(
///     context.evaluate(row, &Expression::Variable(x))?,
///     Some(TypedValue::from("foo"))
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug)]
pub struct QueryContext<'a> {
    solutions: &'a SolutionSequence,
    options: EvaluationOptions,
    rng: Mutex<StdRng>,
}

impl<'a> QueryContext<'a> {
    pub fn new(solutions: &'a SolutionSequence, options: EvaluationOptions) -> Self {
        let seed = options.seed().unwrap_or_else(rand::random);
        Self {
            solutions,
            options,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    #[inline]
    pub fn solutions(&self) -> &'a SolutionSequence {
        self.solutions
    }

    #[inline]
    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }
}

impl EvaluationContext for QueryContext<'_> {
    fn evaluate(
        &self,
        row: RowId,
        expression: &Expression,
    ) -> Result<Option<TypedValue>, EvaluationError> {
        if self.options.is_cancelled() {
            return Err(EvaluationError::Cancelled);
        }
        expression.evaluate(self, row)
    }

    #[inline]
    fn known_variables(&self) -> &FxHashSet<Variable> {
        self.solutions.binder()
    }

    #[inline]
    fn row(&self, row: RowId) -> Option<&BindingRow> {
        self.solutions.row(row)
    }

    fn random(&self) -> f64 {
        let bits = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_u32();
        f64::from(bits) / 4_294_967_296.
    }
}

use crate::context::EvaluationContext;
use crate::error::{AggregateError, EvaluationError};
use crate::expression::Expression;
use crate::solution::{BindingRow, RowId};
use oxsdatatypes::{Decimal, Double, Float, Integer};
use rustc_hash::{FxHashMap, FxHashSet};
use sparvalue::{
    CastTarget, NumericKind, NumericType, TypedValue, cast, cmp_values, partial_cmp_numerics,
};
use std::cmp::Ordering;
use std::fmt;
use tracing::trace;

/// An aggregate function call.
///
/// It is stateless: the same expression can be evaluated on any number of groups, concurrently.
///
/// ```
/// use oxrdf::Variable;
/// use sparagg::{
///     AggregateExpression, AggregateFunction, EvaluationOptions, QueryContext, SolutionSequence,
/// };
/// use sparvalue::TypedValue;
///
/// let x = Variable::new("x")?;
/// let mut solutions = SolutionSequence::new([x.clone()]);
/// for value in [1_i64, 2, 3] {
///     solutions.push([Some(TypedValue::from(value))]);
/// }
/// let context = QueryContext::new(&solutions, EvaluationOptions::new());
/// let sum = AggregateExpression::FunctionCall {
///     name: AggregateFunction::Sum,
///     expr: x.into(),
///     distinct: false,
/// };
/// assert_eq!(
///     sum.evaluate(&context, &solutions.row_ids())?,
///     Some(TypedValue::from(6_i64))
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AggregateExpression {
    /// [Count](https://www.w3.org/TR/sparql11-query/#defn_aggCount) with `*`.
    CountSolutions { distinct: bool },
    FunctionCall {
        name: AggregateFunction,
        expr: Expression,
        distinct: bool,
    },
}

/// An aggregate function name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    /// [Count](https://www.w3.org/TR/sparql11-query/#defn_aggCount) with an expression.
    Count,
    /// [Sum](https://www.w3.org/TR/sparql11-query/#defn_aggSum).
    Sum,
    /// [Avg](https://www.w3.org/TR/sparql11-query/#defn_aggAvg).
    Avg,
    /// [Min](https://www.w3.org/TR/sparql11-query/#defn_aggMin).
    Min,
    /// [Max](https://www.w3.org/TR/sparql11-query/#defn_aggMax).
    Max,
    /// [GroupConcat](https://www.w3.org/TR/sparql11-query/#defn_aggGroupConcat).
    ///
    /// The separator is evaluated against each solution, it defaults to a single space.
    GroupConcat { separator: Option<Expression> },
    /// [Sample](https://www.w3.org/TR/sparql11-query/#defn_aggSample).
    Sample,
    /// If the effective boolean value of the expression is true for all the solutions.
    All,
    /// If the effective boolean value of the expression is true for at least one solution.
    Any,
    /// If the effective boolean value of the expression is true for none of the solutions.
    None,
    /// The value in the middle of the sorted values.
    Median,
    /// The most frequent value.
    Mode,
    /// The smallest numeric value.
    NumericMin,
    /// The largest numeric value.
    NumericMax,
}

impl AggregateFunction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::GroupConcat { .. } => "GROUP_CONCAT",
            Self::Sample => "SAMPLE",
            Self::All => "ALL",
            Self::Any => "ANY",
            Self::None => "NONE",
            Self::Median => "MEDIAN",
            Self::Mode => "MODE",
            Self::NumericMin => "NMIN",
            Self::NumericMax => "NMAX",
        }
    }
}

impl fmt::Display for AggregateFunction {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl AggregateExpression {
    /// Evaluates the aggregate on a group of solutions.
    ///
    /// Errors raised while evaluating the expression on a solution are handled following the aggregate policy:
    /// the solution is skipped or the aggregate evaluates to `None` (unbound).
    /// Only a call that can never be evaluated properly returns an error.
    pub fn evaluate(
        &self,
        context: &dyn EvaluationContext,
        rows: &[RowId],
    ) -> Result<Option<TypedValue>, AggregateError> {
        self.validate(context)?;
        let mut accumulator = self.accumulator();
        for &row in rows {
            if !accumulator.add(context, row) {
                break;
            }
        }
        Ok(accumulator.finish())
    }

    /// If evaluating the aggregate twice on the same group always gives the same result.
    pub fn is_deterministic(&self) -> bool {
        match self {
            Self::CountSolutions { .. } => true,
            Self::FunctionCall { name, expr, .. } => {
                expr.is_deterministic()
                    && match name {
                        AggregateFunction::GroupConcat {
                            separator: Some(separator),
                        } => separator.is_deterministic(),
                        _ => true,
                    }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CountSolutions { .. } => "COUNT",
            Self::FunctionCall { name, .. } => name.name(),
        }
    }

    fn validate(&self, context: &dyn EvaluationContext) -> Result<(), AggregateError> {
        let Self::FunctionCall { name, expr, .. } = self else {
            return Ok(());
        };
        if let Some(variable) = expr.as_variable() {
            if !context.known_variables().contains(variable) {
                return Err(AggregateError::QueryMalformed {
                    aggregate: name.name(),
                    variable: variable.clone(),
                });
            }
        }
        Ok(())
    }

    fn accumulator(&self) -> AccumulatorWrapper<'_> {
        match self {
            Self::CountSolutions { distinct } => {
                if *distinct {
                    AccumulatorWrapper::CountDistinctRows {
                        seen: FxHashSet::default(),
                        count: 0,
                    }
                } else {
                    AccumulatorWrapper::CountRows { count: 0 }
                }
            }
            Self::FunctionCall {
                name,
                expr,
                distinct,
            } => {
                let accumulator: Box<dyn Accumulator + '_> = match name {
                    AggregateFunction::Count => Box::<CountAccumulator>::default(),
                    AggregateFunction::Sum => Box::<SumAccumulator>::default(),
                    AggregateFunction::Avg => Box::<AvgAccumulator>::default(),
                    AggregateFunction::Min => Box::new(ExtremumAccumulator::new(Ordering::Less)),
                    AggregateFunction::Max => {
                        Box::new(ExtremumAccumulator::new(Ordering::Greater))
                    }
                    AggregateFunction::GroupConcat { separator } => {
                        Box::new(GroupConcatAccumulator::new(separator.as_ref()))
                    }
                    AggregateFunction::Sample => Box::<SampleAccumulator>::default(),
                    AggregateFunction::All => Box::new(BooleanAccumulator::all()),
                    AggregateFunction::Any => Box::new(BooleanAccumulator::any()),
                    AggregateFunction::None => Box::new(BooleanAccumulator::none()),
                    AggregateFunction::Median => Box::<MedianAccumulator>::default(),
                    AggregateFunction::Mode => Box::<ModeAccumulator>::default(),
                    AggregateFunction::NumericMin => {
                        Box::new(NumericExtremumAccumulator::new(Ordering::Less))
                    }
                    AggregateFunction::NumericMax => {
                        Box::new(NumericExtremumAccumulator::new(Ordering::Greater))
                    }
                };
                if *distinct {
                    AccumulatorWrapper::DistinctExpression {
                        name: name.name(),
                        expression: expr,
                        seen: FxHashSet::default(),
                        accumulator: Some(accumulator),
                    }
                } else {
                    AccumulatorWrapper::Expression {
                        name: name.name(),
                        expression: expr,
                        accumulator: Some(accumulator),
                    }
                }
            }
        }
    }
}

enum AccumulatorWrapper<'a> {
    CountRows {
        count: u64,
    },
    CountDistinctRows {
        seen: FxHashSet<BindingRow>,
        count: u64,
    },
    Expression {
        name: &'static str,
        expression: &'a Expression,
        accumulator: Option<Box<dyn Accumulator + 'a>>,
    },
    DistinctExpression {
        name: &'static str,
        expression: &'a Expression,
        seen: FxHashSet<TypedValue>,
        accumulator: Option<Box<dyn Accumulator + 'a>>,
    },
}

impl AccumulatorWrapper<'_> {
    /// Returns `false` if the following rows do not need to be evaluated.
    fn add(&mut self, context: &dyn EvaluationContext, row: RowId) -> bool {
        match self {
            Self::CountRows { count } => {
                *count += 1;
            }
            Self::CountDistinctRows { seen, count } => {
                let Some(solution) = context.row(row) else {
                    return true;
                };
                if !seen.contains(solution) {
                    seen.insert(solution.clone());
                    *count += 1;
                }
            }
            Self::Expression {
                name,
                expression,
                accumulator,
            } => {
                let Some(inner) = accumulator else {
                    return false; // Already aborted
                };
                let value = context.evaluate(row, expression);
                let step = inner.add(context, row, value);
                return Self::step(name, row, accumulator, step);
            }
            Self::DistinctExpression {
                name,
                expression,
                seen,
                accumulator,
            } => {
                let Some(inner) = accumulator else {
                    return false;
                };
                let value = context.evaluate(row, expression);
                if let Ok(Some(value)) = &value {
                    if !seen.insert(value.clone()) {
                        return true; // Already seen
                    }
                }
                let step = inner.add(context, row, value);
                return Self::step(name, row, accumulator, step);
            }
        }
        true
    }

    fn step(
        name: &str,
        row: RowId,
        accumulator: &mut Option<Box<dyn Accumulator + '_>>,
        step: Step,
    ) -> bool {
        match step {
            Step::Accumulated => true,
            Step::Skipped(reason) => {
                trace!(aggregate = name, %row, %reason, "solution skipped");
                true
            }
            Step::Aborted(reason) => {
                trace!(aggregate = name, %row, %reason, "aggregate aborted");
                *accumulator = None;
                false
            }
            Step::Finished => false,
        }
    }

    fn finish(self) -> Option<TypedValue> {
        match self {
            Self::CountRows { count } | Self::CountDistinctRows { count, .. } => {
                Some(i64::try_from(count).ok()?.into())
            }
            Self::Expression { accumulator, .. } | Self::DistinctExpression { accumulator, .. } => {
                accumulator?.finish()
            }
        }
    }
}

/// The outcome of adding a solution to an accumulator.
enum Step {
    Accumulated,
    Skipped(Skip),
    /// The aggregate evaluates to unbound whatever the following solutions are
    Aborted(Skip),
    /// The result is known, the following solutions do not need to be evaluated
    Finished,
}

enum Skip {
    Error(EvaluationError),
    Unbound,
    NotNumeric,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(error) => error.fmt(f),
            Self::Unbound => f.write_str("unbound value"),
            Self::NotNumeric => f.write_str("not a numeric value"),
        }
    }
}

/// Splits a solution evaluation into a bound value and the reason why there is none.
fn bound(value: Result<Option<TypedValue>, EvaluationError>) -> Result<TypedValue, Skip> {
    match value {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(Skip::Unbound),
        Err(error) => Err(Skip::Error(error)),
    }
}

trait Accumulator {
    fn add(
        &mut self,
        context: &dyn EvaluationContext,
        row: RowId,
        element: Result<Option<TypedValue>, EvaluationError>,
    ) -> Step;

    fn finish(&mut self) -> Option<TypedValue>;
}

#[derive(Default, Debug)]
struct CountAccumulator {
    count: i64,
}

impl Accumulator for CountAccumulator {
    fn add(
        &mut self,
        _: &dyn EvaluationContext,
        _: RowId,
        element: Result<Option<TypedValue>, EvaluationError>,
    ) -> Step {
        match bound(element) {
            Ok(_) => {
                self.count += 1;
                Step::Accumulated
            }
            Err(reason) => Step::Skipped(reason),
        }
    }

    fn finish(&mut self) -> Option<TypedValue> {
        Some(self.count.into())
    }
}

/// Running totals kept in parallel in all the numeric types.
///
/// A total becomes `None` when it overflows, the total of the widest type seen is the result.
#[derive(Debug)]
struct NumericTotals {
    integer: Option<Integer>,
    decimal: Option<Decimal>,
    float: Float,
    double: Double,
    widest: NumericType,
}

impl Default for NumericTotals {
    fn default() -> Self {
        Self {
            integer: Some(Integer::default()),
            decimal: Some(Decimal::default()),
            float: Float::default(),
            double: Double::default(),
            widest: NumericType::NaN,
        }
    }
}

impl NumericTotals {
    fn add(&mut self, value: NumericKind) {
        self.widest = self.widest.promote(value.numeric_type());
        if self.widest == NumericType::Integer {
            self.integer = self
                .integer
                .and_then(|sum| sum.checked_add(value.as_integer().ok()?));
        }
        if self.widest <= NumericType::Decimal {
            self.decimal = self
                .decimal
                .and_then(|sum| sum.checked_add(value.as_decimal().ok()?));
        }
        self.float = self.float + value.as_float();
        self.double = self.double + value.as_double();
    }

    fn total(&self) -> Option<NumericKind> {
        Some(match self.widest {
            NumericType::NaN | NumericType::Integer => NumericKind::Integer(self.integer?),
            NumericType::Decimal => NumericKind::Decimal(self.decimal?),
            NumericType::Float => NumericKind::Float(self.float),
            NumericType::Double => NumericKind::Double(self.double),
        })
    }
}

#[derive(Default, Debug)]
struct SumAccumulator {
    totals: NumericTotals,
}

impl Accumulator for SumAccumulator {
    fn add(
        &mut self,
        _: &dyn EvaluationContext,
        _: RowId,
        element: Result<Option<TypedValue>, EvaluationError>,
    ) -> Step {
        match bound(element) {
            Ok(value) => {
                let Some(value) = value.as_numeric() else {
                    return Step::Skipped(Skip::NotNumeric);
                };
                self.totals.add(value);
                Step::Accumulated
            }
            Err(reason) => Step::Skipped(reason),
        }
    }

    fn finish(&mut self) -> Option<TypedValue> {
        Some(self.totals.total()?.into())
    }
}

#[derive(Default, Debug)]
struct AvgAccumulator {
    totals: NumericTotals,
    count: i64,
}

impl Accumulator for AvgAccumulator {
    fn add(
        &mut self,
        _: &dyn EvaluationContext,
        _: RowId,
        element: Result<Option<TypedValue>, EvaluationError>,
    ) -> Step {
        match bound(element) {
            Ok(value) => {
                let Some(value) = value.as_numeric() else {
                    return Step::Aborted(Skip::NotNumeric);
                };
                self.totals.add(value);
                self.count += 1;
                Step::Accumulated
            }
            Err(reason) => Step::Aborted(reason),
        }
    }

    fn finish(&mut self) -> Option<TypedValue> {
        if self.count == 0 {
            return None;
        }
        let count = Integer::from(self.count);
        // The average of integers is a decimal
        Some(match self.totals.widest {
            NumericType::NaN | NumericType::Integer | NumericType::Decimal => {
                self.totals.decimal?.checked_div(count)?.into()
            }
            NumericType::Float => (self.totals.float / Float::from(count)).into(),
            NumericType::Double => (self.totals.double / Double::from(count)).into(),
        })
    }
}

/// `MIN` if the ordering is [`Ordering::Less`], `MAX` if it is [`Ordering::Greater`].
#[derive(Debug)]
struct ExtremumAccumulator {
    ordering: Ordering,
    extremum: Option<TypedValue>,
}

impl ExtremumAccumulator {
    fn new(ordering: Ordering) -> Self {
        Self {
            ordering,
            extremum: None,
        }
    }
}

impl Accumulator for ExtremumAccumulator {
    fn add(
        &mut self,
        _: &dyn EvaluationContext,
        _: RowId,
        element: Result<Option<TypedValue>, EvaluationError>,
    ) -> Step {
        let value = match bound(element) {
            Ok(value) => value,
            Err(reason) => return Step::Skipped(reason),
        };
        if self.extremum.is_none()
            || cmp_values(Some(&value), self.extremum.as_ref()) == self.ordering
        {
            self.extremum = Some(value);
        }
        Step::Accumulated
    }

    fn finish(&mut self) -> Option<TypedValue> {
        self.extremum.take()
    }
}

#[derive(Default, Debug)]
struct SampleAccumulator {
    value: Option<TypedValue>,
}

impl Accumulator for SampleAccumulator {
    fn add(
        &mut self,
        _: &dyn EvaluationContext,
        _: RowId,
        element: Result<Option<TypedValue>, EvaluationError>,
    ) -> Step {
        match bound(element) {
            Ok(value) => {
                self.value = Some(value);
                Step::Finished
            }
            Err(reason) => Step::Skipped(reason),
        }
    }

    fn finish(&mut self) -> Option<TypedValue> {
        self.value.take()
    }
}

struct GroupConcatAccumulator<'a> {
    concat: String,
    is_empty: bool,
    separator: Option<&'a Expression>,
}

impl<'a> GroupConcatAccumulator<'a> {
    fn new(separator: Option<&'a Expression>) -> Self {
        Self {
            concat: String::new(),
            is_empty: true,
            separator,
        }
    }
}

impl Accumulator for GroupConcatAccumulator<'_> {
    fn add(
        &mut self,
        context: &dyn EvaluationContext,
        row: RowId,
        element: Result<Option<TypedValue>, EvaluationError>,
    ) -> Step {
        let value = match bound(element) {
            Ok(value) => value,
            Err(reason) => return Step::Skipped(reason),
        };
        let value = match cast(Some(&value), CastTarget::String) {
            Ok(value) => value,
            Err(error) => return Step::Skipped(Skip::Error(error.into())),
        };
        if !self.is_empty {
            if let Some(separator) = self.separator {
                match bound(context.evaluate(row, separator)) {
                    Ok(separator) => self.concat.push_str(&separator.as_string()),
                    Err(reason) => return Step::Skipped(reason),
                }
            } else {
                self.concat.push(' ');
            }
        }
        self.concat.push_str(value.lexical_form());
        self.is_empty = false;
        Step::Accumulated
    }

    fn finish(&mut self) -> Option<TypedValue> {
        Some(TypedValue::simple_string(std::mem::take(&mut self.concat)))
    }
}

/// `ALL`, `ANY` and `NONE`.
#[derive(Debug)]
struct BooleanAccumulator {
    /// The effective boolean value that decides the result
    decisive: bool,
    /// If errors are counted as the decisive value
    errors_are_decisive: bool,
    /// The result if a decisive value has been found
    decided: bool,
    /// The result if no decisive value has been found
    otherwise: bool,
    result: Option<bool>,
}

impl BooleanAccumulator {
    fn all() -> Self {
        Self {
            decisive: false,
            errors_are_decisive: true,
            decided: false,
            otherwise: true,
            result: None,
        }
    }

    fn any() -> Self {
        Self {
            decisive: true,
            errors_are_decisive: false,
            decided: true,
            otherwise: false,
            result: None,
        }
    }

    fn none() -> Self {
        Self {
            decisive: true,
            errors_are_decisive: false,
            decided: false,
            otherwise: true,
            result: None,
        }
    }
}

impl Accumulator for BooleanAccumulator {
    fn add(
        &mut self,
        _: &dyn EvaluationContext,
        _: RowId,
        element: Result<Option<TypedValue>, EvaluationError>,
    ) -> Step {
        let is_decisive = match bound(element) {
            Ok(value) => match value.as_boolean() {
                Ok(value) => value == self.decisive,
                Err(_) if self.errors_are_decisive => true,
                Err(error) => return Step::Skipped(Skip::Error(error.into())),
            },
            Err(_) if self.errors_are_decisive => true,
            Err(reason) => return Step::Skipped(reason),
        };
        if is_decisive {
            self.result = Some(self.decided);
            Step::Finished
        } else {
            Step::Accumulated
        }
    }

    fn finish(&mut self) -> Option<TypedValue> {
        Some(self.result.unwrap_or(self.otherwise).into())
    }
}

#[derive(Default, Debug)]
struct MedianAccumulator {
    values: Vec<TypedValue>,
}

impl Accumulator for MedianAccumulator {
    fn add(
        &mut self,
        _: &dyn EvaluationContext,
        _: RowId,
        element: Result<Option<TypedValue>, EvaluationError>,
    ) -> Step {
        match bound(element) {
            Ok(value) => {
                self.values.push(value);
                Step::Accumulated
            }
            Err(reason) => Step::Skipped(reason),
        }
    }

    fn finish(&mut self) -> Option<TypedValue> {
        self.values.sort_by(|a, b| cmp_values(Some(a), Some(b)));
        let middle = self.values.len() / 2;
        (middle < self.values.len()).then(|| self.values.swap_remove(middle))
    }
}

/// Errors and unbound values are counted together as the unbound value.
#[derive(Default, Debug)]
struct ModeAccumulator {
    counts: FxHashMap<Option<TypedValue>, (usize, usize)>,
}

impl Accumulator for ModeAccumulator {
    fn add(
        &mut self,
        _: &dyn EvaluationContext,
        _: RowId,
        element: Result<Option<TypedValue>, EvaluationError>,
    ) -> Step {
        let first_seen = self.counts.len();
        self.counts
            .entry(element.ok().flatten())
            .or_insert((0, first_seen))
            .0 += 1;
        Step::Accumulated
    }

    fn finish(&mut self) -> Option<TypedValue> {
        // Most frequent first, then unbound, then first seen
        self.counts
            .drain()
            .min_by(|(va, (ca, fa)), (vb, (cb, fb))| {
                cb.cmp(ca)
                    .then_with(|| va.is_some().cmp(&vb.is_some()))
                    .then_with(|| fa.cmp(fb))
            })
            .and_then(|(value, _)| value)
    }
}

/// `NMIN` if the ordering is [`Ordering::Less`], `NMAX` if it is [`Ordering::Greater`].
///
/// The result is returned in the widest type of the values.
#[derive(Debug)]
struct NumericExtremumAccumulator {
    ordering: Ordering,
    extremum: Option<NumericKind>,
    widest: NumericType,
}

impl NumericExtremumAccumulator {
    fn new(ordering: Ordering) -> Self {
        Self {
            ordering,
            extremum: None,
            widest: NumericType::NaN,
        }
    }
}

impl Accumulator for NumericExtremumAccumulator {
    fn add(
        &mut self,
        _: &dyn EvaluationContext,
        _: RowId,
        element: Result<Option<TypedValue>, EvaluationError>,
    ) -> Step {
        let value = match bound(element) {
            Ok(value) => value,
            Err(reason) => return Step::Skipped(reason),
        };
        let Some(value) = value.as_numeric() else {
            return Step::Skipped(Skip::NotNumeric);
        };
        self.widest = self.widest.promote(value.numeric_type());
        let is_better = self.extremum.is_none_or(|extremum| {
            partial_cmp_numerics(value, extremum) == Some(self.ordering)
        });
        if is_better {
            self.extremum = Some(value);
        }
        Step::Accumulated
    }

    fn finish(&mut self) -> Option<TypedValue> {
        Some(self.extremum?.promote_to(self.widest).ok()?.into())
    }
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use crate::options::EvaluationOptions;
    use crate::solution::SolutionSequence;
    use crate::QueryContext;
    use oxrdf::Variable;
    use std::error::Error;
    use std::str::FromStr;

    fn group(values: impl IntoIterator<Item = Option<TypedValue>>) -> (Variable, SolutionSequence) {
        let x = Variable::new_unchecked("x");
        let mut solutions = SolutionSequence::new([x.clone()]);
        for value in values {
            solutions.push([value]);
        }
        (x, solutions)
    }

    fn aggregate(
        name: AggregateFunction,
        values: impl IntoIterator<Item = Option<TypedValue>>,
    ) -> Result<Option<TypedValue>, AggregateError> {
        let (x, solutions) = group(values);
        let context = QueryContext::new(&solutions, EvaluationOptions::new());
        AggregateExpression::FunctionCall {
            name,
            expr: x.into(),
            distinct: false,
        }
        .evaluate(&context, &solutions.row_ids())
    }

    #[test]
    fn sum_keeps_the_widest_type() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            aggregate(
                AggregateFunction::Sum,
                [Some(1_i64.into()), Some(Decimal::from_str("0.5")?.into())]
            )?,
            Some(Decimal::from_str("1.5")?.into())
        );
        assert_eq!(
            aggregate(
                AggregateFunction::Sum,
                [Some(1_u8.into()), Some(2_i8.into())]
            )?,
            Some(3_i64.into())
        );
        assert_eq!(
            aggregate(
                AggregateFunction::Sum,
                [Some(1_i64.into()), Some(0.5_f32.into())]
            )?,
            Some(1.5_f32.into())
        );
        Ok(())
    }

    #[test]
    fn sum_integer_overflow_is_unbound() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            aggregate(
                AggregateFunction::Sum,
                [Some(i64::MAX.into()), Some(1_i64.into())]
            )?,
            None
        );
        Ok(())
    }

    #[test]
    fn sum_overflow_in_a_narrower_type_is_ignored() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            aggregate(
                AggregateFunction::Sum,
                [
                    Some(i64::MAX.into()),
                    Some(i64::MAX.into()),
                    Some(1_f64.into())
                ]
            )?,
            Some(2_f64.powi(64).into())
        );
        Ok(())
    }

    #[test]
    fn avg_type() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            aggregate(
                AggregateFunction::Avg,
                [Some(1_i64.into()), Some(2_i64.into())]
            )?,
            Some(Decimal::from_str("1.5")?.into())
        );
        assert_eq!(
            aggregate(
                AggregateFunction::Avg,
                [Some(1_f32.into()), Some(2_i64.into())]
            )?,
            Some(1.5_f32.into())
        );
        assert_eq!(
            aggregate(
                AggregateFunction::Avg,
                [Some(1_i64.into()), Some("a".into())]
            )?,
            None
        );
        Ok(())
    }

    #[test]
    fn median() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            aggregate(
                AggregateFunction::Median,
                [
                    Some(5_i64.into()),
                    None,
                    Some(1_i64.into()),
                    Some(3_i64.into()),
                    Some(4_i64.into())
                ]
            )?,
            Some(4_i64.into())
        );
        assert_eq!(aggregate(AggregateFunction::Median, [])?, None);
        Ok(())
    }

    #[test]
    fn mode() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            aggregate(
                AggregateFunction::Mode,
                [
                    Some("b".into()),
                    Some("a".into()),
                    Some("a".into()),
                    Some("b".into()),
                    None
                ]
            )?,
            Some("b".into())
        );
        assert_eq!(
            aggregate(
                AggregateFunction::Mode,
                [Some("a".into()), None, None, Some("a".into())]
            )?,
            None
        );
        assert_eq!(aggregate(AggregateFunction::Mode, [])?, None);
        Ok(())
    }

    #[test]
    fn numeric_extremums() -> Result<(), Box<dyn Error>> {
        let values = [
            Some(TypedValue::from(3_i64)),
            Some("z".into()),
            Some(1.5_f32.into()),
            None,
            Some(Decimal::from_str("-2")?.into()),
        ];
        assert_eq!(
            aggregate(AggregateFunction::NumericMin, values.clone())?,
            Some((-2_f32).into())
        );
        assert_eq!(
            aggregate(AggregateFunction::NumericMax, values)?,
            Some(3_f32.into())
        );
        assert_eq!(
            aggregate(AggregateFunction::NumericMax, [Some("z".into())])?,
            None
        );
        Ok(())
    }

    #[test]
    fn boolean_aggregates() -> Result<(), Box<dyn Error>> {
        let mixed: [Option<TypedValue>; 3] =
            [Some(true.into()), Some(0_i64.into()), Some("x".into())];
        assert_eq!(
            aggregate(AggregateFunction::All, mixed.clone())?,
            Some(false.into())
        );
        assert_eq!(
            aggregate(AggregateFunction::Any, mixed.clone())?,
            Some(true.into())
        );
        assert_eq!(
            aggregate(AggregateFunction::None, mixed)?,
            Some(false.into())
        );
        let with_error: [Option<TypedValue>; 2] = [Some(true.into()), None];
        assert_eq!(
            aggregate(AggregateFunction::All, with_error.clone())?,
            Some(false.into())
        );
        assert_eq!(
            aggregate(AggregateFunction::None, [Some(false.into()), None])?,
            Some(true.into())
        );
        assert_eq!(
            aggregate(AggregateFunction::Any, with_error)?,
            Some(true.into())
        );
        assert_eq!(aggregate(AggregateFunction::All, [])?, Some(true.into()));
        assert_eq!(aggregate(AggregateFunction::Any, [])?, Some(false.into()));
        assert_eq!(aggregate(AggregateFunction::None, [])?, Some(true.into()));
        Ok(())
    }

    #[test]
    fn determinism() {
        let x = Variable::new_unchecked("x");
        assert!(AggregateExpression::CountSolutions { distinct: false }.is_deterministic());
        assert!(
            AggregateExpression::FunctionCall {
                name: AggregateFunction::Sum,
                expr: x.clone().into(),
                distinct: false,
            }
            .is_deterministic()
        );
        assert!(
            !AggregateExpression::FunctionCall {
                name: AggregateFunction::GroupConcat {
                    separator: Some(Expression::cast(CastTarget::String, Expression::Rand)),
                },
                expr: x.into(),
                distinct: false,
            }
            .is_deterministic()
        );
    }
}

use oxrdf::Variable;
use rustc_hash::FxHashSet;
use sparvalue::TypedValue;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The identifier of a solution inside a [`SolutionSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(usize);

impl RowId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for RowId {
    #[inline]
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for RowId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A solution: a tuple of values, one for each variable of the [`SolutionSequence`].
///
/// Two rows are equal if all their bindings are equal values.
#[derive(Debug, Clone)]
pub struct BindingRow {
    variables: Arc<[Variable]>,
    values: Vec<Option<TypedValue>>,
}

impl BindingRow {
    /// The value bound to the variable, `None` if it is unbound.
    #[inline]
    pub fn get(&self, variable: &Variable) -> Option<&TypedValue> {
        self.values
            .get(self.position(variable)?)
            .and_then(Option::as_ref)
    }

    /// The position of the variable in the row, `None` if the variable is not a column of the sequence.
    #[inline]
    pub fn position(&self, variable: &Variable) -> Option<usize> {
        self.variables.iter().position(|v| v == variable)
    }

    #[inline]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[inline]
    pub fn values(&self) -> &[Option<TypedValue>] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Has the row no column?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Are all the variables of the row unbound?
    #[inline]
    pub fn is_unbound(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Iterates over the bound variables.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &TypedValue)> {
        self.variables
            .iter()
            .zip(&self.values)
            .filter_map(|(variable, value)| Some((variable, value.as_ref()?)))
    }
}

impl PartialEq for BindingRow {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for BindingRow {}

impl Hash for BindingRow {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.values.hash(state)
    }
}

/// An ordered sequence of solutions sharing the same variables.
///
/// The *binder* is the set of variables that the query pattern might bind.
/// By default it is the set of the sequence variables.
///
/// ```
/// use oxrdf::Variable;
/// use sparagg::SolutionSequence;
/// use sparvalue::TypedValue;
///
/// let x = Variable::new("x")?;
/// let mut solutions = SolutionSequence::new([x.clone()]);
/// let row = solutions.push([Some(TypedValue::from(1_i64))]);
/// assert_eq!(
///     solutions.row(row).and_then(|row| row.get(&x)),
///     Some(&TypedValue::from(1_i64))
/// );
/// assert!(solutions.binder().contains(&x));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone)]
pub struct SolutionSequence {
    variables: Arc<[Variable]>,
    rows: Vec<BindingRow>,
    binder: FxHashSet<Variable>,
}

impl SolutionSequence {
    pub fn new(variables: impl IntoIterator<Item = Variable>) -> Self {
        let variables = variables.into_iter().collect::<Arc<[_]>>();
        Self {
            binder: variables.iter().cloned().collect(),
            variables,
            rows: Vec::new(),
        }
    }

    /// Sets the variables that the query pattern might bind.
    #[must_use]
    pub fn with_binder(mut self, binder: impl IntoIterator<Item = Variable>) -> Self {
        self.binder = binder.into_iter().collect();
        self
    }

    /// Adds a solution at the end of the sequence.
    ///
    /// The values are given in the order of the sequence variables.
    /// Missing values are unbound and extra values are ignored.
    pub fn push(&mut self, values: impl IntoIterator<Item = Option<TypedValue>>) -> RowId {
        let mut values = values
            .into_iter()
            .take(self.variables.len())
            .collect::<Vec<_>>();
        values.resize(self.variables.len(), None);
        self.rows.push(BindingRow {
            variables: Arc::clone(&self.variables),
            values,
        });
        RowId(self.rows.len() - 1)
    }

    #[inline]
    pub fn row(&self, row: RowId) -> Option<&BindingRow> {
        self.rows.get(row.0)
    }

    /// The identifiers of all the solutions, in order.
    pub fn row_ids(&self) -> Vec<RowId> {
        (0..self.rows.len()).map(RowId).collect()
    }

    #[inline]
    pub fn rows(&self) -> &[BindingRow] {
        &self.rows
    }

    #[inline]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[inline]
    pub fn binder(&self) -> &FxHashSet<Variable> {
        &self.binder
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

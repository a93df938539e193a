#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod aggregate;
mod context;
mod error;
mod expression;
mod options;
mod solution;

pub use crate::aggregate::{AggregateExpression, AggregateFunction};
pub use crate::context::{EvaluationContext, QueryContext};
pub use crate::error::{AggregateError, EvaluationError};
pub use crate::expression::Expression;
pub use crate::options::{CancellationToken, EvaluationOptions};
pub use crate::solution::{BindingRow, RowId, SolutionSequence};

#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod cast;
mod error;
mod factory;
mod numeric;
mod order;
mod value;

pub use crate::cast::{CastTarget, cast};
pub use crate::error::{CastError, ValueError};
pub use crate::factory::Node;
pub use crate::numeric::{NumericKind, NumericType, NumericValue};
pub use crate::order::{cmp_values, partial_cmp_numerics, partial_cmp_values};
pub use crate::value::{GraphLiteral, StringTag, StringValue, TypedValue};

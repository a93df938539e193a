use crate::numeric::NumericKind;
use crate::value::{StringTag, TypedValue};
use oxsdatatypes::{Date, DateTime, TimezoneOffset};
use std::cmp::Ordering;

/// The total order used by `ORDER BY`, `MIN` and `MAX`.
///
/// Unbound values come first, then blank nodes, IRIs, literals, graph literals and variables.
/// Literals that are not comparable with [`partial_cmp_values`] are ordered by kind, then lexical form, datatype and language.
/// Dates and date times without timezone are ordered as if they were in UTC.
///
/// ```
/// use sparvalue::{TypedValue, cmp_values};
/// use std::cmp::Ordering;
///
/// let one = TypedValue::from(1_i64);
/// let half = TypedValue::from(0.5_f64);
/// assert_eq!(cmp_values(Some(&half), Some(&one)), Ordering::Less);
/// assert_eq!(cmp_values(None, Some(&half)), Ordering::Less);
/// ```
pub fn cmp_values(a: Option<&TypedValue>, b: Option<&TypedValue>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (a, b) {
            (TypedValue::Blank(a), TypedValue::Blank(b)) => a.as_str().cmp(b.as_str()),
            (TypedValue::Uri(a), TypedValue::Uri(b)) => a.as_str().cmp(b.as_str()),
            (TypedValue::GraphLiteral(a), TypedValue::GraphLiteral(b)) => {
                if a == b {
                    Ordering::Equal
                } else {
                    a.to_string().cmp(&b.to_string())
                }
            }
            (TypedValue::Variable(a), TypedValue::Variable(b)) => a.as_str().cmp(b.as_str()),
            (TypedValue::DateTime { value: a, .. }, TypedValue::DateTime { value: b, .. }) => {
                cmp_date_times(*a, *b)
            }
            (TypedValue::Date { value: a, .. }, TypedValue::Date { value: b, .. }) => {
                cmp_dates(*a, *b)
            }
            _ if a.is_literal() && b.is_literal() => {
                partial_cmp_values(a, b).unwrap_or_else(|| {
                    (
                        literal_rank(a),
                        a.lexical_form(),
                        a.datatype(),
                        language(a),
                    )
                        .cmp(&(
                            literal_rank(b),
                            b.lexical_form(),
                            b.datatype(),
                            language(b),
                        ))
                })
            }
            _ => term_rank(a).cmp(&term_rank(b)),
        },
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Comparison for the `<`, `>`, `<=` and `>=` operators.
///
/// Numbers are compared after promotion to their common type.
/// Returns `None` when the two values are not comparable.
pub fn partial_cmp_values(a: &TypedValue, b: &TypedValue) -> Option<Ordering> {
    match (a, b) {
        (TypedValue::Numeric(a), TypedValue::Numeric(b)) => {
            partial_cmp_numerics(a.kind(), b.kind())
        }
        (TypedValue::Boolean { value: a, .. }, TypedValue::Boolean { value: b, .. }) => {
            Some(bool::from(*a).cmp(&bool::from(*b)))
        }
        (TypedValue::DateTime { value: a, .. }, TypedValue::DateTime { value: b, .. }) => {
            a.partial_cmp(b)
        }
        (TypedValue::Date { value: a, .. }, TypedValue::Date { value: b, .. }) => {
            a.partial_cmp(b)
        }
        (TypedValue::String(a), TypedValue::String(b)) => match (a.tag(), b.tag()) {
            (StringTag::Simple, StringTag::Simple) => Some(a.value().cmp(b.value())),
            (StringTag::Language(la), StringTag::Language(lb)) if la == lb => {
                Some(a.value().cmp(b.value()))
            }
            _ => (a == b).then_some(Ordering::Equal),
        },
        _ => (a == b).then_some(Ordering::Equal),
    }
}

/// Compares two numbers after promoting them to the widest of their two types.
pub fn partial_cmp_numerics(a: NumericKind, b: NumericKind) -> Option<Ordering> {
    let common = a.numeric_type().promote(b.numeric_type());
    match (a.promote_to(common).ok()?, b.promote_to(common).ok()?) {
        (NumericKind::Integer(a), NumericKind::Integer(b)) => Some(a.cmp(&b)),
        (NumericKind::Decimal(a), NumericKind::Decimal(b)) => Some(a.cmp(&b)),
        (NumericKind::Float(a), NumericKind::Float(b)) => a.partial_cmp(&b),
        (NumericKind::Double(a), NumericKind::Double(b)) => a.partial_cmp(&b),
        _ => None,
    }
}

// The partial order is undefined within 14 hours between values with and without timezone
fn cmp_date_times(a: DateTime, b: DateTime) -> Ordering {
    let utc = Some(TimezoneOffset::UTC);
    a.adjust(utc)
        .partial_cmp(&b.adjust(utc))
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            a.timezone_offset()
                .is_some()
                .cmp(&b.timezone_offset().is_some())
        })
}

fn cmp_dates(a: Date, b: Date) -> Ordering {
    let utc = Some(TimezoneOffset::UTC);
    a.adjust(utc)
        .partial_cmp(&b.adjust(utc))
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            a.timezone_offset()
                .is_some()
                .cmp(&b.timezone_offset().is_some())
        })
}

fn term_rank(value: &TypedValue) -> u8 {
    match value {
        TypedValue::Blank(_) => 0,
        TypedValue::Uri(_) => 1,
        TypedValue::Boolean { .. }
        | TypedValue::Numeric(_)
        | TypedValue::DateTime { .. }
        | TypedValue::Date { .. }
        | TypedValue::String(_) => 2,
        TypedValue::GraphLiteral(_) => 3,
        TypedValue::Variable(_) => 4,
    }
}

fn literal_rank(value: &TypedValue) -> u8 {
    match value {
        TypedValue::Boolean { .. } => 0,
        TypedValue::Numeric(_) => 1,
        TypedValue::DateTime { .. } => 2,
        TypedValue::Date { .. } => 3,
        _ => 4,
    }
}

fn language(value: &TypedValue) -> Option<&str> {
    if let TypedValue::String(value) = value {
        value.language()
    } else {
        None
    }
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, NamedNode, Variable};
    use oxsdatatypes::Decimal;
    use std::error::Error;
    use std::str::FromStr;

    #[test]
    fn term_kinds() -> Result<(), Box<dyn Error>> {
        let mut values = vec![
            Some(TypedValue::from(Variable::new("v")?)),
            Some(TypedValue::from("a")),
            Some(TypedValue::from(NamedNode::new("http://example.com")?)),
            None,
            Some(TypedValue::from(BlankNode::new("b")?)),
        ];
        values.sort_by(|a, b| cmp_values(a.as_ref(), b.as_ref()));
        assert_eq!(
            values,
            vec![
                None,
                Some(TypedValue::from(BlankNode::new("b")?)),
                Some(TypedValue::from(NamedNode::new("http://example.com")?)),
                Some(TypedValue::from("a")),
                Some(TypedValue::from(Variable::new("v")?)),
            ]
        );
        Ok(())
    }

    #[test]
    fn numbers_across_widths() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            partial_cmp_values(
                &TypedValue::from(2_i64),
                &TypedValue::from(Decimal::from_str("1.5")?)
            ),
            Some(Ordering::Greater)
        );
        assert_eq!(
            partial_cmp_values(&TypedValue::from(1_u8), &TypedValue::from(1_f32)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            partial_cmp_values(&TypedValue::from(f64::NAN), &TypedValue::from(1_i64)),
            None
        );
        Ok(())
    }

    #[test]
    fn incomparable_literals_are_still_ordered() {
        let a = TypedValue::from(1_i64);
        let b = TypedValue::from("1");
        assert_eq!(partial_cmp_values(&a, &b), None);
        assert_eq!(cmp_values(Some(&a), Some(&b)), Ordering::Less);
        assert_eq!(cmp_values(Some(&b), Some(&a)), Ordering::Greater);
    }

    #[test]
    fn date_times_with_and_without_timezone_are_totally_ordered() -> Result<(), Box<dyn Error>> {
        let east = TypedValue::from(DateTime::from_str("2020-01-01T13:00:00+05:00")?);
        let utc = TypedValue::from(DateTime::from_str("2020-01-01T12:00:00Z")?);
        let local = TypedValue::from(DateTime::from_str("2020-01-01T12:30:00")?);
        assert_eq!(partial_cmp_values(&local, &east), None);
        assert_eq!(cmp_values(Some(&east), Some(&utc)), Ordering::Less);
        assert_eq!(cmp_values(Some(&utc), Some(&local)), Ordering::Less);
        assert_eq!(cmp_values(Some(&east), Some(&local)), Ordering::Less);
        assert_eq!(cmp_values(Some(&local), Some(&east)), Ordering::Greater);

        let same_instant = TypedValue::from(DateTime::from_str("2020-01-01T12:00:00")?);
        assert_eq!(cmp_values(Some(&same_instant), Some(&utc)), Ordering::Less);
        assert_eq!(
            cmp_values(
                Some(&utc),
                Some(&TypedValue::from(DateTime::from_str("2020-01-01T13:00:00+01:00")?))
            ),
            Ordering::Equal
        );
        Ok(())
    }

    #[test]
    fn dates_with_and_without_timezone_are_totally_ordered() -> Result<(), Box<dyn Error>> {
        let local = TypedValue::from(Date::from_str("2020-01-02")?);
        let east = TypedValue::from(Date::from_str("2020-01-02+10:00")?);
        assert_eq!(cmp_values(Some(&east), Some(&local)), Ordering::Less);
        assert_eq!(cmp_values(Some(&local), Some(&east)), Ordering::Greater);
        Ok(())
    }

    #[test]
    fn language_strings() {
        let en = TypedValue::lang_string("b", "en");
        let fr = TypedValue::lang_string("a", "fr");
        assert_eq!(partial_cmp_values(&en, &fr), None);
        assert_eq!(
            partial_cmp_values(&en, &TypedValue::lang_string("c", "en")),
            Some(Ordering::Less)
        );
    }
}

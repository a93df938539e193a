use crate::error::CastError;
use crate::numeric::{NumericKind, NumericType};
use crate::value::{StringTag, StringValue, TypedValue};
use oxrdf::NamedNodeRef;
use oxrdf::vocab::xsd;
use oxsdatatypes::{Boolean, Decimal, Double, Float, Integer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The [XPath constructor functions](https://www.w3.org/TR/sparql11-query/#FunctionMapping) supported by [`cast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastTarget {
    Boolean,
    Decimal,
    Double,
    Float,
    Integer,
    String,
}

impl CastTarget {
    /// The IRI of the target datatype, which is also the IRI of the constructor function.
    pub fn datatype(self) -> NamedNodeRef<'static> {
        match self {
            Self::Boolean => xsd::BOOLEAN,
            Self::Decimal => xsd::DECIMAL,
            Self::Double => xsd::DOUBLE,
            Self::Float => xsd::FLOAT,
            Self::Integer => xsd::INTEGER,
            Self::String => xsd::STRING,
        }
    }

    /// Recognizes a constructor function call.
    ///
    /// ```
    /// use oxrdf::vocab::xsd;
    /// use sparvalue::CastTarget;
    ///
    /// assert_eq!(CastTarget::from_datatype(xsd::FLOAT), Some(CastTarget::Float));
    /// assert_eq!(CastTarget::from_datatype(xsd::DATE_TIME), None);
    /// ```
    pub fn from_datatype(datatype: NamedNodeRef<'_>) -> Option<Self> {
        Some(match datatype {
            xsd::BOOLEAN => Self::Boolean,
            xsd::DECIMAL => Self::Decimal,
            xsd::DOUBLE => Self::Double,
            xsd::FLOAT => Self::Float,
            xsd::INTEGER => Self::Integer,
            xsd::STRING => Self::String,
            _ => return None,
        })
    }

    fn numeric_type(self) -> NumericType {
        match self {
            Self::Decimal => NumericType::Decimal,
            Self::Double => NumericType::Double,
            Self::Float => NumericType::Float,
            Self::Integer => NumericType::Integer,
            Self::Boolean | Self::String => NumericType::NaN,
        }
    }
}

impl fmt::Display for CastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "xsd:boolean",
            Self::Decimal => "xsd:decimal",
            Self::Double => "xsd:double",
            Self::Float => "xsd:float",
            Self::Integer => "xsd:integer",
            Self::String => "xsd:string",
        })
    }
}

/// Applies a constructor function to an evaluated argument (`None` if the argument is unbound).
///
/// ```
/// use oxrdf::Literal;
/// use oxrdf::vocab::xsd;
/// use sparvalue::{CastError, CastTarget, TypedValue, cast};
///
/// let value = TypedValue::from(Literal::new_typed_literal("42", xsd::STRING));
/// assert_eq!(cast(Some(&value), CastTarget::Integer)?, TypedValue::from(42_i64));
///
/// let date = TypedValue::from(Literal::new_typed_literal("2020-01-01", xsd::DATE));
/// assert!(matches!(
///     cast(Some(&date), CastTarget::Boolean),
///     Err(CastError::IllegalCast { .. })
/// ));
/// # Result::<_, CastError>::Ok(())
/// ```
pub fn cast(value: Option<&TypedValue>, target: CastTarget) -> Result<TypedValue, CastError> {
    let Some(value) = value else {
        debug!(%target, "cannot cast an unbound value");
        return Err(CastError::CannotCastNull(target));
    };
    let result = match target {
        CastTarget::Boolean => to_boolean(value),
        CastTarget::String => Ok(TypedValue::simple_string(value.as_string())),
        CastTarget::Decimal | CastTarget::Double | CastTarget::Float | CastTarget::Integer => {
            to_numeric(value, target)
        }
    };
    if let Err(error) = &result {
        debug!(%target, %value, %error, "cast rejected");
    }
    result
}

fn to_boolean(value: &TypedValue) -> Result<TypedValue, CastError> {
    let target = CastTarget::Boolean;
    match value {
        TypedValue::Boolean { .. } => Ok(value.clone()),
        TypedValue::Numeric(numeric) => Ok(numeric.kind().as_boolean().into()),
        TypedValue::String(string) => {
            if let Some(numeric) = parse_malformed_numeric(string, target)? {
                return Ok(numeric.as_boolean().into());
            }
            let lexical = string.value().trim();
            Boolean::from_str(lexical)
                .map(Into::into)
                .map_err(|_| CastError::InvalidLexicalForm {
                    value: lexical.into(),
                    target,
                })
        }
        TypedValue::DateTime { .. }
        | TypedValue::Date { .. }
        | TypedValue::Uri(_)
        | TypedValue::Blank(_)
        | TypedValue::GraphLiteral(_)
        | TypedValue::Variable(_) => Err(illegal_cast(value, target)),
    }
}

fn to_numeric(value: &TypedValue, target: CastTarget) -> Result<TypedValue, CastError> {
    match value {
        TypedValue::Numeric(numeric) => {
            if numeric.datatype() == target.datatype() {
                return Ok(value.clone());
            }
            convert(numeric.kind(), target)
        }
        TypedValue::Boolean { value, .. } => {
            let bit = Integer::from(i64::from(bool::from(*value)));
            convert(NumericKind::Integer(bit), target)
        }
        TypedValue::String(string) => {
            if let Some(numeric) = parse_malformed_numeric(string, target)? {
                return convert(numeric, target);
            }
            let lexical = string.value().trim();
            let invalid = || CastError::InvalidLexicalForm {
                value: lexical.into(),
                target,
            };
            Ok(match target {
                CastTarget::Integer => Integer::from_str(lexical).map_err(|_| invalid())?.into(),
                CastTarget::Decimal => Decimal::from_str(lexical).map_err(|_| invalid())?.into(),
                CastTarget::Float => Float::from_str(lexical).map_err(|_| invalid())?.into(),
                CastTarget::Double => Double::from_str(lexical).map_err(|_| invalid())?.into(),
                CastTarget::Boolean | CastTarget::String => return Err(invalid()),
            })
        }
        TypedValue::DateTime { .. }
        | TypedValue::Date { .. }
        | TypedValue::Uri(_)
        | TypedValue::Blank(_)
        | TypedValue::GraphLiteral(_)
        | TypedValue::Variable(_) => Err(illegal_cast(value, target)),
    }
}

fn convert(kind: NumericKind, target: CastTarget) -> Result<TypedValue, CastError> {
    let out_of_range = |_| CastError::OutOfRange {
        value: kind.to_string(),
        target,
    };
    Ok(match target {
        CastTarget::Integer => kind.as_integer().map_err(out_of_range)?.into(),
        CastTarget::Decimal => kind.as_decimal().map_err(out_of_range)?.into(),
        CastTarget::Float => kind.as_float().into(),
        CastTarget::Double => kind.as_double().into(),
        CastTarget::Boolean => kind.as_boolean().into(),
        CastTarget::String => TypedValue::simple_string(kind.to_string()),
    })
}

/// Handles the strings that kept a numeric or temporal datatype because their lexical form is not valid for it.
///
/// Temporal datatypes are never castable to numbers or booleans.
/// Numeric ones are parsed with their datatype family, without the value space restrictions of the subtypes.
fn parse_malformed_numeric(
    string: &StringValue,
    target: CastTarget,
) -> Result<Option<NumericKind>, CastError> {
    let StringTag::Datatype(datatype) = string.tag() else {
        return Ok(None);
    };
    let datatype = datatype.as_ref();
    if matches!(
        datatype,
        xsd::DATE_TIME | xsd::DATE_TIME_STAMP | xsd::DATE | xsd::TIME
    ) {
        return Err(CastError::IllegalCast {
            source_kind: "a temporal literal",
            target,
        });
    }
    let lexical = string.value().trim();
    let parsed = match NumericType::from_datatype(datatype) {
        NumericType::NaN => return Ok(None),
        NumericType::Integer => Integer::from_str(lexical).ok().map(NumericKind::from),
        NumericType::Decimal => Decimal::from_str(lexical).ok().map(NumericKind::from),
        NumericType::Float => Float::from_str(lexical).ok().map(NumericKind::from),
        NumericType::Double => Double::from_str(lexical).ok().map(NumericKind::from),
    };
    parsed
        .map(Some)
        .ok_or_else(|| CastError::InvalidLexicalForm {
            value: lexical.into(),
            target,
        })
}

fn illegal_cast(value: &TypedValue, target: CastTarget) -> CastError {
    CastError::IllegalCast {
        source_kind: value.kind_name(),
        target,
    }
}

use crate::numeric::{NumericKind, NumericValue, is_integer_datatype};
use crate::value::{GraphLiteral, TypedValue};
use oxrdf::vocab::xsd;
use oxrdf::{BlankNode, Literal, LiteralRef, NamedNode, NamedNodeRef, Variable};
use oxsdatatypes::{Boolean, Date, DateTime, Decimal, Double, Float, Integer};

/// A node flowing through query evaluation, before it has been decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
    GraphLiteral(GraphLiteral),
    Variable(Variable),
    /// A node that has already been decoded
    Value(TypedValue),
}

impl From<NamedNode> for Node {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Self::NamedNode(node)
    }
}

impl From<BlankNode> for Node {
    #[inline]
    fn from(node: BlankNode) -> Self {
        Self::BlankNode(node)
    }
}

impl From<Literal> for Node {
    #[inline]
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<GraphLiteral> for Node {
    #[inline]
    fn from(graph: GraphLiteral) -> Self {
        Self::GraphLiteral(graph)
    }
}

impl From<Variable> for Node {
    #[inline]
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl From<TypedValue> for Node {
    #[inline]
    fn from(value: TypedValue) -> Self {
        Self::Value(value)
    }
}

impl TypedValue {
    /// Decodes a node.
    ///
    /// This operation never fails: literals whose lexical form is not valid for their datatype
    /// are kept as strings tagged with their datatype.
    ///
    /// ```
    /// use oxrdf::Literal;
    /// use oxrdf::vocab::xsd;
    /// use sparvalue::{NumericType, TypedValue};
    ///
    /// let valid = TypedValue::from_node(Literal::new_typed_literal("12", xsd::SHORT).into());
    /// assert_eq!(valid.numeric_type(), NumericType::Integer);
    ///
    /// let invalid = TypedValue::from_node(Literal::new_typed_literal("-12", xsd::UNSIGNED_SHORT).into());
    /// assert_eq!(invalid.numeric_type(), NumericType::NaN);
    /// assert_eq!(invalid.datatype(), Some(xsd::UNSIGNED_SHORT));
    /// ```
    pub fn from_node(node: Node) -> Self {
        match node {
            Node::NamedNode(node) => Self::Uri(node),
            Node::BlankNode(node) => Self::Blank(node),
            Node::Literal(literal) => literal.as_ref().into(),
            Node::GraphLiteral(graph) => Self::GraphLiteral(graph),
            Node::Variable(variable) => Self::Variable(variable),
            Node::Value(value) => value,
        }
    }
}

impl From<Node> for TypedValue {
    #[inline]
    fn from(node: Node) -> Self {
        Self::from_node(node)
    }
}

impl From<Literal> for TypedValue {
    #[inline]
    fn from(literal: Literal) -> Self {
        literal.as_ref().into()
    }
}

impl From<LiteralRef<'_>> for TypedValue {
    fn from(literal: LiteralRef<'_>) -> Self {
        if let Some(language) = literal.language() {
            return Self::lang_string(literal.value(), language);
        }
        let datatype = literal.datatype();
        parse_typed_literal(literal.value(), datatype)
            .unwrap_or_else(|| Self::typed_string(literal.value(), datatype))
    }
}

fn parse_typed_literal(value: &str, datatype: NamedNodeRef<'_>) -> Option<TypedValue> {
    Some(match datatype {
        xsd::STRING => TypedValue::simple_string(value),
        xsd::BOOLEAN => TypedValue::Boolean {
            value: value.parse::<Boolean>().ok()?,
            lexical: value.into(),
        },
        xsd::DECIMAL => numeric(value.parse::<Decimal>().ok()?, value, datatype),
        xsd::FLOAT => numeric(value.parse::<Float>().ok()?, value, datatype),
        xsd::DOUBLE => numeric(value.parse::<Double>().ok()?, value, datatype),
        xsd::BYTE => numeric(value.parse::<i8>().ok()?, value, datatype),
        xsd::UNSIGNED_BYTE => numeric(value.parse::<u8>().ok()?, value, datatype),
        xsd::DATE_TIME | xsd::DATE_TIME_STAMP => {
            let parsed = value.parse::<DateTime>().ok()?;
            if datatype == xsd::DATE_TIME_STAMP && parsed.timezone().is_none() {
                return None;
            }
            TypedValue::DateTime {
                value: parsed,
                lexical: value.into(),
            }
        }
        xsd::DATE => TypedValue::Date {
            value: value.parse::<Date>().ok()?,
            lexical: value.into(),
        },
        _ if is_integer_datatype(datatype) => {
            let parsed = value.parse::<Integer>().ok()?;
            if !is_in_integer_subtype_range(i64::from(parsed), datatype) {
                return None;
            }
            numeric(parsed, value, datatype)
        }
        _ => return None,
    })
}

fn numeric(kind: impl Into<NumericKind>, lexical: &str, datatype: NamedNodeRef<'_>) -> TypedValue {
    TypedValue::Numeric(NumericValue::new_with_lexical_form(
        kind.into(),
        datatype.into_owned(),
        lexical.into(),
    ))
}

/// The value space restrictions of the types derived from `xsd:integer`.
///
/// Values are stored on 64 bits so `xsd:unsignedLong` values above `i64::MAX` are rejected earlier by the parser.
fn is_in_integer_subtype_range(value: i64, datatype: NamedNodeRef<'_>) -> bool {
    match datatype {
        xsd::INT => i32::try_from(value).is_ok(),
        xsd::SHORT => i16::try_from(value).is_ok(),
        xsd::UNSIGNED_INT => u32::try_from(value).is_ok(),
        xsd::UNSIGNED_SHORT => u16::try_from(value).is_ok(),
        xsd::UNSIGNED_LONG | xsd::NON_NEGATIVE_INTEGER => value >= 0,
        xsd::POSITIVE_INTEGER => value > 0,
        xsd::NON_POSITIVE_INTEGER => value <= 0,
        xsd::NEGATIVE_INTEGER => value < 0,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericType;

    fn decode(value: &str, datatype: NamedNodeRef<'_>) -> TypedValue {
        Literal::new_typed_literal(value, datatype).into()
    }

    #[test]
    fn integer_subtypes() {
        assert_eq!(
            decode("32767", xsd::SHORT).numeric_type(),
            NumericType::Integer
        );
        assert_eq!(decode("32768", xsd::SHORT).numeric_type(), NumericType::NaN);
        assert_eq!(
            decode("0", xsd::NON_NEGATIVE_INTEGER).numeric_type(),
            NumericType::Integer
        );
        assert_eq!(
            decode("0", xsd::POSITIVE_INTEGER).numeric_type(),
            NumericType::NaN
        );
        assert_eq!(
            decode("-1", xsd::NEGATIVE_INTEGER).numeric_type(),
            NumericType::Integer
        );
        assert_eq!(
            decode("1", xsd::NON_POSITIVE_INTEGER).numeric_type(),
            NumericType::NaN
        );
        assert_eq!(
            decode("4294967295", xsd::UNSIGNED_INT).numeric_type(),
            NumericType::Integer
        );
    }

    #[test]
    fn bytes() {
        assert_eq!(
            decode("-128", xsd::BYTE).as_numeric(),
            Some(NumericKind::SignedByte(-128))
        );
        assert_eq!(decode("128", xsd::BYTE).numeric_type(), NumericType::NaN);
        assert_eq!(
            decode("255", xsd::UNSIGNED_BYTE).as_numeric(),
            Some(NumericKind::Byte(255))
        );
        assert_eq!(
            decode("-1", xsd::UNSIGNED_BYTE).numeric_type(),
            NumericType::NaN
        );
    }

    #[test]
    fn date_time_stamp_requires_a_timezone() {
        assert!(matches!(
            decode("2020-01-01T00:00:00Z", xsd::DATE_TIME_STAMP),
            TypedValue::DateTime { .. }
        ));
        assert!(matches!(
            decode("2020-01-01T00:00:00", xsd::DATE_TIME_STAMP),
            TypedValue::String(_)
        ));
        assert!(matches!(
            decode("2020-01-01T00:00:00", xsd::DATE_TIME),
            TypedValue::DateTime { .. }
        ));
    }

    #[test]
    fn already_decoded_values_are_kept() {
        let value = TypedValue::from(12_i64);
        assert_eq!(TypedValue::from_node(value.clone().into()), value);
    }
}

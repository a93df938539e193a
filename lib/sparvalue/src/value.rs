use crate::error::ValueError;
use crate::numeric::{NumericKind, NumericType, NumericValue};
use oxrdf::vocab::xsd;
use oxrdf::{BlankNode, Graph, Literal, NamedNode, NamedNodeRef, Term, Variable};
use oxsdatatypes::{Boolean, Date, DateTime, Decimal, Double, Float, Integer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::discriminant;
use std::sync::Arc;

/// An evaluated RDF term decoded according to its datatype.
///
/// Literals keep the lexical form and the datatype they have been read from so that
/// [`TypedValue::to_term`] gives back the original term.
/// Equality and hashing use the decoded value: `"01"^^xsd:int` and `"1"^^xsd:integer` are equal.
///
/// ```
/// use oxrdf::vocab::xsd;
/// use oxrdf::{Literal, Term};
/// use sparvalue::{NumericType, TypedValue};
///
/// let value = TypedValue::from(Literal::new_typed_literal("01", xsd::INT));
/// assert_eq!(value.numeric_type(), NumericType::Integer);
/// assert_eq!(value, TypedValue::from(1_i64));
/// assert_eq!(
///     value.to_term(),
///     Term::from(Literal::new_typed_literal("01", xsd::INT))
/// );
/// ```
#[derive(Debug, Clone)]
pub enum TypedValue {
    Boolean { value: Boolean, lexical: String },
    Numeric(NumericValue),
    DateTime { value: DateTime, lexical: String },
    Date { value: Date, lexical: String },
    String(StringValue),
    Uri(NamedNode),
    Blank(BlankNode),
    GraphLiteral(GraphLiteral),
    Variable(Variable),
}

impl TypedValue {
    /// A simple literal (i.e. a `xsd:string`).
    #[inline]
    pub fn simple_string(value: impl Into<String>) -> Self {
        Self::String(StringValue {
            value: value.into(),
            tag: StringTag::Simple,
        })
    }

    #[inline]
    pub fn lang_string(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::String(StringValue {
            value: value.into(),
            tag: StringTag::Language(language.into()),
        })
    }

    /// A literal with a datatype that is not decoded (or a literal whose lexical form is not valid for its datatype).
    ///
    /// `xsd:string` literals are normalized to simple literals.
    #[inline]
    pub fn typed_string(value: impl Into<String>, datatype: impl Into<NamedNode>) -> Self {
        let datatype = datatype.into();
        Self::String(StringValue {
            value: value.into(),
            tag: if datatype.as_ref() == xsd::STRING {
                StringTag::Simple
            } else {
                StringTag::Datatype(datatype)
            },
        })
    }

    /// The position of this value in the numeric promotion lattice, [`NumericType::NaN`] for non-numerics.
    #[inline]
    pub fn numeric_type(&self) -> NumericType {
        match self {
            Self::Numeric(value) => value.numeric_type(),
            _ => NumericType::NaN,
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }

    #[inline]
    pub fn as_numeric(&self) -> Option<NumericKind> {
        if let Self::Numeric(value) = self {
            Some(value.kind())
        } else {
            None
        }
    }

    pub fn as_integer(&self) -> Result<Integer, ValueError> {
        self.numeric_kind()?.as_integer()
    }

    pub fn as_decimal(&self) -> Result<Decimal, ValueError> {
        self.numeric_kind()?.as_decimal()
    }

    pub fn as_float(&self) -> Result<Float, ValueError> {
        Ok(self.numeric_kind()?.as_float())
    }

    pub fn as_double(&self) -> Result<Double, ValueError> {
        Ok(self.numeric_kind()?.as_double())
    }

    /// The [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv).
    pub fn as_boolean(&self) -> Result<bool, ValueError> {
        match self {
            Self::Boolean { value, .. } => Ok((*value).into()),
            Self::Numeric(value) => Ok(value.kind().as_boolean()),
            Self::String(StringValue {
                value,
                tag: StringTag::Simple | StringTag::Language(_),
            }) => Ok(!value.is_empty()),
            _ => Err(self.type_mismatch("boolean")),
        }
    }

    /// Returns the date time value, dates are converted to the date time of their midnight.
    pub fn as_datetime(&self) -> Result<DateTime, ValueError> {
        match self {
            Self::DateTime { value, .. } => Ok(*value),
            Self::Date { value, lexical } => {
                DateTime::try_from(*value).map_err(|_| ValueError::TypeMismatch {
                    value: lexical.clone(),
                    expected: "dateTime",
                })
            }
            _ => Err(self.type_mismatch("dateTime")),
        }
    }

    /// The lexical form used when serializing the value.
    ///
    /// For literals it is the lexical form the value has been read from, for IRIs the IRI,
    /// for blank nodes their identifier and for variables their name.
    pub fn lexical_form(&self) -> &str {
        match self {
            Self::Boolean { lexical, .. }
            | Self::DateTime { lexical, .. }
            | Self::Date { lexical, .. } => lexical,
            Self::Numeric(value) => value.lexical_form(),
            Self::String(value) => &value.value,
            Self::Uri(value) => value.as_str(),
            Self::Blank(value) => value.as_str(),
            Self::GraphLiteral(_) => "",
            Self::Variable(value) => value.as_str(),
        }
    }

    /// The canonical string representation of the value, used by the `xsd:string` cast.
    pub fn as_string(&self) -> String {
        match self {
            Self::Boolean { value, .. } => value.to_string(),
            Self::Numeric(value) => value.kind().to_string(),
            Self::DateTime { value, .. } => value.to_string(),
            Self::Date { value, .. } => value.to_string(),
            Self::String(value) => value.value.clone(),
            Self::Uri(value) => value.as_str().into(),
            Self::Blank(value) => value.as_str().into(),
            Self::GraphLiteral(value) => value.to_string(),
            Self::Variable(value) => value.to_string(),
        }
    }

    /// The datatype of literal values.
    pub fn datatype(&self) -> Option<NamedNodeRef<'_>> {
        Some(match self {
            Self::Boolean { .. } => xsd::BOOLEAN,
            Self::Numeric(value) => value.datatype(),
            Self::DateTime { .. } => xsd::DATE_TIME,
            Self::Date { .. } => xsd::DATE,
            Self::String(value) => match &value.tag {
                StringTag::Simple => xsd::STRING,
                StringTag::Language(_) => return None,
                StringTag::Datatype(datatype) => datatype.as_ref(),
            },
            Self::Uri(_) | Self::Blank(_) | Self::GraphLiteral(_) | Self::Variable(_) => {
                return None;
            }
        })
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Boolean { .. }
                | Self::Numeric(_)
                | Self::DateTime { .. }
                | Self::Date { .. }
                | Self::String(_)
        )
    }

    /// A short name of the kind of value, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean { .. } => "xsd:boolean",
            Self::Numeric(value) => match value.numeric_type() {
                NumericType::Integer => "xsd:integer",
                NumericType::Decimal => "xsd:decimal",
                NumericType::Float => "xsd:float",
                NumericType::Double | NumericType::NaN => "xsd:double",
            },
            Self::DateTime { .. } => "xsd:dateTime",
            Self::Date { .. } => "xsd:date",
            Self::String(_) => "a string literal",
            Self::Uri(_) => "an IRI",
            Self::Blank(_) => "a blank node",
            Self::GraphLiteral(_) => "a graph literal",
            Self::Variable(_) => "a variable",
        }
    }

    /// Serializes the value back to an RDF term.
    ///
    /// Graph literals and variables have no RDF term representation and are serialized as strings.
    pub fn to_term(&self) -> Term {
        match self {
            Self::Boolean { lexical, .. } => {
                Literal::new_typed_literal(lexical.as_str(), xsd::BOOLEAN).into()
            }
            Self::Numeric(value) => {
                Literal::new_typed_literal(value.lexical_form(), value.datatype()).into()
            }
            Self::DateTime { lexical, .. } => {
                Literal::new_typed_literal(lexical.as_str(), xsd::DATE_TIME).into()
            }
            Self::Date { lexical, .. } => {
                Literal::new_typed_literal(lexical.as_str(), xsd::DATE).into()
            }
            Self::String(value) => value.to_literal().into(),
            Self::Uri(value) => value.clone().into(),
            Self::Blank(value) => value.clone().into(),
            Self::GraphLiteral(_) | Self::Variable(_) => {
                Literal::new_simple_literal(self.as_string()).into()
            }
        }
    }

    fn numeric_kind(&self) -> Result<NumericKind, ValueError> {
        self.as_numeric()
            .ok_or_else(|| ValueError::NotNumeric(self.to_string()))
    }

    fn type_mismatch(&self, expected: &'static str) -> ValueError {
        ValueError::TypeMismatch {
            value: self.to_string(),
            expected,
        }
    }
}

impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        discriminant(self) == discriminant(other)
            && match (self, other) {
                (Self::Boolean { value: l, .. }, Self::Boolean { value: r, .. }) => l == r,
                (Self::Numeric(l), Self::Numeric(r)) => l == r,
                (Self::DateTime { value: l, .. }, Self::DateTime { value: r, .. }) => l == r,
                (Self::Date { value: l, .. }, Self::Date { value: r, .. }) => l == r,
                (Self::String(l), Self::String(r)) => l == r,
                (Self::Uri(l), Self::Uri(r)) => l == r,
                (Self::Blank(l), Self::Blank(r)) => l == r,
                (Self::GraphLiteral(l), Self::GraphLiteral(r)) => l == r,
                (Self::Variable(l), Self::Variable(r)) => l == r,
                (_, _) => false,
            }
    }
}

impl Eq for TypedValue {}

impl Hash for TypedValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        match self {
            Self::Boolean { value, .. } => value.hash(state),
            Self::Numeric(value) => value.hash(state),
            Self::DateTime { value, .. } => value.hash(state),
            Self::Date { value, .. } => value.hash(state),
            Self::String(value) => value.hash(state),
            Self::Uri(value) => value.hash(state),
            Self::Blank(value) => value.hash(state),
            Self::GraphLiteral(value) => value.hash(state),
            Self::Variable(value) => value.hash(state),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GraphLiteral(value) => value.fmt(f),
            Self::Variable(value) => value.fmt(f),
            _ => self.to_term().fmt(f),
        }
    }
}

impl From<bool> for TypedValue {
    #[inline]
    fn from(value: bool) -> Self {
        Boolean::from(value).into()
    }
}

impl From<Boolean> for TypedValue {
    #[inline]
    fn from(value: Boolean) -> Self {
        Self::Boolean {
            lexical: value.to_string(),
            value,
        }
    }
}

impl From<u8> for TypedValue {
    #[inline]
    fn from(value: u8) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<i8> for TypedValue {
    #[inline]
    fn from(value: i8) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<i64> for TypedValue {
    #[inline]
    fn from(value: i64) -> Self {
        Integer::from(value).into()
    }
}

impl From<Integer> for TypedValue {
    #[inline]
    fn from(value: Integer) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<Decimal> for TypedValue {
    #[inline]
    fn from(value: Decimal) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<f32> for TypedValue {
    #[inline]
    fn from(value: f32) -> Self {
        Float::from(value).into()
    }
}

impl From<Float> for TypedValue {
    #[inline]
    fn from(value: Float) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<f64> for TypedValue {
    #[inline]
    fn from(value: f64) -> Self {
        Double::from(value).into()
    }
}

impl From<Double> for TypedValue {
    #[inline]
    fn from(value: Double) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<NumericKind> for TypedValue {
    #[inline]
    fn from(value: NumericKind) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<NumericValue> for TypedValue {
    #[inline]
    fn from(value: NumericValue) -> Self {
        Self::Numeric(value)
    }
}

impl From<DateTime> for TypedValue {
    #[inline]
    fn from(value: DateTime) -> Self {
        Self::DateTime {
            lexical: value.to_string(),
            value,
        }
    }
}

impl From<Date> for TypedValue {
    #[inline]
    fn from(value: Date) -> Self {
        Self::Date {
            lexical: value.to_string(),
            value,
        }
    }
}

impl From<&str> for TypedValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::simple_string(value)
    }
}

impl From<String> for TypedValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::simple_string(value)
    }
}

impl From<NamedNode> for TypedValue {
    #[inline]
    fn from(value: NamedNode) -> Self {
        Self::Uri(value)
    }
}

impl From<BlankNode> for TypedValue {
    #[inline]
    fn from(value: BlankNode) -> Self {
        Self::Blank(value)
    }
}

impl From<Variable> for TypedValue {
    #[inline]
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl From<GraphLiteral> for TypedValue {
    #[inline]
    fn from(value: GraphLiteral) -> Self {
        Self::GraphLiteral(value)
    }
}

/// A string literal: a simple literal, a language-tagged string or a literal with a non-decoded datatype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringValue {
    value: String,
    tag: StringTag,
}

impl StringValue {
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn tag(&self) -> &StringTag {
        &self.tag
    }

    #[inline]
    pub fn language(&self) -> Option<&str> {
        if let StringTag::Language(language) = &self.tag {
            Some(language)
        } else {
            None
        }
    }

    fn to_literal(&self) -> Literal {
        match &self.tag {
            StringTag::Simple => Literal::new_simple_literal(self.value.as_str()),
            StringTag::Language(language) => Literal::new_language_tagged_literal_unchecked(
                self.value.as_str(),
                language.as_str(),
            ),
            StringTag::Datatype(datatype) => {
                Literal::new_typed_literal(self.value.as_str(), datatype.clone())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StringTag {
    /// `xsd:string`
    Simple,
    Language(String),
    Datatype(NamedNode),
}

/// A quoted graph (e.g. a [Notation3](https://w3c.github.io/N3/spec/) formula) used as a term.
#[derive(Debug, Clone)]
pub struct GraphLiteral {
    graph: Arc<Graph>,
}

impl GraphLiteral {
    #[inline]
    pub fn new(graph: impl Into<Arc<Graph>>) -> Self {
        Self {
            graph: graph.into(),
        }
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

impl PartialEq for GraphLiteral {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.graph, &other.graph) || self.graph == other.graph
    }
}

impl Eq for GraphLiteral {}

impl Hash for GraphLiteral {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.graph.len().hash(state)
    }
}

impl fmt::Display for GraphLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {} }}", self.graph)
    }
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::str::FromStr;

    #[test]
    fn numeric_tags() {
        assert_eq!(TypedValue::from(1_i64).numeric_type(), NumericType::Integer);
        assert_eq!(TypedValue::from(1_u8).numeric_type(), NumericType::Integer);
        assert_eq!(
            TypedValue::from(Decimal::from(1)).numeric_type(),
            NumericType::Decimal
        );
        assert_eq!(TypedValue::from(1_f32).numeric_type(), NumericType::Float);
        assert_eq!(TypedValue::from(1_f64).numeric_type(), NumericType::Double);
        assert_eq!(TypedValue::from(true).numeric_type(), NumericType::NaN);
        assert_eq!(TypedValue::from("1").numeric_type(), NumericType::NaN);
    }

    #[test]
    fn numeric_extraction() -> Result<(), Box<dyn Error>> {
        let value = TypedValue::from(Decimal::from_str("2.5")?);
        assert_eq!(value.as_integer()?, Integer::from(2));
        assert_eq!(value.as_float()?, Float::from(2.5));
        assert_eq!(value.as_double()?, Double::from(2.5));
        assert!(matches!(
            TypedValue::from("2").as_double(),
            Err(ValueError::NotNumeric(_))
        ));
        Ok(())
    }

    #[test]
    fn effective_boolean_value() -> Result<(), Box<dyn Error>> {
        assert!(TypedValue::from(true).as_boolean()?);
        assert!(!TypedValue::from(0_i64).as_boolean()?);
        assert!(!TypedValue::from(f64::NAN).as_boolean()?);
        assert!(TypedValue::from("a").as_boolean()?);
        assert!(!TypedValue::from("").as_boolean()?);
        assert!(TypedValue::lang_string("a", "en").as_boolean()?);
        assert!(!TypedValue::lang_string("", "en").as_boolean()?);
        TypedValue::typed_string("a", NamedNode::new("http://example.com/d")?)
            .as_boolean()
            .unwrap_err();
        TypedValue::from(NamedNode::new("http://example.com")?)
            .as_boolean()
            .unwrap_err();
        Ok(())
    }

    #[test]
    fn datetime_extraction() -> Result<(), Box<dyn Error>> {
        let value = TypedValue::from(DateTime::from_str("2020-01-01T10:00:00Z")?);
        assert_eq!(
            value.as_datetime()?,
            DateTime::from_str("2020-01-01T10:00:00Z")?
        );
        assert_eq!(
            TypedValue::from(Date::from_str("2020-01-01Z")?).as_datetime()?,
            DateTime::from_str("2020-01-01T00:00:00Z")?
        );
        assert!(matches!(
            TypedValue::from(1_i64).as_datetime(),
            Err(ValueError::TypeMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn strings() {
        assert_eq!(
            TypedValue::typed_string("a", xsd::STRING),
            TypedValue::simple_string("a")
        );
        assert_ne!(
            TypedValue::lang_string("a", "en"),
            TypedValue::simple_string("a")
        );
        assert_eq!(
            TypedValue::lang_string("a", "en").datatype(),
            None
        );
        assert_eq!(TypedValue::from("a").datatype(), Some(xsd::STRING));
    }

    #[test]
    fn graph_literals() {
        let mut graph = Graph::new();
        graph.insert(oxrdf::TripleRef::new(
            NamedNodeRef::new_unchecked("http://example.com/s"),
            NamedNodeRef::new_unchecked("http://example.com/p"),
            NamedNodeRef::new_unchecked("http://example.com/o"),
        ));
        let value = TypedValue::from(GraphLiteral::new(graph));
        assert_eq!(value.numeric_type(), NumericType::NaN);
        assert!(!value.is_literal());
        assert!(value.as_string().starts_with('{'));
        assert_eq!(value.clone(), value);
    }
}

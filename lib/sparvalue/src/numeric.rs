use crate::error::ValueError;
use oxrdf::vocab::xsd;
use oxrdf::{NamedNode, NamedNodeRef};
use oxsdatatypes::{Boolean, Decimal, Double, Float, Integer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The [numeric type promotion](https://www.w3.org/TR/xpath20/#promotion) lattice.
///
/// Non-numeric values are tagged [`NumericType::NaN`].
/// The order is total: `NaN < Integer < Decimal < Float < Double`.
///
/// ```
/// use sparvalue::NumericType;
///
/// assert!(NumericType::Integer < NumericType::Decimal);
/// assert_eq!(
///     NumericType::Float.promote(NumericType::Decimal),
///     NumericType::Float
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericType {
    #[default]
    NaN,
    Integer,
    Decimal,
    Float,
    Double,
}

impl NumericType {
    /// The smallest type both operands can be promoted to.
    #[inline]
    #[must_use]
    pub fn promote(self, other: Self) -> Self {
        self.max(other)
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        self != Self::NaN
    }

    /// Classifies a literal datatype IRI.
    ///
    /// All the built-in types derived from `xsd:integer` are classified as [`NumericType::Integer`].
    pub fn from_datatype(datatype: NamedNodeRef<'_>) -> Self {
        match datatype {
            xsd::DECIMAL => Self::Decimal,
            xsd::FLOAT => Self::Float,
            xsd::DOUBLE => Self::Double,
            _ if is_integer_datatype(datatype) => Self::Integer,
            _ => Self::NaN,
        }
    }
}

pub(crate) fn is_integer_datatype(datatype: NamedNodeRef<'_>) -> bool {
    matches!(
        datatype,
        xsd::INTEGER
            | xsd::LONG
            | xsd::INT
            | xsd::SHORT
            | xsd::BYTE
            | xsd::UNSIGNED_LONG
            | xsd::UNSIGNED_INT
            | xsd::UNSIGNED_SHORT
            | xsd::UNSIGNED_BYTE
            | xsd::NON_NEGATIVE_INTEGER
            | xsd::POSITIVE_INTEGER
            | xsd::NON_POSITIVE_INTEGER
            | xsd::NEGATIVE_INTEGER
    )
}

/// A decoded numeric value.
///
/// `Byte` and `SignedByte` are the `xsd:unsignedByte` and `xsd:byte` values,
/// all the other integer datatypes are stored as 64 bits [`Integer`]s.
#[derive(Debug, Clone, Copy)]
pub enum NumericKind {
    Byte(u8),
    SignedByte(i8),
    Integer(Integer),
    Decimal(Decimal),
    Float(Float),
    Double(Double),
}

impl NumericKind {
    #[inline]
    pub fn numeric_type(self) -> NumericType {
        match self {
            Self::Byte(_) | Self::SignedByte(_) | Self::Integer(_) => NumericType::Integer,
            Self::Decimal(_) => NumericType::Decimal,
            Self::Float(_) => NumericType::Float,
            Self::Double(_) => NumericType::Double,
        }
    }

    /// The datatype used when serializing a value built without an explicit datatype.
    pub fn datatype(self) -> NamedNodeRef<'static> {
        match self {
            Self::Byte(_) => xsd::UNSIGNED_BYTE,
            Self::SignedByte(_) => xsd::BYTE,
            Self::Integer(_) => xsd::INTEGER,
            Self::Decimal(_) => xsd::DECIMAL,
            Self::Float(_) => xsd::FLOAT,
            Self::Double(_) => xsd::DOUBLE,
        }
    }

    /// Narrowing conversion: truncates toward zero and fails if the magnitude does not fit.
    pub fn as_integer(self) -> Result<Integer, ValueError> {
        match self {
            Self::Byte(v) => Ok(i64::from(v).into()),
            Self::SignedByte(v) => Ok(i64::from(v).into()),
            Self::Integer(v) => Ok(v),
            Self::Decimal(v) => {
                Integer::try_from(v).map_err(|_| self.overflow(NumericType::Integer))
            }
            Self::Float(v) => Integer::try_from(v).map_err(|_| self.overflow(NumericType::Integer)),
            Self::Double(v) => {
                Integer::try_from(v).map_err(|_| self.overflow(NumericType::Integer))
            }
        }
    }

    /// Fails only for floating point values outside of the decimal value space (NaN, infinities, huge magnitudes).
    pub fn as_decimal(self) -> Result<Decimal, ValueError> {
        match self {
            Self::Byte(v) => Ok(i64::from(v).into()),
            Self::SignedByte(v) => Ok(i64::from(v).into()),
            Self::Integer(v) => Ok(v.into()),
            Self::Decimal(v) => Ok(v),
            Self::Float(v) => Decimal::try_from(v).map_err(|_| self.overflow(NumericType::Decimal)),
            Self::Double(v) => {
                Decimal::try_from(v).map_err(|_| self.overflow(NumericType::Decimal))
            }
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn as_float(self) -> Float {
        match self {
            Self::Byte(v) => f32::from(v).into(),
            Self::SignedByte(v) => f32::from(v).into(),
            Self::Integer(v) => v.into(),
            Self::Decimal(v) => v.into(),
            Self::Float(v) => v,
            Self::Double(v) => (f64::from(v) as f32).into(),
        }
    }

    pub fn as_double(self) -> Double {
        match self {
            Self::Byte(v) => f64::from(v).into(),
            Self::SignedByte(v) => f64::from(v).into(),
            Self::Integer(v) => v.into(),
            Self::Decimal(v) => v.into(),
            Self::Float(v) => v.into(),
            Self::Double(v) => v,
        }
    }

    /// Nonzero for integers and decimals, nonzero and not NaN for floats and doubles.
    pub fn as_boolean(self) -> bool {
        match self {
            Self::Byte(v) => v != 0,
            Self::SignedByte(v) => v != 0,
            Self::Integer(v) => Boolean::from(v).into(),
            Self::Decimal(v) => Boolean::from(v).into(),
            Self::Float(v) => Boolean::from(v).into(),
            Self::Double(v) => Boolean::from(v).into(),
        }
    }

    /// Returns the same value stored with the representation of the given type.
    ///
    /// Only promotions (`target >= self.numeric_type()`) and the integer narrowing are allowed.
    pub fn promote_to(self, target: NumericType) -> Result<Self, ValueError> {
        Ok(match target {
            NumericType::Integer => Self::Integer(self.as_integer()?),
            NumericType::Decimal => Self::Decimal(self.as_decimal()?),
            NumericType::Float => Self::Float(self.as_float()),
            NumericType::Double => Self::Double(self.as_double()),
            NumericType::NaN => {
                return Err(ValueError::NotNumeric(self.to_string()));
            }
        })
    }

    fn overflow(self, target: NumericType) -> ValueError {
        ValueError::Overflow {
            value: self.to_string(),
            target,
        }
    }

    fn key(self) -> NumericKey {
        match self {
            Self::Byte(v) => NumericKey::Integer(v.into()),
            Self::SignedByte(v) => NumericKey::Integer(v.into()),
            Self::Integer(v) => NumericKey::Integer(v.into()),
            Self::Decimal(v) => NumericKey::Decimal(v),
            Self::Float(v) => {
                let v = f32::from(v);
                NumericKey::Float(if v.is_nan() {
                    f32::NAN.to_bits()
                } else {
                    (v + 0.).to_bits() // -0 and +0 are the same value
                })
            }
            Self::Double(v) => {
                let v = f64::from(v);
                NumericKey::Double(if v.is_nan() {
                    f64::NAN.to_bits()
                } else {
                    (v + 0.).to_bits()
                })
            }
        }
    }
}

#[derive(PartialEq, Eq, Hash)]
enum NumericKey {
    Integer(i64),
    Decimal(Decimal),
    Float(u32),
    Double(u64),
}

/// Two numeric values are equal if they have the same promotion tag and the same value.
impl PartialEq for NumericKind {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for NumericKind {}

impl Hash for NumericKind {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state)
    }
}

impl fmt::Display for NumericKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte(v) => v.fmt(f),
            Self::SignedByte(v) => v.fmt(f),
            Self::Integer(v) => v.fmt(f),
            Self::Decimal(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::Double(v) => v.fmt(f),
        }
    }
}

impl From<u8> for NumericKind {
    #[inline]
    fn from(value: u8) -> Self {
        Self::Byte(value)
    }
}

impl From<i8> for NumericKind {
    #[inline]
    fn from(value: i8) -> Self {
        Self::SignedByte(value)
    }
}

impl From<Integer> for NumericKind {
    #[inline]
    fn from(value: Integer) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for NumericKind {
    #[inline]
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<Float> for NumericKind {
    #[inline]
    fn from(value: Float) -> Self {
        Self::Float(value)
    }
}

impl From<Double> for NumericKind {
    #[inline]
    fn from(value: Double) -> Self {
        Self::Double(value)
    }
}

/// A numeric value together with the datatype and the lexical form it has been read from.
///
/// The datatype and lexical form are only kept for serialization: equality and hashing only look at the decoded value.
#[derive(Debug, Clone)]
pub struct NumericValue {
    kind: NumericKind,
    datatype: NamedNode,
    lexical: String,
}

impl NumericValue {
    /// Builds a value using the canonical lexical form and the default datatype of its kind.
    pub fn new(kind: NumericKind) -> Self {
        Self {
            datatype: kind.datatype().into_owned(),
            lexical: kind.to_string(),
            kind,
        }
    }

    pub(crate) fn new_with_lexical_form(
        kind: NumericKind,
        datatype: NamedNode,
        lexical: String,
    ) -> Self {
        Self {
            kind,
            datatype,
            lexical,
        }
    }

    #[inline]
    pub fn kind(&self) -> NumericKind {
        self.kind
    }

    #[inline]
    pub fn numeric_type(&self) -> NumericType {
        self.kind.numeric_type()
    }

    #[inline]
    pub fn datatype(&self) -> NamedNodeRef<'_> {
        self.datatype.as_ref()
    }

    #[inline]
    pub fn lexical_form(&self) -> &str {
        &self.lexical
    }
}

impl PartialEq for NumericValue {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for NumericValue {}

impl Hash for NumericValue {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state)
    }
}

impl<T: Into<NumericKind>> From<T> for NumericValue {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value.into())
    }
}

use std::fmt;

use serde::{Serialize, Serializer};

/// Normalized column type, shared by the assembler and the synthesizer.
///
/// `Display` yields the canonical spelling (`INTEGER(11).UNSIGNED`); the
/// generated code references it as `DataTypes.<canonical>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalType {
    Boolean,
    Integer {
        length: Option<u32>,
        unsigned: bool,
        zerofill: bool,
    },
    BigInt {
        unsigned: bool,
        zerofill: bool,
    },
    String {
        length: Option<u32>,
    },
    Char {
        length: Option<u32>,
    },
    Real,
    Text,
    DateOnly,
    Date,
    Time,
    Float,
    Decimal,
    Double,
    Uuid,
    Json,
    Jsonb,
    Geometry,
    /// Value list in its original casing, parentheses included: `('a','b')`.
    Enum(String),
    /// Unrecognized raw type, lowercased.
    Unknown(String),
}

impl CanonicalType {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, CanonicalType::Unknown(_))
    }

    /// Source expression for the `type` property of a generated attribute.
    ///
    /// Unknown types are emitted as their raw text.
    pub fn to_expression(&self) -> String {
        match self {
            CanonicalType::Unknown(raw) => raw.clone(),
            other => format!("DataTypes.{}", other),
        }
    }
}

fn write_length(f: &mut fmt::Formatter<'_>, length: &Option<u32>) -> fmt::Result {
    match length {
        Some(len) => write!(f, "({})", len),
        None => Ok(()),
    }
}

fn write_modifiers(f: &mut fmt::Formatter<'_>, unsigned: bool, zerofill: bool) -> fmt::Result {
    if unsigned {
        f.write_str(".UNSIGNED")?;
    }
    if zerofill {
        f.write_str(".ZEROFILL")?;
    }
    Ok(())
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalType::Boolean => f.write_str("BOOLEAN"),
            CanonicalType::Integer {
                length,
                unsigned,
                zerofill,
            } => {
                f.write_str("INTEGER")?;
                write_length(f, length)?;
                write_modifiers(f, *unsigned, *zerofill)
            }
            CanonicalType::BigInt { unsigned, zerofill } => {
                f.write_str("BIGINT")?;
                write_modifiers(f, *unsigned, *zerofill)
            }
            CanonicalType::String { length } => {
                f.write_str("STRING")?;
                write_length(f, length)
            }
            CanonicalType::Char { length } => {
                f.write_str("CHAR")?;
                write_length(f, length)
            }
            CanonicalType::Real => f.write_str("REAL"),
            CanonicalType::Text => f.write_str("TEXT"),
            CanonicalType::DateOnly => f.write_str("DATEONLY"),
            CanonicalType::Date => f.write_str("DATE"),
            CanonicalType::Time => f.write_str("TIME"),
            CanonicalType::Float => f.write_str("FLOAT"),
            CanonicalType::Decimal => f.write_str("DECIMAL"),
            CanonicalType::Double => f.write_str("DOUBLE"),
            CanonicalType::Uuid => f.write_str("UUIDV4"),
            CanonicalType::Json => f.write_str("JSON"),
            CanonicalType::Jsonb => f.write_str("JSONB"),
            CanonicalType::Geometry => f.write_str("GEOMETRY"),
            CanonicalType::Enum(values) => write!(f, "ENUM{}", values),
            CanonicalType::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for CanonicalType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

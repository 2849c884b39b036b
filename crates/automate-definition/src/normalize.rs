//! Raw column metadata → canonical type and default value.
//!
//! The pattern table is deterministic and case-insensitive. Unknown types are
//! never an error: they come back as [`CanonicalType::Unknown`] holding the
//! lowercased raw spelling.

use automate_core::{CanonicalType, ColumnDescriptor, DefaultValue, RawDefault, SqlDialect};
use once_cell::sync::Lazy;
use regex::Regex;

static LENGTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d+)\)").expect("invalid length regex"));

static INTEGER_FAMILY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(tinyint|smallint|mediumint|int)").expect("invalid integer regex"));

static POSTGRES_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"nextval\(.*seq'?::regclass\)").expect("invalid sequence regex"));

const TIME_KEYWORDS: &[&str] = &[
    "current_timestamp",
    "current_date",
    "current_time",
    "localtime",
    "localtimestamp",
];

fn type_length(lower: &str) -> Option<u32> {
    LENGTH
        .captures(lower)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn is_varchar(lower: &str, dialect: SqlDialect) -> bool {
    lower.starts_with("varchar")
        || (dialect.is_mssql() && lower.starts_with("nvarchar"))
        || (dialect.is_postgres() && lower.starts_with("character varying"))
}

fn is_char(lower: &str, dialect: SqlDialect) -> bool {
    lower.starts_with("char") || (dialect.is_mssql() && lower.starts_with("nchar"))
}

/// Map a raw column type onto its canonical spelling.
pub fn normalize_type(raw: &str, dialect: SqlDialect) -> CanonicalType {
    let raw = raw.trim();
    // The value list keeps its original casing.
    if raw
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("enum"))
    {
        return CanonicalType::Enum(raw[4..].to_string());
    }

    let lower = raw.to_lowercase();
    let length = type_length(&lower);
    let unsigned = lower.contains("unsigned");
    let zerofill = lower.contains("zerofill");

    match lower.as_str() {
        "boolean" | "bit(1)" | "bit" => return CanonicalType::Boolean,
        "date" => return CanonicalType::DateOnly,
        _ => {}
    }

    if INTEGER_FAMILY.is_match(&lower) && !lower.starts_with("interval") {
        CanonicalType::Integer {
            length,
            unsigned,
            zerofill,
        }
    } else if lower.starts_with("bigint") {
        CanonicalType::BigInt { unsigned, zerofill }
    } else if is_varchar(&lower, dialect) {
        CanonicalType::String { length }
    } else if is_char(&lower, dialect) {
        CanonicalType::Char { length }
    } else if lower.starts_with("real") {
        CanonicalType::Real
    } else if lower.contains("text") {
        CanonicalType::Text
    } else if lower.starts_with("date") || lower.starts_with("timestamp") {
        CanonicalType::Date
    } else if lower.starts_with("time") {
        CanonicalType::Time
    } else if lower.starts_with("float8") {
        CanonicalType::Double
    } else if lower.starts_with("float") {
        CanonicalType::Float
    } else if lower.starts_with("decimal") {
        CanonicalType::Decimal
    } else if ["double precision", "numeric", "double"]
        .iter()
        .any(|p| lower.starts_with(p))
    {
        CanonicalType::Double
    } else if lower.starts_with("uuid") || lower.contains("uniqueidentifier") {
        CanonicalType::Uuid
    } else if lower.starts_with("jsonb") {
        CanonicalType::Jsonb
    } else if lower.starts_with("json") {
        CanonicalType::Json
    } else if lower.starts_with("geometry") {
        CanonicalType::Geometry
    } else {
        CanonicalType::Unknown(lower)
    }
}

fn is_temporal(type_lower: &str) -> bool {
    ["date", "timestamp", "time"]
        .iter()
        .any(|prefix| type_lower.starts_with(prefix))
}

fn bit_flag(raw: &RawDefault, set: &str) -> DefaultValue {
    let on = match raw {
        RawDefault::Text(text) => text == set,
        RawDefault::Bool(b) => *b,
        RawDefault::Integer(i) => *i == 1,
        RawDefault::Float(_) => false,
    };
    DefaultValue::Integer(i64::from(on))
}

/// Classify a column's raw default, applying per-dialect quirks.
pub fn normalize_default(column: &ColumnDescriptor, dialect: SqlDialect) -> DefaultValue {
    let Some(raw) = &column.default_value else {
        return DefaultValue::Null;
    };
    let type_lower = column.type_lower();

    if dialect.is_mssql()
        && raw
            .as_text()
            .is_some_and(|text| text.eq_ignore_ascii_case("(newid())"))
    {
        return DefaultValue::Null;
    }
    if type_lower == "bit(1)" {
        return bit_flag(raw, "b'1'");
    }
    if dialect.is_mssql() && type_lower == "bit" {
        return bit_flag(raw, "((1))");
    }

    match raw {
        RawDefault::Bool(b) => DefaultValue::Boolean(*b),
        RawDefault::Integer(i) => DefaultValue::Integer(*i),
        RawDefault::Float(f) => DefaultValue::Float(*f),
        RawDefault::Text(text) => {
            if dialect.is_postgres() && POSTGRES_SEQUENCE.is_match(text) {
                DefaultValue::Null
            } else if let Some(name) = text.strip_suffix("()") {
                DefaultValue::function_call(name)
            } else if is_temporal(&type_lower)
                && TIME_KEYWORDS.contains(&text.to_lowercase().as_str())
            {
                DefaultValue::runtime_literal(text)
            } else {
                DefaultValue::Text(text.clone())
            }
        }
    }
}

/// The reported flag when present, else the postgres sequence pattern.
pub fn derive_auto_increment(column: &ColumnDescriptor, dialect: SqlDialect) -> bool {
    if let Some(flag) = column.auto_increment {
        return flag;
    }
    dialect.is_postgres()
        && column
            .default_value
            .as_ref()
            .and_then(RawDefault::as_text)
            .is_some_and(|text| POSTGRES_SEQUENCE.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn int(length: Option<u32>, unsigned: bool, zerofill: bool) -> CanonicalType {
        CanonicalType::Integer {
            length,
            unsigned,
            zerofill,
        }
    }

    #[rstest]
    #[case("INT(11)", int(Some(11), false, false))]
    #[case("int(10) unsigned", int(Some(10), true, false))]
    #[case("TINYINT(3) UNSIGNED ZEROFILL", int(Some(3), true, true))]
    #[case("smallint", int(None, false, false))]
    #[case("integer", int(None, false, false))]
    #[case("bigint(20) unsigned", CanonicalType::BigInt { unsigned: true, zerofill: false })]
    #[case("bigint", CanonicalType::BigInt { unsigned: false, zerofill: false })]
    #[case("VARCHAR(100)", CanonicalType::String { length: Some(100) })]
    #[case("varchar", CanonicalType::String { length: None })]
    #[case("CHAR(2)", CanonicalType::Char { length: Some(2) })]
    #[case("character(8)", CanonicalType::Char { length: Some(8) })]
    #[case("boolean", CanonicalType::Boolean)]
    #[case("BIT(1)", CanonicalType::Boolean)]
    #[case("bit", CanonicalType::Boolean)]
    #[case("real", CanonicalType::Real)]
    #[case("LONGTEXT", CanonicalType::Text)]
    #[case("mediumtext", CanonicalType::Text)]
    #[case("DATE", CanonicalType::DateOnly)]
    #[case("DATETIME", CanonicalType::Date)]
    #[case("timestamp with time zone", CanonicalType::Date)]
    #[case("TIME", CanonicalType::Time)]
    #[case("float", CanonicalType::Float)]
    #[case("float4", CanonicalType::Float)]
    #[case("float8", CanonicalType::Double)]
    #[case("decimal(10,2)", CanonicalType::Decimal)]
    #[case("double precision", CanonicalType::Double)]
    #[case("numeric", CanonicalType::Double)]
    #[case("DOUBLE", CanonicalType::Double)]
    #[case("uuid", CanonicalType::Uuid)]
    #[case("jsonb", CanonicalType::Jsonb)]
    #[case("JSON", CanonicalType::Json)]
    #[case("geometry", CanonicalType::Geometry)]
    #[case("interval", CanonicalType::Unknown("interval".into()))]
    #[case("BLOB", CanonicalType::Unknown("blob".into()))]
    fn normalizes_mysql_types(#[case] raw: &str, #[case] expected: CanonicalType) {
        assert_eq!(normalize_type(raw, SqlDialect::Mysql), expected);
    }

    #[test]
    fn enum_keeps_value_casing() {
        assert_eq!(
            normalize_type("ENUM('Draft','Published')", SqlDialect::Mysql),
            CanonicalType::Enum("('Draft','Published')".into())
        );
        assert_eq!(
            normalize_type("enum('a')", SqlDialect::Mysql).to_string(),
            "ENUM('a')"
        );
    }

    #[rstest]
    #[case("nvarchar(50)", SqlDialect::Mssql, CanonicalType::String { length: Some(50) })]
    #[case("nchar(10)", SqlDialect::Mssql, CanonicalType::Char { length: Some(10) })]
    #[case("uniqueidentifier", SqlDialect::Mssql, CanonicalType::Uuid)]
    #[case("ntext", SqlDialect::Mssql, CanonicalType::Text)]
    #[case("character varying(255)", SqlDialect::Postgres, CanonicalType::String { length: Some(255) })]
    #[case("character varying(255)", SqlDialect::Mysql, CanonicalType::Char { length: Some(255) })]
    fn normalizes_dialect_specific_spellings(
        #[case] raw: &str,
        #[case] dialect: SqlDialect,
        #[case] expected: CanonicalType,
    ) {
        assert_eq!(normalize_type(raw, dialect), expected);
    }

    #[test]
    fn missing_default_is_null() {
        let column = ColumnDescriptor::new("VARCHAR(10)");
        assert_eq!(normalize_default(&column, SqlDialect::Mysql), DefaultValue::Null);
    }

    #[rstest]
    #[case("NOW()", "DATETIME", DefaultValue::Expression("sequelize.fn('NOW')".into()))]
    #[case("uuid_generate_v4()", "uuid", DefaultValue::Expression("sequelize.fn('uuid_generate_v4')".into()))]
    #[case("CURRENT_TIMESTAMP", "TIMESTAMP", DefaultValue::Expression("sequelize.literal('CURRENT_TIMESTAMP')".into()))]
    #[case("current_date", "date", DefaultValue::Expression("sequelize.literal('current_date')".into()))]
    #[case("LOCALTIME", "time", DefaultValue::Expression("sequelize.literal('LOCALTIME')".into()))]
    #[case("CURRENT_TIMESTAMP", "VARCHAR(20)", DefaultValue::Text("CURRENT_TIMESTAMP".into()))]
    #[case("guest", "VARCHAR(20)", DefaultValue::Text("guest".into()))]
    fn classifies_string_defaults(
        #[case] raw: &str,
        #[case] ty: &str,
        #[case] expected: DefaultValue,
    ) {
        let column = ColumnDescriptor::new(ty).with_default(raw);
        assert_eq!(normalize_default(&column, SqlDialect::Mysql), expected);
    }

    #[test]
    fn scalar_defaults_pass_through() {
        let column = ColumnDescriptor::new("INT(11)").with_default(7_i64);
        assert_eq!(
            normalize_default(&column, SqlDialect::Mysql),
            DefaultValue::Integer(7)
        );
        let mut column = ColumnDescriptor::new("boolean");
        column.default_value = Some(RawDefault::Bool(true));
        assert_eq!(
            normalize_default(&column, SqlDialect::Postgres),
            DefaultValue::Boolean(true)
        );
    }

    #[rstest]
    #[case("bit(1)", "b'1'", SqlDialect::Mysql, 1)]
    #[case("BIT(1)", "b'0'", SqlDialect::Mysql, 0)]
    #[case("bit", "((1))", SqlDialect::Mssql, 1)]
    #[case("bit", "((0))", SqlDialect::Mssql, 0)]
    fn coerces_single_bit_defaults(
        #[case] ty: &str,
        #[case] raw: &str,
        #[case] dialect: SqlDialect,
        #[case] expected: i64,
    ) {
        let column = ColumnDescriptor::new(ty).with_default(raw);
        assert_eq!(normalize_default(&column, dialect), DefaultValue::Integer(expected));
    }

    #[test]
    fn mssql_newid_is_suppressed() {
        let column = ColumnDescriptor::new("uniqueidentifier").with_default("(NEWID())");
        assert_eq!(normalize_default(&column, SqlDialect::Mssql), DefaultValue::Null);
        assert_eq!(
            normalize_default(&column, SqlDialect::Mysql),
            DefaultValue::Text("(NEWID())".into())
        );
    }

    #[rstest]
    #[case("nextval('user_id_seq'::regclass)")]
    #[case("nextval(user_id_seq::regclass)")]
    #[case("nextval('public.user_id_seq'::regclass)")]
    fn postgres_sequence_default_becomes_auto_increment(#[case] raw: &str) {
        let column = ColumnDescriptor::new("integer").with_default(raw);
        assert_eq!(normalize_default(&column, SqlDialect::Postgres), DefaultValue::Null);
        assert!(derive_auto_increment(&column, SqlDialect::Postgres));
        assert!(!derive_auto_increment(&column, SqlDialect::Mysql));
    }

    #[test]
    fn explicit_auto_increment_flag_wins() {
        let column = ColumnDescriptor::new("INT(11)").with_auto_increment(true);
        assert!(derive_auto_increment(&column, SqlDialect::Mysql));
        let column = ColumnDescriptor::new("integer")
            .with_default("nextval('user_id_seq'::regclass)")
            .with_auto_increment(false);
        assert!(!derive_auto_increment(&column, SqlDialect::Postgres));
        assert!(!derive_auto_increment(&ColumnDescriptor::new("INT"), SqlDialect::Mysql));
    }
}

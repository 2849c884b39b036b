//! Conversion of model definitions into template syntax.

use automate_core::{
    AttributeDescriptor, CanonicalType, DefaultValue, IndexDescriptor, ModelDefinition,
};
use automate_template::ast::{Expr, Prop, TsMember, TsType};
use automate_template::parse_expression;

use crate::report::Diagnostic;

/// `{ key: { type, allowNull, ... }, ... }` for the `attributes` binding.
pub fn attributes_object(definition: &ModelDefinition, diagnostics: &mut Vec<Diagnostic>) -> Expr {
    Expr::object(
        definition
            .attributes
            .iter()
            .map(|(key, attribute)| {
                Prop::new(
                    key,
                    attribute_object(&definition.table_name, attribute, diagnostics),
                )
            })
            .collect(),
    )
}

fn attribute_object(
    table: &str,
    attribute: &AttributeDescriptor,
    diagnostics: &mut Vec<Diagnostic>,
) -> Expr {
    let mut props = vec![
        Prop::new("type", type_expr(table, attribute, diagnostics)),
        Prop::new("allowNull", Expr::Bool(attribute.allow_null)),
        Prop::new("defaultValue", default_expr(table, attribute, diagnostics)),
        Prop::new("primaryKey", Expr::Bool(attribute.primary_key)),
        Prop::new("autoIncrement", Expr::Bool(attribute.auto_increment)),
        Prop::new(
            "comment",
            attribute
                .comment
                .as_deref()
                .map(Expr::str)
                .unwrap_or(Expr::Null),
        ),
        Prop::new("field", Expr::str(attribute.field.as_str())),
    ];
    if let Some(unique) = &attribute.unique {
        props.push(Prop::new("unique", Expr::str(unique.as_str())));
    }
    if let Some(references) = &attribute.references {
        props.push(Prop::new(
            "references",
            Expr::object(vec![
                Prop::new("key", Expr::str(references.key.as_str())),
                Prop::new("model", Expr::str(references.model.as_str())),
            ]),
        ));
    }
    Expr::object(props)
}

/// `DataTypes.<canonical>`; unknown types are spliced as written when they
/// parse, otherwise as a string.
pub fn type_expr(
    table: &str,
    attribute: &AttributeDescriptor,
    diagnostics: &mut Vec<Diagnostic>,
) -> Expr {
    let source = attribute.r#type.to_expression();
    let parsed = parse_expression(&source).ok();

    match (&attribute.r#type, parsed) {
        (CanonicalType::Unknown(raw), parsed) => {
            diagnostics.push(Diagnostic::UnrecognizedColumnType {
                table: table.to_string(),
                attribute: attribute.name.clone(),
                raw_type: raw.clone(),
            });
            parsed.unwrap_or_else(|| Expr::str(raw.as_str()))
        }
        (_, Some(expr)) => expr,
        // an enum value list the parser rejects
        (other, None) => {
            diagnostics.push(Diagnostic::UnrecognizedColumnType {
                table: table.to_string(),
                attribute: attribute.name.clone(),
                raw_type: other.to_string(),
            });
            Expr::str(source)
        }
    }
}

pub fn default_expr(
    table: &str,
    attribute: &AttributeDescriptor,
    diagnostics: &mut Vec<Diagnostic>,
) -> Expr {
    match &attribute.default_value {
        DefaultValue::Null => Expr::Null,
        DefaultValue::Integer(value) => Expr::Num(value.to_string()),
        DefaultValue::Float(value) if value.is_finite() => Expr::Num(value.to_string()),
        DefaultValue::Float(_) => Expr::Null,
        DefaultValue::Boolean(value) => Expr::Bool(*value),
        DefaultValue::Text(value) => Expr::str(value.as_str()),
        DefaultValue::Expression(source) => parse_expression(source).unwrap_or_else(|_| {
            diagnostics.push(Diagnostic::UnparsableDefaultExpression {
                table: table.to_string(),
                attribute: attribute.name.clone(),
                expression: source.clone(),
            });
            Expr::str(source.as_str())
        }),
    }
}

/// `[{ name, unique, type?, fields }, ...]` for `options.indexes`.
pub fn indexes_array(indexes: &[IndexDescriptor]) -> Expr {
    Expr::Array(
        indexes
            .iter()
            .map(|index| {
                let mut props = vec![
                    Prop::new("name", Expr::str(index.name.as_str())),
                    Prop::new("unique", Expr::Bool(index.unique)),
                ];
                if let Some(method) = &index.method {
                    props.push(Prop::new("type", Expr::str(method.as_str())));
                }
                props.push(Prop::new(
                    "fields",
                    Expr::Array(index.fields.iter().map(|f| Expr::str(f.as_str())).collect()),
                ));
                Expr::object(props)
            })
            .collect(),
    )
}

/// TypeScript type of an attribute in the definition artifact.
pub fn ts_type(ty: &CanonicalType) -> TsType {
    match ty {
        CanonicalType::Boolean => TsType::keyword("boolean"),
        CanonicalType::Integer { .. }
        | CanonicalType::BigInt { .. }
        | CanonicalType::Real
        | CanonicalType::Float
        | CanonicalType::Decimal
        | CanonicalType::Double => TsType::keyword("number"),
        CanonicalType::String { .. }
        | CanonicalType::Char { .. }
        | CanonicalType::Text
        | CanonicalType::Uuid => TsType::keyword("string"),
        CanonicalType::Date | CanonicalType::DateOnly => TsType::reference("Date"),
        _ => TsType::keyword("any"),
    }
}

/// One interface property per attribute, optional when nullable.
pub fn attribute_members(definition: &ModelDefinition) -> Vec<TsMember> {
    definition
        .attributes
        .iter()
        .map(|(key, attribute)| TsMember::property(key, attribute.allow_null, ts_type(&attribute.r#type)))
        .collect()
}

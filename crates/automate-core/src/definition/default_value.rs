use serde::Serialize;

/// Normalized column default.
///
/// `Expression` holds source code evaluated when the generated model loads
/// (`sequelize.fn('now')`); every other variant is a static literal.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DefaultValue {
    #[default]
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    Expression(String),
}

impl DefaultValue {
    /// A database function call such as `NOW()`, invoked at load time.
    pub fn function_call(name: &str) -> Self {
        DefaultValue::Expression(format!("sequelize.fn('{}')", name))
    }

    /// A runtime keyword such as `CURRENT_TIMESTAMP`, passed through verbatim.
    pub fn runtime_literal(keyword: &str) -> Self {
        DefaultValue::Expression(format!("sequelize.literal('{}')", keyword))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DefaultValue::Null)
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, DefaultValue::Expression(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_constructors() {
        assert_eq!(
            DefaultValue::function_call("NOW"),
            DefaultValue::Expression("sequelize.fn('NOW')".into())
        );
        assert_eq!(
            DefaultValue::runtime_literal("CURRENT_TIMESTAMP"),
            DefaultValue::Expression("sequelize.literal('CURRENT_TIMESTAMP')".into())
        );
        assert!(DefaultValue::function_call("uuid").is_expression());
        assert!(DefaultValue::default().is_null());
    }

    #[test]
    fn serializes_tagged() {
        let json = serde_json::to_string(&DefaultValue::Text("guest".into())).unwrap();
        assert_eq!(json, r#"{"kind":"text","value":"guest"}"#);
        let json = serde_json::to_string(&DefaultValue::Null).unwrap();
        assert_eq!(json, r#"{"kind":"null"}"#);
    }
}

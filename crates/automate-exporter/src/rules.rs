//! Rewrite rules applied to the parsed templates.

use automate_config::dialect::MIDWAY_PACKAGE;
use automate_template::ast::*;
use automate_template::Rule;

/// Replaces the initializer of `const attributes = ...`.
pub struct AttributesRule {
    pub attributes: Expr,
}

impl Rule for AttributesRule {
    fn name(&self) -> &str {
        "attributes"
    }

    fn on_declarator(&self, decl: &Declarator) -> Option<Declarator> {
        (decl.ident() == Some("attributes")).then(|| Declarator {
            init: Some(self.attributes.clone()),
            ..decl.clone()
        })
    }
}

/// Edits `const options = { ... }` in place: only `tableName`, `comment` and
/// `indexes` are overwritten.
pub struct OptionsRule {
    pub table_name: String,
    pub comment: String,
    pub indexes: Expr,
}

impl Rule for OptionsRule {
    fn name(&self) -> &str {
        "options"
    }

    fn on_declarator(&self, decl: &Declarator) -> Option<Declarator> {
        if decl.ident() != Some("options") {
            return None;
        }
        let Some(Expr::Object(props)) = &decl.init else {
            return None;
        };
        let props = props
            .iter()
            .map(|prop| match prop {
                Prop::KeyValue(key, value) => {
                    let value = match key.name() {
                        Some("tableName") => Expr::str(self.table_name.as_str()),
                        Some("comment") => Expr::str(self.comment.as_str()),
                        Some("indexes") => self.indexes.clone(),
                        _ => value.clone(),
                    };
                    Prop::KeyValue(key.clone(), value)
                }
                other => other.clone(),
            })
            .collect();
        Some(Declarator {
            init: Some(Expr::Object(props)),
            ..decl.clone()
        })
    }
}

/// Sets the first argument of `<x>.define(...)` to the model name.
pub struct DefineRule {
    pub model_name: String,
}

impl Rule for DefineRule {
    fn name(&self) -> &str {
        "define"
    }

    fn on_call(&self, call: &CallExpr) -> Option<Expr> {
        if call.method_name() != Some("define") || call.args.is_empty() {
            return None;
        }
        let mut args = call.args.clone();
        args[0] = Expr::str(self.model_name.as_str());
        Some(Expr::Call(CallExpr {
            callee: call.callee.clone(),
            args,
        }))
    }
}

/// Sets every `id` property inside `providerWrapper(...)` to the model name.
pub struct ProviderWrapperRule {
    pub model_name: String,
}

impl ProviderWrapperRule {
    fn rewrite(&self, expr: &Expr) -> Expr {
        match expr {
            Expr::Array(elements) => Expr::Array(elements.iter().map(|e| self.rewrite(e)).collect()),
            Expr::Object(props) => Expr::Object(
                props
                    .iter()
                    .map(|prop| match prop {
                        Prop::KeyValue(key, _) if key.name() == Some("id") => {
                            Prop::KeyValue(key.clone(), Expr::str(self.model_name.as_str()))
                        }
                        Prop::KeyValue(key, value) => {
                            Prop::KeyValue(key.clone(), self.rewrite(value))
                        }
                        other => other.clone(),
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

impl Rule for ProviderWrapperRule {
    fn name(&self) -> &str {
        "providerWrapper"
    }

    fn on_call(&self, call: &CallExpr) -> Option<Expr> {
        if call.callee_name() != Some("providerWrapper") {
            return None;
        }
        Some(Expr::Call(CallExpr {
            callee: call.callee.clone(),
            args: call.args.iter().map(|arg| self.rewrite(arg)).collect(),
        }))
    }
}

/// Points `import ... from "midway"` at an aliased package.
pub struct PackageAliasRule {
    pub alias: String,
}

impl Rule for PackageAliasRule {
    fn name(&self) -> &str {
        MIDWAY_PACKAGE
    }

    fn on_import(&self, import: &ImportDecl) -> Option<ImportDecl> {
        (import.source == MIDWAY_PACKAGE).then(|| ImportDecl {
            source: self.alias.clone(),
            ..import.clone()
        })
    }
}

/// Replaces the body of the attributes interface in a definition artifact.
pub struct InterfaceRule {
    pub interface: &'static str,
    pub members: Vec<TsMember>,
}

impl Rule for InterfaceRule {
    fn name(&self) -> &str {
        self.interface
    }

    fn on_interface(&self, iface: &InterfaceDecl) -> Option<InterfaceDecl> {
        (iface.name == self.interface).then(|| InterfaceDecl {
            body: self.members.clone(),
            ..iface.clone()
        })
    }
}

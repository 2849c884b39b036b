//! Rule-driven rewriting.
//!
//! [`fold_module`] walks the tree once, bottom-up, and rebuilds it. At
//! every anchor-capable node each rule is offered the (already folded)
//! node in order; a rule that returns a replacement counts as a match and
//! later rules see the replacement.

use crate::ast::*;

/// A rewrite keyed by a structural anchor.
///
/// Every hook defaults to "no match". Hooks must be pure: the same input
/// node always yields the same result.
pub trait Rule {
    /// Label used in diagnostics.
    fn name(&self) -> &str;

    /// Variable declarators, e.g. `const attributes = ...`.
    fn on_declarator(&self, _decl: &Declarator) -> Option<Declarator> {
        None
    }

    /// Call expressions, e.g. `sequelize.define(...)`.
    fn on_call(&self, _call: &CallExpr) -> Option<Expr> {
        None
    }

    fn on_import(&self, _import: &ImportDecl) -> Option<ImportDecl> {
        None
    }

    fn on_interface(&self, _iface: &InterfaceDecl) -> Option<InterfaceDecl> {
        None
    }
}

/// The rewritten module and how many nodes each rule replaced, indexed
/// like the rule list.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldOutcome {
    pub module: Module,
    pub matches: Vec<usize>,
}

impl FoldOutcome {
    /// Names of the rules that never matched.
    pub fn unmatched<'r>(&self, rules: &[&'r dyn Rule]) -> Vec<&'r str> {
        rules
            .iter()
            .zip(&self.matches)
            .filter(|(_, count)| **count == 0)
            .map(|(rule, _)| rule.name())
            .collect()
    }
}

pub fn fold_module(module: &Module, rules: &[&dyn Rule]) -> FoldOutcome {
    let mut folder = Folder {
        rules,
        matches: vec![0; rules.len()],
    };
    let items = folder.items(&module.items);
    FoldOutcome {
        module: Module { items },
        matches: folder.matches,
    }
}

struct Folder<'a> {
    rules: &'a [&'a dyn Rule],
    matches: Vec<usize>,
}

impl Folder<'_> {
    /// Offer `node` to every rule in order.
    fn apply<T>(&mut self, mut node: T, hook: impl Fn(&dyn Rule, &T) -> Option<T>) -> T {
        for (i, rule) in self.rules.iter().enumerate() {
            if let Some(replacement) = hook(*rule, &node) {
                self.matches[i] += 1;
                node = replacement;
            }
        }
        node
    }

    fn items(&mut self, items: &[Item]) -> Vec<Item> {
        items
            .iter()
            .map(|item| Item {
                comments: item.comments.clone(),
                blank_line_before: item.blank_line_before,
                stmt: self.stmt(&item.stmt),
            })
            .collect()
    }

    fn stmt(&mut self, stmt: &Stmt) -> Stmt {
        match stmt {
            Stmt::Var(decl) => Stmt::Var(self.var_decl(decl)),
            Stmt::Function(func) => Stmt::Function(self.function(func)),
            Stmt::Return(value) => Stmt::Return(value.as_ref().map(|v| self.expr(v))),
            Stmt::Expr(expr) => Stmt::Expr(self.expr(expr)),
            Stmt::Import(import) => {
                Stmt::Import(self.apply(import.clone(), |rule, node| rule.on_import(node)))
            }
            Stmt::Export(inner) => Stmt::Export(Box::new(self.stmt(inner))),
            Stmt::ExportDefault(ExportDefault::Function(func)) => {
                Stmt::ExportDefault(ExportDefault::Function(self.function(func)))
            }
            Stmt::ExportDefault(ExportDefault::Expr(expr)) => {
                Stmt::ExportDefault(ExportDefault::Expr(self.expr(expr)))
            }
            Stmt::Interface(iface) => {
                Stmt::Interface(self.apply(iface.clone(), |rule, node| rule.on_interface(node)))
            }
            Stmt::TypeAlias(alias) => Stmt::TypeAlias(alias.clone()),
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) -> VarDecl {
        VarDecl {
            kind: decl.kind,
            declarators: decl
                .declarators
                .iter()
                .map(|d| {
                    let folded = Declarator {
                        pat: d.pat.clone(),
                        type_ann: d.type_ann.clone(),
                        init: d.init.as_ref().map(|init| self.expr(init)),
                    };
                    self.apply(folded, |rule, node| rule.on_declarator(node))
                })
                .collect(),
        }
    }

    fn function(&mut self, func: &Function) -> Function {
        Function {
            name: func.name.clone(),
            is_async: func.is_async,
            params: func.params.clone(),
            return_type: func.return_type.clone(),
            body: self.items(&func.body),
        }
    }

    fn exprs(&mut self, exprs: &[Expr]) -> Vec<Expr> {
        exprs.iter().map(|e| self.expr(e)).collect()
    }

    fn boxed(&mut self, expr: &Expr) -> Box<Expr> {
        Box::new(self.expr(expr))
    }

    fn expr(&mut self, expr: &Expr) -> Expr {
        match expr {
            Expr::Ident(_) | Expr::Str(_) | Expr::Num(_) | Expr::Bool(_) | Expr::Null => {
                expr.clone()
            }
            Expr::Array(elements) => Expr::Array(self.exprs(elements)),
            Expr::Object(props) => Expr::Object(props.iter().map(|p| self.prop(p)).collect()),
            Expr::Member { object, property } => Expr::Member {
                object: self.boxed(object),
                property: property.clone(),
            },
            Expr::Index { object, index } => Expr::Index {
                object: self.boxed(object),
                index: self.boxed(index),
            },
            Expr::Call(call) => {
                let folded = CallExpr {
                    callee: self.boxed(&call.callee),
                    args: self.exprs(&call.args),
                };
                self.call(folded)
            }
            Expr::New(call) => Expr::New(CallExpr {
                callee: self.boxed(&call.callee),
                args: self.exprs(&call.args),
            }),
            Expr::Arrow(arrow) => Expr::Arrow(ArrowFn {
                is_async: arrow.is_async,
                params: arrow.params.clone(),
                body: match &arrow.body {
                    ArrowBody::Block(items) => ArrowBody::Block(self.items(items)),
                    ArrowBody::Expr(body) => ArrowBody::Expr(self.boxed(body)),
                },
            }),
            Expr::Function(func) => Expr::Function(Box::new(self.function(func))),
            Expr::Await(arg) => Expr::Await(self.boxed(arg)),
            Expr::Unary { op, arg } => Expr::Unary {
                op: op.clone(),
                arg: self.boxed(arg),
            },
            Expr::Binary { op, left, right } => Expr::Binary {
                op: op.clone(),
                left: self.boxed(left),
                right: self.boxed(right),
            },
            Expr::Cond {
                test,
                consequent,
                alternate,
            } => Expr::Cond {
                test: self.boxed(test),
                consequent: self.boxed(consequent),
                alternate: self.boxed(alternate),
            },
            Expr::Assign { op, target, value } => Expr::Assign {
                op: op.clone(),
                target: self.boxed(target),
                value: self.boxed(value),
            },
            Expr::Spread(arg) => Expr::Spread(self.boxed(arg)),
            Expr::Paren(inner) => Expr::Paren(self.boxed(inner)),
        }
    }

    /// Calls are special: a rule may turn one into any expression, after
    /// which the remaining rules only see it if it is still a call.
    fn call(&mut self, call: CallExpr) -> Expr {
        let mut expr = Expr::Call(call);
        for (i, rule) in self.rules.iter().enumerate() {
            let Expr::Call(current) = &expr else {
                break;
            };
            if let Some(replacement) = rule.on_call(current) {
                self.matches[i] += 1;
                expr = replacement;
            }
        }
        expr
    }

    fn prop(&mut self, prop: &Prop) -> Prop {
        match prop {
            Prop::KeyValue(key, value) => Prop::KeyValue(self.prop_key(key), self.expr(value)),
            Prop::Shorthand(name) => Prop::Shorthand(name.clone()),
            Prop::Spread(arg) => Prop::Spread(self.expr(arg)),
        }
    }

    fn prop_key(&mut self, key: &PropKey) -> PropKey {
        match key {
            PropKey::Computed(expr) => PropKey::Computed(self.boxed(expr)),
            other => other.clone(),
        }
    }
}

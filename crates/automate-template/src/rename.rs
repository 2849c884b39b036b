//! Scope-aware identifier renaming.
//!
//! Only bindings named `from` and the references resolving to them are
//! rewritten. Object keys, member properties, string literals and free
//! identifiers keep their text. A rename that would make `to` mean two
//! things is refused: `to` bound next to `from`, in a scope enclosing it, in
//! a scope nested inside it, or referenced free where `from` is renamed.

use std::collections::HashSet;

use crate::ast::*;
use crate::error::RenameError;

/// Rename `from` to `to` throughout `module`.
///
/// Fails with [`RenameError::Undeclared`] when `from` is never declared and
/// with [`RenameError::Collision`] when `to` is already visible where the
/// renamed binding lives.
pub fn rename(module: &Module, from: &str, to: &str) -> Result<Module, RenameError> {
    let mut renamer = Renamer {
        from,
        to,
        renamed: false,
        collision: false,
    };
    let names = declared_names(&module.items);
    let scope = renamer.scope(Scope::default(), &names);
    let items = renamer.items(&module.items, scope);

    if renamer.collision {
        Err(RenameError::Collision {
            from: from.to_string(),
            to: to.to_string(),
        })
    } else if !renamer.renamed {
        Err(RenameError::Undeclared(from.to_string()))
    } else {
        Ok(Module { items })
    }
}

/// Names bound directly by `items`, not descending into nested functions.
fn declared_names(items: &[Item]) -> HashSet<&str> {
    let mut names = HashSet::new();
    for item in items {
        collect_stmt(&item.stmt, &mut names);
    }
    names
}

fn collect_stmt<'a>(stmt: &'a Stmt, names: &mut HashSet<&'a str>) {
    match stmt {
        Stmt::Var(decl) => {
            for declarator in &decl.declarators {
                collect_pat(&declarator.pat, names);
            }
        }
        Stmt::Function(func)
        | Stmt::ExportDefault(ExportDefault::Function(func)) => {
            if let Some(name) = &func.name {
                names.insert(name);
            }
        }
        Stmt::Import(import) => names.extend(import.locals()),
        Stmt::Export(inner) => collect_stmt(inner, names),
        Stmt::Interface(iface) => {
            names.insert(&iface.name);
        }
        Stmt::TypeAlias(alias) => {
            names.insert(&alias.name);
        }
        Stmt::Return(_) | Stmt::Expr(_) | Stmt::ExportDefault(ExportDefault::Expr(_)) => {}
    }
}

fn collect_pat<'a>(pat: &'a Pat, names: &mut HashSet<&'a str>) {
    match pat {
        Pat::Ident(name) => {
            names.insert(name);
        }
        Pat::Object(props) => {
            for prop in props {
                match prop {
                    PatProp::Shorthand(name) => {
                        names.insert(name);
                    }
                    PatProp::KeyValue(_, value) => collect_pat(value, names),
                }
            }
        }
    }
}

fn collect_params<'a>(params: &'a [Param], names: &mut HashSet<&'a str>) {
    for param in params {
        collect_pat(&param.pat, names);
    }
}

/// What a scope sees of the two names.
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    /// `from` resolves to a binding that is being renamed.
    renaming: bool,
    /// `to` is bound here or in an enclosing scope.
    binds_to: bool,
}

struct Renamer<'a> {
    from: &'a str,
    to: &'a str,
    renamed: bool,
    collision: bool,
}

impl Renamer<'_> {
    fn scope(&mut self, parent: Scope, names: &HashSet<&str>) -> Scope {
        let binds_from = names.contains(self.from);
        let binds_to = names.contains(self.to);
        let renaming = parent.renaming || binds_from;
        if (renaming && binds_to) || (binds_from && parent.binds_to) {
            self.collision = true;
        }
        Scope {
            renaming,
            binds_to: parent.binds_to || binds_to,
        }
    }

    fn binding(&mut self, name: &str, scope: Scope) -> String {
        if name == self.from && scope.renaming {
            self.renamed = true;
            self.to.to_string()
        } else {
            name.to_string()
        }
    }

    fn reference(&mut self, name: &str, scope: Scope) -> String {
        if !scope.renaming {
            return name.to_string();
        }
        if name == self.to {
            self.collision = true;
        }
        if name == self.from {
            self.to.to_string()
        } else {
            name.to_string()
        }
    }

    /// `ns.Name` resolves through its first segment.
    fn qualified(&mut self, name: &str, state: Scope) -> String {
        match name.split_once('.') {
            Some((head, rest)) => format!("{}.{}", self.reference(head, state), rest),
            None => self.reference(name, state),
        }
    }

    fn items(&mut self, items: &[Item], state: Scope) -> Vec<Item> {
        items
            .iter()
            .map(|item| Item {
                comments: item.comments.clone(),
                blank_line_before: item.blank_line_before,
                stmt: self.stmt(&item.stmt, state),
            })
            .collect()
    }

    fn stmt(&mut self, stmt: &Stmt, state: Scope) -> Stmt {
        match stmt {
            Stmt::Var(decl) => Stmt::Var(VarDecl {
                kind: decl.kind,
                declarators: decl
                    .declarators
                    .iter()
                    .map(|d| Declarator {
                        pat: self.pat(&d.pat, state),
                        type_ann: d.type_ann.as_ref().map(|t| self.ty(t, state)),
                        init: d.init.as_ref().map(|e| self.expr(e, state)),
                    })
                    .collect(),
            }),
            Stmt::Function(func) => Stmt::Function(self.function(func, state, false)),
            Stmt::Return(value) => Stmt::Return(value.as_ref().map(|e| self.expr(e, state))),
            Stmt::Expr(expr) => Stmt::Expr(self.expr(expr, state)),
            Stmt::Import(import) => Stmt::Import(self.import(import, state)),
            Stmt::Export(inner) => Stmt::Export(Box::new(self.stmt(inner, state))),
            Stmt::ExportDefault(ExportDefault::Function(func)) => {
                Stmt::ExportDefault(ExportDefault::Function(self.function(func, state, false)))
            }
            Stmt::ExportDefault(ExportDefault::Expr(expr)) => {
                Stmt::ExportDefault(ExportDefault::Expr(self.expr(expr, state)))
            }
            Stmt::Interface(iface) => Stmt::Interface(InterfaceDecl {
                name: self.binding(&iface.name, state),
                extends: iface.extends.iter().map(|t| self.ty(t, state)).collect(),
                body: self.members(&iface.body, state),
            }),
            Stmt::TypeAlias(alias) => Stmt::TypeAlias(TypeAlias {
                name: self.binding(&alias.name, state),
                ty: self.ty(&alias.ty, state),
            }),
        }
    }

    fn import(&mut self, import: &ImportDecl, state: Scope) -> ImportDecl {
        ImportDecl {
            type_only: import.type_only,
            default: import.default.as_ref().map(|n| self.binding(n, state)),
            namespace: import.namespace.as_ref().map(|n| self.binding(n, state)),
            named: import
                .named
                .iter()
                .map(|s| ImportSpecifier {
                    imported: s.imported.clone(),
                    local: self.binding(&s.local, state),
                })
                .collect(),
            source: import.source.clone(),
        }
    }

    /// A function opens a scope for its parameters and body. An expression
    /// function's own name is bound inside that scope; a declaration's name
    /// belongs to the enclosing one.
    fn function(&mut self, func: &Function, outer: Scope, is_expression: bool) -> Function {
        let mut names = declared_names(&func.body);
        collect_params(&func.params, &mut names);
        if is_expression {
            if let Some(name) = &func.name {
                names.insert(name);
            }
        }
        let inner = self.scope(outer, &names);

        let name_state = if is_expression { inner } else { outer };
        Function {
            name: func.name.as_ref().map(|n| self.binding(n, name_state)),
            is_async: func.is_async,
            params: self.params(&func.params, inner),
            return_type: func.return_type.as_ref().map(|t| self.ty(t, inner)),
            body: self.items(&func.body, inner),
        }
    }

    fn arrow(&mut self, arrow: &ArrowFn, outer: Scope) -> ArrowFn {
        let mut names = match &arrow.body {
            ArrowBody::Block(items) => declared_names(items),
            ArrowBody::Expr(_) => HashSet::new(),
        };
        collect_params(&arrow.params, &mut names);
        let inner = self.scope(outer, &names);

        ArrowFn {
            is_async: arrow.is_async,
            params: self.params(&arrow.params, inner),
            body: match &arrow.body {
                ArrowBody::Block(items) => ArrowBody::Block(self.items(items, inner)),
                ArrowBody::Expr(body) => ArrowBody::Expr(Box::new(self.expr(body, inner))),
            },
        }
    }

    fn params(&mut self, params: &[Param], state: Scope) -> Vec<Param> {
        params
            .iter()
            .map(|p| Param {
                pat: self.pat(&p.pat, state),
                optional: p.optional,
                type_ann: p.type_ann.as_ref().map(|t| self.ty(t, state)),
            })
            .collect()
    }

    fn pat(&mut self, pat: &Pat, state: Scope) -> Pat {
        match pat {
            Pat::Ident(name) => Pat::Ident(self.binding(name, state)),
            Pat::Object(props) => Pat::Object(
                props
                    .iter()
                    .map(|prop| match prop {
                        PatProp::Shorthand(name) => {
                            let local = self.binding(name, state);
                            if &local == name {
                                PatProp::Shorthand(local)
                            } else {
                                PatProp::KeyValue(PropKey::Ident(name.clone()), Pat::Ident(local))
                            }
                        }
                        PatProp::KeyValue(key, value) => {
                            PatProp::KeyValue(self.prop_key(key, state), self.pat(value, state))
                        }
                    })
                    .collect(),
            ),
        }
    }

    fn prop_key(&mut self, key: &PropKey, state: Scope) -> PropKey {
        match key {
            PropKey::Computed(expr) => PropKey::Computed(Box::new(self.expr(expr, state))),
            other => other.clone(),
        }
    }

    fn boxed(&mut self, expr: &Expr, state: Scope) -> Box<Expr> {
        Box::new(self.expr(expr, state))
    }

    fn exprs(&mut self, exprs: &[Expr], state: Scope) -> Vec<Expr> {
        exprs.iter().map(|e| self.expr(e, state)).collect()
    }

    fn call(&mut self, call: &CallExpr, state: Scope) -> CallExpr {
        CallExpr {
            callee: self.boxed(&call.callee, state),
            args: self.exprs(&call.args, state),
        }
    }

    fn expr(&mut self, expr: &Expr, state: Scope) -> Expr {
        match expr {
            Expr::Ident(name) => Expr::Ident(self.reference(name, state)),
            Expr::Str(_) | Expr::Num(_) | Expr::Bool(_) | Expr::Null => expr.clone(),
            Expr::Array(elements) => Expr::Array(self.exprs(elements, state)),
            Expr::Object(props) => Expr::Object(
                props
                    .iter()
                    .map(|prop| match prop {
                        Prop::KeyValue(key, value) => {
                            Prop::KeyValue(self.prop_key(key, state), self.expr(value, state))
                        }
                        Prop::Shorthand(name) => {
                            let value = self.reference(name, state);
                            if &value == name {
                                Prop::Shorthand(value)
                            } else {
                                Prop::KeyValue(PropKey::Ident(name.clone()), Expr::Ident(value))
                            }
                        }
                        Prop::Spread(arg) => Prop::Spread(self.expr(arg, state)),
                    })
                    .collect(),
            ),
            Expr::Member { object, property } => Expr::Member {
                object: self.boxed(object, state),
                property: property.clone(),
            },
            Expr::Index { object, index } => Expr::Index {
                object: self.boxed(object, state),
                index: self.boxed(index, state),
            },
            Expr::Call(call) => Expr::Call(self.call(call, state)),
            Expr::New(call) => Expr::New(self.call(call, state)),
            Expr::Arrow(arrow) => Expr::Arrow(self.arrow(arrow, state)),
            Expr::Function(func) => Expr::Function(Box::new(self.function(func, state, true))),
            Expr::Await(arg) => Expr::Await(self.boxed(arg, state)),
            Expr::Unary { op, arg } => Expr::Unary {
                op: op.clone(),
                arg: self.boxed(arg, state),
            },
            Expr::Binary { op, left, right } => Expr::Binary {
                op: op.clone(),
                left: self.boxed(left, state),
                right: self.boxed(right, state),
            },
            Expr::Cond {
                test,
                consequent,
                alternate,
            } => Expr::Cond {
                test: self.boxed(test, state),
                consequent: self.boxed(consequent, state),
                alternate: self.boxed(alternate, state),
            },
            Expr::Assign { op, target, value } => Expr::Assign {
                op: op.clone(),
                target: self.boxed(target, state),
                value: self.boxed(value, state),
            },
            Expr::Spread(arg) => Expr::Spread(self.boxed(arg, state)),
            Expr::Paren(inner) => Expr::Paren(self.boxed(inner, state)),
        }
    }

    fn ty(&mut self, ty: &TsType, state: Scope) -> TsType {
        match ty {
            TsType::Keyword(_) | TsType::Str(_) => ty.clone(),
            TsType::Ref { name, args } => TsType::Ref {
                name: self.qualified(name, state),
                args: args.iter().map(|t| self.ty(t, state)).collect(),
            },
            TsType::TypeOf(name) => TsType::TypeOf(self.qualified(name, state)),
            TsType::Literal(members) => TsType::Literal(self.members(members, state)),
            TsType::Array(elem) => TsType::Array(Box::new(self.ty(elem, state))),
            TsType::Union(types) => {
                TsType::Union(types.iter().map(|t| self.ty(t, state)).collect())
            }
            TsType::Intersection(types) => {
                TsType::Intersection(types.iter().map(|t| self.ty(t, state)).collect())
            }
            TsType::Paren(inner) => TsType::Paren(Box::new(self.ty(inner, state))),
        }
    }

    /// Member keys are never renamed; only the types they carry.
    fn members(&mut self, members: &[TsMember], state: Scope) -> Vec<TsMember> {
        members
            .iter()
            .map(|member| match member {
                TsMember::Property {
                    readonly,
                    key,
                    optional,
                    type_ann,
                } => TsMember::Property {
                    readonly: *readonly,
                    key: key.clone(),
                    optional: *optional,
                    type_ann: type_ann.as_ref().map(|t| self.ty(t, state)),
                },
                TsMember::Method {
                    key,
                    optional,
                    params,
                    return_type,
                } => TsMember::Method {
                    key: key.clone(),
                    optional: *optional,
                    params: self.signature_params(params, state),
                    return_type: return_type.as_ref().map(|t| self.ty(t, state)),
                },
                TsMember::Call {
                    params,
                    return_type,
                } => TsMember::Call {
                    params: self.signature_params(params, state),
                    return_type: return_type.as_ref().map(|t| self.ty(t, state)),
                },
                TsMember::Construct {
                    params,
                    return_type,
                } => TsMember::Construct {
                    params: self.signature_params(params, state),
                    return_type: return_type.as_ref().map(|t| self.ty(t, state)),
                },
                TsMember::Index {
                    param,
                    key_type,
                    type_ann,
                } => TsMember::Index {
                    param: param.clone(),
                    key_type: self.ty(key_type, state),
                    type_ann: self.ty(type_ann, state),
                },
            })
            .collect()
    }

    /// Parameter names in a type signature are labels, not bindings.
    fn signature_params(&mut self, params: &[Param], state: Scope) -> Vec<Param> {
        params
            .iter()
            .map(|p| Param {
                pat: p.pat.clone(),
                optional: p.optional,
                type_ann: p.type_ann.as_ref().map(|t| self.ty(t, state)),
            })
            .collect()
    }
}

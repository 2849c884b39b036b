//! Deterministic source printer.
//!
//! Output uses two-space indentation, double-quoted strings, one object
//! property per line and inline arrays. Blank lines and comments attached
//! to items are reproduced.

use crate::ast::*;
use crate::lexer::{Comment, CommentKind};

const INDENT: &str = "  ";

// Binding strength of an expression when it appears as an operand.
const PREC_ASSIGN: u8 = 2;
const PREC_COND: u8 = 3;
const PREC_UNARY: u8 = 16;
const PREC_POSTFIX: u8 = 18;
const PREC_PRIMARY: u8 = 20;

/// Print a whole module, ending with a newline.
pub fn print_module(module: &Module) -> String {
    let mut printer = Printer::default();
    printer.items(&module.items);
    printer.out
}

/// Print a single expression at indentation level zero.
pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::default();
    printer.expr(expr, PREC_ASSIGN);
    printer.out
}

pub fn print_type(ty: &TsType) -> String {
    let mut printer = Printer::default();
    printer.ty(ty);
    printer.out
}

/// Double-quoted string literal with JSON-compatible escaping.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn binary_precedence(op: &str) -> u8 {
    let level = match op {
        "??" => 1,
        "||" => 2,
        "&&" => 3,
        "|" => 4,
        "^" => 5,
        "&" => 6,
        "==" | "!=" | "===" | "!==" => 7,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 8,
        "<<" | ">>" | ">>>" => 9,
        "+" | "-" => 10,
        "**" => 12,
        _ => 11,
    };
    PREC_COND + level
}

/// `??` cannot share an unparenthesized operand with `||` or `&&`.
fn mixes_coalesce(op: &str, operand: &Expr) -> bool {
    match operand {
        Expr::Binary { op: inner, .. } => match op {
            "??" => matches!(inner.as_str(), "||" | "&&"),
            "||" | "&&" => inner == "??",
            _ => false,
        },
        _ => false,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Arrow(_) | Expr::Assign { .. } | Expr::Spread(_) => PREC_ASSIGN,
        Expr::Cond { .. } => PREC_COND,
        Expr::Binary { op, .. } => binary_precedence(op),
        Expr::Unary { .. } | Expr::Await(_) => PREC_UNARY,
        Expr::Call(_) | Expr::New(_) | Expr::Member { .. } | Expr::Index { .. } => PREC_POSTFIX,
        _ => PREC_PRIMARY,
    }
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn items(&mut self, items: &[Item]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 && item.blank_line_before {
                self.out.push('\n');
            }
            for comment in &item.comments {
                self.write_indent();
                self.comment(comment);
                self.out.push('\n');
            }
            self.write_indent();
            self.stmt(&item.stmt);
            self.out.push('\n');
        }
    }

    fn comment(&mut self, comment: &Comment) {
        match comment.kind {
            CommentKind::Line => {
                self.push("//");
                self.push(&comment.text);
            }
            CommentKind::Block => {
                self.push("/*");
                self.push(&comment.text);
                self.push("*/");
            }
        }
    }

    /// `{ items }` with the closing brace at the current indentation.
    fn block(&mut self, items: &[Item]) {
        if items.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{\n");
        self.indent += 1;
        self.items(items);
        self.indent -= 1;
        self.write_indent();
        self.push("}");
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Var(decl) => {
                self.var_decl(decl);
                self.push(";");
            }
            Stmt::Function(func) => self.function(func),
            Stmt::Return(value) => {
                self.push("return");
                if let Some(value) = value {
                    self.push(" ");
                    self.expr(value, PREC_ASSIGN);
                }
                self.push(";");
            }
            Stmt::Expr(expr) => {
                // a leading `{` or `function` would start a block or declaration
                if matches!(expr, Expr::Object(_) | Expr::Function(_)) {
                    self.push("(");
                    self.expr(expr, PREC_ASSIGN);
                    self.push(")");
                } else {
                    self.expr(expr, PREC_ASSIGN);
                }
                self.push(";");
            }
            Stmt::Import(import) => self.import(import),
            Stmt::Export(inner) => {
                self.push("export ");
                self.stmt(inner);
            }
            Stmt::ExportDefault(ExportDefault::Function(func)) => {
                self.push("export default ");
                self.function(func);
            }
            Stmt::ExportDefault(ExportDefault::Expr(expr)) => {
                self.push("export default ");
                self.expr(expr, PREC_ASSIGN);
                self.push(";");
            }
            Stmt::Interface(iface) => {
                self.push("interface ");
                self.push(&iface.name);
                for (i, parent) in iface.extends.iter().enumerate() {
                    self.push(if i == 0 { " extends " } else { ", " });
                    self.ty(parent);
                }
                self.push(" ");
                self.members(&iface.body);
            }
            Stmt::TypeAlias(alias) => {
                self.push("type ");
                self.push(&alias.name);
                self.push(" = ");
                self.ty(&alias.ty);
                self.push(";");
            }
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        self.push(decl.kind.as_str());
        self.push(" ");
        for (i, declarator) in decl.declarators.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.pat(&declarator.pat);
            if let Some(ty) = &declarator.type_ann {
                self.push(": ");
                self.ty(ty);
            }
            if let Some(init) = &declarator.init {
                self.push(" = ");
                self.expr(init, PREC_ASSIGN);
            }
        }
    }

    fn import(&mut self, import: &ImportDecl) {
        self.push("import ");
        if import.type_only {
            self.push("type ");
        }

        let mut clauses = Vec::new();
        if let Some(default) = &import.default {
            clauses.push(default.clone());
        }
        if let Some(namespace) = &import.namespace {
            clauses.push(format!("* as {}", namespace));
        }
        if !import.named.is_empty() {
            let named = import
                .named
                .iter()
                .map(|s| {
                    if s.imported == s.local {
                        s.local.clone()
                    } else {
                        format!("{} as {}", s.imported, s.local)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            clauses.push(format!("{{ {} }}", named));
        }

        if !clauses.is_empty() {
            self.push(&clauses.join(", "));
            self.push(" from ");
        }
        self.push(&quote(&import.source));
        self.push(";");
    }

    fn function(&mut self, func: &Function) {
        if func.is_async {
            self.push("async ");
        }
        self.push("function ");
        if let Some(name) = &func.name {
            self.push(name);
        }
        self.params(&func.params);
        if let Some(ty) = &func.return_type {
            self.push(": ");
            self.ty(ty);
        }
        self.push(" ");
        self.block(&func.body);
    }

    fn params(&mut self, params: &[Param]) {
        self.push("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.param(param);
        }
        self.push(")");
    }

    fn param(&mut self, param: &Param) {
        self.pat(&param.pat);
        if param.optional {
            self.push("?");
        }
        if let Some(ty) = &param.type_ann {
            self.push(": ");
            self.ty(ty);
        }
    }

    fn pat(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(name) => self.push(name),
            Pat::Object(props) if props.is_empty() => self.push("{}"),
            Pat::Object(props) => {
                self.push("{ ");
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    match prop {
                        PatProp::Shorthand(name) => self.push(name),
                        PatProp::KeyValue(key, value) => {
                            self.prop_key(key);
                            self.push(": ");
                            self.pat(value);
                        }
                    }
                }
                self.push(" }");
            }
        }
    }

    fn expr(&mut self, expr: &Expr, min_prec: u8) {
        if precedence(expr) < min_prec {
            self.push("(");
            self.expr(expr, PREC_ASSIGN);
            self.push(")");
            return;
        }

        match expr {
            Expr::Ident(name) => self.push(name),
            Expr::Str(value) => self.push(&quote(value)),
            Expr::Num(value) => self.push(value),
            Expr::Bool(value) => self.push(if *value { "true" } else { "false" }),
            Expr::Null => self.push("null"),
            Expr::Array(elements) => {
                self.push("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(element, PREC_ASSIGN);
                }
                self.push("]");
            }
            Expr::Object(props) => self.object(props),
            Expr::Member { object, property } => {
                self.expr(object, PREC_POSTFIX);
                self.push(".");
                self.push(property);
            }
            Expr::Index { object, index } => {
                self.expr(object, PREC_POSTFIX);
                self.push("[");
                self.expr(index, PREC_ASSIGN);
                self.push("]");
            }
            Expr::Call(call) => {
                self.expr(&call.callee, PREC_POSTFIX);
                self.args(&call.args);
            }
            Expr::New(call) => {
                self.push("new ");
                // a call inside the callee would take the arguments
                if matches!(call.callee.as_ref(), Expr::Call(_)) {
                    self.push("(");
                    self.expr(&call.callee, PREC_ASSIGN);
                    self.push(")");
                } else {
                    self.expr(&call.callee, PREC_POSTFIX);
                }
                self.args(&call.args);
            }
            Expr::Arrow(arrow) => self.arrow(arrow),
            Expr::Function(func) => self.function(func),
            Expr::Await(arg) => {
                self.push("await ");
                self.expr(arg, PREC_UNARY);
            }
            Expr::Unary { op, arg } => {
                self.push(op);
                if op.chars().all(char::is_alphabetic) {
                    self.push(" ");
                }
                self.expr(arg, PREC_UNARY);
            }
            Expr::Binary { op, left, right } => {
                let prec = binary_precedence(op);
                // `**` is right-associative and takes no unary left operand
                let (left_min, right_min) = if op == "**" {
                    (PREC_UNARY + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                let left_min = if mixes_coalesce(op, left) { PREC_PRIMARY } else { left_min };
                let right_min = if mixes_coalesce(op, right) { PREC_PRIMARY } else { right_min };
                self.expr(left, left_min);
                self.push(" ");
                self.push(op);
                self.push(" ");
                self.expr(right, right_min);
            }
            Expr::Cond {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test, PREC_COND + 1);
                self.push(" ? ");
                self.expr(consequent, PREC_ASSIGN);
                self.push(" : ");
                self.expr(alternate, PREC_ASSIGN);
            }
            Expr::Assign { op, target, value } => {
                self.expr(target, PREC_POSTFIX);
                self.push(" ");
                self.push(op);
                self.push(" ");
                self.expr(value, PREC_ASSIGN);
            }
            Expr::Spread(arg) => {
                self.push("...");
                self.expr(arg, PREC_ASSIGN);
            }
            Expr::Paren(inner) => {
                self.push("(");
                self.expr(inner, PREC_ASSIGN);
                self.push(")");
            }
        }
    }

    fn args(&mut self, args: &[Expr]) {
        self.push("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(arg, PREC_ASSIGN);
        }
        self.push(")");
    }

    fn arrow(&mut self, arrow: &ArrowFn) {
        if arrow.is_async {
            self.push("async ");
        }
        match arrow.params.as_slice() {
            [Param {
                pat: Pat::Ident(name),
                optional: false,
                type_ann: None,
            }] => self.push(name),
            params => self.params(params),
        }
        self.push(" => ");
        match &arrow.body {
            ArrowBody::Block(items) => self.block(items),
            ArrowBody::Expr(body) if matches!(body.as_ref(), Expr::Object(_)) => {
                self.push("(");
                self.expr(body, PREC_ASSIGN);
                self.push(")");
            }
            ArrowBody::Expr(body) => self.expr(body, PREC_ASSIGN),
        }
    }

    fn object(&mut self, props: &[Prop]) {
        if props.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{");
        self.indent += 1;
        for (i, prop) in props.iter().enumerate() {
            if i > 0 {
                self.push(",");
            }
            self.newline();
            match prop {
                Prop::KeyValue(key, value) => {
                    self.prop_key(key);
                    self.push(": ");
                    self.expr(value, PREC_ASSIGN);
                }
                Prop::Shorthand(name) => self.push(name),
                Prop::Spread(arg) => {
                    self.push("...");
                    self.expr(arg, PREC_ASSIGN);
                }
            }
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn prop_key(&mut self, key: &PropKey) {
        match key {
            PropKey::Ident(name) | PropKey::Num(name) => self.push(name),
            PropKey::Str(name) => self.push(&quote(name)),
            PropKey::Computed(expr) => {
                self.push("[");
                self.expr(expr, PREC_ASSIGN);
                self.push("]");
            }
        }
    }

    fn ty(&mut self, ty: &TsType) {
        match ty {
            TsType::TypeOf(name) => {
                self.push("typeof ");
                self.push(name);
            }
            TsType::Keyword(name) => self.push(name),
            TsType::Ref { name, args } => {
                self.push(name);
                if !args.is_empty() {
                    self.push("<");
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.ty(arg);
                    }
                    self.push(">");
                }
            }
            TsType::Literal(members) => self.members(members),
            TsType::Str(value) => self.push(&quote(value)),
            TsType::Array(elem) => {
                if matches!(elem.as_ref(), TsType::Union(_) | TsType::Intersection(_)) {
                    self.push("(");
                    self.ty(elem);
                    self.push(")");
                } else {
                    self.ty(elem);
                }
                self.push("[]");
            }
            TsType::Union(types) => self.type_list(types, " | "),
            TsType::Intersection(types) => self.type_list(types, " & "),
            TsType::Paren(inner) => {
                self.push("(");
                self.ty(inner);
                self.push(")");
            }
        }
    }

    fn type_list(&mut self, types: &[TsType], separator: &str) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.push(separator);
            }
            if separator == " & " && matches!(ty, TsType::Union(_)) {
                self.push("(");
                self.ty(ty);
                self.push(")");
            } else {
                self.ty(ty);
            }
        }
    }

    fn members(&mut self, members: &[TsMember]) {
        if members.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{");
        self.indent += 1;
        for member in members {
            self.newline();
            self.member(member);
            self.push(";");
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn member(&mut self, member: &TsMember) {
        match member {
            TsMember::Property {
                readonly,
                key,
                optional,
                type_ann,
            } => {
                if *readonly {
                    self.push("readonly ");
                }
                self.prop_key(key);
                if *optional {
                    self.push("?");
                }
                if let Some(ty) = type_ann {
                    self.push(": ");
                    self.ty(ty);
                }
            }
            TsMember::Method {
                key,
                optional,
                params,
                return_type,
            } => {
                self.prop_key(key);
                if *optional {
                    self.push("?");
                }
                self.signature(params, return_type.as_ref());
            }
            TsMember::Call {
                params,
                return_type,
            } => self.signature(params, return_type.as_ref()),
            TsMember::Construct {
                params,
                return_type,
            } => {
                self.push("new ");
                self.signature(params, return_type.as_ref());
            }
            TsMember::Index {
                param,
                key_type,
                type_ann,
            } => {
                self.push("[");
                self.push(param);
                self.push(": ");
                self.ty(key_type);
                self.push("]: ");
                self.ty(type_ann);
            }
        }
    }

    fn signature(&mut self, params: &[Param], return_type: Option<&TsType>) {
        self.params(params);
        if let Some(ty) = return_type {
            self.push(": ");
            self.ty(ty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_expression, parse_module};
    use rstest::rstest;

    fn reprint(source: &str) -> String {
        print_module(&parse_module(source).unwrap())
    }

    #[test]
    fn test_print_model_factory() {
        let source = "module.exports = (sequelize, DataTypes) => {\n\
                      const attributes = { id: { type: DataTypes.INTEGER(11), primaryKey: true } }\n\
                      \n\
                      const options = { tableName: 'user', comment: '', indexes: [] }\n\
                      return sequelize.define('user_model', attributes, options)\n\
                      }";
        let expected = "module.exports = (sequelize, DataTypes) => {\n\
                        \x20 const attributes = {\n\
                        \x20   id: {\n\
                        \x20     type: DataTypes.INTEGER(11),\n\
                        \x20     primaryKey: true\n\
                        \x20   }\n\
                        \x20 };\n\
                        \n\
                        \x20 const options = {\n\
                        \x20   tableName: \"user\",\n\
                        \x20   comment: \"\",\n\
                        \x20   indexes: []\n\
                        \x20 };\n\
                        \x20 return sequelize.define(\"user_model\", attributes, options);\n\
                        };\n";
        assert_eq!(reprint(source), expected);
    }

    #[test]
    fn test_print_array_of_objects_inline() {
        let expr = parse_expression("[{ name: 'a', fields: ['x', 'y'] }, { name: 'b' }]").unwrap();
        assert_eq!(
            print_expr(&expr),
            "[{\n  name: \"a\",\n  fields: [\"x\", \"y\"]\n}, {\n  name: \"b\"\n}]"
        );
    }

    #[test]
    fn test_print_single_param_arrow_without_parens() {
        assert_eq!(reprint("module.exports = (app) => {}"), "module.exports = app => {};\n");
        assert_eq!(
            reprint("const f = (app: App) => app"),
            "const f = (app: App) => app;\n"
        );
    }

    #[test]
    fn test_print_typescript_declarations() {
        let source = "import { Model, BuildOptions } from 'sequelize'\n\
                      export interface IUserModel extends IUserAttributes, Model {}\n\
                      export type IUserModelStatic = typeof Model & { new (values?: object, options?: BuildOptions): IUserModel }";
        let expected = "import { Model, BuildOptions } from \"sequelize\";\n\
                        export interface IUserModel extends IUserAttributes, Model {}\n\
                        export type IUserModelStatic = typeof Model & {\n\
                        \x20 new (values?: object, options?: BuildOptions): IUserModel;\n\
                        };\n";
        assert_eq!(reprint(source), expected);
    }

    #[test]
    fn test_print_comments_and_imports() {
        let source = "// @ts-nocheck\nimport * as path from 'path';\nimport { a as b } from 'c';\n/* note */\nexport default function () {}";
        let expected = "// @ts-nocheck\nimport * as path from \"path\";\nimport { a as b } from \"c\";\n/* note */\nexport default function () {}\n";
        assert_eq!(reprint(source), expected);
    }

    #[rstest]
    #[case("(a + b) * c", "(a + b) * c")]
    #[case("a - (b - c)", "a - (b - c)")]
    #[case("!(a && b)", "!(a && b)")]
    #[case("typeof x", "typeof x")]
    #[case("await context.getAsync('DB')", "await context.getAsync(\"DB\")")]
    #[case("new Sequelize()", "new Sequelize()")]
    #[case("a ? b : c", "a ? b : c")]
    #[case("x => ({})", "x => ({})")]
    fn test_print_expressions(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(print_expr(&parse_expression(source).unwrap()), expected);
    }

    #[test]
    fn test_print_synthesized_binary_adds_parens() {
        let expr = Expr::Binary {
            op: "*".into(),
            left: Box::new(Expr::Binary {
                op: "+".into(),
                left: Box::new(Expr::ident("a")),
                right: Box::new(Expr::ident("b")),
            }),
            right: Box::new(Expr::ident("c")),
        };
        assert_eq!(print_expr(&expr), "(a + b) * c");
    }

    fn binary(op: &str, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn unary(op: &str, arg: Expr) -> Expr {
        Expr::Unary {
            op: op.into(),
            arg: Box::new(arg),
        }
    }

    fn pair(op: &str, left: &str, right: &str) -> Expr {
        binary(op, Expr::ident(left), Expr::ident(right))
    }

    #[rstest]
    #[case(binary("**", pair("**", "a", "b"), Expr::ident("c")), "(a ** b) ** c")]
    #[case(binary("**", Expr::ident("a"), pair("**", "b", "c")), "a ** b ** c")]
    #[case(binary("**", unary("-", Expr::ident("a")), Expr::ident("b")), "(-a) ** b")]
    #[case(binary("**", Expr::ident("a"), unary("-", Expr::ident("b"))), "a ** -b")]
    #[case(binary("*", pair("**", "a", "b"), Expr::ident("c")), "a ** b * c")]
    #[case(binary("**", pair("*", "a", "b"), Expr::ident("c")), "(a * b) ** c")]
    #[case(binary("??", pair("||", "a", "b"), Expr::ident("c")), "(a || b) ?? c")]
    #[case(binary("??", Expr::ident("a"), pair("&&", "b", "c")), "a ?? (b && c)")]
    #[case(binary("||", pair("??", "a", "b"), Expr::ident("c")), "(a ?? b) || c")]
    #[case(binary("&&", Expr::ident("a"), pair("??", "b", "c")), "a && (b ?? c)")]
    #[case(binary("??", pair("??", "a", "b"), Expr::ident("c")), "a ?? b ?? c")]
    #[case(binary("||", pair("&&", "a", "b"), Expr::ident("c")), "a && b || c")]
    fn test_print_exponent_and_coalesce_operands(#[case] expr: Expr, #[case] expected: &str) {
        assert_eq!(print_expr(&expr), expected);
    }

    #[rstest]
    #[case("plain", "\"plain\"")]
    #[case("say \"hi\"", "\"say \\\"hi\\\"\"")]
    #[case("a\\b", "\"a\\\\b\"")]
    #[case("line\nbreak\ttab", "\"line\\nbreak\\ttab\"")]
    #[case("\u{1}", "\"\\u0001\"")]
    #[case("\u{2028}", "\"\\u2028\"")]
    #[case("用户", "\"用户\"")]
    fn test_quote(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(quote(value), expected);
    }

    #[test]
    fn test_print_object_keys_are_quoted_when_needed() {
        let expr = Expr::object(vec![
            Prop::new("created_at", Expr::Null),
            Prop::new("created-at", Expr::Bool(false)),
        ]);
        assert_eq!(
            print_expr(&expr),
            "{\n  created_at: null,\n  \"created-at\": false\n}"
        );
    }
}

//! Lua text emission shared by the pretty and minified renderers.
//!
//! Binary operations are always parenthesized, so the output never depends
//! on Lua's precedence rules. Constructs that have no Lua equivalent
//! (imports, intrinsics, elements, assignment expressions) are emitted in
//! dialect syntax so that partially desugared trees can still be inspected.

use crate::ast::*;
use crate::token::Word;
use bstr::{BStr, ByteSlice};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Two-space indentation, one statement per line.
    Pretty,
    /// Single line with the minimum spacing Lua needs.
    Minify,
}

/// Emits Lua for nodes of one arena.
pub struct LuaEmitter<'a> {
    arena: &'a Arena,
    layout: Layout,
}

impl<'a> LuaEmitter<'a> {
    pub fn new(arena: &'a Arena, layout: Layout) -> Self {
        Self { arena, layout }
    }

    fn pretty(&self) -> bool {
        self.layout == Layout::Pretty
    }

    fn pad(&self, indent: usize) -> String {
        if self.pretty() {
            "  ".repeat(indent)
        } else {
            String::new()
        }
    }

    fn comma(&self) -> &'static str {
        if self.pretty() { ", " } else { "," }
    }

    fn equals(&self) -> &'static str {
        if self.pretty() { " = " } else { "=" }
    }

    /// Statements of a block. The first line carries no indentation of its
    /// own in minified output; in pretty output every line is indented.
    pub fn block(&self, body: &[Stmt], indent: usize) -> String {
        let rendered = body
            .iter()
            .filter(|stmt| !stmt.is_ignored())
            .map(|stmt| self.statement(stmt, indent))
            .filter(|text| !text.is_empty());

        let mut out = String::new();
        if self.pretty() {
            let pad = self.pad(indent);
            for text in rendered {
                if !out.is_empty() {
                    if text.starts_with('(') {
                        out.push(';');
                    }
                    out.push('\n');
                }
                out.push_str(&pad);
                out.push_str(&text);
            }
        } else {
            for text in rendered {
                if !out.is_empty() {
                    // `f()\n(g)()` would parse as a call of f's result.
                    out.push(if text.starts_with('(') { ';' } else { ' ' });
                }
                out.push_str(&text);
            }
        }
        out
    }

    /// `head body tail`, with the body indented one level deeper.
    fn wrap(&self, head: &str, body: &[Stmt], tail: &str, indent: usize) -> String {
        let inner = self.block(body, indent + 1);
        if inner.is_empty() {
            format!("{head} {tail}")
        } else if self.pretty() {
            format!("{head}\n{inner}\n{}{tail}", self.pad(indent))
        } else {
            format!("{head} {inner} {tail}")
        }
    }

    /// A statement without its leading indentation.
    pub fn statement(&self, stmt: &Stmt, indent: usize) -> String {
        match &stmt.kind {
            StmtKind::Return(values) if values.is_empty() => "return".to_string(),
            StmtKind::Return(values) => format!("return {}", self.list(values, indent)),
            StmtKind::LocalFunction { name, func } => {
                format!("local {}", self.closure(func, Some(name.as_str()), indent))
            }
            StmtKind::Function { path, func } => {
                self.closure(func, Some(path.to_string().as_str()), indent)
            }
            StmtKind::Local { names, values } if values.is_empty() => {
                format!("local {}", names.join(self.comma()))
            }
            StmtKind::Local { names, values } => format!(
                "local {}{}{}",
                names.join(self.comma()),
                self.equals(),
                self.list(values, indent)
            ),
            StmtKind::CompoundAssign { target, op, value } => self.operation(
                &self.expression(*target, indent),
                &AssignOp::Compound(*op).as_str(),
                &self.expression(*value, indent),
            ),
            StmtKind::Assign { targets, values } => format!(
                "{}{}{}",
                self.list(targets, indent),
                self.equals(),
                self.list(values, indent)
            ),
            StmtKind::Call(call) => self.expression(*call, indent),
            StmtKind::Break => "break".to_string(),
            StmtKind::Do(body) => self.wrap("do", body, "end", indent),
            StmtKind::While { condition, body } => {
                let head = format!("while {} do", self.expression(*condition, indent));
                self.wrap(&head, body, "end", indent)
            }
            StmtKind::Repeat { body, condition } => {
                let tail = format!("until {}", self.expression(*condition, indent));
                self.wrap("repeat", body, &tail, indent)
            }
            StmtKind::If(arm) => self.if_chain(arm, indent),
            StmtKind::ForNumeric {
                var,
                start,
                limit,
                step,
                body,
            } => {
                let mut head = format!(
                    "for {var}{}{}{}{}",
                    self.equals(),
                    self.expression(*start, indent),
                    self.comma(),
                    self.expression(*limit, indent)
                );
                if let Some(step) = step {
                    head.push_str(self.comma());
                    head.push_str(&self.expression(*step, indent));
                }
                head.push_str(" do");
                self.wrap(&head, body, "end", indent)
            }
            StmtKind::ForGeneric {
                names,
                iterators,
                body,
            } => {
                let head = format!(
                    "for {} in {} do",
                    names.join(self.comma()),
                    self.list(iterators, indent)
                );
                self.wrap(&head, body, "end", indent)
            }
            StmtKind::Import { binding, source } => {
                let source = self.expression(*source, indent);
                match binding {
                    ImportBinding::Default(name) => format!("import {name} from {source}"),
                    ImportBinding::Named(names) => {
                        format!("import {{ {} }} from {source}", names.join(self.comma()))
                    }
                }
            }
            StmtKind::Intrinsic { expr, args } => {
                let mut out = format!("@{}", self.expression(*expr, indent));
                if !args.is_empty() {
                    let _ = write!(out, "({})", self.list(args, indent));
                }
                out
            }
            StmtKind::Ignore => String::new(),
        }
    }

    fn if_chain(&self, arm: &IfArm, indent: usize) -> String {
        let separator = if self.pretty() {
            format!("\n{}", self.pad(indent))
        } else {
            " ".to_string()
        };
        let head = format!("if {} then", self.expression(arm.condition, indent));
        let mut out = self.arm(&head, &arm.body, indent);
        let mut next = arm.otherwise.as_deref();
        while let Some(otherwise) = next {
            out.push_str(&separator);
            match otherwise {
                ElseArm::ElseIf(arm) => {
                    let head = format!("elseif {} then", self.expression(arm.condition, indent));
                    out.push_str(&self.arm(&head, &arm.body, indent));
                    next = arm.otherwise.as_deref();
                }
                ElseArm::Else { body, .. } => {
                    out.push_str(&self.arm("else", body, indent));
                    next = None;
                }
            }
        }
        out.push_str(&separator);
        out.push_str("end");
        out
    }

    fn arm(&self, head: &str, body: &[Stmt], indent: usize) -> String {
        let inner = self.block(body, indent + 1);
        if inner.is_empty() {
            head.to_string()
        } else if self.pretty() {
            format!("{head}\n{inner}")
        } else {
            format!("{head} {inner}")
        }
    }

    /// `function name(params) body end`, or an anonymous literal.
    pub fn closure(&self, func: &Function, name: Option<&str>, indent: usize) -> String {
        let mut params = func.params.clone();
        if func.variadic {
            params.push("...".to_string());
        }
        let params = params.join(self.comma());
        let head = match name {
            Some(name) => format!("function {name}({params})"),
            None => format!("function({params})"),
        };
        self.wrap(&head, &func.body, "end", indent)
    }

    fn list(&self, exprs: &[ExprId], indent: usize) -> String {
        exprs
            .iter()
            .map(|id| self.expression(*id, indent))
            .collect::<Vec<_>>()
            .join(self.comma())
    }

    /// `left op right`, spaced in pretty output and glued in minified
    /// output wherever the tokens stay distinct.
    fn operation(&self, left: &str, op: &str, right: &str) -> String {
        if self.pretty() || op.starts_with(char::is_alphabetic) {
            format!("{left} {op} {right}")
        } else {
            glue(&glue(left, op), right)
        }
    }

    pub fn expression(&self, id: ExprId, indent: usize) -> String {
        match self.arena.get(id) {
            Expr::Atom(atom) => self.atom(atom, indent),
            Expr::Arith(Arith::Binary { op, left, right }) => {
                // `-a ^ b` reads as `-(a ^ b)`.
                let left = match self.arena.get(*left) {
                    Expr::Arith(Arith::Unary { .. }) if *op == BinaryOp::Pow => {
                        format!("({})", self.expression(*left, indent))
                    }
                    _ => self.expression(*left, indent),
                };
                format!(
                    "({})",
                    self.operation(&left, op.as_str(), &self.expression(*right, indent))
                )
            }
            Expr::Arith(Arith::Unary { op, operand }) => {
                let operand = self.expression(*operand, indent);
                match op {
                    UnaryOp::Not => format!("not {operand}"),
                    _ => glue(op.as_str(), &operand),
                }
            }
            Expr::Arith(Arith::Member { object, name }) => {
                format!("{}.{name}", self.prefix(*object, indent))
            }
            Expr::Arith(Arith::Index { object, key }) => format!(
                "{}[{}]",
                self.prefix(*object, indent),
                self.expression(*key, indent)
            ),
            Expr::Arith(Arith::Call {
                target,
                method,
                args,
            }) => {
                let mut out = self.prefix(*target, indent);
                if let Some(method) = method {
                    out.push(':');
                    out.push_str(method);
                }
                let _ = write!(out, "({})", self.list(args, indent));
                out
            }
            Expr::Arith(Arith::Assign { op, target, value }) => format!(
                "({})",
                self.operation(
                    &self.expression(*target, indent),
                    &op.as_str(),
                    &self.expression(*value, indent)
                )
            ),
        }
    }

    /// The object of an index or call. Literals and unary operations need
    /// parentheses there.
    fn prefix(&self, id: ExprId, indent: usize) -> String {
        let text = self.expression(id, indent);
        match self.arena.get(id) {
            Expr::Atom(Atom::Name(_)) => text,
            Expr::Arith(Arith::Unary { .. }) | Expr::Atom(_) => format!("({text})"),
            Expr::Arith(_) => text,
        }
    }

    fn atom(&self, atom: &Atom, indent: usize) -> String {
        match atom {
            Atom::Number(n) => format_number(*n),
            Atom::String(s) => quote_string(s.as_bstr()),
            Atom::Boolean(b) => b.to_string(),
            Atom::Nil => "nil".to_string(),
            Atom::Name(name) => name.clone(),
            Atom::Vararg => "...".to_string(),
            Atom::Table(table) => self.table(table, indent),
            Atom::Element(element) => self.element(element, indent),
            Atom::Func(func) => self.closure(func, None, indent),
        }
    }

    fn table(&self, table: &TableConstructor, indent: usize) -> String {
        let mut dict = Vec::new();
        let mut array = Vec::new();
        for (key, value) in &table.entries {
            let value = self.expression(*value, indent + 1);
            match key {
                TableKey::Positional(_) => array.push(value),
                TableKey::Expr(key) => {
                    let key = match self.arena.get(*key) {
                        Expr::Atom(Atom::String(s)) if is_identifier(s.as_bstr()) => s.to_string(),
                        _ => format!("[{}]", self.expression(*key, indent + 1)),
                    };
                    dict.push(format!("{key}{}{value}", self.equals()));
                }
            }
        }

        let array = array.join(self.comma());
        if !self.pretty() {
            let separator = if dict.is_empty() || array.is_empty() { "" } else { ";" };
            return format!("{{{}{separator}{array}}}", dict.join(";"));
        }
        if dict.is_empty() {
            return format!("{{{array}}}");
        }
        if !array.is_empty() {
            dict.push(array);
        }
        let inner = self.pad(indent + 1);
        let lines: Vec<String> = dict.iter().map(|line| format!("{inner}{line}")).collect();
        format!("{{\n{}\n{}}}", lines.join(";\n"), self.pad(indent))
    }

    fn element(&self, element: &Element, indent: usize) -> String {
        let mut out = format!("<{}", element.name);
        for (name, value) in &element.properties {
            match self.arena.get(*value) {
                Expr::Atom(Atom::Boolean(true)) => {
                    let _ = write!(out, " {name}");
                }
                Expr::Atom(Atom::String(s)) => {
                    let _ = write!(out, " {name}={}", quote_string(s.as_bstr()));
                }
                _ => {
                    let _ = write!(out, " {name}={{{}}}", self.expression(*value, indent));
                }
            }
        }
        let Some(children) = &element.children else {
            out.push_str("/>");
            return out;
        };
        out.push('>');
        for child in children {
            match self.arena.get(*child) {
                Expr::Atom(Atom::Element(nested)) => out.push_str(&self.element(nested, indent)),
                _ => {
                    let _ = write!(out, "{{{}}}", self.expression(*child, indent));
                }
            }
        }
        let _ = write!(out, "</{}>", element.name);
        out
    }
}

/// Join two fragments, inserting a space only where the boundary would
/// otherwise lex differently (`a and`, `- -x`, `1 ..`).
fn glue(left: &str, right: &str) -> String {
    let needs_space = match (left.chars().last(), right.chars().next()) {
        (Some(a), Some(b)) => {
            (is_word_char(a) && is_word_char(b))
                || (a == '-' && b == '-')
                || (a == '.' && (b == '.' || b.is_ascii_digit()))
                || (a.is_ascii_digit() && b == '.')
        }
        _ => false,
    };
    if needs_space {
        format!("{left} {right}")
    } else {
        format!("{left}{right}")
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_identifier(s: &BStr) -> bool {
    let Ok(s) = s.to_str() else {
        return false;
    };
    let mut chars = s.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_well
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && Word::from_name(s).is_none()
        && !matches!(s, "and" | "or" | "not")
}

/// Lua number literal. Integral values print without a fraction.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "(0/0)".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "(1/0)" } else { "(-1/0)" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Double-quoted Lua string literal. Bytes that are not valid UTF-8 and
/// control characters are written as decimal escapes.
pub fn quote_string(s: &BStr) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for chunk in s.utf8_chunks() {
        for ch in chunk.valid().chars() {
            match ch {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_ascii_control() => {
                    let _ = write!(out, "\\{:03}", c as u32);
                }
                c => out.push(c),
            }
        }
        for byte in chunk.invalid() {
            let _ = write!(out, "\\{byte:03}");
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(f64::INFINITY), "(1/0)");
        assert_eq!(format_number(f64::NEG_INFINITY), "(-1/0)");
        assert_eq!(format_number(f64::NAN), "(0/0)");
    }

    #[test]
    fn strings() {
        assert_eq!(quote_string(BStr::new("a\"b\n")), r#""a\"b\n""#);
        assert_eq!(quote_string(BStr::new(b"\x01\xff")), r#""\001\255""#);
        assert_eq!(quote_string(BStr::new("héllo")), "\"héllo\"");
    }

    #[test]
    fn glue_keeps_tokens_apart() {
        assert_eq!(glue("-", "-x"), "- -x");
        assert_eq!(glue("1", ".."), "1 ..");
        assert_eq!(glue("..", "2"), ".. 2");
        assert_eq!(glue("a", "+"), "a+");
        assert_eq!(glue("x", "y"), "x y");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier(BStr::new("name_1")));
        assert!(!is_identifier(BStr::new("1name")));
        assert!(!is_identifier(BStr::new("end")));
        assert!(!is_identifier(BStr::new("and")));
        assert!(!is_identifier(BStr::new("with space")));
    }
}

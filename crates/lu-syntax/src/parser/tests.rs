use super::*;
use crate::lexer::tokenize;

fn chunk(source: &str) -> Chunk {
    parse(tokenize(source).unwrap()).unwrap()
}

fn parse_error(source: &str) -> String {
    parse(tokenize(source).unwrap()).unwrap_err().to_string()
}

/// The single value of `x = <expr>`.
fn value_of(source: &str) -> (Chunk, ExprId) {
    let chunk = chunk(source);
    let StmtKind::Assign { values, .. } = &chunk.body[0].kind else {
        panic!("expected assignment, got {:?}", chunk.body[0].kind);
    };
    let value = values[0];
    (chunk, value)
}

fn binary(arena: &Arena, id: ExprId) -> (BinaryOp, ExprId, ExprId) {
    match arena.get(id) {
        Expr::Arith(Arith::Binary { op, left, right }) => (*op, *left, *right),
        other => panic!("expected binary, got {other:?}"),
    }
}

fn number(arena: &Arena, id: ExprId) -> f64 {
    match arena.get(id) {
        Expr::Atom(Atom::Number(n)) => *n,
        other => panic!("expected number, got {other:?}"),
    }
}

#[test]
fn multiplication_binds_tighter() {
    let (chunk, value) = value_of("x = 1 + 2 * 3");
    let (op, left, right) = binary(&chunk.arena, value);
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(number(&chunk.arena, left), 1.0);
    assert_eq!(binary(&chunk.arena, right).0, BinaryOp::Mul);
}

#[test]
fn left_associative_subtraction() {
    let (chunk, value) = value_of("x = 1 - 2 - 3");
    let (op, left, right) = binary(&chunk.arena, value);
    assert_eq!(op, BinaryOp::Sub);
    assert_eq!(binary(&chunk.arena, left).0, BinaryOp::Sub);
    assert_eq!(number(&chunk.arena, right), 3.0);
}

#[test]
fn power_and_concat_are_right_associative() {
    let (chunk, value) = value_of("x = 2 ^ 3 ^ 2");
    let (_, left, right) = binary(&chunk.arena, value);
    assert_eq!(number(&chunk.arena, left), 2.0);
    assert_eq!(binary(&chunk.arena, right).0, BinaryOp::Pow);

    let (chunk, value) = value_of("x = a .. b .. c");
    let (_, _, right) = binary(&chunk.arena, value);
    assert_eq!(binary(&chunk.arena, right).0, BinaryOp::Concat);
}

#[test]
fn unary_operators() {
    let (chunk, value) = value_of("x = -2 ^ 2");
    match chunk.arena.get(value) {
        Expr::Arith(Arith::Unary { op, operand }) => {
            assert_eq!(*op, UnaryOp::Neg);
            assert_eq!(binary(&chunk.arena, *operand).0, BinaryOp::Pow);
        }
        other => panic!("expected unary, got {other:?}"),
    }

    let (chunk, value) = value_of("x = not a == b");
    let (op, left, _) = binary(&chunk.arena, value);
    assert_eq!(op, BinaryOp::Eq);
    assert!(matches!(
        chunk.arena.get(left),
        Expr::Arith(Arith::Unary {
            op: UnaryOp::Not,
            ..
        })
    ));
}

#[test]
fn logical_operators() {
    let (chunk, value) = value_of("x = a or b and c");
    let (op, _, right) = binary(&chunk.arena, value);
    assert_eq!(op, BinaryOp::Or);
    assert_eq!(binary(&chunk.arena, right).0, BinaryOp::And);
}

#[test]
fn call_sugar() {
    let chunk = chunk("f 'a'\ng { 1 }\nobj:method(1, 2)");
    assert_eq!(chunk.body.len(), 3);
    let StmtKind::Call(call) = chunk.body[2].kind else {
        panic!("expected call");
    };
    match chunk.arena.get(call) {
        Expr::Arith(Arith::Call { method, args, .. }) => {
            assert_eq!(method.as_deref(), Some("method"));
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn return_without_values() {
    let chunk = chunk("function f() return end");
    let StmtKind::Function { func, .. } = &chunk.body[0].kind else {
        panic!("expected function");
    };
    assert_eq!(func.body[0].kind, StmtKind::Return(Vec::new()));

    let chunk = super::parse(tokenize("return").unwrap()).unwrap();
    assert_eq!(chunk.body[0].kind, StmtKind::Return(Vec::new()));
}

#[test]
fn method_definition_path() {
    let chunk = chunk("function a.b:c(x, ...) end");
    let StmtKind::Function { path, func } = &chunk.body[0].kind else {
        panic!("expected function");
    };
    assert_eq!(path.segments, vec!["a", "b", "c"]);
    assert!(path.method);
    assert_eq!(func.params, vec!["x"]);
    assert!(func.variadic);
}

#[test]
fn intrinsic_head_and_args() {
    let chunk = chunk("@deco.wrap(1, 2)\nlocal x = 1");
    let StmtKind::Intrinsic { expr, args } = &chunk.body[0].kind else {
        panic!("expected intrinsic");
    };
    assert!(matches!(
        chunk.arena.get(*expr),
        Expr::Arith(Arith::Member { name, .. }) if name == "wrap"
    ));
    assert_eq!(args.len(), 2);
    assert!(matches!(chunk.body[1].kind, StmtKind::Local { .. }));
    assert_eq!(chunk.body[1].line, 2);
}

#[test]
fn import_forms() {
    let chunk = chunk("import a from 'x'\nimport { b, c } from \"y\"");
    assert!(matches!(
        &chunk.body[0].kind,
        StmtKind::Import { binding: ImportBinding::Default(name), .. } if name == "a"
    ));
    assert!(matches!(
        &chunk.body[1].kind,
        StmtKind::Import { binding: ImportBinding::Named(names), .. } if names == &["b", "c"]
    ));
}

#[test]
fn import_requires_from() {
    assert_eq!(
        parse_error("import a 'x'"),
        "script:1: Expected 'from', got String near 'x'"
    );
}

#[test]
fn elements() {
    let (chunk, value) = value_of("x = <div class=\"box\" hidden data={n}>{label}<Icon/></div>");
    let Expr::Atom(Atom::Element(element)) = chunk.arena.get(value) else {
        panic!("expected element");
    };
    assert_eq!(element.name, "div");
    let props: Vec<&str> = element.properties.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(props, vec!["class", "hidden", "data"]);
    assert_eq!(
        chunk.arena.get(element.properties[1].1),
        &Expr::Atom(Atom::Boolean(true))
    );
    let children = element.children.as_ref().unwrap();
    assert_eq!(children.len(), 2);
    assert!(matches!(
        chunk.arena.get(children[1]),
        Expr::Atom(Atom::Element(Element { children: None, .. }))
    ));
}

#[test]
fn mismatched_closing_tag() {
    assert_eq!(
        parse_error("x = <a></b>"),
        "script:1: Mismatched closing tag: expected </a>, got </b>"
    );
}

#[test]
fn assignment_inside_parentheses() {
    let chunk = chunk("print((a = b += 1))");
    let StmtKind::Call(call) = chunk.body[0].kind else {
        panic!("expected call");
    };
    let Expr::Arith(Arith::Call { args, .. }) = chunk.arena.get(call) else {
        panic!("expected call");
    };
    match chunk.arena.get(args[0]) {
        Expr::Arith(Arith::Assign {
            op: AssignOp::Set,
            value,
            ..
        }) => assert!(matches!(
            chunk.arena.get(*value),
            Expr::Arith(Arith::Assign {
                op: AssignOp::Compound(BinaryOp::Add),
                ..
            })
        )),
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn compound_assignment_statement() {
    let chunk = chunk("t.count ..= 'x'");
    assert!(matches!(
        chunk.body[0].kind,
        StmtKind::CompoundAssign {
            op: BinaryOp::Concat,
            ..
        }
    ));
}

#[test]
fn table_entries() {
    let (chunk, value) = value_of("x = { 1, name = 2, [k] = 3; 4, function m() end }");
    let Expr::Atom(Atom::Table(table)) = chunk.arena.get(value) else {
        panic!("expected table");
    };
    let keys: Vec<_> = table.entries.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys.len(), 5);
    assert_eq!(keys[0], TableKey::Positional(1));
    assert_eq!(keys[3], TableKey::Positional(2));
    let TableKey::Expr(method_key) = keys[4] else {
        panic!("expected keyed method");
    };
    assert_eq!(
        chunk.arena.get(method_key),
        &Expr::Atom(Atom::String("m".into()))
    );
}

#[test]
fn pipe_lambda() {
    let (chunk, value) = value_of("x = |a, b| a + b");
    let Expr::Atom(Atom::Func(func)) = chunk.arena.get(value) else {
        panic!("expected function");
    };
    assert_eq!(func.params, vec!["a", "b"]);
    assert!(matches!(func.body[0].kind, StmtKind::Return(ref values) if values.len() == 1));
}

#[test]
fn control_flow() {
    let chunk = chunk(
        "if a then b() elseif c then d() else e() end
         while x do break end
         repeat y() until z
         for i = 1, 10, 2 do end
         for k, v in pairs(t) do end
         do local q end",
    );
    assert_eq!(chunk.body.len(), 6);
    let StmtKind::If(arm) = &chunk.body[0].kind else {
        panic!("expected if");
    };
    let Some(ElseArm::ElseIf(elseif)) = arm.otherwise.as_deref() else {
        panic!("expected elseif");
    };
    assert!(matches!(
        elseif.otherwise.as_deref(),
        Some(ElseArm::Else { .. })
    ));
    assert!(matches!(
        chunk.body[3].kind,
        StmtKind::ForNumeric { step: Some(_), .. }
    ));
    assert!(matches!(
        &chunk.body[4].kind,
        StmtKind::ForGeneric { names, .. } if names.len() == 2
    ));
}

#[test]
fn missing_then() {
    assert_eq!(
        parse_error("if x end"),
        "script:1: Expected 'then', got Word near 'end'"
    );
}

#[test]
fn unterminated_block() {
    assert_eq!(
        parse_error("while x do\n  f()\n"),
        "script:2: Expected 'end', got <eof>"
    );
}

#[test]
fn expression_is_not_a_statement() {
    assert_eq!(
        parse_error("x"),
        "script:1: Syntax error: expression is not a statement"
    );
}

#[test]
fn cannot_assign_to_call() {
    assert!(parse_error("f() = 1").contains("cannot assign"));
}

#[test]
fn stray_keyword() {
    assert_eq!(parse_error("end"), "script:1: Unexpected 'end' in statement");
}

//! Element literals become constructor calls.
//!
//! `<Button label="ok">{icon}<span/></Button>` is lowered to
//! `h(Button, {label = "ok"}, {icon, h("span", {}, {})})`. Tags starting
//! with an uppercase letter are passed as variables, others as strings.

use crate::ast::*;
use crate::transform::{ExprCursor, Rewrite, TransformError, traverse};

pub fn lower_elements(chunk: &mut Chunk, constructor: &str) -> Result<(), TransformError> {
    traverse(chunk, &mut ElementLowering { constructor })
}

struct ElementLowering<'a> {
    constructor: &'a str,
}

impl Rewrite for ElementLowering<'_> {
    fn expression(&mut self, cursor: &mut ExprCursor<'_>) -> Result<(), TransformError> {
        for leaf in cursor.leaves() {
            lower(cursor.arena_mut(), leaf, self.constructor);
        }
        Ok(())
    }
}

/// Rewrite the element at `id` and every element nested in it.
fn lower(arena: &mut Arena, id: ExprId, constructor: &str) {
    if !matches!(arena.get(id), Expr::Atom(Atom::Element(_))) {
        return;
    }
    let Expr::Atom(Atom::Element(element)) = arena.replace(id, Expr::Atom(Atom::Nil)) else {
        return;
    };

    let tag = if element.name.starts_with(|c: char| c.is_ascii_uppercase()) {
        arena.name(element.name.as_str())
    } else {
        arena.string(element.name.as_str())
    };

    let mut properties = TableConstructor::new();
    for (name, value) in element.properties {
        lower_within(arena, value, constructor);
        properties.push_named(arena, &name, value);
    }
    let properties = arena.table(properties);

    let mut children = TableConstructor::new();
    for child in element.children.unwrap_or_default() {
        lower_within(arena, child, constructor);
        children.push_positional(child);
    }
    let children = arena.table(children);

    let ctor = arena.name(constructor);
    arena.replace(id, Expr::call(ctor, vec![tag, properties, children]));
}

fn lower_within(arena: &mut Arena, root: ExprId, constructor: &str) {
    for leaf in arena.leaves(root) {
        lower(arena, leaf, constructor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn lowered(source: &str, constructor: &str) -> (Chunk, ExprId) {
        let mut chunk = parse(tokenize(source).unwrap()).unwrap();
        lower_elements(&mut chunk, constructor).unwrap();
        let StmtKind::Local { values, .. } = &chunk.body[0].kind else {
            panic!("expected local");
        };
        let value = values[0];
        (chunk, value)
    }

    fn call_parts(chunk: &Chunk, id: ExprId) -> (&Expr, Vec<ExprId>) {
        match chunk.arena.get(id) {
            Expr::Arith(Arith::Call { target, args, .. }) => (chunk.arena.get(*target), args.clone()),
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn component_tags_are_variables() {
        let (chunk, value) = lowered("local e = <Button label=\"ok\"/>", "h");
        let (ctor, args) = call_parts(&chunk, value);
        assert_eq!(ctor, &Expr::Atom(Atom::Name("h".into())));
        assert_eq!(chunk.arena.get(args[0]), &Expr::Atom(Atom::Name("Button".into())));
        let Expr::Atom(Atom::Table(props)) = chunk.arena.get(args[1]) else {
            panic!("expected props table");
        };
        assert_eq!(props.entries.len(), 1);
        let Expr::Atom(Atom::Table(children)) = chunk.arena.get(args[2]) else {
            panic!("expected children table");
        };
        assert!(children.entries.is_empty());
    }

    #[test]
    fn nested_children_are_lowered() {
        let (chunk, value) = lowered("local e = <div>{label}<span/></div>", "React.h");
        let (ctor, args) = call_parts(&chunk, value);
        assert_eq!(ctor, &Expr::Atom(Atom::Name("React.h".into())));
        assert_eq!(chunk.arena.get(args[0]), &Expr::Atom(Atom::String("div".into())));
        let Expr::Atom(Atom::Table(children)) = chunk.arena.get(args[2]) else {
            panic!("expected children table");
        };
        assert_eq!(children.entries.len(), 2);
        assert_eq!(children.entries[1].0, TableKey::Positional(2));
        let (_, nested) = call_parts(&chunk, children.entries[1].1);
        assert_eq!(chunk.arena.get(nested[0]), &Expr::Atom(Atom::String("span".into())));
    }

    #[test]
    fn elements_in_property_values() {
        let (chunk, value) = lowered("local e = <Frame icon={<Icon/>}/>", "h");
        let (_, args) = call_parts(&chunk, value);
        let Expr::Atom(Atom::Table(props)) = chunk.arena.get(args[1]) else {
            panic!("expected props table");
        };
        let (ctor, _) = call_parts(&chunk, props.entries[0].1);
        assert_eq!(ctor, &Expr::Atom(Atom::Name("h".into())));
    }
}

use super::*;
use crate::token::Operator;

impl Parser {
    /// `<Name prop="s" flag other={expr}>{child}<Nested/></Name>` or a
    /// self-closing `<Name ... />`.
    pub(super) fn element(&mut self) -> Result<Element, ParseError> {
        self.expect_op(Operator::Lt)?;
        let name = self.expect_name()?;

        let mut properties = Vec::new();
        while let TokenKind::Name(prop) = &self.current().kind {
            let prop = prop.clone();
            self.advance();
            let value = if self.eat_op(Operator::Assign) {
                match &self.current().kind {
                    TokenKind::String(value) => {
                        let value = value.clone();
                        self.advance();
                        self.arena.string(value)
                    }
                    TokenKind::Operator(Operator::LBrace) => {
                        self.advance();
                        let value = self.expression(1)?;
                        self.expect_op(Operator::RBrace)?;
                        value
                    }
                    _ => {
                        return Err(self.unexpected(&format!(
                            "string or {{expression}} for property '{prop}'"
                        )));
                    }
                }
            } else {
                self.arena.boolean(true)
            };
            properties.push((prop, value));
        }

        if self.eat_op(Operator::Slash) {
            self.expect_op(Operator::Gt)?;
            return Ok(Element {
                name,
                properties,
                children: None,
            });
        }
        self.expect_op(Operator::Gt)?;

        let mut children = Vec::new();
        loop {
            if self.eat_op(Operator::LBrace) {
                children.push(self.expression(1)?);
                self.expect_op(Operator::RBrace)?;
            } else if self.check_op(Operator::Lt) && self.peek(1).is_operator(Operator::Slash) {
                self.advance();
                self.advance();
                break;
            } else if self.check_op(Operator::Lt) {
                let child = self.element()?;
                children.push(self.arena.alloc(Expr::Atom(Atom::Element(child))));
            } else {
                return Err(self.unexpected(&format!("'{{', '<' or '</{name}>'")));
            }
        }

        let closing = self.expect_name()?;
        if closing != name {
            return Err(self.error(format!(
                "Mismatched closing tag: expected </{name}>, got </{closing}>"
            )));
        }
        self.expect_op(Operator::Gt)?;

        Ok(Element {
            name,
            properties,
            children: Some(children),
        })
    }
}

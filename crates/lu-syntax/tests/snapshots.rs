//! Snapshot tests for the compile pipeline.
//!
//! These tests verify that desugaring and rendering produce the expected
//! Lua text. Run `cargo insta review` to update snapshots after
//! intentional changes.

use lu_syntax::{DesugarOptions, Layout, compile_to_lua};

fn pretty(source: &str) -> String {
    compile_to_lua(source, &DesugarOptions::default(), Layout::Pretty)
        .expect("compile failed")
        .trim_end()
        .to_string()
}

fn minify(source: &str) -> String {
    compile_to_lua(source, &DesugarOptions::default(), Layout::Minify)
        .expect("compile failed")
        .trim_end()
        .to_string()
}

// ============================================================================
// Pretty output
// ============================================================================

mod pretty_output {
    use super::*;

    #[test]
    fn compound_assignment() {
        insta::assert_snapshot!(pretty("local x = 1\nx += 2"), @r"
        local x = 1
        x = (x + 2)
        ");
    }

    #[test]
    fn assignment_expression() {
        insta::assert_snapshot!(pretty("print((a = 1))"), @r"
        print((function()
          a = 1
          return a
        end)())
        ");
    }

    #[test]
    fn imports() {
        insta::assert_snapshot!(
            pretty("import json from \"json\"\nimport { encode, decode } from \"json\""),
            @r#"
        local json = require("json")
        local __import0 = require("json")
        local encode, decode = __import0.encode, __import0.decode
        "#
        );
    }

    #[test]
    fn intrinsic_on_local() {
        insta::assert_snapshot!(pretty("@watch\nlocal x = 1"), @r#"
        local x = 1
        watch({
          name = "x";
          get = function()
            return x
          end;
          set = function(v)
            x = v
          end
        })
        "#);
    }

    #[test]
    fn intrinsic_on_method() {
        insta::assert_snapshot!(pretty("@memo\nfunction M:f(a)\n  return a\nend"), @r#"
        M.f = memo("M.f(self, a)", function(self, a)
          return a
        end)
        "#);
    }

    #[test]
    fn intrinsic_on_local_function() {
        insta::assert_snapshot!(pretty("@memo(2)\nlocal function f(a) return a end"), @r#"
        local f
        f = memo(2, "f(a)", function(a)
          return a
        end)
        "#);
    }

    #[test]
    fn element_literal() {
        insta::assert_snapshot!(
            pretty("local e = <Button label=\"ok\">{title}<span/></Button>"),
            @r#"
        local e = h(Button, {
          label = "ok"
        }, {title, h("span", {}, {})})
        "#
        );
    }

    #[test]
    fn pipe_lambda() {
        insta::assert_snapshot!(pretty("local add = |a, b| a + b"), @r"
        local add = function(a, b)
          return (a + b)
        end
        ");
    }

    #[test]
    fn parenthesized_statement_ends_previous_line() {
        insta::assert_snapshot!(
            pretty("local x = 1\n;(function() print(x) end)()\nf()\n;(\"s\"):len()"),
            @r#"
        local x = 1;
        (function()
          print(x)
        end)()
        f();
        ("s"):len()
        "#
        );
    }

    #[test]
    fn unary_operands_keep_grouping() {
        insta::assert_snapshot!(
            pretty("print((-2) ^ 2, -2 ^ 2, (-x).y, (not f)())"),
            @"print(((-2) ^ 2), -(2 ^ 2), (-x).y, (not f)())"
        );
    }

    #[test]
    fn control_flow() {
        insta::assert_snapshot!(
            pretty(
                "for i = 1, 10 do\n  if i % 2 == 0 then\n    print(i)\n  elseif i > 5 then\n    break\n  else\n  end\nend"
            ),
            @r"
        for i = 1, 10 do
          if ((i % 2) == 0) then
            print(i)
          elseif (i > 5) then
            break
          else
          end
        end
        "
        );
    }
}

// ============================================================================
// Minified output
// ============================================================================

mod minified_output {
    use super::*;

    #[test]
    fn compound_assignment() {
        insta::assert_snapshot!(minify("local x = 1\nx += 2"), @"local x=1 x=(x+2)");
    }

    #[test]
    fn tokens_stay_apart() {
        insta::assert_snapshot!(
            minify("local s = 'a' .. 1\nprint(-(-x), a and b)"),
            @r#"local s=("a".. 1) print(- -x,(a and b))"#
        );
    }

    #[test]
    fn parenthesized_statement_gets_semicolon() {
        insta::assert_snapshot!(
            minify("a = 1;\n(function() end)()"),
            @"a=1;(function() end)()"
        );
    }

    #[test]
    fn unary_operands_keep_grouping() {
        insta::assert_snapshot!(
            minify("print((-2) ^ 2, (-x).y, (not f)())"),
            @"print(((-2)^2),(-x).y,(not f)())"
        );
    }

    #[test]
    fn table_parts() {
        insta::assert_snapshot!(
            minify("local t = { 1, 2, x = 3, [\"y z\"] = 4 }"),
            @r#"local t={x=3;["y z"]=4;1,2}"#
        );
    }
}

// ============================================================================
// Errors
// ============================================================================

mod errors {
    use lu_syntax::{CompileError, DesugarOptions, compile};

    fn error(source: &str) -> CompileError {
        compile(source, &DesugarOptions::default()).unwrap_err()
    }

    #[test]
    fn lexer_error_has_line() {
        let err = error("local x = 1\nlocal y = \"\\xZZ\"");
        assert_eq!(err.line(), 2);
        assert_eq!(err.to_string(), "script:2: hexadecimal digit expected");
    }

    #[test]
    fn parser_error_has_line() {
        let err = error("local x = 1\nif x\nthen");
        assert!(matches!(err, CompileError::Parse(_)));
        assert_eq!(err.to_string(), "script:3: Expected 'end', got <eof>");
    }

    #[test]
    fn intrinsic_target_error() {
        let err = error("@memo\nreturn 1");
        assert_eq!(
            err.to_string(),
            "script:1: intrinsic must precede a local declaration or a function definition, found return statement"
        );
    }
}

use im_rc::Vector;
use tracing::{debug, trace};

use std::rc::Rc;

use crate::{
    ast::{Expression, Program, Statement},
    env::Env,
    error as e,
    eval::eval_block,
    modify,
    quote::into_expression,
    value::Value,
};

/// Moves every top-level `let name = macro(...) { ... };` out of `program`
/// and into `macro_env`. Macro bodies are not evaluated here.
pub fn define_macros(program: &mut Program, macro_env: &Env) {
    let statements = std::mem::take(&mut program.statements);

    for statement in statements {
        match statement {
            Statement::Let {
                name,
                value: Expression::Macro { parameters, body },
            } => {
                debug!(%name, arity = parameters.len(), "registered macro");
                macro_env.set(
                    name.as_str(),
                    Value::Macro {
                        parameters: Rc::new(parameters),
                        body: Rc::new(body),
                        env: macro_env.clone(),
                    },
                );
            }
            other => program.statements.push(other),
        }
    }
}

/// Rewrites every call of a macro bound in `macro_env` into the node its
/// body returns. Innermost calls are expanded first.
pub fn expand_macros(program: Program, macro_env: &Env) -> Result<Program, Value> {
    modify::program(program, &mut |node: Expression| -> Result<Expression, Value> {
        let found = node
            .called_name()
            .and_then(|name| macro_env.get(name).ok())
            .filter(|value| matches!(value, Value::Macro { .. }));

        match (found, node) {
            (
                Some(Value::Macro {
                    parameters,
                    body,
                    env,
                }),
                Expression::Call {
                    function,
                    arguments,
                },
            ) => {
                let name = function.to_string();
                trace!(%name, "expanding macro call");

                let args: Vector<Value> = arguments.into_iter().map(Value::make_quote).collect();
                let env = Env::builder().outer(env).binds(&parameters, args)?.make();

                let expanded = match eval_block(&body, &env) {
                    Ok(value) => value,
                    Err(Value::ReturnValue(value)) => *value,
                    Err(error) => return Err(error),
                };

                match expanded {
                    Value::Quote(_) => into_expression(expanded),
                    other => Err(e::macro_result(&name, &other)),
                }
            }
            (_, node) => Ok(node),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{eval::eval_program, parser::parse};
    use pretty_assertions::assert_eq;

    fn parse_ok(input: &str) -> Program {
        parse(input).unwrap_or_else(|errors| panic!("{:?}", errors))
    }

    fn expand(input: &str) -> Result<Program, Value> {
        let mut program = parse_ok(input);
        let macro_env = Env::new();
        define_macros(&mut program, &macro_env);
        expand_macros(program, &macro_env)
    }

    fn run(input: &str) -> Option<Value> {
        match expand(input) {
            Ok(program) => eval_program(&program, &Env::new()),
            Err(error) => Some(error),
        }
    }

    #[test]
    fn collects_top_level_definitions() {
        let mut program = parse_ok(
            "let number = 1;
             let function = fn(x, y) { x + y };
             let mymacro = macro(x, y) { x + y; };",
        );
        let macro_env = Env::new();

        define_macros(&mut program, &macro_env);

        assert_eq!(program.statements.len(), 2);
        assert!(macro_env.get("number").is_err());
        assert!(macro_env.get("function").is_err());
        match macro_env.get("mymacro") {
            Ok(Value::Macro {
                parameters, body, ..
            }) => {
                assert_eq!(*parameters, vec!["x".to_string(), "y".to_string()]);
                assert_eq!(body.to_string(), "(x + y)");
            }
            other => panic!("not a macro: {:?}", other),
        }
    }

    #[test]
    fn nested_definitions_are_left_alone() {
        let mut program = parse_ok("let f = fn() { let m = macro() { quote(1) }; m };");
        let macro_env = Env::new();

        define_macros(&mut program, &macro_env);

        assert_eq!(program.statements.len(), 1);
        assert!(macro_env.get("m").is_err());
    }

    #[test]
    fn expands_calls() {
        let cases = [
            (
                "let infixExpression = macro() { quote(1 + 2); }; infixExpression();",
                "(1 + 2)",
            ),
            (
                "let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); }; reverse(2 + 2, 10 - 5);",
                "((10 - 5) - (2 + 2))",
            ),
            (
                "let unless = macro(cond, cons, alt) {
                     quote(if (!(unquote(cond))) { unquote(cons); } else { unquote(alt); });
                 };
                 unless(10 > 5, puts(\"not greater\"), puts(\"greater\"));",
                r#"if (!(10 > 5)) { puts("not greater") } else { puts("greater") }"#,
            ),
            (
                "let early = macro(x) { return quote(unquote(x) * 2); 0 }; early(3)",
                "(3 * 2)",
            ),
            ("let m = macro() { quote(1) }; [m(), fn() { m() }]", "[1, fn() { 1 }]"),
        ];

        for (input, expected) in cases.iter() {
            assert_eq!(expand(input).unwrap().to_string(), *expected, "{}", input);
        }
    }

    #[test]
    fn unless_round_trip() {
        let unless = "let unless = macro(cond, cons, alt) {
            quote(if (!(unquote(cond))) { unquote(cons) } else { unquote(alt) })
        };";

        assert_eq!(
            run(&format!("{} unless(true, 10, 20)", unless)),
            Some(Value::Integer(20))
        );
        assert_eq!(
            run(&format!("{} unless(false, 10, 20)", unless)),
            Some(Value::Integer(10))
        );
    }

    #[test]
    fn inner_calls_expand_first() {
        let input = "let double = macro(x) { quote(unquote(x) * 2) };
                     let inc = macro(x) { quote(unquote(x) + 1) };
                     inc(double(5))";

        assert_eq!(expand(input).unwrap().to_string(), "((5 * 2) + 1)");
        assert_eq!(run(input), Some(Value::Integer(11)));
    }

    #[test]
    fn macros_do_not_leak_into_values() {
        assert_eq!(
            run("let m = macro() { quote(1) }; m"),
            Some(Value::make_error("identifier not found: m"))
        );
    }

    #[test]
    fn expansion_errors() {
        assert_eq!(
            run("let m = macro(x) { 1 }; m(2)"),
            Some(Value::make_error(
                "macro m must return a quoted expression, got INTEGER"
            ))
        );
        assert_eq!(
            run("let m = macro(x) { quote(unquote(x)) }; m()"),
            Some(Value::make_error("wrong number of arguments: want=1, got=0"))
        );
        assert_eq!(
            run("let m = macro() { nope }; m()"),
            Some(Value::make_error("identifier not found: nope"))
        );
    }
}

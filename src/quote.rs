use std::rc::Rc;

use crate::{
    ast::Expression,
    builtins::ensure_len,
    env::Env,
    error as e,
    eval::eval,
    modify,
    value::{EvalResult, Value},
};

/// Evaluates `quote(node)`: wraps the unevaluated node, after replacing every
/// `unquote(x)` inside it with the node form of `x` evaluated in `env`.
pub fn quote(arguments: &[Expression], env: &Env) -> EvalResult {
    ensure_len(arguments.len(), |n| n == 1, 1, "quote")?;

    eval_unquote_calls(arguments[0].clone(), env).map(Value::make_quote)
}

fn eval_unquote_calls(quoted: Expression, env: &Env) -> Result<Expression, Value> {
    modify::expression(quoted, &mut |node: Expression| -> Result<Expression, Value> {
        match node {
            Expression::Call {
                function,
                arguments,
            } if matches!(&*function, Expression::Identifier(name) if name == "unquote") => {
                ensure_len(arguments.len(), |n| n == 1, 1, "unquote")?;
                into_expression(eval(&arguments[0], env)?)
            }
            other => Ok(other),
        }
    })
}

/// Converts an evaluated value back into a program-tree node.
pub fn into_expression(value: Value) -> Result<Expression, Value> {
    match value {
        Value::Integer(n) => Ok(Expression::Integer(n)),
        Value::Boolean(b) => Ok(Expression::Boolean(b)),
        Value::Quote(node) => Ok(Rc::try_unwrap(node).unwrap_or_else(|node| (*node).clone())),
        Value::Null
        | Value::String(_)
        | Value::Array(_)
        | Value::Hash(_)
        | Value::Function { .. }
        | Value::Builtin(_)
        | Value::ReturnValue(_)
        | Value::Error(_)
        | Value::Macro { .. } => Err(e::unquote_type(&value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{eval::eval_program, parser::parse};
    use pretty_assertions::assert_eq;

    fn run(input: &str) -> Value {
        let program = parse(input).unwrap_or_else(|errors| panic!("{:?}", errors));
        eval_program(&program, &Env::new()).unwrap_or(Value::Null)
    }

    fn quoted_source(input: &str) -> String {
        match run(input) {
            Value::Quote(node) => node.to_string(),
            other => panic!("expected a quote for {:?}, got {}", input, other),
        }
    }

    #[test]
    fn quote_keeps_nodes_unevaluated() {
        let cases = [
            ("quote(5)", "5"),
            ("quote(5 + 8)", "(5 + 8)"),
            ("quote(foobar)", "foobar"),
            ("quote(foobar + barfoo)", "(foobar + barfoo)"),
            ("quote(fn(x) { x })", "fn(x) { x }"),
            ("quote(unquote)", "unquote"),
            ("quote([unquote, f(unquote)])", "[unquote, f(unquote)]"),
        ];

        for (input, expected) in cases.iter() {
            assert_eq!(quoted_source(input), *expected, "{}", input);
        }
    }

    #[test]
    fn unquote_splices_evaluated_values() {
        let cases = [
            ("quote(unquote(4))", "4"),
            ("quote(unquote(4 + 4))", "8"),
            ("quote(8 + unquote(4 + 4))", "(8 + 8)"),
            ("quote(unquote(4 + 4) + 8)", "(8 + 8)"),
            ("let foobar = 8; quote(foobar)", "foobar"),
            ("let foobar = 8; quote(unquote(foobar))", "8"),
            ("quote(unquote(true))", "true"),
            ("quote(unquote(true == false))", "false"),
            ("quote(unquote(quote(4 + 4)))", "(4 + 4)"),
            (
                "let quotedInfixExpression = quote(4 + 4);
                 quote(unquote(4 + 4) + unquote(quotedInfixExpression))",
                "(8 + (4 + 4))",
            ),
            ("quote([unquote(1 - 2), {unquote(true): f(unquote(3))}])", "[-1, {true: f(3)}]"),
        ];

        for (input, expected) in cases.iter() {
            assert_eq!(quoted_source(input), *expected, "{}", input);
        }
    }

    #[test]
    fn quote_errors() {
        let cases = [
            ("quote(1, 2)", "wrong number of arguments to `quote`: got=2, want=1"),
            ("quote()", "wrong number of arguments to `quote`: got=0, want=1"),
            (r#"quote(unquote("s"))"#, "cannot unquote value of type STRING"),
            ("quote(unquote(fn(x) { x }))", "cannot unquote value of type FUNCTION"),
            ("quote(unquote(missing))", "identifier not found: missing"),
            ("quote(unquote(1, 2))", "wrong number of arguments to `unquote`: got=2, want=1"),
        ];

        for (input, expected) in cases.iter() {
            assert_eq!(run(input), Value::make_error(*expected), "{}", input);
        }
    }

    #[test]
    fn every_value_kind_converts_or_errors() {
        assert_eq!(into_expression(Value::Integer(3)), Ok(Expression::Integer(3)));
        assert_eq!(into_expression(Value::Boolean(false)), Ok(Expression::Boolean(false)));
        assert_eq!(
            into_expression(Value::make_quote(Expression::Identifier("x".into()))),
            Ok(Expression::Identifier("x".into()))
        );
        assert_eq!(
            into_expression(Value::Null),
            Err(Value::make_error("cannot unquote value of type NULL"))
        );
        assert_eq!(
            into_expression(Value::make_array(vec![Value::Integer(1)])),
            Err(Value::make_error("cannot unquote value of type ARRAY"))
        );
    }
}

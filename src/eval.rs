use im_rc::HashMap;

use std::{convert::TryFrom, rc::Rc};

use crate::{
    ast::{BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement},
    builtins,
    env::Env,
    error as e,
    hashkey::HashKey,
    quote::quote,
    value::{Args, EvalResult, HashPair, Value},
};

/// Evaluates a whole program.
///
/// A top-level `return` ends the program with its value and the first
/// error becomes the result. Returns `None` when no statement produced a
/// value (an empty program, or one ending in `let`).
pub fn eval_program(program: &Program, env: &Env) -> Option<Value> {
    let mut result = None;

    for statement in &program.statements {
        match eval_statement(statement, env) {
            Ok(value) => result = value,
            Err(Value::ReturnValue(value)) => return Some(*value),
            Err(error) => return Some(error),
        }
    }

    result
}

/// Evaluates the statements of `block` in order. A `return` or an error
/// stops the block and travels outward in the `Err` arm.
pub fn eval_block(block: &BlockStatement, env: &Env) -> EvalResult {
    let mut result = Value::Null;

    for statement in &block.statements {
        result = eval_statement(statement, env)?.unwrap_or(Value::Null);
    }

    Ok(result)
}

fn eval_statement(statement: &Statement, env: &Env) -> Result<Option<Value>, Value> {
    match statement {
        Statement::Expression(expression) => eval(expression, env).map(Some),
        Statement::Return(expression) => Err(Value::ReturnValue(Box::new(eval(expression, env)?))),
        Statement::Let { name, value } => {
            let value = eval(value, env)?;
            env.set(name.as_str(), value);
            Ok(None)
        }
    }
}

pub fn eval(expression: &Expression, env: &Env) -> EvalResult {
    match expression {
        Expression::Integer(n) => Ok(Value::Integer(*n)),
        Expression::Boolean(b) => Ok(Value::Boolean(*b)),
        Expression::String(s) => Ok(Value::make_string(s.as_str())),
        Expression::Identifier(name) => builtins::lookup(name).map_or_else(|| env.get(name), Ok),

        Expression::Prefix { operator, right } => {
            let right = eval(right, env)?;
            eval_prefix(*operator, right)
        }

        Expression::Infix {
            left,
            operator,
            right,
        } => {
            let left = eval(left, env)?;
            let right = eval(right, env)?;
            eval_infix(*operator, left, right)
        }

        Expression::If {
            condition,
            consequence,
            alternative,
        } => {
            if eval(condition, env)?.is_truthy() {
                eval_block(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block(alternative, env)
            } else {
                Ok(Value::Null)
            }
        }

        Expression::Function { parameters, body } => Ok(Value::Function {
            parameters: Rc::new(parameters.clone()),
            body: Rc::new(body.clone()),
            env: env.clone(),
        }),

        Expression::Macro { parameters, body } => Ok(Value::Macro {
            parameters: Rc::new(parameters.clone()),
            body: Rc::new(body.clone()),
            env: env.clone(),
        }),

        Expression::Call {
            function,
            arguments,
        } => {
            if expression.called_name() == Some("quote") {
                return quote(arguments, env);
            }

            let function = eval(function, env)?;
            let arguments = eval_expressions(arguments, env)?;
            apply_function(&function, arguments)
        }

        Expression::Array(elements) => eval_expressions(elements, env).map(Value::Array),

        Expression::Hash(pairs) => eval_hash_literal(pairs, env),

        Expression::Index { left, index } => {
            let left = eval(left, env)?;
            let index = eval(index, env)?;
            eval_index(&left, &index)
        }
    }
}

fn eval_expressions(expressions: &[Expression], env: &Env) -> Result<Args, Value> {
    expressions
        .iter()
        .map(|expression| eval(expression, env))
        .collect()
}

/// Calls a function or builtin with already evaluated arguments.
pub fn apply_function(function: &Value, args: Args) -> EvalResult {
    match function {
        Value::Function {
            parameters,
            body,
            env,
        } => {
            let env = Env::builder()
                .outer(env.clone())
                .binds(parameters, args)?
                .make();

            match eval_block(body, &env) {
                Err(Value::ReturnValue(value)) => Ok(*value),
                other => other,
            }
        }
        Value::Builtin(builtin) => (builtin.func)(args),
        other => Err(e::not_a_function(other)),
    }
}

fn eval_prefix(operator: PrefixOperator, right: Value) -> EvalResult {
    match operator {
        PrefixOperator::Bang => Ok(Value::Boolean(!right.is_truthy())),
        PrefixOperator::Minus => match right {
            Value::Integer(n) => n
                .checked_neg()
                .map(Value::Integer)
                .ok_or_else(|| e::negation_overflow(n)),
            other => Err(e::unknown_prefix_operator(operator, &other)),
        },
    }
}

fn eval_infix(operator: InfixOperator, left: Value, right: Value) -> EvalResult {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Value::String(l), Value::String(r)) if operator == InfixOperator::Plus => {
            Ok(Value::make_string(format!("{}{}", l, r)))
        }
        (Value::Boolean(_), Value::Boolean(_))
        | (Value::Boolean(_), Value::Null)
        | (Value::Null, Value::Boolean(_))
        | (Value::Null, Value::Null) => match operator {
            InfixOperator::Eq => Ok(Value::Boolean(left == right)),
            InfixOperator::NotEq => Ok(Value::Boolean(left != right)),
            _ => Err(mismatch(operator, &left, &right)),
        },
        _ => Err(mismatch(operator, &left, &right)),
    }
}

fn mismatch(operator: InfixOperator, left: &Value, right: &Value) -> Value {
    if left.type_name() != right.type_name() {
        e::type_mismatch(left, operator, right)
    } else {
        e::unknown_infix_operator(left, operator, right)
    }
}

fn eval_integer_infix(operator: InfixOperator, left: i64, right: i64) -> EvalResult {
    match operator {
        InfixOperator::Plus => arithmetic_operation(left, right, i64::checked_add, operator),
        InfixOperator::Minus => arithmetic_operation(left, right, i64::checked_sub, operator),
        InfixOperator::Asterisk => arithmetic_operation(left, right, i64::checked_mul, operator),
        InfixOperator::Slash if right == 0 => Err(e::division_by_zero(left)),
        InfixOperator::Slash => arithmetic_operation(left, right, i64::checked_div, operator),
        InfixOperator::Lt => Ok(Value::Boolean(left < right)),
        InfixOperator::Gt => Ok(Value::Boolean(left > right)),
        InfixOperator::Eq => Ok(Value::Boolean(left == right)),
        InfixOperator::NotEq => Ok(Value::Boolean(left != right)),
    }
}

#[inline]
fn arithmetic_operation(
    left: i64,
    right: i64,
    operation: fn(i64, i64) -> Option<i64>,
    operator: InfixOperator,
) -> EvalResult {
    operation(left, right)
        .map(Value::Integer)
        .ok_or_else(|| e::integer_overflow(left, operator, right))
}

fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &Env) -> EvalResult {
    let mut map = HashMap::new();

    for (key, value) in pairs {
        let key = eval(key, env)?;
        let hash_key = HashKey::try_from(&key)?;
        let value = eval(value, env)?;
        map.insert(hash_key, HashPair { key, value });
    }

    Ok(Value::Hash(map))
}

fn eval_index(left: &Value, index: &Value) -> EvalResult {
    match (left, index) {
        (Value::Array(elements), Value::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(Value::Null)),
        (Value::Hash(pairs), key) => {
            let key = HashKey::try_from(key)?;
            Ok(pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Value::Null))
        }
        _ => Err(e::index_not_supported(left, index)),
    }
}

use std::{fmt::Display, io, path::PathBuf};

use thiserror::Error;

use crate::{
    ast::{InfixOperator, PrefixOperator},
    value::Value,
};

/// Failures of the driver itself. Evaluation errors are [`Value::Error`]s
/// and never end up here.
#[derive(Debug, Error)]
pub enum MonkeyError {
    #[error("parser errors:\n\t{}", .0.join("\n\t"))]
    Parse(Vec<String>),

    #[error("could not read `{}`: {source}", .path.display())]
    ReadScript { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub fn identifier_not_found(name: &str) -> Value {
    Value::make_error(format!("identifier not found: {}", name))
}

pub fn type_mismatch(left: &Value, operator: InfixOperator, right: &Value) -> Value {
    Value::make_error(format!(
        "type mismatch: {} {} {}",
        left.type_name(),
        operator,
        right.type_name()
    ))
}

pub fn unknown_infix_operator(left: &Value, operator: InfixOperator, right: &Value) -> Value {
    Value::make_error(format!(
        "unknown operator: {} {} {}",
        left.type_name(),
        operator,
        right.type_name()
    ))
}

pub fn unknown_prefix_operator(operator: PrefixOperator, right: &Value) -> Value {
    Value::make_error(format!(
        "unknown operator: {}{}",
        operator,
        right.type_name()
    ))
}

pub fn integer_overflow(left: i64, operator: impl Display, right: i64) -> Value {
    Value::make_error(format!(
        "integer overflow: {} {} {}",
        left, operator, right
    ))
}

pub fn negation_overflow(right: i64) -> Value {
    Value::make_error(format!("integer overflow: -{}", right))
}

pub fn division_by_zero(left: i64) -> Value {
    Value::make_error(format!("division by zero: {} / 0", left))
}

pub fn not_a_function(callee: &Value) -> Value {
    Value::make_error(format!("not a function: {}", callee.type_name()))
}

pub fn fn_arity(want: usize, got: usize) -> Value {
    Value::make_error(format!(
        "wrong number of arguments: want={}, got={}",
        want, got
    ))
}

pub fn unusable_as_hash_key(key: &Value) -> Value {
    Value::make_error(format!("unusable as hash key: {}", key.type_name()))
}

pub fn index_not_supported(left: &Value, index: &Value) -> Value {
    Value::make_error(format!(
        "index operator not supported: {}[{}]",
        left.type_name(),
        index.type_name()
    ))
}

pub fn arg_count<D: Display>(name: &str, required: D, provided: usize) -> Value {
    Value::make_error(format!(
        "wrong number of arguments to `{}`: got={}, want={}",
        name, provided, required
    ))
}

pub fn arg_not_supported(name: &str, provided: &Value) -> Value {
    Value::make_error(format!(
        "argument to `{}` not supported, got {}",
        name,
        provided.type_name()
    ))
}

pub fn arg_type(name: &str, required: &str, provided: &Value) -> Value {
    Value::make_error(format!(
        "argument to `{}` must be {}, got {}",
        name,
        required,
        provided.type_name()
    ))
}

pub fn unquote_type(value: &Value) -> Value {
    Value::make_error(format!(
        "cannot unquote value of type {}",
        value.type_name()
    ))
}

pub fn macro_result(name: &str, result: &Value) -> Value {
    Value::make_error(format!(
        "macro {} must return a quoted expression, got {}",
        name,
        result.type_name()
    ))
}

pub fn io_failure(name: &str, error: &io::Error) -> Value {
    Value::make_error(format!("`{}` failed: {}", name, error))
}

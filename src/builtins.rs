use std::{
    fmt::Display,
    io::{self, stdout, Write},
};

use crate::{
    error as e,
    value::{Args, Builtin, EvalResult, Value},
};

const BUILTINS: &[Builtin] = &[
    Builtin { name: "len", func: len },
    Builtin { name: "first", func: first },
    Builtin { name: "last", func: last },
    Builtin { name: "rest", func: rest },
    Builtin { name: "push", func: push },
    Builtin { name: "puts", func: puts },
];

pub fn lookup(name: &str) -> Option<Value> {
    BUILTINS
        .iter()
        .find(|builtin| builtin.name == name)
        .map(|builtin| Value::Builtin(*builtin))
}

pub fn len(args: Args) -> EvalResult {
    ensure_len(args.len(), |n| n == 1, 1, "len")?;

    match &args[0] {
        Value::String(s) => Ok(Value::Integer(s.len() as i64)),
        Value::Array(elements) => Ok(Value::Integer(elements.len() as i64)),
        other => Err(e::arg_not_supported("len", other)),
    }
}

pub fn first(args: Args) -> EvalResult {
    ensure_len(args.len(), |n| n == 1, 1, "first")?;

    match &args[0] {
        Value::Array(elements) => Ok(elements.front().cloned().unwrap_or(Value::Null)),
        other => Err(e::arg_type("first", "ARRAY", other)),
    }
}

pub fn last(args: Args) -> EvalResult {
    ensure_len(args.len(), |n| n == 1, 1, "last")?;

    match &args[0] {
        Value::Array(elements) => Ok(elements.back().cloned().unwrap_or(Value::Null)),
        other => Err(e::arg_type("last", "ARRAY", other)),
    }
}

pub fn rest(args: Args) -> EvalResult {
    ensure_len(args.len(), |n| n == 1, 1, "rest")?;

    match &args[0] {
        Value::Array(elements) if elements.is_empty() => Ok(Value::Null),
        Value::Array(elements) => Ok(Value::Array(elements.skip(1))),
        other => Err(e::arg_type("rest", "ARRAY", other)),
    }
}

pub fn push(args: Args) -> EvalResult {
    ensure_len(args.len(), |n| n == 2, 2, "push")?;

    match &args[0] {
        Value::Array(elements) => {
            let mut elements = elements.clone();
            elements.push_back(args[1].clone());
            Ok(Value::Array(elements))
        }
        other => Err(e::arg_type("push", "ARRAY", other)),
    }
}

pub fn puts(args: Args) -> EvalResult {
    write_puts(&mut stdout().lock(), &args).map_err(|err| e::io_failure("puts", &err))?;
    Ok(Value::Null)
}

/// Writes the rendering of each argument on its own line.
pub fn write_puts<W: Write>(out: &mut W, args: &Args) -> io::Result<()> {
    for arg in args.iter() {
        writeln!(out, "{}", arg)?;
    }
    out.flush()
}

#[inline]
pub fn ensure_len<F, S>(provided: usize, p: F, required: S, name: &str) -> Result<(), Value>
where
    F: Fn(usize) -> bool,
    S: Display,
{
    if p(provided) {
        Ok(())
    } else {
        Err(e::arg_count(name, required, provided))
    }
}

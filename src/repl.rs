use tracing::debug;

use std::{
    fs,
    io::{BufRead, Write},
    path::Path,
};

use crate::{
    env::Env,
    error::MonkeyError,
    eval::eval_program,
    macro_expand::{define_macros, expand_macros},
    parser::parse,
    value::Value,
};

pub const PROMPT: &str = ">> ";

/// Bindings that outlive a single input unit: one environment for values
/// and one for macros.
#[derive(Debug, Default)]
pub struct Session {
    env: Env,
    macro_env: Env,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses, expands and evaluates one unit. A failed expansion is
    /// reported the same way as a failed evaluation: as an Error value.
    pub fn rep(&self, input: &str) -> Result<Option<Value>, MonkeyError> {
        let mut program = parse(input).map_err(MonkeyError::Parse)?;

        define_macros(&mut program, &self.macro_env);
        let program = match expand_macros(program, &self.macro_env) {
            Ok(program) => program,
            Err(error) => return Ok(Some(error)),
        };

        debug!(statements = program.statements.len(), "evaluating unit");
        Ok(eval_program(&program, &self.env))
    }
}

pub fn start<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<(), MonkeyError> {
    let session = Session::new();
    let mut line = String::new();

    loop {
        write!(output, "{}", PROMPT).and_then(|_| output.flush())?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        match session.rep(&line) {
            Ok(Some(value)) => writeln!(output, "{}", value)?,
            Ok(None) => (),
            Err(MonkeyError::Parse(errors)) => print_parser_errors(&mut output, &errors)?,
            Err(error) => return Err(error),
        }
        output.flush()?;
    }
}

/// Evaluates a whole file as one unit.
pub fn run_file<P: AsRef<Path>>(path: P) -> Result<Option<Value>, MonkeyError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| MonkeyError::ReadScript {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = source.len(), "running script");
    Session::new().rep(&source)
}

fn print_parser_errors<W: Write>(output: &mut W, errors: &[String]) -> std::io::Result<()> {
    writeln!(output, "Woops! We ran into some monkey business here!")?;
    writeln!(output, " parser errors:")?;
    for message in errors {
        writeln!(output, "\t{}", message)?;
    }
    Ok(())
}

//! Tree-walking interpreter for the Monkey language, with `quote`/`unquote`
//! and macros expanded ahead of evaluation.

pub mod ast;
pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod hashkey;
pub mod lexer;
pub mod macro_expand;
pub mod modify;
pub mod parser;
pub mod quote;
pub mod repl;
pub mod value;

use monkey::{error::MonkeyError, repl};

use std::{
    env::args,
    io::{stdin, stdout},
    sync::Once,
};

static TRACING_INIT: Once = Once::new();

/// Logging stays off unless `RUST_LOG` is set, so the REPL output is clean.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn run() -> Result<(), MonkeyError> {
    if let Some(path) = args().nth(1) {
        if let Some(value) = repl::run_file(path)? {
            println!("{}", value);
        }
        return Ok(());
    }

    let user = std::env::var("USER").unwrap_or_else(|_| "there".into());
    println!("Hello {}! This is the Monkey programming language!", user);
    println!("Feel free to type in commands");

    repl::start(stdin().lock(), stdout())
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

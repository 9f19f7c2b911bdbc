use clap::Parser;
use little_scheme::config::{
    HISTORY_FILE, PROMPT_CONTINUATION, PROMPT_PRIMARY, WELCOME_MESSAGE, WELCOME_SUBTITLE,
};
use little_scheme::env::Environment;
use little_scheme::eval::eval;
use little_scheme::reader;
use little_scheme::value::Value;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

/// A minimal Scheme interpreter with first-class continuations
#[derive(Parser, Debug)]
#[command(name = "little-scheme")]
#[command(version = "1.0.0")]
#[command(about = "A minimal Scheme interpreter with first-class continuations")]
struct CliArgs {
    /// Script file to load (starts the REPL if omitted)
    script: Option<PathBuf>,

    /// Pass "-" after a script to continue into the REPL afterward
    repl_after: Option<String>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let env = Environment::new();
    little_scheme::builtins::register_builtins(&env);

    if let Some(path) = &args.script {
        if let Err(code) = load_script(path, &env) {
            return code;
        }
        if args.repl_after.as_deref() != Some("-") {
            return ExitCode::SUCCESS;
        }
    }

    run_repl(&env)
}

fn load_script(path: &PathBuf, env: &Rc<Environment>) -> Result<(), ExitCode> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Host I/O: {e}");
        ExitCode::FAILURE
    })?;
    let forms = reader::read_all(&source).map_err(|e| {
        eprintln!("{}: {}", e.kind(), e);
        ExitCode::FAILURE
    })?;
    for form in forms {
        if let Err(e) = eval(form, env.clone()) {
            eprintln!("{}: {}", e.kind(), e);
            return Err(ExitCode::FAILURE);
        }
    }
    Ok(())
}

/// Runs the REPL, wiring the reader's incremental line source to `rustyline`
/// so both interactive top-level reads and the `(read)` intrinsic share it.
fn run_repl(env: &Rc<Environment>) -> ExitCode {
    let rl = Rc::new(RefCell::new(
        DefaultEditor::new().expect("failed to initialize line editor"),
    ));
    let _ = rl.borrow_mut().load_history(HISTORY_FILE);

    {
        let rl = Rc::clone(&rl);
        reader::set_line_source(move |prompt| {
            let outcome = rl.borrow_mut().readline(prompt);
            match outcome {
                Ok(line) => {
                    let _ = rl.borrow_mut().add_history_entry(line.as_str());
                    Some(line)
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    Some(String::new())
                }
                Err(_) => None,
            }
        });
    }

    println!("{WELCOME_MESSAGE}");
    println!("{WELCOME_SUBTITLE}");

    loop {
        match reader::read_expression(PROMPT_PRIMARY, PROMPT_CONTINUATION) {
            Ok(Value::Eof) => {
                println!("Goodbye");
                break;
            }
            Ok(form) => match eval(form, env.clone()) {
                Ok(Value::Unit) => {}
                Ok(value) => println!("{value}"),
                Err(e) => eprintln!("{}: {}", e.kind(), e),
            },
            Err(e) => eprintln!("{}: {}", e.kind(), e),
        }
    }

    let _ = rl.borrow_mut().save_history(HISTORY_FILE);
    ExitCode::SUCCESS
}

//! Host I/O: `display`, `newline`, `read`, `globals`.

use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE};
use crate::symbol::intern;
use crate::value::{Intrinsic, Value};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

fn builtin_display(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("display", ARITY_ONE, args.len()));
    }
    print!("{}", args[0].stringify(false));
    std::io::stdout()
        .flush()
        .map_err(|e| EvalError::Io(e.to_string()))?;
    Ok(Value::Unit)
}

fn builtin_newline(args: &[Value]) -> Result<Value, EvalError> {
    if !args.is_empty() {
        return Err(EvalError::arity_error("newline", "0", args.len()));
    }
    println!();
    Ok(Value::Unit)
}

fn builtin_read(args: &[Value]) -> Result<Value, EvalError> {
    if !args.is_empty() {
        return Err(EvalError::arity_error("read", "0", args.len()));
    }
    crate::reader::read_expression("", "").map_err(|e| EvalError::Io(e.to_string()))
}

// `globals` needs to see the environment it's registered into, but an
// Intrinsic's func is a bare fn pointer with no captured state. Stash the
// bound environment's symbol lister here at registration time instead.
thread_local! {
    static GLOBALS_ENV: RefCell<Option<Rc<Environment>>> = RefCell::new(None);
}

fn builtin_globals(args: &[Value]) -> Result<Value, EvalError> {
    if !args.is_empty() {
        return Err(EvalError::arity_error("globals", "0", args.len()));
    }
    let names = GLOBALS_ENV.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|env| env.all_symbols())
            .unwrap_or_default()
    });
    Ok(Value::list(names.into_iter().map(Value::Symbol).collect()))
}

static DISPLAY: Intrinsic = Intrinsic {
    name: "display",
    arity: 1,
    func: builtin_display,
};
static NEWLINE: Intrinsic = Intrinsic {
    name: "newline",
    arity: 0,
    func: builtin_newline,
};
static READ: Intrinsic = Intrinsic {
    name: "read",
    arity: 0,
    func: builtin_read,
};
static GLOBALS: Intrinsic = Intrinsic {
    name: "globals",
    arity: 0,
    func: builtin_globals,
};

pub fn register(env: &Rc<Environment>) {
    env.define(intern("display"), Value::Intrinsic(&DISPLAY));
    env.define(intern("newline"), Value::Intrinsic(&NEWLINE));
    env.define(intern("read"), Value::Intrinsic(&READ));
    env.define(intern("globals"), Value::Intrinsic(&GLOBALS));
    GLOBALS_ENV.with(|cell| *cell.borrow_mut() = Some(Rc::clone(env)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_returns_unit() {
        assert!(matches!(
            builtin_display(&[Value::int(1)]).unwrap(),
            Value::Unit
        ));
    }

    #[test]
    fn display_wrong_arity_errors() {
        assert!(builtin_display(&[]).is_err());
    }

    #[test]
    fn newline_rejects_arguments() {
        assert!(builtin_newline(&[Value::int(1)]).is_err());
    }

    #[test]
    fn globals_reports_registered_names() {
        let env = Environment::new();
        register(&env);
        let result = builtin_globals(&[]).unwrap();
        let names = result.list_to_vec().unwrap();
        assert!(names.iter().any(|v| v.to_string() == "display"));
    }
}

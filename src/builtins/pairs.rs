//! Pair operations: `car`, `cdr`, `cons`, `list`.

use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE, ARITY_TWO};
use crate::symbol::intern;
use crate::value::{Intrinsic, Value};
use std::rc::Rc;

fn builtin_car(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("car", ARITY_ONE, args.len()));
    }
    args[0].car()
}

fn builtin_cdr(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("cdr", ARITY_ONE, args.len()));
    }
    args[0].cdr()
}

fn builtin_cons(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("cons", ARITY_TWO, args.len()));
    }
    Ok(Value::cons(args[0].clone(), args[1].clone()))
}

fn builtin_list(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::list(args.to_vec()))
}

static CAR: Intrinsic = Intrinsic { name: "car", arity: 1, func: builtin_car };
static CDR: Intrinsic = Intrinsic { name: "cdr", arity: 1, func: builtin_cdr };
static CONS: Intrinsic = Intrinsic { name: "cons", arity: 2, func: builtin_cons };
static LIST: Intrinsic = Intrinsic { name: "list", arity: -1, func: builtin_list };

pub fn register(env: &Rc<Environment>) {
    env.define(intern("car"), Value::Intrinsic(&CAR));
    env.define(intern("cdr"), Value::Intrinsic(&CDR));
    env.define(intern("cons"), Value::Intrinsic(&CONS));
    env.define(intern("list"), Value::Intrinsic(&LIST));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cons_car_cdr_round_trip() {
        let p = builtin_cons(&[Value::int(1), Value::int(2)]).unwrap();
        assert_eq!(builtin_car(&[p.clone()]).unwrap(), Value::int(1));
        assert_eq!(builtin_cdr(&[p]).unwrap(), Value::int(2));
    }

    #[test]
    fn car_of_non_pair_errors() {
        assert!(builtin_car(&[Value::int(1)]).is_err());
    }

    #[test]
    fn list_builds_proper_list() {
        let l = builtin_list(&[Value::int(1), Value::int(2), Value::int(3)]).unwrap();
        assert_eq!(l.to_string(), "(1 2 3)");
    }

    #[test]
    fn list_accepts_any_arity() {
        assert_eq!(builtin_list(&[]).unwrap().to_string(), "()");
    }
}

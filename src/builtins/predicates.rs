//! Identity, structural, and type predicates: `eq?`, `eqv?`, `pair?`,
//! `null?`, `not`, `symbol?`, `eof-object?`.

use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE, ARITY_TWO};
use crate::symbol::intern;
use crate::value::{Intrinsic, Value};
use std::rc::Rc;

fn builtin_eq(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("eq?", ARITY_TWO, args.len()));
    }
    Ok(Value::Bool(args[0].is_eq(&args[1])))
}

fn builtin_eqv(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("eqv?", ARITY_TWO, args.len()));
    }
    Ok(Value::Bool(args[0].is_eqv(&args[1])))
}

fn builtin_pair_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("pair?", ARITY_ONE, args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Pair(_))))
}

fn builtin_null_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("null?", ARITY_ONE, args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Nil)))
}

fn builtin_not(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("not", ARITY_ONE, args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Bool(false))))
}

fn builtin_symbol_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("symbol?", ARITY_ONE, args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Symbol(_))))
}

fn builtin_eof_object_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("eof-object?", ARITY_ONE, args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Eof)))
}

static EQ: Intrinsic = Intrinsic { name: "eq?", arity: 2, func: builtin_eq };
static EQV: Intrinsic = Intrinsic { name: "eqv?", arity: 2, func: builtin_eqv };
static PAIR_P: Intrinsic = Intrinsic { name: "pair?", arity: 1, func: builtin_pair_p };
static NULL_P: Intrinsic = Intrinsic { name: "null?", arity: 1, func: builtin_null_p };
static NOT: Intrinsic = Intrinsic { name: "not", arity: 1, func: builtin_not };
static SYMBOL_P: Intrinsic = Intrinsic { name: "symbol?", arity: 1, func: builtin_symbol_p };
static EOF_OBJECT_P: Intrinsic = Intrinsic {
    name: "eof-object?",
    arity: 1,
    func: builtin_eof_object_p,
};

pub fn register(env: &Rc<Environment>) {
    env.define(intern("eq?"), Value::Intrinsic(&EQ));
    env.define(intern("eqv?"), Value::Intrinsic(&EQV));
    env.define(intern("pair?"), Value::Intrinsic(&PAIR_P));
    env.define(intern("null?"), Value::Intrinsic(&NULL_P));
    env.define(intern("not"), Value::Intrinsic(&NOT));
    env.define(intern("symbol?"), Value::Intrinsic(&SYMBOL_P));
    env.define(intern("eof-object?"), Value::Intrinsic(&EOF_OBJECT_P));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_on_symbols_is_identity() {
        assert_eq!(
            builtin_eq(&[Value::symbol("a"), Value::symbol("a")]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn eq_on_distinct_pairs_is_false() {
        let a = Value::cons(Value::int(1), Value::Nil);
        let b = Value::cons(Value::int(1), Value::Nil);
        assert_eq!(builtin_eq(&[a, b]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn eq_does_not_coerce_numeric_types() {
        use crate::value::Number;
        assert_eq!(
            builtin_eq(&[Value::int(1), Value::Number(Number::Float(1.0))]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn eqv_coerces_numeric_types() {
        use crate::value::Number;
        assert_eq!(
            builtin_eqv(&[Value::int(1), Value::Number(Number::Float(1.0))]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn not_is_false_only_for_false() {
        assert_eq!(builtin_not(&[Value::Bool(false)]).unwrap(), Value::Bool(true));
        assert_eq!(builtin_not(&[Value::int(0)]).unwrap(), Value::Bool(false));
        assert_eq!(builtin_not(&[Value::Nil]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn pair_and_null_predicates() {
        assert_eq!(
            builtin_pair_p(&[Value::cons(Value::int(1), Value::Nil)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(builtin_null_p(&[Value::Nil]).unwrap(), Value::Bool(true));
        assert_eq!(builtin_null_p(&[Value::int(1)]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn eof_object_predicate() {
        assert_eq!(builtin_eof_object_p(&[Value::Eof]).unwrap(), Value::Bool(true));
        assert_eq!(builtin_eof_object_p(&[Value::int(1)]).unwrap(), Value::Bool(false));
    }
}

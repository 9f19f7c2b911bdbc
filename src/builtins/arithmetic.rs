//! Binary numeric operators: `+`, `-`, `*`, `<`, `=`.

use crate::env::Environment;
use crate::error::{EvalError, ARITY_TWO};
use crate::symbol::intern;
use crate::value::{Intrinsic, Number, Value};
use std::rc::Rc;

fn numbers(name: &'static str, args: &[Value]) -> Result<(Number, Number), EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error(name, ARITY_TWO, args.len()));
    }
    let a = match &args[0] {
        Value::Number(n) => *n,
        other => return Err(EvalError::type_error(name, "number", other, 0)),
    };
    let b = match &args[1] {
        Value::Number(n) => *n,
        other => return Err(EvalError::type_error(name, "number", other, 1)),
    };
    Ok((a, b))
}

fn builtin_add(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = numbers("+", args)?;
    Ok(promote(a, b, |x, y| x + y, |x, y| x + y))
}

fn builtin_sub(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = numbers("-", args)?;
    Ok(promote(a, b, |x, y| x - y, |x, y| x - y))
}

fn builtin_mul(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = numbers("*", args)?;
    Ok(promote(a, b, |x, y| x * y, |x, y| x * y))
}

fn builtin_lt(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = numbers("<", args)?;
    Ok(Value::Bool(a.as_f64() < b.as_f64()))
}

fn builtin_num_eq(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = numbers("=", args)?;
    Ok(Value::Bool(a.numeric_eq(b)))
}

/// Int+int stays exact; either operand being a float promotes the result.
fn promote(
    a: Number,
    b: Number,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Value {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Value::Number(Number::Int(int_op(x, y))),
        _ => Value::Number(Number::Float(float_op(a.as_f64(), b.as_f64()))),
    }
}

static ADD: Intrinsic = Intrinsic { name: "+", arity: 2, func: builtin_add };
static SUB: Intrinsic = Intrinsic { name: "-", arity: 2, func: builtin_sub };
static MUL: Intrinsic = Intrinsic { name: "*", arity: 2, func: builtin_mul };
static LT: Intrinsic = Intrinsic { name: "<", arity: 2, func: builtin_lt };
static NUM_EQ: Intrinsic = Intrinsic { name: "=", arity: 2, func: builtin_num_eq };

pub fn register(env: &Rc<Environment>) {
    env.define(intern("+"), Value::Intrinsic(&ADD));
    env.define(intern("-"), Value::Intrinsic(&SUB));
    env.define(intern("*"), Value::Intrinsic(&MUL));
    env.define(intern("<"), Value::Intrinsic(&LT));
    env.define(intern("="), Value::Intrinsic(&NUM_EQ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_stays_exact_for_ints() {
        assert_eq!(
            builtin_add(&[Value::int(2), Value::int(3)]).unwrap(),
            Value::int(5)
        );
    }

    #[test]
    fn add_promotes_to_float() {
        let result = builtin_add(&[Value::int(2), Value::Number(Number::Float(0.5))]).unwrap();
        assert_eq!(result.to_string(), "2.5");
    }

    #[test]
    fn lt_compares_numerically() {
        assert_eq!(
            builtin_lt(&[Value::int(1), Value::int(2)]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn eq_coerces_int_and_float() {
        assert_eq!(
            builtin_num_eq(&[Value::int(1), Value::Number(Number::Float(1.0))]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn wrong_arity_errors() {
        assert!(builtin_add(&[Value::int(1)]).is_err());
    }

    #[test]
    fn non_number_errors() {
        assert!(builtin_add(&[Value::int(1), Value::string("x")]).is_err());
    }
}

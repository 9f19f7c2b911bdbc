// ABOUTME: The evaluator: a CPS trampoline over an explicit continuation stack
//
// This is deliberately not a host-stack-recursive tree walker. `eval` holds
// three registers (`exp`, `env`, `k`) and iterates; sub-expressions are
// scheduled by pushing tagged frames onto `k` rather than by recursive Rust
// calls, which is what lets tail calls run in bounded space and lets
// `call/cc` capture "the rest of the computation" as a plain value.

use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE, ARITY_TWO};
use crate::symbol::Symbol;
use crate::value::{ClosureData, Special, Value};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum ContOp {
    /// Received the condition of `if`; `e3` is `None` for the one-armed form.
    Then(Value, Option<Value>),
    /// Sequence continuation: remaining expressions of a `begin` body.
    Begin(Vec<Value>),
    /// Bind the incoming value to this symbol in the current frame.
    Define(Symbol),
    /// Mutate this already-resolved storage cell with the incoming value.
    Setq(Rc<RefCell<Value>>),
    /// Received the function; these are its unevaluated argument expressions.
    Apply(Vec<Value>),
    /// The next unevaluated argument, once the previous one lands.
    EvalArg(Value),
    /// Arguments evaluated so far, in source (left-to-right) order.
    PushArgs(Vec<Value>),
    /// The function to call once all arguments have landed.
    ApplyFun(Value),
    /// Reinstate this environment once the call beneath it returns.
    RestoreEnv(Rc<Environment>),
}

/// The continuation stack. `Done` is `NOCONT`: nothing left to do, the
/// machine's current value is the final answer.
#[derive(Debug)]
pub enum Cont {
    Done,
    Frame { op: ContOp, next: Rc<Cont> },
}

impl Cont {
    fn top_is_restore_env(self_rc: &Rc<Cont>) -> bool {
        matches!(
            &**self_rc,
            Cont::Frame {
                op: ContOp::RestoreEnv(_),
                ..
            }
        )
    }
}

fn push(k: Rc<Cont>, op: ContOp) -> Rc<Cont> {
    Rc::new(Cont::Frame { op, next: k })
}

/// Splices a `RestoreEnv` frame onto `k` unless the top is already one —
/// this de-duplication is what keeps chains of tail calls and repeated
/// `call/cc` invocations from growing the stack.
fn push_restore_env(k: Rc<Cont>, env: Rc<Environment>) -> Rc<Cont> {
    if Cont::top_is_restore_env(&k) {
        k
    } else {
        push(k, ContOp::RestoreEnv(env))
    }
}

fn pop(k: &Rc<Cont>) -> Option<(ContOp, Rc<Cont>)> {
    match &**k {
        Cont::Done => None,
        Cont::Frame { op, next } => Some((op.clone(), next.clone())),
    }
}

/// Evaluates `expr` in `env`, running the trampoline to completion.
pub fn eval(expr: Value, env: Rc<Environment>) -> Result<Value, EvalError> {
    let mut exp = expr;
    let mut env = env;
    let mut k: Rc<Cont> = Rc::new(Cont::Done);

    'outer: loop {
        // Phase 1: reduce `exp` to an atomic value, pushing at most one
        // continuation frame per compound form encountered.
        loop {
            match &exp {
                Value::Pair(_) => {
                    let head = exp.car()?;
                    let rest = exp.cdr()?;
                    let form = if let Value::Symbol(s) = &head {
                        Some(s.name().to_string())
                    } else {
                        None
                    };
                    match form.as_deref() {
                        Some("quote") => {
                            exp = rest.car()?;
                            break;
                        }
                        Some("if") => {
                            let e1 = rest.car()?;
                            let branches = rest.cdr()?;
                            let e2 = branches.car()?;
                            let e3 = match branches.cdr()? {
                                Value::Nil => None,
                                other => Some(other.car()?),
                            };
                            k = push(k, ContOp::Then(e2, e3));
                            exp = e1;
                        }
                        Some("begin") => {
                            let e1 = rest.car()?;
                            if !matches!(rest.cdr()?, Value::Nil) {
                                k = push(k, ContOp::Begin(rest.cdr()?.list_to_vec()?));
                            }
                            exp = e1;
                        }
                        Some("lambda") => {
                            let params = rest
                                .car()?
                                .list_to_vec()?
                                .into_iter()
                                .map(|v| match v {
                                    Value::Symbol(s) => Ok(s),
                                    other => Err(EvalError::type_error("lambda", "symbol", &other, 0)),
                                })
                                .collect::<Result<Vec<_>, _>>()?;
                            let body = rest.cdr()?.list_to_vec()?;
                            if body.is_empty() {
                                return Err(EvalError::type_error(
                                    "lambda",
                                    "non-empty body",
                                    &Value::Nil,
                                    0,
                                ));
                            }
                            exp = Value::Closure(Rc::new(ClosureData {
                                params,
                                body,
                                env: env.clone(),
                            }));
                            break;
                        }
                        Some("define") => {
                            // (define v e) binds directly; (define (f . params) body...)
                            // is sugar for (define f (lambda params body...)).
                            let (sym, valexp) = match rest.car()? {
                                Value::Symbol(s) => (s, rest.cdr()?.car()?),
                                Value::Pair(_) => {
                                    let head_form = rest.car()?;
                                    let name = match head_form.car()? {
                                        Value::Symbol(s) => s,
                                        other => {
                                            return Err(EvalError::type_error(
                                                "define", "symbol", &other, 0,
                                            ))
                                        }
                                    };
                                    let params = head_form.cdr()?;
                                    let body = rest.cdr()?;
                                    let lambda_form =
                                        Value::cons(Value::symbol("lambda"), Value::cons(params, body));
                                    (name, lambda_form)
                                }
                                other => {
                                    return Err(EvalError::type_error("define", "symbol", &other, 0))
                                }
                            };
                            k = push(k, ContOp::Define(sym));
                            exp = valexp;
                        }
                        Some("set!") => {
                            let sym = match rest.car()? {
                                Value::Symbol(s) => s,
                                other => {
                                    return Err(EvalError::type_error("set!", "symbol", &other, 0))
                                }
                            };
                            let cell = env
                                .lookup_cell(&sym)
                                .ok_or_else(|| EvalError::UndefinedSymbol(sym.to_string()))?;
                            let valexp = rest.cdr()?.car()?;
                            k = push(k, ContOp::Setq(cell));
                            exp = valexp;
                        }
                        _ => {
                            let args = rest.list_to_vec()?;
                            k = push(k, ContOp::Apply(args));
                            exp = head;
                        }
                    }
                }
                Value::Symbol(s) => {
                    let s = s.clone();
                    exp = env.get(&s)?;
                    break;
                }
                _ => break, // numbers, booleans, strings, nil, closures, etc: self-evaluating
            }
        }

        // Phase 2: drive the continuation stack with the value now in `exp`.
        loop {
            let (op, rest_k) = match pop(&k) {
                None => return Ok(exp),
                Some(pair) => pair,
            };
            k = rest_k;
            match op {
                ContOp::Then(e2, e3) => {
                    if exp.is_truthy() {
                        exp = e2;
                    } else {
                        match e3 {
                            Some(e) => exp = e,
                            None => {
                                exp = Value::Unit;
                                continue;
                            }
                        }
                    }
                    continue 'outer;
                }
                ContOp::Begin(mut remaining) => {
                    let e1 = remaining.remove(0);
                    if !remaining.is_empty() {
                        k = push(k, ContOp::Begin(remaining));
                    }
                    exp = e1;
                    continue 'outer;
                }
                ContOp::Define(sym) => {
                    env.define(sym, exp.clone());
                    exp = Value::Unit;
                }
                ContOp::Setq(cell) => {
                    *cell.borrow_mut() = exp.clone();
                    exp = Value::Unit;
                }
                ContOp::Apply(mut args) => {
                    if args.is_empty() {
                        let (ne, nk, nenv) = apply_function(exp, Vec::new(), k, env.clone())?;
                        exp = ne;
                        k = nk;
                        env = nenv;
                    } else {
                        let first = args.remove(0);
                        k = push(k, ContOp::ApplyFun(exp));
                        for a in args.into_iter().rev() {
                            k = push(k, ContOp::EvalArg(a));
                        }
                        k = push(k, ContOp::PushArgs(Vec::new()));
                        exp = first;
                        continue 'outer;
                    }
                }
                ContOp::PushArgs(mut accum) => {
                    accum.push(exp.clone());
                    match pop(&k) {
                        Some((ContOp::EvalArg(next_arg), rest2)) => {
                            k = push(rest2, ContOp::PushArgs(accum));
                            exp = next_arg;
                            continue 'outer;
                        }
                        Some((ContOp::ApplyFun(fun), rest2)) => {
                            let (ne, nk, nenv) = apply_function(fun, accum, rest2, env.clone())?;
                            exp = ne;
                            k = nk;
                            env = nenv;
                        }
                        _ => {
                            return Err(EvalError::Io(
                                "malformed continuation stack during argument evaluation".into(),
                            ))
                        }
                    }
                }
                ContOp::EvalArg(_) | ContOp::ApplyFun(_) => {
                    return Err(EvalError::Io("continuation stack frame out of order".into()))
                }
                ContOp::RestoreEnv(saved) => {
                    env = saved;
                }
            }
        }
    }
}

/// Applies `fun` to `args`, possibly unwrapping `call/cc`/`apply` sentinels
/// first. Returns the resulting `(exp, k, env)` triple for the trampoline
/// to continue with; it does not recurse back into `eval`.
fn apply_function(
    fun: Value,
    args: Vec<Value>,
    k: Rc<Cont>,
    env: Rc<Environment>,
) -> Result<(Value, Rc<Cont>, Rc<Environment>), EvalError> {
    let mut fun = fun;
    let mut args = args;
    let mut k = k;
    loop {
        match &fun {
            Value::Special(Special::CallCC) => {
                k = push_restore_env(k, env.clone());
                let f = args
                    .into_iter()
                    .next()
                    .ok_or_else(|| EvalError::arity_error("call/cc", ARITY_ONE, 0))?;
                fun = f;
                args = vec![Value::Continuation(k.clone())];
            }
            Value::Special(Special::Apply) => {
                if args.len() != 2 {
                    return Err(EvalError::arity_error("apply", ARITY_TWO, args.len()));
                }
                let arglist = args[1].list_to_vec()?;
                fun = args[0].clone();
                args = arglist;
            }
            _ => break,
        }
    }

    match fun {
        Value::Intrinsic(intr) => {
            if intr.arity >= 0 && args.len() as i32 != intr.arity {
                return Err(EvalError::arity_error(
                    intr.name,
                    intr.arity.to_string(),
                    args.len(),
                ));
            }
            let result = (intr.func)(&args)?;
            Ok((result, k, env))
        }
        Value::Closure(c) => {
            if c.params.len() != args.len() {
                return Err(EvalError::arity_error(
                    "#<closure>",
                    c.params.len().to_string(),
                    args.len(),
                ));
            }
            let k = push_restore_env(k, env);
            let k = push(k, ContOp::Begin(c.body.clone()));
            let call_env = Environment::extend(&c.env, &c.params, &args);
            Ok((Value::Unit, k, call_env))
        }
        Value::Continuation(captured) => {
            let v = args
                .into_iter()
                .next()
                .ok_or_else(|| EvalError::arity_error("continuation", ARITY_ONE, 0))?;
            Ok((v, captured, env))
        }
        other => Err(EvalError::NotCallable(other.stringify(true))),
    }
}

//! The built-in procedure set, grouped by category. `register_builtins`
//! populates a fresh top-level environment with everything a program can
//! call without defining it itself.

mod arithmetic;
mod io;
mod pairs;
mod predicates;

use crate::env::Environment;
use crate::symbol::intern;
use crate::value::{Special, Value};
use std::rc::Rc;

pub fn register_builtins(env: &Rc<Environment>) {
    arithmetic::register(env);
    pairs::register(env);
    predicates::register(env);
    io::register(env);

    // call/cc and apply aren't ordinary intrinsics: they need access to
    // the evaluator's continuation, so they're reified as Value::Special
    // sentinels and unwrapped specially in eval::apply_function.
    env.define(intern("call/cc"), Value::Special(Special::CallCC));
    env.define(intern("call-with-current-continuation"), Value::Special(Special::CallCC));
    env.define(intern("apply"), Value::Special(Special::Apply));
}

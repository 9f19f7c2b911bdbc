// ABOUTME: Symbol interning so that symbols compare by identity, not by string content

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// An interned identifier. Two `Symbol`s are `eq?` iff they share the same
/// interned id, regardless of how many times their name was interned.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: usize,
    name: Rc<str>,
}

impl Symbol {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

struct Interner {
    ids: HashMap<Rc<str>, usize>,
    names: Vec<Rc<str>>,
}

impl Interner {
    fn new() -> Self {
        Interner {
            ids: HashMap::new(),
            names: Vec::new(),
        }
    }

    fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&id) = self.ids.get(name) {
            return Symbol {
                id,
                name: self.names[id].clone(),
            };
        }
        let id = self.names.len();
        let rc: Rc<str> = Rc::from(name);
        self.names.push(rc.clone());
        self.ids.insert(rc.clone(), id);
        Symbol { id, name: rc }
    }
}

thread_local! {
    static INTERNER: RefCell<Interner> = RefCell::new(Interner::new());
}

/// Interns `name`, returning the process-wide unique `Symbol` for it.
pub fn intern(name: &str) -> Symbol {
    INTERNER.with(|i| i.borrow_mut().intern(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_identity() {
        let a = intern("foo");
        let b = intern("foo");
        assert_eq!(a, b);
    }

    #[test]
    fn different_names_differ() {
        let a = intern("foo");
        let b = intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn name_round_trips() {
        let s = intern("hello-world?");
        assert_eq!(s.name(), "hello-world?");
    }
}

// ABOUTME: The reader: tokenizes source text and builds s-expression values
//
// Tokenization is a deliberately simple line/quote-splitting pass rather
// than a combinator grammar: split each line on `"` so string literals are
// isolated, strip `;`-comments outside of strings, pad `(`, `)`, `'` with
// whitespace, then split on whitespace and restore the string literals.
// Incremental reads (REPL mode) keep a thread-local token buffer so a
// partial expression can be completed by feeding more lines later.

use crate::error::ReaderError;
use crate::value::{Number, Value};
use std::cell::RefCell;
use std::collections::VecDeque;

fn tokenize_line(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.split('"').collect();
    let mut joined = String::new();
    let mut literals: VecDeque<String> = VecDeque::new();
    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 0 {
            joined.push_str(part);
            joined.push(' ');
        } else {
            literals.push_back(format!("\"{part}"));
            joined.push_str("#s ");
        }
    }
    let before_comment = joined.split(';').next().unwrap_or("");
    let padded = before_comment
        .replace('\'', " ' ")
        .replace(')', " ) ")
        .replace('(', " ( ");
    padded
        .split_whitespace()
        .map(|tok| {
            if tok == "#s" {
                literals.pop_front().unwrap_or_default()
            } else {
                tok.to_string()
            }
        })
        .collect()
}

/// Splits `source` into tokens, across as many lines as it contains.
pub fn tokenize(source: &str) -> Vec<String> {
    source.lines().flat_map(tokenize_line).collect()
}

/// Reads one expression from the front of `tokens`, consuming what it uses.
/// `Err(ReaderError::Eof)` means the tokens ran out mid-expression: in
/// incremental mode that means "ask for more input", not a real syntax error.
pub fn read_from_tokens(tokens: &mut VecDeque<String>) -> Result<Value, ReaderError> {
    let token = tokens.pop_front().ok_or(ReaderError::Eof)?;
    match token.as_str() {
        "(" => read_list(tokens),
        ")" => Err(ReaderError::Syntax("unexpected )".to_string())),
        "'" => {
            let quoted = read_from_tokens(tokens)?;
            Ok(Value::list(vec![Value::symbol("quote"), quoted]))
        }
        "#f" => Ok(Value::Bool(false)),
        "#t" => Ok(Value::Bool(true)),
        t if t.starts_with('"') => Ok(Value::string(t[1..].to_string())),
        t => Ok(atom(t)),
    }
}

fn read_list(tokens: &mut VecDeque<String>) -> Result<Value, ReaderError> {
    let mut items = Vec::new();
    loop {
        match tokens.front().map(String::as_str) {
            None => return Err(ReaderError::Eof),
            Some(")") => {
                tokens.pop_front();
                return Ok(Value::list(items));
            }
            Some(".") => {
                tokens.pop_front();
                let tail = read_from_tokens(tokens)?;
                match tokens.pop_front().as_deref() {
                    Some(")") => {}
                    _ => return Err(ReaderError::Syntax(") is expected".to_string())),
                }
                return Ok(items
                    .into_iter()
                    .rev()
                    .fold(tail, |acc, v| Value::cons(v, acc)));
            }
            _ => items.push(read_from_tokens(tokens)?),
        }
    }
}

fn atom(token: &str) -> Value {
    if let Ok(i) = token.parse::<i64>() {
        Value::int(i)
    } else if let Ok(f) = token.parse::<f64>() {
        Value::Number(Number::Float(f))
    } else {
        Value::symbol(token)
    }
}

/// Reads every top-level expression out of `source` at once (used for
/// loading whole files and in tests).
pub fn read_all(source: &str) -> Result<Vec<Value>, ReaderError> {
    let mut tokens: VecDeque<String> = tokenize(source).into();
    let mut forms = Vec::new();
    while !tokens.is_empty() {
        forms.push(read_from_tokens(&mut tokens)?);
    }
    Ok(forms)
}

thread_local! {
    static TOKENS: RefCell<VecDeque<String>> = RefCell::new(VecDeque::new());
    static LINE_SOURCE: RefCell<Option<Box<dyn FnMut(&str) -> Option<String>>>> = RefCell::new(None);
}

/// Installs the callback the incremental reader uses to request another
/// line of input (prompting with the given continuation string). The
/// driver wires this to `rustyline` or to plain stdin.
pub fn set_line_source(f: impl FnMut(&str) -> Option<String> + 'static) {
    LINE_SOURCE.with(|s| *s.borrow_mut() = Some(Box::new(f)));
}

fn request_line(prompt: &str) -> Option<String> {
    LINE_SOURCE.with(|s| s.borrow_mut().as_mut().and_then(|f| f(prompt)))
}

/// Clears the incremental token buffer, discarding any partially-read
/// expression (done after a syntax error).
pub fn reset_tokens() {
    TOKENS.with(|t| t.borrow_mut().clear());
}

fn try_read() -> Result<Option<Value>, ReaderError> {
    TOKENS.with(|t| {
        let saved = t.borrow().clone();
        match read_from_tokens(&mut t.borrow_mut()) {
            Ok(v) => Ok(Some(v)),
            Err(ReaderError::Eof) => {
                *t.borrow_mut() = saved;
                Ok(None)
            }
            Err(e) => {
                t.borrow_mut().clear();
                Err(e)
            }
        }
    })
}

/// Reads the next expression, pulling more lines through the installed
/// line source as needed. Returns `Value::Eof` at end of input rather
/// than an error, matching `eof-object?`.
pub fn read_expression(prompt1: &str, prompt2: &str) -> Result<Value, ReaderError> {
    loop {
        let had_tokens = TOKENS.with(|t| !t.borrow().is_empty());
        if let Some(v) = try_read()? {
            return Ok(v);
        }
        let prompt = if had_tokens { prompt2 } else { prompt1 };
        match request_line(prompt) {
            Some(line) => TOKENS.with(|t| t.borrow_mut().extend(tokenize(&line))),
            None => return Ok(Value::Eof),
        }
    }
}

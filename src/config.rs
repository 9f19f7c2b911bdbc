// ABOUTME: Version info and REPL banner/prompt constants

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "little-scheme v1.0";
pub const WELCOME_SUBTITLE: &str = "A minimal Scheme interpreter with first-class continuations";

pub const PROMPT_PRIMARY: &str = "> ";
pub const PROMPT_CONTINUATION: &str = "| ";

pub const HISTORY_FILE: &str = ".scheme_history";

//! Error types for grammar loading and parser simulation.

use thiserror::Error;

/// Errors raised while loading a grammar.
///
/// Malformed production lines are not errors: the loader skips them with a
/// warning and keeps going. Only an unreadable file or a grammar with no
/// usable production is fatal.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("cannot open grammar file '{path}': {source}")]
    FileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("grammar contains no usable productions")]
    EmptyGrammar,
}

/// Errors raised by the LL(1) and SLR(1) recognizers.
///
/// A parse failure aborts the current simulation but is reported, not fatal:
/// the driver keeps running the remaining inputs.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no rule in table cell ({nonterminal}, {token})")]
    NoRule { nonterminal: String, token: String },

    #[error("unexpected terminal '{found}', expected '{expected}'")]
    UnexpectedTerminal { expected: String, found: String },

    #[error("ambiguous table cell ({nonterminal}, {token}): {entries}")]
    AmbiguousRule {
        nonterminal: String,
        token: String,
        entries: String,
    },

    #[error("no action in state {state} on '{token}'")]
    NoAction { state: usize, token: String },

    #[error("ambiguous actions in state {state} on '{token}': {entries}")]
    AmbiguousAction {
        state: usize,
        token: String,
        entries: String,
    },

    #[error("missing GOTO from state {state} on {nonterminal}")]
    MissingGoto { state: usize, nonterminal: String },
}

/// Top-level error for the driver.
#[derive(Error, Debug)]
pub enum CfgError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, CfgError>;

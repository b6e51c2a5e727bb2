//! Grammar analysis and parser-generation toolkit for context-free grammars.
//!
//! Given a BNF-style grammar this crate computes nullability, FIRST and
//! FOLLOW sets as a joint fixed point; builds an LL(1) predictive table and
//! an SLR(1) ACTION/GOTO table with every colliding entry preserved;
//! simulates both parsers on token streams with step-by-step traces; and
//! classifies table conflicts with resolution hints.
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools"
//! (2nd Edition). Addison-Wesley, 2006.

pub mod cli;
pub mod conflict;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod ll1;
pub mod report;
pub mod resolver;
pub mod slr1;
pub mod symbol;
pub mod trace;

// Re-export commonly used types
pub use conflict::{Conflict, ConflictKind, ConflictSite};
pub use error::{CfgError, GrammarError, ParseError, Result};
pub use first_follow::FirstFollow;
pub use grammar::{Grammar, Production};
pub use ll1::{LL1Parser, LL1Table};
pub use slr1::{Action, SLR1Parser};
pub use symbol::{Symbol, SymbolTable};
pub use trace::{MemorySink, StdoutSink, TraceSink};

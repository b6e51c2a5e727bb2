//! Grammar model and BNF file loader.
//!
//! A grammar is loaded once and is immutable for the remainder of the run.
//! Terminals are derived, not declared: every right-hand-side symbol that
//! never appears as a left-hand side is a terminal.

use crate::error::GrammarError;
use crate::symbol::{END_MARKER_STR, EPSILON_STR, Symbol, SymbolTable};
use log::warn;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

/// A production: one nonterminal with its ordered list of alternatives.
///
/// Each alternative is a sequence of symbols. The canonical empty alternative
/// is the singleton `[ε]`; the LR item constructor normalizes it to the empty
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    /// Left-hand side (always a nonterminal).
    pub lhs: Symbol,
    /// Right-hand-side alternatives, in source order.
    pub alternatives: Vec<Vec<Symbol>>,
}

/// One token of recognizer input, resolved against the grammar's symbols.
///
/// Tokens the grammar has never seen keep `symbol = None` and fail the parse
/// at the step that consults them.
#[derive(Debug, Clone)]
pub struct InputToken {
    pub text: String,
    pub symbol: Option<Symbol>,
}

/// A context-free grammar: ordered productions, derived symbol populations,
/// and the interner that owns every symbol string.
#[derive(Debug, Clone)]
pub struct Grammar {
    symbols: SymbolTable,
    productions: Vec<Production>,
    by_lhs: HashMap<Symbol, usize>,
    nonterminals: HashSet<Symbol>,
    terminals: HashSet<Symbol>,
    start_symbol: Symbol,
}

/// A production line split into raw strings, before interning.
struct RawProduction {
    lhs: String,
    alternatives: Vec<Vec<String>>,
}

impl Grammar {
    /// Loads a grammar from a file. A file that cannot be opened is fatal.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GrammarError::FileUnreadable {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_lines(text.lines())
    }

    /// Parses a grammar from production lines.
    ///
    /// # Format
    /// One production per line: `LHS -> RHS1 | RHS2 | …` (the Unicode arrow
    /// `→` is also accepted). Symbols are whitespace-separated; the empty
    /// alternative is the single token `ε`; `#` starts a comment. Malformed
    /// lines are skipped with a warning. The first production's LHS is the
    /// start symbol.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut raw: Vec<RawProduction> = Vec::new();

        for line in lines {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            match Self::parse_production_line(line) {
                Some(prod) => raw.push(prod),
                None => warn!("skipping malformed production line: {line}"),
            }
        }

        Self::from_raw(raw)
    }

    /// Splits one production line into LHS and alternatives.
    ///
    /// Returns `None` when the line has no arrow, a non-singleton LHS, or no
    /// usable alternative.
    fn parse_production_line(line: &str) -> Option<RawProduction> {
        let (lhs_part, rhs_part) = match line.split_once("->") {
            Some(parts) => parts,
            None => line.split_once('→')?,
        };

        let mut lhs_tokens = lhs_part.split_whitespace();
        let lhs = lhs_tokens.next()?.to_string();
        if lhs_tokens.next().is_some() || lhs == EPSILON_STR || lhs == END_MARKER_STR {
            return None;
        }

        let alternatives: Vec<Vec<String>> = rhs_part
            .split('|')
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .map(|alt| alt.split_whitespace().map(str::to_string).collect())
            .collect();

        // $ is the recognizers' sentinel; it never appears in a grammar.
        if alternatives.is_empty()
            || alternatives
                .iter()
                .any(|alt| alt.iter().any(|tok| tok == END_MARKER_STR))
        {
            return None;
        }

        Some(RawProduction { lhs, alternatives })
    }

    /// Interns the raw productions and derives the symbol populations.
    fn from_raw(raw: Vec<RawProduction>) -> Result<Self, GrammarError> {
        if raw.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }

        let mut symbols = SymbolTable::new();

        // The LHS population defines the nonterminal set; everything else on
        // a RHS (except ε) is a terminal.
        let mut nonterminals = HashSet::new();
        for prod in &raw {
            nonterminals.insert(symbols.intern(&prod.lhs));
        }

        let start_symbol = symbols
            .lookup(&raw[0].lhs)
            .ok_or(GrammarError::EmptyGrammar)?;

        let mut productions: Vec<Production> = Vec::new();
        let mut by_lhs: HashMap<Symbol, usize> = HashMap::new();
        let mut terminals = HashSet::new();

        for prod in &raw {
            let lhs = symbols.intern(&prod.lhs);
            let mut alternatives = Vec::with_capacity(prod.alternatives.len());
            for alt in &prod.alternatives {
                let rhs: Vec<Symbol> = alt.iter().map(|tok| symbols.intern(tok)).collect();
                for &sym in &rhs {
                    if !nonterminals.contains(&sym) && !sym.is_epsilon() && !sym.is_end_marker() {
                        terminals.insert(sym);
                    }
                }
                alternatives.push(rhs);
            }

            // Repeated LHS lines merge their alternatives into one production.
            match by_lhs.get(&lhs) {
                Some(&idx) => productions[idx].alternatives.extend(alternatives),
                None => {
                    by_lhs.insert(lhs, productions.len());
                    productions.push(Production { lhs, alternatives });
                }
            }
        }

        Ok(Self {
            symbols,
            productions,
            by_lhs,
            nonterminals,
            terminals,
            start_symbol,
        })
    }

    /// Returns the symbol interner.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Returns the start symbol.
    pub fn start_symbol(&self) -> Symbol {
        self.start_symbol
    }

    /// Returns all nonterminals.
    pub fn nonterminals(&self) -> &HashSet<Symbol> {
        &self.nonterminals
    }

    /// Returns all terminals.
    pub fn terminals(&self) -> &HashSet<Symbol> {
        &self.terminals
    }

    /// Returns all productions in insertion order.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Returns the alternatives of a nonterminal, or an empty slice.
    pub fn alternatives_of(&self, nt: Symbol) -> &[Vec<Symbol>] {
        self.by_lhs
            .get(&nt)
            .map(|&idx| self.productions[idx].alternatives.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates all `(lhs, alternative)` rules in source order.
    pub fn rules(&self) -> impl Iterator<Item = (Symbol, &[Symbol])> {
        self.productions
            .iter()
            .flat_map(|p| p.alternatives.iter().map(move |alt| (p.lhs, alt.as_slice())))
    }

    /// Checks if a symbol is a terminal.
    pub fn is_terminal(&self, sym: Symbol) -> bool {
        self.terminals.contains(&sym)
    }

    /// Checks if a symbol is a nonterminal.
    pub fn is_nonterminal(&self, sym: Symbol) -> bool {
        self.nonterminals.contains(&sym)
    }

    /// Resolves recognizer input tokens against the grammar's symbols.
    /// The `$` sentinel is appended by the recognizers, never by callers.
    pub fn resolve_tokens(&self, tokens: &[&str]) -> Vec<InputToken> {
        tokens
            .iter()
            .map(|tok| InputToken {
                text: (*tok).to_string(),
                symbol: self.symbols.lookup(tok),
            })
            .collect()
    }

    /// Returns an augmented copy of this grammar with a minted fresh start
    /// symbol `S'` and the single rule `S' → S`, plus the minted symbol.
    ///
    /// The copy is owned by the LR generator and discarded when its tables
    /// are built; `S'` never appears on any right-hand side.
    pub fn augment(&self) -> (Grammar, Symbol) {
        let mut g = self.clone();
        let base = g.symbols.name(g.start_symbol).to_string();
        let fresh = g.symbols.fresh(&base);
        g.nonterminals.insert(fresh);
        g.by_lhs.insert(fresh, g.productions.len());
        g.productions.push(Production {
            lhs: fresh,
            alternatives: vec![vec![g.start_symbol]],
        });
        (g, fresh)
    }

    /// Renders the grammar summary: start symbol, productions, and the
    /// derived symbol populations.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        out.push_str("===== Grammar =====\n");
        out.push_str(&format!(
            "Start symbol: {}\n\nProductions:\n",
            self.symbols.name(self.start_symbol)
        ));
        for prod in &self.productions {
            out.push_str(&format!("{}\n", self.render_production(prod)));
        }

        let mut nts: Vec<&str> = self.nonterminals.iter().map(|&s| self.symbols.name(s)).collect();
        nts.sort_unstable();
        let mut ts: Vec<&str> = self.terminals.iter().map(|&s| self.symbols.name(s)).collect();
        ts.sort_unstable();

        out.push_str(&format!("\nNonterminals ({}): {}\n", nts.len(), nts.join(", ")));
        out.push_str(&format!("Terminals ({}): {}\n", ts.len(), ts.join(", ")));
        out.push_str("===================\n");
        out
    }

    fn render_production(&self, prod: &Production) -> String {
        let alts: Vec<String> = prod
            .alternatives
            .iter()
            .map(|alt| self.symbols.render_sequence(alt))
            .collect();
        format!("{} -> {}", self.symbols.name(prod.lhs), alts.join(" | "))
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prod in &self.productions {
            writeln!(f, "{}", self.render_production(prod))?;
        }
        Ok(())
    }
}

//! LL(1) predictive table construction and stack-driven recognition.
//!
//! Table cells keep every colliding alternative so the conflict detector can
//! classify them later; a conflicted grammar still gets a table. The
//! recognizer refuses to guess: an ambiguous cell fails the parse.

use crate::error::ParseError;
use crate::first_follow::FirstFollow;
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use crate::trace::TraceSink;
use std::collections::HashMap;

/// Predictive parsing table `M[A][a]` with all offenders preserved.
///
/// A cell holding more than one alternative is a conflict cell; construction
/// never drops an entry.
#[derive(Debug, Clone)]
pub struct LL1Table {
    cells: HashMap<(Symbol, Symbol), Vec<Vec<Symbol>>>,
}

impl LL1Table {
    /// Builds the table.
    ///
    /// For each rule `A → α`: `α` lands in `M[A][a]` for every terminal
    /// `a ∈ FIRST(α) \ {ε}`, and when `ε ∈ FIRST(α)` also in `M[A][b]` for
    /// every `b ∈ FOLLOW(A)`.
    pub fn build(grammar: &Grammar, sets: &FirstFollow) -> Self {
        let mut cells: HashMap<(Symbol, Symbol), Vec<Vec<Symbol>>> = HashMap::new();

        for (lhs, rhs) in grammar.rules() {
            let first_alpha = sets.first_of_sequence(rhs);

            for &a in &first_alpha {
                if !a.is_epsilon() {
                    cells.entry((lhs, a)).or_default().push(rhs.to_vec());
                }
            }

            if first_alpha.contains(&Symbol::EPSILON) {
                for &b in sets.follow(lhs) {
                    cells.entry((lhs, b)).or_default().push(rhs.to_vec());
                }
            }
        }

        Self { cells }
    }

    /// The alternatives recorded for `M[nt][t]`; empty slice when the cell is
    /// blank.
    pub fn entries(&self, nt: Symbol, t: Symbol) -> &[Vec<Symbol>] {
        self.cells
            .get(&(nt, t))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates every populated cell.
    pub fn cells(&self) -> impl Iterator<Item = (&(Symbol, Symbol), &Vec<Vec<Symbol>>)> {
        self.cells.iter()
    }

    /// True when no cell holds more than one alternative.
    pub fn is_ll1(&self) -> bool {
        self.cells.values().all(|entries| entries.len() <= 1)
    }

    /// Serializes a cell for display: alternatives joined with `|`, symbols
    /// inside an alternative space-separated, `ε` spelled literally.
    pub fn cell_string(&self, grammar: &Grammar, nt: Symbol, t: Symbol) -> String {
        self.entries(nt, t)
            .iter()
            .map(|alt| grammar.symbols().render_sequence(alt))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Renders the table as sorted `(A, a) => rhs` lines.
    pub fn render(&self, grammar: &Grammar) -> String {
        let table = grammar.symbols();
        let mut keys: Vec<&(Symbol, Symbol)> = self.cells.keys().collect();
        keys.sort_by_key(|&&(nt, t)| (table.name(nt), table.name(t)));

        let mut out = String::new();
        out.push_str("=== LL(1) Parsing Table ===\n");
        for &&(nt, t) in &keys {
            out.push_str(&format!(
                "({}, {}) => {}\n",
                table.name(nt),
                table.name(t),
                self.cell_string(grammar, nt, t)
            ));
        }
        out.push_str("===========================\n");
        out
    }
}

/// LL(1) predictive recognizer over a built table.
///
/// Holds read-only views of the grammar and the computed sets; both live as
/// long as the driver keeps them.
#[derive(Debug)]
pub struct LL1Parser<'g> {
    grammar: &'g Grammar,
    table: LL1Table,
}

impl<'g> LL1Parser<'g> {
    /// Builds the parsing table for a grammar.
    pub fn new(grammar: &'g Grammar, sets: &FirstFollow) -> Self {
        Self {
            grammar,
            table: LL1Table::build(grammar, sets),
        }
    }

    /// Returns the parsing table.
    pub fn table(&self) -> &LL1Table {
        &self.table
    }

    /// Simulates the predictive parse of a token stream.
    ///
    /// The stack starts as `[$, S]` and the input gets `$` appended. Every
    /// loop iteration emits one trace row `(stack, remaining input, action)`.
    pub fn parse(&self, tokens: &[&str], trace: &mut dyn TraceSink) -> Result<(), ParseError> {
        let table = self.grammar.symbols();
        let mut input = self.grammar.resolve_tokens(tokens);
        input.push(crate::grammar::InputToken {
            text: crate::symbol::END_MARKER_STR.to_string(),
            symbol: Some(Symbol::END_MARKER),
        });

        let mut stack = vec![Symbol::END_MARKER, self.grammar.start_symbol()];
        let mut pos = 0;

        loop {
            // $ sits at the bottom of the stack and is only consumed by the
            // accept case, so the stack is never empty here.
            let top = *stack.last().unwrap();
            let lookahead = &input[pos];
            let row = |action: &str| {
                format!(
                    "{:<32}{:<32}{}",
                    render_stack(self.grammar, &stack),
                    render_input(&input, pos),
                    action
                )
            };

            if top.is_end_marker() && lookahead.symbol == Some(Symbol::END_MARKER) {
                trace.write(&row("accept"));
                return Ok(());
            }

            if !self.grammar.is_nonterminal(top) {
                // Terminal (or the $ sentinel) on top: it must match the
                // lookahead exactly.
                if lookahead.symbol == Some(top) {
                    trace.write(&row(&format!("match {}", table.name(top))));
                    stack.pop();
                    pos += 1;
                    continue;
                }
                let err = ParseError::UnexpectedTerminal {
                    expected: table.name(top).to_string(),
                    found: lookahead.text.clone(),
                };
                trace.write(&row(&format!("error: {err}")));
                return Err(err);
            }

            let entries = match lookahead.symbol {
                Some(sym) => self.table.entries(top, sym),
                None => &[],
            };

            match entries.len() {
                0 => {
                    let err = ParseError::NoRule {
                        nonterminal: table.name(top).to_string(),
                        token: lookahead.text.clone(),
                    };
                    trace.write(&row(&format!("error: {err}")));
                    return Err(err);
                }
                1 => {
                    let rhs = &entries[0];
                    trace.write(&row(&format!(
                        "apply {} -> {}",
                        table.name(top),
                        table.render_sequence(rhs)
                    )));
                    stack.pop();
                    for &sym in rhs.iter().rev() {
                        if !sym.is_epsilon() {
                            stack.push(sym);
                        }
                    }
                }
                _ => {
                    let err = ParseError::AmbiguousRule {
                        nonterminal: table.name(top).to_string(),
                        token: lookahead.text.clone(),
                        entries: self
                            .table
                            .cell_string(self.grammar, top, lookahead.symbol.unwrap_or(top)),
                    };
                    trace.write(&row(&format!("error: {err}")));
                    return Err(err);
                }
            }
        }
    }
}

fn render_stack(grammar: &Grammar, stack: &[Symbol]) -> String {
    stack
        .iter()
        .map(|&s| grammar.symbols().name(s))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_input(input: &[crate::grammar::InputToken], pos: usize) -> String {
    input[pos..]
        .iter()
        .map(|tok| tok.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::MemorySink;

    fn expression_grammar() -> Grammar {
        Grammar::from_lines(vec![
            "E -> T E'",
            "E' -> + T E' | ε",
            "T -> F T'",
            "T' -> * F T' | ε",
            "F -> ( E ) | id",
        ])
        .unwrap()
    }

    #[test]
    fn classic_grammar_table_is_conflict_free() {
        let grammar = expression_grammar();
        let sets = FirstFollow::compute(&grammar);
        let table = LL1Table::build(&grammar, &sets);
        assert!(table.is_ll1());
    }

    #[test]
    fn accepts_expression_input() {
        let grammar = expression_grammar();
        let sets = FirstFollow::compute(&grammar);
        let parser = LL1Parser::new(&grammar, &sets);

        let mut sink = MemorySink::new();
        let result = parser.parse(&["id", "+", "id", "*", "id"], &mut sink);
        assert!(result.is_ok());

        // F expands to id once per operand.
        let f_to_id = sink
            .lines()
            .iter()
            .filter(|line| line.contains("apply F -> id"))
            .count();
        assert_eq!(f_to_id, 3);
        assert!(sink.lines().last().unwrap().contains("accept"));
    }

    #[test]
    fn rejects_truncated_input() {
        let grammar = expression_grammar();
        let sets = FirstFollow::compute(&grammar);
        let parser = LL1Parser::new(&grammar, &sets);

        let mut sink = MemorySink::new();
        let result = parser.parse(&["id", "+"], &mut sink);
        assert!(matches!(result, Err(ParseError::NoRule { .. })));
    }

    #[test]
    fn rejects_mismatched_terminal() {
        let grammar = expression_grammar();
        let sets = FirstFollow::compute(&grammar);
        let parser = LL1Parser::new(&grammar, &sets);

        let mut sink = MemorySink::new();
        let result = parser.parse(&["(", "id", "+", "id"], &mut sink);
        assert!(matches!(result, Err(ParseError::UnexpectedTerminal { .. })));
    }

    #[test]
    fn left_recursive_grammar_keeps_all_offenders() {
        let grammar = Grammar::from_lines(vec![
            "E -> E + T | T",
            "T -> T * F | F",
            "F -> ( E ) | id",
        ])
        .unwrap();
        let sets = FirstFollow::compute(&grammar);
        let table = LL1Table::build(&grammar, &sets);

        assert!(!table.is_ll1());
        let e = grammar.symbols().lookup("E").unwrap();
        let id = grammar.symbols().lookup("id").unwrap();
        let lparen = grammar.symbols().lookup("(").unwrap();
        assert_eq!(table.entries(e, id).len(), 2);
        assert_eq!(table.entries(e, lparen).len(), 2);
    }

    #[test]
    fn ambiguous_cell_fails_the_parse() {
        let grammar = Grammar::from_lines(vec!["E -> E + T | T", "T -> id"]).unwrap();
        let sets = FirstFollow::compute(&grammar);
        let parser = LL1Parser::new(&grammar, &sets);

        let mut sink = MemorySink::new();
        let result = parser.parse(&["id"], &mut sink);
        assert!(matches!(result, Err(ParseError::AmbiguousRule { .. })));
    }

    #[test]
    fn empty_input_accepted_when_start_is_nullable() {
        let grammar =
            Grammar::from_lines(vec!["S -> A B", "A -> a | ε", "B -> b | ε"]).unwrap();
        let sets = FirstFollow::compute(&grammar);
        let parser = LL1Parser::new(&grammar, &sets);

        let mut sink = MemorySink::new();
        assert!(parser.parse(&[], &mut sink).is_ok());
    }
}

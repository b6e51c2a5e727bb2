//! Conflict detection over built parsing tables.
//!
//! Detection is pure inspection: tables are built with every colliding entry
//! preserved, and the detector classifies multi-entry cells after the fact.
//! Running it twice on the same tables yields the same list in the same
//! order.

use crate::grammar::Grammar;
use crate::ll1::LL1Table;
use crate::slr1::{Action, SLR1Parser};
use std::fmt;

/// Classification of a conflicted table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// An LL(1) cell holding more than one alternative.
    Ll1MultipleEntries,
    /// Two shift targets for one symbol. Structurally impossible in a
    /// correct LR(0) automaton; reported only if the generator misbehaved.
    ShiftShift,
    /// A shift competing with at least one reduce.
    ShiftReduce,
    /// Two or more reduces, no shift.
    ReduceReduce,
    /// Anything else with more than one entry.
    MultipleActions,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConflictKind::Ll1MultipleEntries => "LL(1) multiple entries",
            ConflictKind::ShiftShift => "Shift/Shift conflict",
            ConflictKind::ShiftReduce => "Shift/Reduce conflict",
            ConflictKind::ReduceReduce => "Reduce/Reduce conflict",
            ConflictKind::MultipleActions => "Multiple actions",
        };
        f.write_str(label)
    }
}

/// Where a conflict lives: an LL(1) cell or an ACTION cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictSite {
    Cell { nonterminal: String, terminal: String },
    State { state: usize, symbol: String },
}

impl fmt::Display for ConflictSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictSite::Cell {
                nonterminal,
                terminal,
            } => write!(f, "({nonterminal}, {terminal})"),
            ConflictSite::State { state, symbol } => write!(f, "(State {state}, {symbol})"),
        }
    }
}

/// One detected conflict with every colliding entry preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub site: ConflictSite,
    pub offenders: Vec<String>,
}

/// Finds every LL(1) cell with more than one alternative, sorted by
/// `(nonterminal, terminal)`.
pub fn detect_ll1(grammar: &Grammar, table: &LL1Table) -> Vec<Conflict> {
    let symbols = grammar.symbols();
    let mut conflicts: Vec<Conflict> = table
        .cells()
        .filter(|(_, entries)| entries.len() > 1)
        .map(|(&(nt, t), entries)| Conflict {
            kind: ConflictKind::Ll1MultipleEntries,
            site: ConflictSite::Cell {
                nonterminal: symbols.name(nt).to_string(),
                terminal: symbols.name(t).to_string(),
            },
            offenders: entries
                .iter()
                .map(|alt| symbols.render_sequence(alt))
                .collect(),
        })
        .collect();

    conflicts.sort_by(|a, b| site_key(&a.site).cmp(&site_key(&b.site)));
    conflicts
}

/// Classifies every multi-entry ACTION cell, sorted by `(state, symbol)`.
///
/// Classification counts the structured actions directly rather than
/// pattern-matching their serialized text.
pub fn detect_lr(grammar: &Grammar, parser: &SLR1Parser) -> Vec<Conflict> {
    let symbols = grammar.symbols();
    let mut conflicts: Vec<Conflict> = parser
        .action_table()
        .iter()
        .filter(|(_, cell)| cell.len() > 1)
        .map(|(&(state, sym), cell)| {
            let shifts = cell.iter().filter(|a| matches!(a, Action::Shift(_))).count();
            let reduces = cell
                .iter()
                .filter(|a| matches!(a, Action::Reduce { .. }))
                .count();

            let kind = if shifts >= 1 && reduces >= 1 {
                ConflictKind::ShiftReduce
            } else if shifts >= 2 {
                ConflictKind::ShiftShift
            } else if reduces >= 2 {
                ConflictKind::ReduceReduce
            } else {
                ConflictKind::MultipleActions
            };

            Conflict {
                kind,
                site: ConflictSite::State {
                    state,
                    symbol: symbols.name(sym).to_string(),
                },
                offenders: cell.iter().map(|a| a.to_wire(symbols)).collect(),
            }
        })
        .collect();

    conflicts.sort_by(|a, b| site_key(&a.site).cmp(&site_key(&b.site)));
    conflicts
}

fn site_key(site: &ConflictSite) -> (usize, String, String) {
    match site {
        ConflictSite::Cell {
            nonterminal,
            terminal,
        } => (0, nonterminal.clone(), terminal.clone()),
        ConflictSite::State { state, symbol } => (*state, symbol.clone(), String::new()),
    }
}

/// Renders conflicts as a type/location/details table with a total count.
pub fn render_conflicts(conflicts: &[Conflict]) -> String {
    if conflicts.is_empty() {
        return "No conflicts detected.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("Conflicts detected:\n");
    out.push_str(&format!(
        "{:<30}{:<25}{}\n",
        "Type", "Location", "Details"
    ));
    out.push_str(&format!("{}\n", "-".repeat(80)));

    for conflict in conflicts {
        out.push_str(&format!(
            "{:<30}{:<25}{}\n",
            conflict.kind.to_string(),
            conflict.site.to_string(),
            conflict.offenders.first().map(String::as_str).unwrap_or("")
        ));
        for extra in conflict.offenders.iter().skip(1) {
            out.push_str(&format!("{:<55}{extra}\n", ""));
        }
    }

    out.push_str(&format!("{}\n", "-".repeat(80)));
    out.push_str(&format!("Total conflicts: {}\n", conflicts.len()));
    out
}

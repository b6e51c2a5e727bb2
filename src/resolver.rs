//! Resolution hints for detected conflicts.
//!
//! The resolver explains conflicts and suggests grammar changes; it never
//! rewrites the grammar itself.

use crate::conflict::{Conflict, ConflictKind};

/// Produces a human-readable explanation and suggestion for one conflict.
pub fn explain(conflict: &Conflict) -> String {
    let hint = match conflict.kind {
        ConflictKind::Ll1MultipleEntries => {
            "the listed alternatives share a lookahead token; left-factor \
             their common prefix, or eliminate left recursion, so one token \
             selects exactly one alternative"
        }
        ConflictKind::ShiftReduce => {
            "a completed rule competes with shifting the same token (the \
             dangling-else shape); either restructure the grammar to separate \
             the two readings, or accept the conventional shift preference"
        }
        ConflictKind::ReduceReduce => {
            "two rules complete in the same state on the same lookahead; \
             merge the overlapping rules or distinguish them with more \
             context than SLR(1) FOLLOW sets provide"
        }
        ConflictKind::ShiftShift => {
            "two shift targets exist for one symbol; the automaton that \
             produced this table is inconsistent"
        }
        ConflictKind::MultipleActions => {
            "the cell mixes actions in an unexpected way; inspect the listed \
             entries"
        }
    };
    format!("{} at {}: {hint}", conflict.kind, conflict.site)
}

/// Renders one numbered resolution hint per conflict.
pub fn render_resolutions(conflicts: &[Conflict]) -> String {
    if conflicts.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("Resolution hints:\n");
    for (i, conflict) in conflicts.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, explain(conflict)));
    }
    out
}

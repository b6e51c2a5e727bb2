//! FIRST, FOLLOW and nullability computation.
//!
//! The three maps are solved as a joint monotone fixed point: FIRST and
//! NULLABLE grow together until saturation, then FOLLOW runs as a second
//! fixed point that reads the final FIRST. Every iteration strictly grows at
//! least one set and all sets are bounded by the symbol populations, so both
//! loops terminate.

use crate::grammar::Grammar;
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static EMPTY: LazyLock<HashSet<Symbol>> = LazyLock::new(HashSet::new);

/// The computed FIRST/FOLLOW/NULLABLE maps, frozen after [`compute`].
///
/// [`compute`]: FirstFollow::compute
#[derive(Debug, Clone)]
pub struct FirstFollow {
    first: HashMap<Symbol, HashSet<Symbol>>,
    follow: HashMap<Symbol, HashSet<Symbol>>,
    nullable: HashSet<Symbol>,
}

impl FirstFollow {
    /// Computes all three maps for a grammar. Pure and deterministic.
    pub fn compute(grammar: &Grammar) -> Self {
        let mut sets = Self {
            first: HashMap::new(),
            follow: HashMap::new(),
            nullable: HashSet::new(),
        };
        sets.compute_first(grammar);
        sets.compute_follow(grammar);
        sets
    }

    /// FIRST of a single symbol. Terminals map to themselves, `ε` to `{ε}`.
    pub fn first(&self, sym: Symbol) -> &HashSet<Symbol> {
        self.first.get(&sym).unwrap_or(&EMPTY)
    }

    /// FOLLOW of a nonterminal. Never contains `ε`; never defined for
    /// terminals.
    pub fn follow(&self, sym: Symbol) -> &HashSet<Symbol> {
        self.follow.get(&sym).unwrap_or(&EMPTY)
    }

    /// Whether a symbol can derive the empty string.
    pub fn is_nullable(&self, sym: Symbol) -> bool {
        self.nullable.contains(&sym)
    }

    /// FIRST of a symbol sequence: the union of `FIRST(Xᵢ) \ {ε}` over the
    /// longest nullable prefix, plus `ε` iff every symbol is nullable. The
    /// empty sequence yields `{ε}`.
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> HashSet<Symbol> {
        let mut result = HashSet::new();
        let mut all_nullable = true;

        for &sym in symbols {
            for &f in self.first(sym) {
                if !f.is_epsilon() {
                    result.insert(f);
                }
            }
            if !self.is_nullable(sym) {
                all_nullable = false;
                break;
            }
        }

        if all_nullable {
            result.insert(Symbol::EPSILON);
        }
        result
    }

    /// FIRST and NULLABLE, iterated together to saturation.
    fn compute_first(&mut self, grammar: &Grammar) {
        for &t in grammar.terminals() {
            self.first.insert(t, HashSet::from([t]));
        }
        self.first
            .insert(Symbol::EPSILON, HashSet::from([Symbol::EPSILON]));
        self.nullable.insert(Symbol::EPSILON);

        for &nt in grammar.nonterminals() {
            self.first.insert(nt, HashSet::new());
        }

        let mut changed = true;
        while changed {
            changed = false;

            for (lhs, rhs) in grammar.rules() {
                // Walk left to right, stopping at the first non-nullable
                // symbol; the empty RHS is vacuously nullable.
                let mut additions: Vec<Symbol> = Vec::new();
                let mut all_nullable = true;
                for &sym in rhs {
                    additions.extend(self.first(sym).iter().filter(|f| !f.is_epsilon()));
                    if !self.is_nullable(sym) {
                        all_nullable = false;
                        break;
                    }
                }

                let entry = self.first.entry(lhs).or_default();
                for f in additions {
                    changed |= entry.insert(f);
                }
                if all_nullable {
                    changed |= entry.insert(Symbol::EPSILON);
                    changed |= self.nullable.insert(lhs);
                }
            }
        }
    }

    /// FOLLOW as a second fixed point over the final FIRST.
    fn compute_follow(&mut self, grammar: &Grammar) {
        for &nt in grammar.nonterminals() {
            self.follow.insert(nt, HashSet::new());
        }
        self.follow
            .entry(grammar.start_symbol())
            .or_default()
            .insert(Symbol::END_MARKER);

        let mut changed = true;
        while changed {
            changed = false;

            for (lhs, rhs) in grammar.rules() {
                for (i, &sym) in rhs.iter().enumerate() {
                    if !grammar.is_nonterminal(sym) {
                        continue;
                    }

                    let beta = &rhs[i + 1..];
                    let first_beta = self.first_of_sequence(beta);

                    let mut additions: Vec<Symbol> = first_beta
                        .iter()
                        .filter(|f| !f.is_epsilon())
                        .copied()
                        .collect();
                    if beta.is_empty() || first_beta.contains(&Symbol::EPSILON) {
                        additions.extend(self.follow(lhs).iter().copied());
                    }

                    let entry = self.follow.entry(sym).or_default();
                    for f in additions {
                        changed |= entry.insert(f);
                    }
                }
            }
        }
    }

    /// Renders the sets in sorted order, one `FIRST(X) = { … }` line per
    /// symbol with FOLLOW and nullability alongside.
    pub fn render(&self, grammar: &Grammar) -> String {
        let table = grammar.symbols();
        let mut nts: Vec<Symbol> = grammar.nonterminals().iter().copied().collect();
        nts.sort_by_key(|&s| table.name(s));

        let render_set = |set: &HashSet<Symbol>| {
            let mut names: Vec<&str> = set.iter().map(|&s| table.name(s)).collect();
            names.sort_unstable();
            format!("{{ {} }}", names.join(", "))
        };

        let mut out = String::new();
        out.push_str("===== FIRST & FOLLOW =====\n");
        for &nt in &nts {
            out.push_str(&format!(
                "FIRST({}) = {}\n",
                table.name(nt),
                render_set(self.first(nt))
            ));
        }
        out.push('\n');
        for &nt in &nts {
            out.push_str(&format!(
                "FOLLOW({}) = {}\n",
                table.name(nt),
                render_set(self.follow(nt))
            ));
        }

        let mut nullable: Vec<&str> = nts
            .iter()
            .filter(|&&nt| self.is_nullable(nt))
            .map(|&nt| table.name(nt))
            .collect();
        nullable.sort_unstable();
        out.push_str(&format!("\nNullable: {{ {} }}\n", nullable.join(", ")));
        out.push_str("==========================\n");
        out
    }
}

//! LR(0) canonical collection with SLR(1) reduce placement, and the
//! shift-reduce recognizer driven by the resulting ACTION/GOTO tables.
//!
//! The generator augments the grammar with a minted fresh start symbol,
//! saturates CLOSURE/GOTO over item sets, and numbers states by breadth-first
//! discovery. Table cells keep every colliding action; conflicted grammars
//! still get tables and the detector classifies them afterwards.

use crate::error::ParseError;
use crate::first_follow::FirstFollow;
use crate::grammar::{Grammar, InputToken};
use crate::symbol::{END_MARKER_STR, Symbol, SymbolTable};
use crate::trace::TraceSink;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// An LR(0) item: a rule with a dot position.
///
/// The empty alternative is normalized to an empty RHS, so `A → ·` is the
/// complete item for `A → ε`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Item {
    lhs: Symbol,
    rhs: Vec<Symbol>,
    dot: usize,
}

impl Item {
    fn new(lhs: Symbol, rhs: Vec<Symbol>, dot: usize) -> Self {
        Self { lhs, rhs, dot }
    }

    /// The symbol immediately after the dot, if any.
    fn next_symbol(&self) -> Option<Symbol> {
        self.rhs.get(self.dot).copied()
    }

    /// Dot at the end: a reduce (or accept) item.
    fn is_complete(&self) -> bool {
        self.dot >= self.rhs.len()
    }

    fn advanced(&self) -> Self {
        Self::new(self.lhs, self.rhs.clone(), self.dot + 1)
    }
}

/// A state of the automaton. Item-set equality is state identity; the
/// ordered set also fixes iteration order, keeping table cells and state
/// numbering reproducible.
type ItemSet = BTreeSet<Item>;

/// A parse action. Reduce carries the full rule; serialization to the wire
/// form (`s4`, `rA->α `, `acc`) happens only at the display boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce { lhs: Symbol, rhs: Vec<Symbol> },
    Accept,
}

impl Action {
    /// Wire form: `"s" + state`, `"r" + A + "->" + γ` with the RHS
    /// space-joined (`ε` for the empty RHS) and a trailing space, or `acc`.
    pub fn to_wire(&self, symbols: &SymbolTable) -> String {
        match self {
            Action::Shift(state) => format!("s{state}"),
            Action::Reduce { lhs, rhs } => {
                format!("r{}->{} ", symbols.name(*lhs), symbols.render_sequence(rhs))
            }
            Action::Accept => "acc".to_string(),
        }
    }
}

/// SLR(1) parser: canonical LR(0) collection plus FOLLOW-guarded reduces.
#[derive(Debug)]
pub struct SLR1Parser<'g> {
    grammar: &'g Grammar,
    augmented_start_name: String,
    augmented_start: Symbol,
    states: Vec<ItemSet>,
    action: HashMap<(usize, Symbol), Vec<Action>>,
    goto_table: HashMap<(usize, Symbol), usize>,
}

impl<'g> SLR1Parser<'g> {
    /// Builds the automaton and both tables.
    ///
    /// The augmented grammar copy lives only inside this constructor; the
    /// minted `S'` never appears on any right-hand side.
    pub fn new(grammar: &'g Grammar, sets: &FirstFollow) -> Self {
        let (augmented, augmented_start) = grammar.augment();

        let kernel = Item::new(augmented_start, vec![grammar.start_symbol()], 0);
        let (states, transitions) = build_collection(&augmented, kernel);

        let mut action: HashMap<(usize, Symbol), Vec<Action>> = HashMap::new();
        let mut goto_table: HashMap<(usize, Symbol), usize> = HashMap::new();

        // Shift and GOTO entries come straight from the transition function.
        for (&(state, sym), &target) in &transitions {
            if grammar.is_nonterminal(sym) {
                goto_table.insert((state, sym), target);
            } else {
                action.entry((state, sym)).or_default().push(Action::Shift(target));
            }
        }

        // SLR reduce placement: a complete item A → γ· reduces on FOLLOW(A).
        for (state_id, state) in states.iter().enumerate() {
            for item in state {
                if !item.is_complete() || item.lhs == augmented_start {
                    continue;
                }
                let mut lookaheads: Vec<Symbol> = sets.follow(item.lhs).iter().copied().collect();
                lookaheads.sort_by_key(|&s| grammar.symbols().name(s));
                for t in lookaheads {
                    action.entry((state_id, t)).or_default().push(Action::Reduce {
                        lhs: item.lhs,
                        rhs: item.rhs.clone(),
                    });
                }
            }
        }

        // Accept is a pure assignment on $ in the state holding S' → S·;
        // it is never combined with other actions.
        let accept_item = Item::new(augmented_start, vec![grammar.start_symbol()], 1);
        for (state_id, state) in states.iter().enumerate() {
            if state.contains(&accept_item) {
                action.insert((state_id, Symbol::END_MARKER), vec![Action::Accept]);
            }
        }

        let augmented_start_name = augmented.symbols().name(augmented_start).to_string();

        Self {
            grammar,
            augmented_start_name,
            augmented_start,
            states,
            action,
            goto_table,
        }
    }

    /// Number of states in the canonical collection.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The ACTION table with all colliding entries preserved.
    pub fn action_table(&self) -> &HashMap<(usize, Symbol), Vec<Action>> {
        &self.action
    }

    /// The GOTO table (partial; only defined transitions appear).
    pub fn goto_table(&self) -> &HashMap<(usize, Symbol), usize> {
        &self.goto_table
    }

    /// Simulates the shift-reduce parse of a token stream.
    ///
    /// Dual stacks: states (seeded with 0) and symbols (empty). The input
    /// gets `$` appended. Every step emits one trace row.
    pub fn parse(&self, tokens: &[&str], trace: &mut dyn TraceSink) -> Result<(), ParseError> {
        let table = self.grammar.symbols();
        let mut input = self.grammar.resolve_tokens(tokens);
        input.push(InputToken {
            text: END_MARKER_STR.to_string(),
            symbol: Some(Symbol::END_MARKER),
        });

        let mut state_stack: Vec<usize> = vec![0];
        let mut symbol_stack: Vec<Symbol> = Vec::new();
        let mut pos = 0;

        loop {
            // State 0 is never popped, so the state stack is never empty.
            let state = *state_stack.last().unwrap();
            let lookahead = &input[pos];
            let row = |action: &str| {
                format!(
                    "{:<32}{:<32}{}",
                    render_stacks(self.grammar, &state_stack, &symbol_stack),
                    render_input(&input, pos),
                    action
                )
            };

            let cell: &[Action] = match lookahead.symbol {
                Some(sym) => self
                    .action
                    .get(&(state, sym))
                    .map(Vec::as_slice)
                    .unwrap_or(&[]),
                None => &[],
            };

            match cell {
                [] => {
                    let err = ParseError::NoAction {
                        state,
                        token: lookahead.text.clone(),
                    };
                    trace.write(&row(&format!("error: {err}")));
                    return Err(err);
                }
                [Action::Shift(target)] => {
                    trace.write(&row(&format!("shift {target}")));
                    if let Some(sym) = lookahead.symbol {
                        symbol_stack.push(sym);
                    }
                    state_stack.push(*target);
                    pos += 1;
                }
                [Action::Reduce { lhs, rhs }] => {
                    trace.write(&row(&format!(
                        "reduce {} -> {}",
                        table.name(*lhs),
                        table.render_sequence(rhs)
                    )));
                    for _ in 0..rhs.len() {
                        state_stack.pop();
                        symbol_stack.pop();
                    }
                    // State 0 is never popped: a reduce pops exactly the
                    // viable prefix on top of it.
                    let under = state_stack.last().copied().unwrap_or(0);
                    match self.goto_table.get(&(under, *lhs)) {
                        Some(&next) => {
                            symbol_stack.push(*lhs);
                            state_stack.push(next);
                        }
                        None => {
                            let err = ParseError::MissingGoto {
                                state: under,
                                nonterminal: table.name(*lhs).to_string(),
                            };
                            trace.write(&format!("error: {err}"));
                            return Err(err);
                        }
                    }
                }
                [Action::Accept] => {
                    trace.write(&row("accept"));
                    return Ok(());
                }
                _ => {
                    let entries = cell
                        .iter()
                        .map(|a| a.to_wire(table))
                        .collect::<Vec<_>>()
                        .join("|");
                    let err = ParseError::AmbiguousAction {
                        state,
                        token: lookahead.text.clone(),
                        entries,
                    };
                    trace.write(&row(&format!("error: {err}")));
                    return Err(err);
                }
            }
        }
    }

    fn symbol_name(&self, sym: Symbol) -> &str {
        if sym == self.augmented_start {
            &self.augmented_start_name
        } else {
            self.grammar.symbols().name(sym)
        }
    }

    fn render_item(&self, item: &Item) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(item.rhs.len() + 1);
        for (i, &sym) in item.rhs.iter().enumerate() {
            if i == item.dot {
                parts.push("·");
            }
            parts.push(self.symbol_name(sym));
        }
        if item.is_complete() {
            parts.push("·");
        }
        format!("{} -> {}", self.symbol_name(item.lhs), parts.join(" "))
    }

    /// Renders the canonical collection, one state per block.
    pub fn render_states(&self) -> String {
        let mut out = String::new();
        out.push_str("=== LR(0) Canonical Collection ===\n");
        for (id, state) in self.states.iter().enumerate() {
            out.push_str(&format!("State {id}:\n"));
            for item in state {
                out.push_str(&format!("  {}\n", self.render_item(item)));
            }
        }
        out.push_str("==================================\n");
        out
    }

    /// Renders the ACTION table as sorted `(state, terminal) => entry` lines,
    /// with colliding entries `|`-joined in wire form.
    pub fn render_action_table(&self) -> String {
        let table = self.grammar.symbols();
        let mut keys: Vec<&(usize, Symbol)> = self.action.keys().collect();
        keys.sort_by_key(|&&(state, sym)| (state, table.name(sym)));

        let mut out = String::new();
        out.push_str("=== SLR(1) ACTION Table ===\n");
        for &&(state, sym) in &keys {
            let cell = &self.action[&(state, sym)];
            let joined = cell
                .iter()
                .map(|a| a.to_wire(table))
                .collect::<Vec<_>>()
                .join("|");
            out.push_str(&format!("({state}, {}) => {joined}\n", table.name(sym)));
        }
        out.push_str("===========================\n");
        out
    }

    /// Renders the GOTO table as sorted `(state, nonterminal) => state` lines.
    pub fn render_goto_table(&self) -> String {
        let table = self.grammar.symbols();
        let mut keys: Vec<&(usize, Symbol)> = self.goto_table.keys().collect();
        keys.sort_by_key(|&&(state, sym)| (state, table.name(sym)));

        let mut out = String::new();
        out.push_str("=== SLR(1) GOTO Table ===\n");
        for &&(state, sym) in &keys {
            out.push_str(&format!(
                "({state}, {}) => {}\n",
                table.name(sym),
                self.goto_table[&(state, sym)]
            ));
        }
        out.push_str("=========================\n");
        out
    }
}

/// Strips `ε` markers so the empty alternative becomes the empty sequence.
fn normalize(alt: &[Symbol]) -> Vec<Symbol> {
    alt.iter().copied().filter(|s| !s.is_epsilon()).collect()
}

/// CLOSURE(I): saturate with `B → ·γ` for every nonterminal B after a dot.
fn closure(grammar: &Grammar, mut items: ItemSet) -> ItemSet {
    let mut changed = true;
    while changed {
        changed = false;
        let snapshot: Vec<Item> = items.iter().cloned().collect();
        for item in snapshot {
            let Some(sym) = item.next_symbol() else {
                continue;
            };
            if !grammar.is_nonterminal(sym) {
                continue;
            }
            for alt in grammar.alternatives_of(sym) {
                changed |= items.insert(Item::new(sym, normalize(alt), 0));
            }
        }
    }
    items
}

/// GOTO(I, X): advance every item with X after the dot, then close.
fn goto_set(grammar: &Grammar, items: &ItemSet, sym: Symbol) -> ItemSet {
    let moved: ItemSet = items
        .iter()
        .filter(|item| item.next_symbol() == Some(sym))
        .map(Item::advanced)
        .collect();
    if moved.is_empty() {
        return moved;
    }
    closure(grammar, moved)
}

/// Breadth-first construction of the canonical collection. State identity is
/// item-set equality; ids are assigned in discovery order.
fn build_collection(
    grammar: &Grammar,
    kernel: Item,
) -> (Vec<ItemSet>, HashMap<(usize, Symbol), usize>) {
    let initial = closure(grammar, ItemSet::from([kernel]));
    let mut states = vec![initial];
    let mut transitions: HashMap<(usize, Symbol), usize> = HashMap::new();
    let mut worklist: VecDeque<usize> = VecDeque::from([0]);

    while let Some(state_id) = worklist.pop_front() {
        let state = states[state_id].clone();

        let mut fanout: BTreeSet<Symbol> = BTreeSet::new();
        for item in &state {
            if let Some(sym) = item.next_symbol() {
                fanout.insert(sym);
            }
        }

        for sym in fanout {
            let next = goto_set(grammar, &state, sym);
            if next.is_empty() {
                continue;
            }
            let target = match states.iter().position(|s| *s == next) {
                Some(existing) => existing,
                None => {
                    states.push(next);
                    worklist.push_back(states.len() - 1);
                    states.len() - 1
                }
            };
            transitions.insert((state_id, sym), target);
        }
    }

    (states, transitions)
}

fn render_stacks(grammar: &Grammar, state_stack: &[usize], symbol_stack: &[Symbol]) -> String {
    // Interleaved states and symbols, the classic shift-reduce trace column.
    let mut out = String::new();
    for (i, state) in state_stack.iter().enumerate() {
        if i > 0 {
            if let Some(&sym) = symbol_stack.get(i - 1) {
                out.push_str(grammar.symbols().name(sym));
                out.push(' ');
            }
        }
        out.push_str(&state.to_string());
        out.push(' ');
    }
    out.trim_end().to_string()
}

fn render_input(input: &[InputToken], pos: usize) -> String {
    input[pos..]
        .iter()
        .map(|tok| tok.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

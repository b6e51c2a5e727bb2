//! Unit tests for symbol interning.

use cfg_analyzer::symbol::{END_MARKER_STR, EPSILON_STR, Symbol, SymbolTable};

#[test]
fn test_sentinels_exist_in_fresh_table() {
    let table = SymbolTable::new();
    assert_eq!(table.lookup(EPSILON_STR), Some(Symbol::EPSILON));
    assert_eq!(table.lookup(END_MARKER_STR), Some(Symbol::END_MARKER));
    assert_eq!(table.name(Symbol::EPSILON), EPSILON_STR);
    assert_eq!(table.name(Symbol::END_MARKER), END_MARKER_STR);
}

#[test]
fn test_interning_round_trips_names() {
    let mut table = SymbolTable::new();
    for name in ["E", "E'", "+", "id", "("] {
        let sym = table.intern(name);
        assert_eq!(table.name(sym), name);
        assert_eq!(table.lookup(name), Some(sym));
    }
    assert_eq!(table.len(), 2 + 5);
}

#[test]
fn test_unknown_symbols_do_not_resolve() {
    let table = SymbolTable::new();
    assert_eq!(table.lookup("nope"), None);
    assert!(!table.is_empty());
}

#[test]
fn test_fresh_symbol_disjoint_from_existing() {
    let mut table = SymbolTable::new();
    table.intern("S");
    let fresh = table.fresh("S");
    assert_eq!(table.name(fresh), "S'");

    // Even a grammar that already uses primed names gets a new symbol.
    let fresher = table.fresh("S");
    assert_eq!(table.name(fresher), "S''");
    assert_ne!(fresh, fresher);
}

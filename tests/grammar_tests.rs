//! Unit tests for grammar loading and the derived symbol populations.

use cfg_analyzer::error::GrammarError;
use cfg_analyzer::grammar::Grammar;
use std::fs;

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join("cfg_analyzer_grammar_test.bnf");
    fs::write(
        &path,
        "# toy grammar\nS -> a S b | ε\n",
    )
    .unwrap();

    let grammar = Grammar::from_file(&path).unwrap();
    assert_eq!(grammar.symbols().name(grammar.start_symbol()), "S");
    assert_eq!(grammar.alternatives_of(grammar.start_symbol()).len(), 2);
    let _ = fs::remove_file(&path);
}

#[test]
fn test_missing_file_is_fatal() {
    let result = Grammar::from_file("/definitely/not/a/grammar.bnf");
    assert!(matches!(result, Err(GrammarError::FileUnreadable { .. })));
}

#[test]
fn test_undefined_rhs_symbols_become_terminals() {
    // `X` never appears as a LHS, so it is silently classified terminal.
    let grammar = Grammar::from_lines(vec!["S -> X a"]).unwrap();
    let x = grammar.symbols().lookup("X").unwrap();
    assert!(grammar.is_terminal(x));
    assert!(!grammar.is_nonterminal(x));
}

#[test]
fn test_epsilon_is_neither_terminal_nor_nonterminal() {
    let grammar = Grammar::from_lines(vec!["S -> a | ε"]).unwrap();
    assert!(!grammar.is_terminal(cfg_analyzer::Symbol::EPSILON));
    assert!(!grammar.is_nonterminal(cfg_analyzer::Symbol::EPSILON));
    assert!(!grammar.is_terminal(cfg_analyzer::Symbol::END_MARKER));
}

#[test]
fn test_start_symbol_is_first_lhs() {
    let grammar = Grammar::from_lines(vec!["A -> B", "B -> b"]).unwrap();
    assert_eq!(grammar.symbols().name(grammar.start_symbol()), "A");
}

#[test]
fn test_token_resolution() {
    let grammar = Grammar::from_lines(vec!["S -> a b"]).unwrap();
    let resolved = grammar.resolve_tokens(&["a", "zzz", "b"]);
    assert_eq!(resolved.len(), 3);
    assert!(resolved[0].symbol.is_some());
    assert!(resolved[1].symbol.is_none());
    assert_eq!(resolved[1].text, "zzz");
}

#[test]
fn test_summary_lists_populations() {
    let grammar = Grammar::from_lines(vec!["S -> a S | b"]).unwrap();
    let summary = grammar.render_summary();
    assert!(summary.contains("Start symbol: S"));
    assert!(summary.contains("S -> a S | b"));
    assert!(summary.contains("Nonterminals (1): S"));
    assert!(summary.contains("Terminals (2): a, b"));
}

//! Unit tests for the LR(0)/SLR(1) generator and shift-reduce recognition.

use cfg_analyzer::error::ParseError;
use cfg_analyzer::first_follow::FirstFollow;
use cfg_analyzer::grammar::Grammar;
use cfg_analyzer::slr1::{Action, SLR1Parser};
use cfg_analyzer::symbol::Symbol;
use cfg_analyzer::trace::MemorySink;

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

fn left_recursive_grammar() -> Grammar {
    Grammar::from_lines(vec![
        "E -> E + T | T",
        "T -> T * F | F",
        "F -> ( E ) | id",
    ])
    .unwrap()
}

#[test]
fn test_expression_grammar_state_count() {
    let grammar = expression_grammar();
    let sets = FirstFollow::compute(&grammar);
    let parser = SLR1Parser::new(&grammar, &sets);
    assert!(parser.state_count() >= 12);
}

#[test]
fn test_accept_in_exactly_one_state() {
    for lines in [
        vec!["E -> T E'", "E' -> + T E' | ε", "T -> F T'", "T' -> * F T' | ε", "F -> ( E ) | id"],
        vec!["E -> E + T | T", "T -> T * F | F", "F -> ( E ) | id"],
        vec!["S -> A B", "A -> a | ε", "B -> b | ε"],
    ] {
        let grammar = Grammar::from_lines(lines).unwrap();
        let sets = FirstFollow::compute(&grammar);
        let parser = SLR1Parser::new(&grammar, &sets);

        let accept_cells: Vec<_> = parser
            .action_table()
            .iter()
            .filter(|(_, cell)| cell.contains(&Action::Accept))
            .collect();
        assert_eq!(accept_cells.len(), 1);
        let (&(_, sym), cell) = accept_cells[0];
        assert_eq!(sym, Symbol::END_MARKER);
        assert_eq!(cell.len(), 1);
    }
}

#[test]
fn test_both_grammars_accept_expressions() {
    for grammar in [expression_grammar(), left_recursive_grammar()] {
        let sets = FirstFollow::compute(&grammar);
        let parser = SLR1Parser::new(&grammar, &sets);

        let mut sink = MemorySink::new();
        assert!(parser.parse(&["id", "+", "id", "*", "id"], &mut sink).is_ok());
        assert!(parser
            .parse(&["(", "id", "+", "id", ")", "*", "id"], &mut sink)
            .is_ok());
    }
}

#[test]
fn test_acceptance_requires_full_input_consumption() {
    let grammar = left_recursive_grammar();
    let sets = FirstFollow::compute(&grammar);
    let parser = SLR1Parser::new(&grammar, &sets);

    // A viable prefix followed by garbage must not accept.
    let mut sink = MemorySink::new();
    assert!(parser.parse(&["id", "id"], &mut sink).is_err());
    assert!(parser.parse(&["id", "+"], &mut sink).is_err());
    assert!(!sink.lines().iter().any(|l| l.contains("accept")));
}

#[test]
fn test_reduce_trace_shows_full_rule() {
    let grammar = left_recursive_grammar();
    let sets = FirstFollow::compute(&grammar);
    let parser = SLR1Parser::new(&grammar, &sets);

    let mut sink = MemorySink::new();
    parser.parse(&["id", "+", "id"], &mut sink).unwrap();

    assert!(sink.lines().iter().any(|l| l.contains("reduce F -> id")));
    assert!(sink.lines().iter().any(|l| l.contains("reduce E -> E + T")));
}

#[test]
fn test_epsilon_reduce_pops_nothing() {
    let grammar = Grammar::from_lines(vec!["S -> A B", "A -> a | ε", "B -> b | ε"]).unwrap();
    let sets = FirstFollow::compute(&grammar);
    let parser = SLR1Parser::new(&grammar, &sets);

    let mut sink = MemorySink::new();
    assert!(parser.parse(&[], &mut sink).is_ok());
    assert!(sink.lines().iter().any(|l| l.contains("reduce A -> ε")));
    assert!(sink.lines().iter().any(|l| l.contains("reduce B -> ε")));
}

#[test]
fn test_failure_reports_state_and_token() {
    let grammar = left_recursive_grammar();
    let sets = FirstFollow::compute(&grammar);
    let parser = SLR1Parser::new(&grammar, &sets);

    let mut sink = MemorySink::new();
    match parser.parse(&["+"], &mut sink) {
        Err(ParseError::NoAction { state, token }) => {
            assert_eq!(state, 0);
            assert_eq!(token, "+");
        }
        other => panic!("expected NoAction, got {other:?}"),
    }
}

#[test]
fn test_dangling_else_still_parses_with_single_action_path() {
    // The grammar has one shift/reduce conflict on `e`, but inputs that
    // never reach the conflicted cell still parse.
    let grammar =
        Grammar::from_lines(vec!["S -> i E t S | i E t S e S | a", "E -> b"]).unwrap();
    let sets = FirstFollow::compute(&grammar);
    let parser = SLR1Parser::new(&grammar, &sets);

    let mut sink = MemorySink::new();
    assert!(parser.parse(&["a"], &mut sink).is_ok());
    assert!(parser.parse(&["i", "b", "t", "a"], &mut sink).is_ok());

    // Reaching the conflicted cell aborts with an ambiguity diagnostic.
    let result = parser.parse(&["i", "b", "t", "a", "e", "a"], &mut sink);
    assert!(matches!(result, Err(ParseError::AmbiguousAction { .. })));
}

#[test]
fn test_rendered_tables_use_wire_format() {
    let grammar = left_recursive_grammar();
    let sets = FirstFollow::compute(&grammar);
    let parser = SLR1Parser::new(&grammar, &sets);

    let actions = parser.render_action_table();
    assert!(actions.contains("=> s"));
    assert!(actions.contains("rF->id "));

    let gotos = parser.render_goto_table();
    assert!(gotos.contains("(0, E) => "));
    let e = grammar.symbols().lookup("E").unwrap();
    assert!(parser.goto_table().contains_key(&(0, e)));

    let states = parser.render_states();
    assert!(states.contains("State 0:"));
    assert!(states.contains("E' -> · E"));
}

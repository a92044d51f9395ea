//! Property-based tests for the automata and the lexer
//!
//! These tests use proptest to generate random expressions and sources and
//! check properties that must hold for every input.

#![cfg(test)]

use earlex::automaton::{Automaton, Nfa};
use earlex::compile::{LexisBuilder, MachineStack};
use earlex::lexer::TokenDefinition;
use earlex::regex::to_postfix;
use proptest::prelude::*;

/// Well-formed expressions over `a`, `b` and `c`
fn expression() -> impl Strategy<Value = String> {
    let leaf = prop::sample::select(vec!["a", "b", "c", "[ab]", "[a-c]"]).prop_map(String::from);
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("{l}{r}")),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l}|{r})")),
            inner.clone().prop_map(|r| format!("({r})*")),
            inner.clone().prop_map(|r| format!("({r})+")),
            inner.prop_map(|r| format!("({r})?")),
        ]
    })
}

fn compile(regex: &str) -> Nfa {
    let mut stack = MachineStack::new();
    stack
        .add_expression("expression", regex)
        .expect("generated expressions are well formed");
    stack.build()
}

#[derive(Debug, Clone)]
enum Piece {
    Word(String),
    Number(String),
}

fn pieces() -> impl Strategy<Value = Vec<(Piece, &'static str)>> {
    let piece = prop_oneof![
        "[a-z]{1,6}".prop_map(Piece::Word),
        "[0-9]{1,4}".prop_map(Piece::Number),
    ];
    let separator = prop::sample::select(vec![" ", "  ", "\n", " \n\t"]);
    prop::collection::vec((piece, separator), 0..16)
}

proptest! {
    #[test]
    fn prop_nfa_and_dfa_agree(regex in expression(), inputs in prop::collection::vec("[abcd]{0,8}", 1..8)) {
        let nfa = compile(&regex);
        let dfa = nfa.to_dfa();
        for input in &inputs {
            prop_assert_eq!(nfa.accepts(input), dfa.accepts(input), "regex {:?}, input {:?}", regex, input);
        }
    }

    #[test]
    fn prop_closures_stay_closed(regex in expression()) {
        let mut nfa = compile(&regex);
        prop_assert!(!nfa.close_epsilon());
    }

    #[test]
    fn prop_lexer_reproduces_source(pieces in pieces()) {
        let source: String = pieces
            .iter()
            .map(|(piece, separator)| match piece {
                Piece::Word(text) | Piece::Number(text) => format!("{text}{separator}"),
            })
            .collect();

        let lexis = LexisBuilder::new()
            .token("word", "[a-z]+")
            .token("number", "[0-9]+")
            .definition(TokenDefinition::new("whitespace", "[\\s\\t\\n]+").omitted())
            .build()
            .unwrap();
        let mut lexer = lexis.lexer();
        lexer.set_source(source.as_str());
        let tokens = lexer.tokenize().unwrap();

        let rebuilt: String = tokens.iter().map(|t| t.value.as_str()).collect();
        prop_assert_eq!(rebuilt, source);

        let required: Vec<&str> = tokens
            .iter()
            .filter(|t| t.required)
            .map(|t| t.token_type.as_str())
            .collect();
        let expected: Vec<&str> = pieces
            .iter()
            .map(|(piece, _)| match piece {
                Piece::Word(_) => "word",
                Piece::Number(_) => "number",
            })
            .collect();
        prop_assert_eq!(required, expected);
    }

    #[test]
    fn prop_postfix_never_panics(regex in "\\PC{0,24}") {
        let _ = to_postfix(&regex);
        let mut stack = MachineStack::new();
        let _ = stack.add_expression("any", &regex);
    }
}

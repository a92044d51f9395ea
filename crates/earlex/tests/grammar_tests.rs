//! Tests for grammar construction and validation

use earlex::compile::LexisBuilder;
use earlex::error::GrammarError;
use earlex::grammar::{DottedRule, GrammarBuilder, GrammarDefinition, RuleDefinition, Symbol};

fn statements() -> GrammarDefinition {
    GrammarDefinition {
        start: "Program".into(),
        rules: vec![
            RuleDefinition::new("Program", ["Statements"]),
            RuleDefinition::new("Statements", [] as [&str; 0]),
            RuleDefinition::new("Statements", ["Statements", "Statement"]),
            RuleDefinition::new("Statement", ["$identifier", "$assign", "Value", "$semicolon"]),
            RuleDefinition::new("Value", ["$number"]),
            RuleDefinition::new("Value", ["$identifier"]),
        ],
    }
}

#[test]
fn test_grammar_from_definition() {
    let grammar = GrammarBuilder::new().definition(&statements()).build().unwrap();

    assert_eq!(grammar.start(), "Program");
    assert_eq!(grammar.rule_count(), 6);
    assert_eq!(
        grammar.non_terminals(),
        ["Program", "Statements", "Statement", "Value"]
    );
    assert_eq!(
        grammar.terminals(),
        ["assign", "identifier", "number", "semicolon"]
    );

    let values: Vec<Vec<Symbol>> = grammar
        .productions_of("Value")
        .map(|item| grammar.symbols(item.rule))
        .collect();
    assert_eq!(
        values,
        [
            vec![Symbol::terminal("number")],
            vec![Symbol::terminal("identifier")]
        ]
    );
}

#[test]
fn test_nullable_propagates() {
    let grammar = GrammarBuilder::new().definition(&statements()).build().unwrap();
    assert!(grammar.is_nullable("Statements"));
    assert!(grammar.is_nullable("Program"));
    assert!(!grammar.is_nullable("Statement"));
    assert!(!grammar.is_nullable("identifier"));
}

#[test]
fn test_duplicate_productions_collapse() {
    let grammar = GrammarBuilder::new()
        .start("S")
        .rule("S", ["$a"])
        .rule("S", ["$a"])
        .rule("S", ["$b"])
        .build()
        .unwrap();
    assert_eq!(grammar.rule_count(), 2);
}

#[test]
fn test_display_lists_rules_in_order() {
    let grammar = GrammarBuilder::new()
        .start("List")
        .rule("List", ["List", "$comma", "$item"])
        .rule("List", [] as [&str; 0])
        .build()
        .unwrap();
    assert_eq!(
        grammar.to_string(),
        "List → List $comma $item\nList → ε\n"
    );

    let first = grammar.rule_ids().next().unwrap();
    let item = DottedRule::new(first, 1, 4);
    assert_eq!(
        item.display(&grammar).to_string(),
        "List → List • $comma $item, 4"
    );
    assert_eq!(item.next_symbol(&grammar), Some(Symbol::terminal("comma")));
    assert!(item.advance().advance().is_complete(&grammar));
}

#[test]
fn test_validation_errors() {
    assert_eq!(
        GrammarBuilder::new().rule("S", ["$a"]).build().unwrap_err(),
        GrammarError::MissingStart
    );

    let err = GrammarBuilder::new()
        .start("S")
        .rule("S", ["T", "$a"])
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::UndefinedNonTerminal {
            name: "T".into(),
            referenced_by: "S".into(),
        }
    );

    let err = GrammarBuilder::new()
        .start("S")
        .rule("S", ["$"])
        .build()
        .unwrap_err();
    assert!(matches!(err, GrammarError::InvalidSymbol { .. }));
}

#[test]
fn test_terminals_checked_against_lexis() {
    let lexis = LexisBuilder::new()
        .token("identifier", "[a-z]+")
        .token("number", "[0-9]+")
        .token("assign", "=")
        .token("semicolon", ";")
        .build()
        .unwrap();
    let grammar = GrammarBuilder::new().definition(&statements()).build().unwrap();
    assert!(grammar.check_terminals(lexis.types()).is_ok());

    let typo = GrammarBuilder::new()
        .start("S")
        .rule("S", ["$identifer", "$semicolon"])
        .build()
        .unwrap();
    let err = typo.check_terminals(lexis.types()).unwrap_err();
    assert_eq!(
        err,
        GrammarError::UnknownTerminal {
            name: "identifer".into(),
            suggestion: Some("identifier".into()),
        }
    );
    assert_eq!(
        err.to_string(),
        "terminal `identifer` is not defined by the lexis (did you mean `identifier`?)"
    );
}

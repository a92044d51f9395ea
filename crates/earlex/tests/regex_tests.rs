//! Tests for regex conversion and Thompson construction

use earlex::automaton::{Automaton, Cursor, Nfa};
use earlex::compile::MachineStack;
use earlex::error::RegexErrorKind;
use earlex::regex::to_postfix;

fn machine(regex: &str) -> Nfa {
    let mut stack = MachineStack::new();
    stack.add_expression(regex, regex).unwrap();
    stack.build()
}

#[test]
fn test_postfix_conversion() {
    let cases = [
        ("a|b", "ab|"),
        ("ab*", "ab*."),
        ("ab+", "ab+."),
        ("a(b|c)d", "abc|.d."),
        ("(ab)?c", "ab.?c."),
        ("[0-2]+", "01|2|+"),
        ("if|int", "if.in.t.|"),
    ];
    for (regex, expected) in cases {
        assert_eq!(
            to_postfix(regex).unwrap().to_string(),
            expected,
            "postfix of {regex:?}"
        );
    }
}

#[test]
fn test_minus_outside_class_is_literal() {
    let nfa = machine("a-b");
    assert!(nfa.accepts("a-b"));
    assert!(!nfa.accepts("ab"));
}

#[test]
fn test_machine_accepts() {
    let cases = [
        ("a|b", "a"),
        ("a|b", "b"),
        ("ab*", "a"),
        ("ab*", "abbbb"),
        ("ab+", "ab"),
        ("ab+", "abbb"),
        ("a?b", "b"),
        ("(a|b)*c", "ababbac"),
        ("[a-z]+[0-9]*", "var12"),
        ("\\(\\)", "()"),
        ("x\\sy", "x y"),
    ];
    for (regex, input) in cases {
        assert!(machine(regex).accepts(input), "{regex:?} should accept {input:?}");
    }
}

#[test]
fn test_machine_rejects() {
    let cases = [
        ("a|b", "c"),
        ("a|b", "ab"),
        ("ab+", "a"),
        ("ab*", "b"),
        ("a?b", "aab"),
        ("[a-z]+", "A"),
    ];
    for (regex, input) in cases {
        assert!(!machine(regex).accepts(input), "{regex:?} should reject {input:?}");
    }
}

#[test]
fn test_trigger_without_transition_keeps_configuration() {
    let nfa = machine("abcd");
    let mut cursor = Cursor::new(&nfa);
    for c in "ab".chars() {
        cursor.trigger(c).unwrap();
    }
    let before = cursor.configuration().clone();

    let err = cursor.trigger('x').unwrap_err();
    assert_eq!(err.symbol, 'x');
    assert_eq!(cursor.configuration(), &before);

    for c in "cd".chars() {
        cursor.trigger(c).unwrap();
    }
    assert!(cursor.is_final());
    assert!(cursor.trigger('a').is_err());
}

#[test]
fn test_final_state_names() {
    let mut stack = MachineStack::new();
    stack.add_expression("keyword", "if").unwrap();
    stack.add_expression("identifier", "[a-z]+").unwrap();
    let nfa = stack.build();

    let mut cursor = Cursor::new(&nfa);
    cursor.trigger('i').unwrap();
    assert_eq!(cursor.name().as_slice(), ["identifier"]);
    cursor.trigger('f').unwrap();
    let mut names = cursor.name().to_vec();
    names.sort_unstable();
    assert_eq!(names, ["identifier", "keyword"]);
}

#[test]
fn test_invalid_expression_leaves_stack_usable() {
    let mut stack = MachineStack::new();
    stack.add_expression("number", "[0-9]+").unwrap();

    let err = stack.add_expression("broken", "(a|b").unwrap_err();
    assert_eq!(err.kind, RegexErrorKind::UnbalancedParentheses);
    let err = stack.add_expression("lonely", "*").unwrap_err();
    assert_eq!(err.kind, RegexErrorKind::MissingOperand { operator: '*' });
    assert_eq!(stack.len(), 1);

    let nfa = stack.build();
    assert!(nfa.accepts("2024"));
    assert!(!nfa.accepts("a"));
}

#[test]
fn test_determinized_machine_agrees() {
    let nfa = machine("(a|b)*abb");
    let dfa = nfa.to_dfa();
    for input in ["abb", "aabb", "babb", "ab", "abba", "", "bbbbabb"] {
        assert_eq!(nfa.accepts(input), dfa.accepts(input), "input {input:?}");
    }
}

#![no_main]
use earlex::automaton::Automaton;
use earlex::compile::MachineStack;
use earlex::regex::to_postfix;
use libfuzzer_sys::fuzz_target;

// Wide bracket ranges expand to one state per member
const MAX_PATTERN_LEN: usize = 64;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (pattern, input) = text.split_once('\n').unwrap_or((text, ""));
    if pattern.len() > MAX_PATTERN_LEN || !pattern.is_ascii() {
        return;
    }

    let converted = to_postfix(pattern);
    let mut stack = MachineStack::new();
    let compiled = stack.add_expression("fuzz", pattern);
    assert!(
        converted.is_ok() || compiled.is_err(),
        "{pattern:?} compiled without a postfix form"
    );
    if compiled.is_err() {
        return;
    }

    let mut nfa = stack.build();
    assert!(!nfa.close_epsilon());
    let dfa = nfa.to_dfa();
    assert_eq!(nfa.accepts(input), dfa.accepts(input));
});

//! Subset construction: NFA → DFA

use super::dfa::Labels;
use super::{Dfa, Nfa, StateId, StateSet};
use hashbrown::HashMap;
use std::collections::VecDeque;
use tracing::debug;

impl Nfa {
    /// Convert to an equivalent [`Dfa`] by subset construction
    ///
    /// Breadth-first over the reachable state sets, starting from the closure
    /// of the start state. Each distinct set becomes one DFA state; a DFA
    /// state is final when any member is final and inherits the labels of
    /// all final members, ordered by NFA state id.
    #[must_use]
    pub fn to_dfa(&self) -> Dfa {
        let mut dfa = Dfa::new();
        let mut state_map: HashMap<StateSet, StateId, ahash::RandomState> = HashMap::default();
        let mut worklist: VecDeque<(StateSet, StateId)> = VecDeque::new();

        let initial = self.closure(self.start()).clone();
        state_map.insert(initial.clone(), dfa.start());
        worklist.push_back((initial, dfa.start()));

        let alphabet: Vec<char> = self.alphabet().collect();

        while let Some((set, id)) = worklist.pop_front() {
            let labels: Labels = self.labels(&set).into_iter().map(Into::into).collect();
            if set.iter().any(|s| self.is_final_state(s)) {
                dfa.set_final(id, labels);
            }

            for &symbol in &alphabet {
                let next = self.step(&set, symbol);
                if next.is_empty() {
                    continue;
                }
                let target = match state_map.get(&next) {
                    Some(&target) => target,
                    None => {
                        let target = dfa.add_state();
                        state_map.insert(next.clone(), target);
                        worklist.push_back((next, target));
                        target
                    }
                };
                dfa.add_transition(id, symbol, target);
            }
        }

        debug!(
            nfa_states = self.states().len(),
            dfa_states = dfa.states().len(),
            alphabet = alphabet.len(),
            "subset construction finished"
        );
        dfa
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Automaton;

    /// a(b|c)* built by hand with redundant epsilon paths
    fn sample() -> Nfa {
        let mut nfa = Nfa::new();
        let s = nfa.start();
        let a = nfa.add_state();
        let loop_head = nfa.add_state();
        let b = nfa.add_state();
        let c = nfa.add_state();
        nfa.add_transition(s, 'a', a);
        nfa.add_epsilon(a, loop_head);
        nfa.add_transition(loop_head, 'b', b);
        nfa.add_transition(loop_head, 'c', c);
        nfa.add_epsilon(b, loop_head);
        nfa.add_epsilon(c, loop_head);
        nfa.set_final(loop_head, "word");
        nfa
    }

    #[test]
    fn test_dfa_matches_nfa() {
        let nfa = sample();
        let dfa = nfa.to_dfa();
        for input in ["", "a", "ab", "acbcb", "b", "aa", "abca"] {
            assert_eq!(nfa.accepts(input), dfa.accepts(input), "input {input:?}");
        }
        assert!(dfa.accepts("abcbc"));
    }

    #[test]
    fn test_equal_state_sets_are_merged() {
        let dfa = sample().to_dfa();
        // {s}, {a, loop}, {b, loop} and {c, loop}
        assert_eq!(dfa.states().len(), 4);
    }

    #[test]
    fn test_labels_are_merged() {
        let mut nfa = Nfa::new();
        let s = nfa.start();
        let x = nfa.add_state();
        let y = nfa.add_state();
        nfa.add_transition(s, 'i', x);
        nfa.add_transition(s, 'i', y);
        nfa.set_final(x, "keyword");
        nfa.set_final(y, "identifier");

        let dfa = nfa.to_dfa();
        let mut config = dfa.initial();
        dfa.trigger(&mut config, 'i').unwrap();
        assert_eq!(dfa.name(&config).as_slice(), &["keyword", "identifier"]);
    }
}

//! The automaton data model: named states with ordered outgoing transitions,
//! collected into an index-addressed arena, plus the structural combinators
//! the regex compiler builds Thompson automata with.
//!
//! States refer to each other by `StateId` (an arena index) rather than by
//! reference, so cyclic graphs such as self-loops and star back-edges need no
//! special casing. Combinators consume their operand automata by value and
//! return a new owned automaton; the operand arenas are absorbed wholesale,
//! which is an ownership transfer rather than a copy.

use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Index of a state within its owning automaton's arena.
pub type StateId = usize;

/// A single outgoing transition.
///
/// `symbol: None` is an epsilon transition, consumable without reading an
/// input symbol. `read`/`write` are the pushdown pop/push symbols, and
/// `direction` is the tape head move; any subset may be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub symbol: Option<char>,
    pub target: StateId,
    pub read: Option<char>,
    pub write: Option<char>,
    pub direction: Option<Direction>,
}

impl Transition {
    /// A plain transition on an input symbol.
    pub fn on(symbol: char, target: StateId) -> Self {
        Self {
            symbol: Some(symbol),
            target,
            read: None,
            write: None,
            direction: None,
        }
    }

    /// An epsilon transition.
    pub fn epsilon(target: StateId) -> Self {
        Self {
            symbol: None,
            target,
            read: None,
            write: None,
            direction: None,
        }
    }

    /// Adds a pushdown pop symbol.
    pub fn reading(mut self, symbol: char) -> Self {
        self.read = Some(symbol);
        self
    }

    /// Adds a pushdown push symbol, or a tape write.
    pub fn writing(mut self, symbol: char) -> Self {
        self.write = Some(symbol);
        self
    }

    /// Adds a tape head move.
    pub fn moving(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn is_epsilon(&self) -> bool {
        self.symbol.is_none()
    }
}

/// A named automaton state.
///
/// Transition order is insertion order and determines match precedence: a
/// deterministic run follows the first transition whose symbol matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub is_start: bool,
    pub is_final: bool,
    pub is_reject: bool,
    pub transitions: Vec<Transition>,
}

impl State {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_start: false,
            is_final: false,
            is_reject: false,
            transitions: Vec::new(),
        }
    }
}

/// A collection of states with one designated start state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Automaton {
    states: Vec<State>,
    start: Option<StateId>,
}

impl Automaton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state by name, or returns the existing one. Idempotence here
    /// is what lets the definition parser create states incrementally, in
    /// whatever order the file mentions them.
    pub fn add_state(&mut self, name: &str) -> StateId {
        if let Some(id) = self.state_id(name) {
            return id;
        }
        self.states.push(State::new(name));
        self.states.len() - 1
    }

    /// Looks a state up by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.name == name)
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Appends a transition to a state's outgoing list.
    pub fn add_transition(&mut self, from: StateId, transition: Transition) {
        self.states[from].transitions.push(transition);
    }

    /// Designates the start state. Flags on other states are left alone;
    /// callers that move the start are expected to clear the old flag.
    pub fn set_start(&mut self, id: StateId) {
        self.states[id].is_start = true;
        self.start = Some(id);
    }

    pub fn start_id(&self) -> Option<StateId> {
        self.start
    }

    /// A two-state automaton accepting exactly the one-symbol word.
    pub fn literal(symbol: char) -> Self {
        let mut automaton = Automaton::new();
        let q0 = automaton.add_state("q0");
        let q1 = automaton.add_state("q1");
        automaton.add_transition(q0, Transition::on(symbol, q1));
        automaton.state_mut(q1).is_final = true;
        automaton.set_start(q0);
        automaton
    }

    /// Concatenation: every final state of `self` gets an epsilon transition
    /// into `other`'s start and loses its final flag; `other`'s start loses
    /// its start flag; the composite starts at `self`'s start.
    pub fn concat(mut self, other: Automaton) -> Automaton {
        let other_start = other.start.expect("operand automaton has a start");
        let offset = self.absorb(other);
        for id in 0..offset {
            if self.states[id].is_final {
                self.states[id].is_final = false;
                self.add_transition(id, Transition::epsilon(other_start + offset));
            }
        }
        self.states[other_start + offset].is_start = false;
        self.renumber();
        self
    }

    /// Alternation: a fresh start state with epsilon transitions into both
    /// operands' starts, which lose their start flags.
    pub fn union(self, other: Automaton) -> Automaton {
        let self_start = self.start.expect("operand automaton has a start");
        let other_start = other.start.expect("operand automaton has a start");

        let mut result = Automaton::new();
        let entry = result.add_state("q0");
        result.set_start(entry);

        let self_offset = result.absorb(self);
        let other_offset = result.absorb(other);

        result.add_transition(entry, Transition::epsilon(self_start + self_offset));
        result.add_transition(entry, Transition::epsilon(other_start + other_offset));
        result.states[self_start + self_offset].is_start = false;
        result.states[other_start + other_offset].is_start = false;

        result.renumber();
        result
    }

    /// Kleene star: a fresh start state that is also final, with an epsilon
    /// transition into the operand's old start, and an epsilon back-edge
    /// from every operand final state to the old start. The operand's final
    /// flags stay set; any word that reaches one has matched a nonempty
    /// repetition.
    pub fn star(self) -> Automaton {
        let old_start = self.start.expect("operand automaton has a start");

        let mut result = Automaton::new();
        let entry = result.add_state("q0");
        result.state_mut(entry).is_final = true;
        result.set_start(entry);

        let offset = result.absorb(self);
        result.add_transition(entry, Transition::epsilon(old_start + offset));
        for id in offset..result.len() {
            if result.states[id].is_final {
                result.add_transition(id, Transition::epsilon(old_start + offset));
            }
            result.states[id].is_start = false;
        }

        result.renumber();
        result
    }

    /// One-or-more repetition: the same back-edge splice as `star`, but the
    /// operand keeps its own start as the composite start, so the empty word
    /// is not accepted.
    pub fn plus(mut self) -> Automaton {
        let start = self.start.expect("operand automaton has a start");
        for id in 0..self.len() {
            if self.states[id].is_final {
                self.add_transition(id, Transition::epsilon(start));
            }
        }
        self.renumber();
        self
    }

    /// Moves `other`'s states into this arena, rewriting their transition
    /// targets, and returns the index offset they landed at.
    fn absorb(&mut self, other: Automaton) -> StateId {
        let offset = self.states.len();
        for mut state in other.states {
            for transition in &mut state.transitions {
                transition.target += offset;
            }
            self.states.push(state);
        }
        offset
    }

    /// Renames every state to the canonical `q0, q1, ...` scheme in arena
    /// order. Composition merges states from formerly-independent automata
    /// whose names collide, so this runs after every combinator.
    fn renumber(&mut self) {
        for (id, state) in self.states.iter_mut().enumerate() {
            state.name = format!("q{}", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_state_is_idempotent() {
        let mut automaton = Automaton::new();
        let first = automaton.add_state("q0");
        let again = automaton.add_state("q0");
        let second = automaton.add_state("q1");

        assert_eq!(first, again);
        assert_ne!(first, second);
        assert_eq!(automaton.len(), 2);
    }

    #[test]
    fn test_transition_order_is_preserved() {
        let mut automaton = Automaton::new();
        let q0 = automaton.add_state("q0");
        let q1 = automaton.add_state("q1");
        automaton.add_transition(q0, Transition::on('a', q1));
        automaton.add_transition(q0, Transition::on('a', q0));

        let symbol_targets: Vec<StateId> = automaton
            .state(q0)
            .transitions
            .iter()
            .map(|t| t.target)
            .collect();
        assert_eq!(symbol_targets, vec![q1, q0]);
    }

    #[test]
    fn test_literal_shape() {
        let automaton = Automaton::literal('a');
        assert_eq!(automaton.len(), 2);

        let start = automaton.start_id().unwrap();
        assert!(automaton.state(start).is_start);
        assert!(!automaton.state(start).is_final);

        let transition = &automaton.state(start).transitions[0];
        assert_eq!(transition.symbol, Some('a'));
        assert!(automaton.state(transition.target).is_final);
    }

    #[test]
    fn test_concat_splices_finals() {
        let automaton = Automaton::literal('a').concat(Automaton::literal('b'));
        assert_eq!(automaton.len(), 4);

        // The left operand's final became an epsilon bridge.
        let finals: Vec<&State> = automaton.states().iter().filter(|s| s.is_final).collect();
        assert_eq!(finals.len(), 1);

        let start = automaton.start_id().unwrap();
        assert_eq!(automaton.state(start).name, "q0");
        let starts = automaton.states().iter().filter(|s| s.is_start).count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_union_has_fresh_start() {
        let automaton = Automaton::literal('a').union(Automaton::literal('b'));
        assert_eq!(automaton.len(), 5);

        let start = automaton.start_id().unwrap();
        let entry = automaton.state(start);
        assert!(entry.is_start);
        assert_eq!(entry.transitions.len(), 2);
        assert!(entry.transitions.iter().all(Transition::is_epsilon));

        let starts = automaton.states().iter().filter(|s| s.is_start).count();
        assert_eq!(starts, 1);
        // Both operand finals survive.
        let finals = automaton.states().iter().filter(|s| s.is_final).count();
        assert_eq!(finals, 2);
    }

    #[test]
    fn test_star_keeps_operand_finals() {
        let automaton = Automaton::literal('a').star();
        assert_eq!(automaton.len(), 3);

        let start = automaton.start_id().unwrap();
        assert!(automaton.state(start).is_final);

        // The operand's final keeps its flag and gains a back-edge.
        let operand_final = automaton
            .states()
            .iter()
            .find(|s| s.is_final && !s.is_start)
            .unwrap();
        assert!(operand_final.transitions.iter().any(Transition::is_epsilon));
    }

    #[test]
    fn test_plus_keeps_operand_start() {
        let automaton = Automaton::literal('a').plus();
        assert_eq!(automaton.len(), 2);

        // No always-final entry state: the empty word is not accepted.
        let start = automaton.start_id().unwrap();
        assert_eq!(automaton.state(start).name, "q0");
        assert!(!automaton.state(start).is_final);

        // The operand's final gained a back-edge to the start.
        let operand_final = automaton.states().iter().find(|s| s.is_final).unwrap();
        assert!(operand_final
            .transitions
            .iter()
            .any(|t| t.is_epsilon() && t.target == start));
    }

    #[test]
    fn test_renumber_after_composition() {
        let automaton = Automaton::literal('a').concat(Automaton::literal('b'));
        let names: Vec<&str> = automaton.states().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["q0", "q1", "q2", "q3"]);
    }

    #[test]
    fn test_self_loop_is_representable() {
        let mut automaton = Automaton::new();
        let q0 = automaton.add_state("q0");
        automaton.add_transition(q0, Transition::on('a', q0));
        assert_eq!(automaton.state(q0).transitions[0].target, q0);
    }
}

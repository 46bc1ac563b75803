//! Determines an automaton's computational class for engine dispatch.

use crate::automaton::Automaton;
use crate::types::MachineClass;

/// Scans every transition once and classifies the automaton.
///
/// Precedence rules, in order:
///
/// 1. Any transition with a tape direction makes the automaton a Turing
///    machine; pushdown reads elsewhere are ignored once a direction is
///    seen.
/// 2. Otherwise any transition that pops the stack makes it a PDA.
/// 3. Otherwise any transition that writes (with no pops anywhere) also
///    makes it a Turing machine. Write-only automata are deliberately not
///    PDAs.
/// 4. Otherwise it is a DFA exactly when no transition is epsilon and every
///    state is complete, carrying exactly one transition per alphabet
///    symbol. Anything else is an NFA.
///
/// This is a pure function; it never mutates the automaton.
pub fn classify(automaton: &Automaton) -> MachineClass {
    let mut pops = 0usize;
    let mut writes = 0usize;
    for state in automaton.states() {
        for transition in &state.transitions {
            if transition.direction.is_some() {
                return MachineClass::TuringMachine;
            }
            if transition.read.is_some() {
                pops += 1;
            }
            if transition.write.is_some() {
                writes += 1;
            }
        }
    }
    if pops > 0 {
        return MachineClass::Pda;
    }
    if writes > 0 {
        return MachineClass::TuringMachine;
    }

    // Alphabet = union of all symbols in use; insertion order is irrelevant
    // but duplicates must not count twice.
    let mut alphabet: Vec<char> = Vec::new();
    for state in automaton.states() {
        for transition in &state.transitions {
            match transition.symbol {
                None => return MachineClass::Nfa,
                Some(symbol) => {
                    if !alphabet.contains(&symbol) {
                        alphabet.push(symbol);
                    }
                }
            }
        }
    }

    for state in automaton.states() {
        if state.transitions.len() != alphabet.len() {
            return MachineClass::Nfa;
        }
        for &symbol in &alphabet {
            let count = state
                .transitions
                .iter()
                .filter(|t| t.symbol == Some(symbol))
                .count();
            if count != 1 {
                return MachineClass::Nfa;
            }
        }
    }

    MachineClass::Dfa
}

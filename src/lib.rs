//! A formal-language toolkit: compiles regular expressions into finite
//! automata via Thompson construction, and executes automata of increasing
//! power against input strings. A classifier inspects an automaton's
//! transitions to pick the simulation algorithm: deterministic
//! transition-following for DFAs, configuration-set simulation with
//! per-state stack multiplicities for NFAs and PDAs, and tape-as-stack
//! simulation for Turing machines. Automata come from the regex compiler,
//! from definition text (see `parser`), or from the embedded demo library.

pub mod analyzer;
pub mod automaton;
pub mod classifier;
pub mod encoder;
pub mod engine;
pub mod loader;
pub mod parser;
pub mod programs;
pub mod regex;
pub mod stack;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the validation entry points from the analyzer module.
pub use analyzer::{analyze, unreachable_states, AnalysisError};
/// Re-exports the automaton model.
pub use automaton::{Automaton, State, StateId, Transition};
/// Re-exports the machine classifier.
pub use classifier::classify;
/// Re-exports the definition-format serializer.
pub use encoder::encode;
/// Re-exports the simulation entry points.
pub use engine::{run, run_classified, run_dfa, run_nondeterministic, run_turing};
/// Re-exports the file loading utilities.
pub use loader::{read_inputs, run_file, DefinitionLoader};
/// Re-exports the definition parser.
pub use parser::parse;
/// Re-exports the embedded demo registry.
pub use programs::DemoLibrary;
/// Re-exports the regex compiler.
pub use regex::regex_to_nfa;
/// Re-exports the stack/tape structure.
pub use stack::Stack;
/// Re-exports the shared value types.
pub use types::{
    AutomatonError, Direction, MachineClass, Outcome, RunOptions, BLANK_SYMBOL,
};

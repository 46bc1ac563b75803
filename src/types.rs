//! Core value types shared across the toolkit: tape directions, machine
//! classes, run outcomes, engine options, and the crate-wide error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::Rule;

/// The symbol an unwritten tape cell holds. It is an ordinary name character
/// in the definition format, so machines can match it explicitly.
pub const BLANK_SYMBOL: char = '_';

/// A tape head movement attached to a Turing-machine transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one cell to the left.
    Left,
    /// Move the head one cell to the right.
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "L"),
            Direction::Right => write!(f, "R"),
        }
    }
}

/// The computational class of an automaton, as determined by the classifier.
///
/// `Nfa` and `Pda` share a simulation algorithm; they are distinguished so
/// callers can report what they are running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineClass {
    /// Every state has exactly one transition per alphabet symbol and no
    /// epsilon or pushdown transitions.
    Dfa,
    /// Nondeterministic finite automaton without stack operations.
    Nfa,
    /// At least one transition pops the stack (and none moves a tape head).
    Pda,
    /// At least one transition moves a tape head, or writes without reading.
    TuringMachine,
}

impl fmt::Display for MachineClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineClass::Dfa => write!(f, "DFA"),
            MachineClass::Nfa => write!(f, "NFA"),
            MachineClass::Pda => write!(f, "PDA"),
            MachineClass::TuringMachine => write!(f, "TM"),
        }
    }
}

/// The verdict of running an automaton over an input string.
///
/// Simulation has no error path: a structurally valid automaton always
/// produces a definite outcome, and a stuck machine is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Accepted,
    Rejected,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted => write!(f, "ACCEPTED"),
            Outcome::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Execution options passed to the engine.
///
/// These travel by value instead of living in process-wide flags, so two
/// runs with different settings can coexist.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Print every configuration transition while running.
    pub trace: bool,
    /// Pause between simulation steps, for human-paced trace display.
    pub delay: Option<Duration>,
    /// Bound on Turing-machine steps. Exhausting the bound rejects.
    /// `None` lets non-halting machines loop forever, faithful to the model.
    pub max_steps: Option<usize>,
}

/// Errors raised while building an automaton, from a regex or a definition
/// file. Simulation itself never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// The regex does not belong to the supported grammar.
    #[error("Invalid regex: {0}")]
    InvalidRegex(String),
    /// The regex has unbalanced parentheses.
    #[error("Parentheses mismatch")]
    UnbalancedParens,
    /// The definition text is syntactically malformed.
    #[error("Definition parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// The definition parsed but violates a structural rule.
    #[error("Definition validation error: {0}")]
    ValidationError(String),
    /// A definition or input file could not be read.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let right = Direction::Right;

        let left_json = serde_json::to_string(&left).unwrap();
        let right_json = serde_json::to_string(&right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        let right_deserialized: Direction = serde_json::from_str(&right_json).unwrap();

        assert_eq!(left, left_deserialized);
        assert_eq!(right, right_deserialized);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Accepted.to_string(), "ACCEPTED");
        assert_eq!(Outcome::Rejected.to_string(), "REJECTED");
        assert!(Outcome::Accepted.is_accepted());
        assert!(!Outcome::Rejected.is_accepted());
    }

    #[test]
    fn test_error_display() {
        let error = AutomatonError::InvalidRegex("a**".to_string());
        let message = format!("{}", error);
        assert!(message.contains("Invalid regex"));
        assert!(message.contains("a**"));

        let error = AutomatonError::ValidationError("No final states specified".to_string());
        assert!(error.to_string().contains("No final states specified"));
    }

    #[test]
    fn test_run_options_default() {
        let options = RunOptions::default();
        assert!(!options.trace);
        assert!(options.delay.is_none());
        assert!(options.max_steps.is_none());
    }
}

//! Embedded demo automata, compiled into the binary and parsed on first
//! access. One of each machine class: a DFA, a PDA, and a Turing machine.

use crate::automaton::Automaton;
use crate::parser::parse;
use crate::types::AutomatonError;

use std::sync::RwLock;

// Demo definitions embedded at build time. The name is the file stem; the
// definition format itself carries no name.
const DEMO_SOURCES: [(&str, &str); 3] = [
    ("even-zeros", include_str!("../demos/even-zeros.aut")),
    ("balanced-parens", include_str!("../demos/balanced-parens.aut")),
    ("ab-sort", include_str!("../demos/ab-sort.aut")),
];

lazy_static::lazy_static! {
    pub static ref DEMOS: RwLock<Vec<(String, Automaton)>> = RwLock::new(Vec::new());
}

pub struct DemoLibrary;

impl DemoLibrary {
    /// Parses every embedded definition into the registry. Called lazily by
    /// the accessors; a demo that fails to parse is skipped with a warning.
    pub fn load() -> Result<(), AutomatonError> {
        let mut demos = Vec::new();
        for (name, source) in DEMO_SOURCES {
            match parse(source) {
                Ok(automaton) => demos.push((name.to_string(), automaton)),
                Err(e) => eprintln!("Failed to parse demo {}: {}", name, e),
            }
        }

        let mut guard = DEMOS.write().map_err(|_| {
            AutomatonError::FileError("Failed to acquire write lock".to_string())
        })?;
        *guard = demos;

        Ok(())
    }

    fn ensure_loaded() {
        let empty = DEMOS.read().map(|demos| demos.is_empty()).unwrap_or(false);
        if empty {
            let _ = Self::load();
        }
    }

    /// The number of available demos.
    pub fn count() -> usize {
        Self::ensure_loaded();
        DEMOS.read().map(|demos| demos.len()).unwrap_or(0)
    }

    /// All demo names, in registry order.
    pub fn names() -> Vec<String> {
        Self::ensure_loaded();
        DEMOS
            .read()
            .map(|demos| demos.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    /// Looks a demo up by name.
    pub fn by_name(name: &str) -> Result<Automaton, AutomatonError> {
        Self::ensure_loaded();
        DEMOS
            .read()
            .map_err(|_| AutomatonError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|(demo_name, _)| demo_name == name)
            .map(|(_, automaton)| automaton.clone())
            .ok_or_else(|| {
                AutomatonError::ValidationError(format!("Demo '{}' not found", name))
            })
    }

    /// The definition text of a demo, as embedded.
    pub fn source_by_name(name: &str) -> Result<&'static str, AutomatonError> {
        DEMO_SOURCES
            .iter()
            .find(|(demo_name, _)| *demo_name == name)
            .map(|(_, source)| *source)
            .ok_or_else(|| {
                AutomatonError::ValidationError(format!("Demo '{}' not found", name))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::engine::run;
    use crate::types::{MachineClass, Outcome, RunOptions};

    #[test]
    fn test_all_demos_parse() {
        assert!(DemoLibrary::load().is_ok());
        assert_eq!(DemoLibrary::count(), DEMO_SOURCES.len());
    }

    #[test]
    fn test_demo_names() {
        let names = DemoLibrary::names();
        assert!(names.contains(&"even-zeros".to_string()));
        assert!(names.contains(&"balanced-parens".to_string()));
        assert!(names.contains(&"ab-sort".to_string()));
    }

    #[test]
    fn test_unknown_demo() {
        assert!(DemoLibrary::by_name("no-such-demo").is_err());
        assert!(DemoLibrary::source_by_name("no-such-demo").is_err());
    }

    #[test]
    fn test_demo_classes() {
        assert_eq!(
            classify(&DemoLibrary::by_name("even-zeros").unwrap()),
            MachineClass::Dfa
        );
        assert_eq!(
            classify(&DemoLibrary::by_name("balanced-parens").unwrap()),
            MachineClass::Pda
        );
        assert_eq!(
            classify(&DemoLibrary::by_name("ab-sort").unwrap()),
            MachineClass::TuringMachine
        );
    }

    #[test]
    fn test_even_zeros_language() {
        let dfa = DemoLibrary::by_name("even-zeros").unwrap();
        let options = RunOptions::default();
        assert_eq!(run(&dfa, "1001", &options), Outcome::Accepted);
        assert_eq!(run(&dfa, "10", &options), Outcome::Rejected);
    }

    #[test]
    fn test_balanced_parens_language() {
        let pda = DemoLibrary::by_name("balanced-parens").unwrap();
        let options = RunOptions::default();
        assert_eq!(run(&pda, "(())", &options), Outcome::Accepted);
        assert_eq!(run(&pda, "(()", &options), Outcome::Rejected);
        assert_eq!(run(&pda, ")(", &options), Outcome::Rejected);
    }

    #[test]
    fn test_ab_sort_halts_and_accepts() {
        let tm = DemoLibrary::by_name("ab-sort").unwrap();
        let options = RunOptions {
            max_steps: Some(1000),
            ..RunOptions::default()
        };
        assert_eq!(run(&tm, "abab", &options), Outcome::Accepted);
        assert_eq!(run(&tm, "", &options), Outcome::Accepted);
    }

    #[test]
    fn test_demo_source_is_embedded() {
        let source = DemoLibrary::source_by_name("even-zeros").unwrap();
        assert!(source.contains("start: even;"));
    }
}

//! Loads automaton definitions and input-string files from disk, and
//! batch-runs a file of inputs against an automaton.

use crate::automaton::Automaton;
use crate::classifier::classify;
use crate::engine::run_classified;
use crate::parser::parse;
use crate::types::{AutomatonError, Outcome, RunOptions};
use std::fs;
use std::path::Path;

/// Utility for loading automaton definitions from files or strings.
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Loads and validates a definition file.
    ///
    /// # Errors
    ///
    /// * `AutomatonError::FileError` when the file cannot be read.
    /// * `AutomatonError::ParseError` / `ValidationError` from `parse`.
    pub fn load_file(path: &Path) -> Result<Automaton, AutomatonError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Parses a definition from string content, e.g. user input.
    pub fn load_str(content: &str) -> Result<Automaton, AutomatonError> {
        parse(content)
    }
}

/// Reads a newline-delimited input-string file. Lines keep their content
/// verbatim apart from the line terminator, so an empty line runs the
/// automaton on the empty word.
pub fn read_inputs(path: &Path) -> Result<Vec<String>, AutomatonError> {
    let content = fs::read_to_string(path).map_err(|e| {
        AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    Ok(content.lines().map(|line| line.to_string()).collect())
}

/// Runs every input line of a file against the automaton: classify once,
/// then simulate each line, pairing it with its outcome.
pub fn run_file(
    automaton: &Automaton,
    inputs: &Path,
    options: &RunOptions,
) -> Result<Vec<(String, Outcome)>, AutomatonError> {
    let class = classify(automaton);
    Ok(read_inputs(inputs)?
        .into_iter()
        .map(|line| {
            let outcome = run_classified(automaton, class, &line, options);
            (line, outcome)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const EVEN_ZEROS: &str = "\
even: 0>odd, 1>even;
odd: 0>even, 1>odd;
start: even;
final: even;
";

    #[test]
    fn test_load_valid_definition() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("even.aut");
        File::create(&path)
            .unwrap()
            .write_all(EVEN_ZEROS.as_bytes())
            .unwrap();

        let automaton = DefinitionLoader::load_file(&path).unwrap();
        assert_eq!(automaton.len(), 2);
        assert!(automaton.state_id("even").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let result = DefinitionLoader::load_file(Path::new("/no/such/file.aut"));
        assert!(matches!(result, Err(AutomatonError::FileError(_))));
    }

    #[test]
    fn test_load_invalid_definition() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.aut");
        File::create(&path)
            .unwrap()
            .write_all(b"this is not a definition")
            .unwrap();

        assert!(DefinitionLoader::load_file(&path).is_err());
    }

    #[test]
    fn test_load_str() {
        assert!(DefinitionLoader::load_str(EVEN_ZEROS).is_ok());
    }

    #[test]
    fn test_read_inputs_keeps_empty_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inputs.txt");
        File::create(&path)
            .unwrap()
            .write_all(b"11\n\n0\n")
            .unwrap();

        let inputs = read_inputs(&path).unwrap();
        assert_eq!(inputs, vec!["11", "", "0"]);
    }

    #[test]
    fn test_run_file() {
        let dir = tempdir().unwrap();
        let inputs = dir.path().join("inputs.txt");
        File::create(&inputs)
            .unwrap()
            .write_all(b"11\n0\n00\n")
            .unwrap();

        let automaton = DefinitionLoader::load_str(EVEN_ZEROS).unwrap();
        let results = run_file(&automaton, &inputs, &RunOptions::default()).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], ("11".to_string(), Outcome::Accepted));
        assert_eq!(results[1], ("0".to_string(), Outcome::Rejected));
        assert_eq!(results[2], ("00".to_string(), Outcome::Accepted));
    }
}

//! Pre-execution validation of automata.
//!
//! The execution engine assumes a structurally valid automaton; this module
//! is where that assumption is earned. `parse` runs `analyze` on every
//! loaded definition, and callers building automata programmatically can do
//! the same before handing them to the engine. `unreachable_states` is a
//! non-fatal report: definitions with unreachable states are legal, but a
//! caller may want to warn about them.

use crate::automaton::Automaton;
use crate::types::AutomatonError;
use std::collections::HashSet;

/// Structural problems found while validating an automaton.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// No state is designated as the start state.
    MissingStart,
    /// No state carries the final flag.
    MissingFinal,
    /// A state is flagged both final and reject.
    FinalRejectConflict(String),
    /// The start state is flagged reject.
    StartRejectConflict(String),
}

impl From<AnalysisError> for AutomatonError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::MissingStart => {
                AutomatonError::ValidationError("No start states specified".to_string())
            }
            AnalysisError::MissingFinal => {
                AutomatonError::ValidationError("No final states specified".to_string())
            }
            AnalysisError::FinalRejectConflict(name) => AutomatonError::ValidationError(format!(
                "State {} cannot be both a final and reject state",
                name
            )),
            AnalysisError::StartRejectConflict(name) => AutomatonError::ValidationError(format!(
                "State {} cannot be both a start and reject state",
                name
            )),
        }
    }
}

/// Validates the role-flag invariants: a designated start state, at least
/// one final state, and no state that is both final and reject or both
/// start and reject.
///
/// Returns the first violation found.
pub fn analyze(automaton: &Automaton) -> Result<(), AutomatonError> {
    let checks = [check_start, check_final, check_role_conflicts];
    for check in checks {
        check(automaton).map_err(AutomatonError::from)?;
    }
    Ok(())
}

fn check_start(automaton: &Automaton) -> Result<(), AnalysisError> {
    let Some(start) = automaton.start_id() else {
        return Err(AnalysisError::MissingStart);
    };
    let state = automaton.state(start);
    if state.is_reject {
        return Err(AnalysisError::StartRejectConflict(state.name.clone()));
    }
    Ok(())
}

fn check_final(automaton: &Automaton) -> Result<(), AnalysisError> {
    if automaton.states().iter().any(|s| s.is_final) {
        Ok(())
    } else {
        Err(AnalysisError::MissingFinal)
    }
}

fn check_role_conflicts(automaton: &Automaton) -> Result<(), AnalysisError> {
    for state in automaton.states() {
        if state.is_final && state.is_reject {
            return Err(AnalysisError::FinalRejectConflict(state.name.clone()));
        }
    }
    Ok(())
}

/// Names of states that cannot be reached from the start state, sorted for
/// deterministic output. An automaton with no start state reports every
/// state.
pub fn unreachable_states(automaton: &Automaton) -> Vec<String> {
    let mut visited: HashSet<usize> = HashSet::new();
    let mut queue: Vec<usize> = automaton.start_id().into_iter().collect();

    while let Some(id) = queue.pop() {
        if !visited.insert(id) {
            continue;
        }
        for transition in &automaton.state(id).transitions {
            if !visited.contains(&transition.target) {
                queue.push(transition.target);
            }
        }
    }

    let mut unreachable: Vec<String> = automaton
        .states()
        .iter()
        .enumerate()
        .filter(|(id, _)| !visited.contains(id))
        .map(|(_, state)| state.name.clone())
        .collect();
    unreachable.sort();
    unreachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Transition;

    fn two_state_automaton() -> Automaton {
        let mut a = Automaton::new();
        let q0 = a.add_state("q0");
        let q1 = a.add_state("q1");
        a.add_transition(q0, Transition::on('a', q1));
        a.state_mut(q1).is_final = true;
        a.set_start(q0);
        a
    }

    #[test]
    fn test_valid_automaton_passes() {
        assert!(analyze(&two_state_automaton()).is_ok());
    }

    #[test]
    fn test_missing_start() {
        let mut a = Automaton::new();
        let q0 = a.add_state("q0");
        a.state_mut(q0).is_final = true;

        let error = analyze(&a).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Definition validation error: No start states specified"
        );
    }

    #[test]
    fn test_missing_final() {
        let mut a = Automaton::new();
        let q0 = a.add_state("q0");
        a.set_start(q0);

        let error = analyze(&a).unwrap_err();
        assert!(error.to_string().contains("No final states specified"));
    }

    #[test]
    fn test_final_reject_conflict() {
        let mut a = two_state_automaton();
        let q1 = a.state_id("q1").unwrap();
        a.state_mut(q1).is_reject = true;

        let error = analyze(&a).unwrap_err();
        assert!(error
            .to_string()
            .contains("State q1 cannot be both a final and reject state"));
    }

    #[test]
    fn test_start_reject_conflict() {
        let mut a = two_state_automaton();
        let q0 = a.state_id("q0").unwrap();
        a.state_mut(q0).is_reject = true;

        let error = analyze(&a).unwrap_err();
        assert!(error
            .to_string()
            .contains("State q0 cannot be both a start and reject state"));
    }

    #[test]
    fn test_analysis_error_conversion() {
        let error: AutomatonError = AnalysisError::MissingFinal.into();
        assert!(matches!(error, AutomatonError::ValidationError(_)));
    }

    #[test]
    fn test_unreachable_states() {
        let mut a = two_state_automaton();
        a.add_state("orphan");
        let lost = a.add_state("lost");
        a.add_transition(lost, Transition::on('a', lost));

        assert_eq!(unreachable_states(&a), vec!["lost", "orphan"]);
    }

    #[test]
    fn test_all_states_reachable() {
        assert!(unreachable_states(&two_state_automaton()).is_empty());
    }

    #[test]
    fn test_cycles_do_not_loop_reachability() {
        let mut a = two_state_automaton();
        let q0 = a.state_id("q0").unwrap();
        let q1 = a.state_id("q1").unwrap();
        a.add_transition(q1, Transition::on('b', q0));

        assert!(unreachable_states(&a).is_empty());
    }
}

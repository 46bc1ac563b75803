//! Parser for the automaton definition text format, built on the `pest`
//! grammar in `grammar.pest`.
//!
//! A definition lists states with their outgoing transitions plus the
//! pseudo-state declarations `start:`, `final:`, and `reject:` assigning
//! role flags. States come into existence on first mention, whether as a
//! source or a destination, so files can reference states in any order.

use crate::analyzer::analyze;
use crate::automaton::{Automaton, StateId, Transition};
use crate::types::{AutomatonError, Direction, BLANK_SYMBOL};
use pest::iterators::Pair;
use pest::Parser as PestParser;
use pest_derive::Parser as PestParser;

/// Derives the definition-format parser from `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DefinitionParser;

/// Role assignments collected while walking the parse tree. A later
/// declaration of the same role replaces the earlier one.
#[derive(Debug, Default)]
struct RoleDecls {
    start: Option<String>,
    finals: Vec<String>,
    rejects: Vec<String>,
}

/// Parses definition text into a validated `Automaton`.
///
/// # Errors
///
/// * `AutomatonError::ParseError` on malformed syntax.
/// * `AutomatonError::ValidationError` when a role declaration names an
///   unknown state, roles conflict, or the start/final declarations are
///   missing (see `analyzer`).
pub fn parse(input: &str) -> Result<Automaton, AutomatonError> {
    let root = DefinitionParser::parse(Rule::program, input.trim())
        .map_err(|e| AutomatonError::ParseError(Box::new(e)))?
        .next()
        .unwrap();

    let mut roles = RoleDecls::default();
    let mut automaton = Automaton::new();

    for decl in root.into_inner() {
        match decl.as_rule() {
            Rule::start_decl => {
                roles.start = decl.into_inner().next().map(|p| p.as_str().to_string());
            }
            Rule::final_decl => {
                roles.finals = decl.into_inner().map(|p| p.as_str().to_string()).collect();
            }
            Rule::reject_decl => {
                roles.rejects = decl.into_inner().map(|p| p.as_str().to_string()).collect();
            }
            Rule::state_decl => parse_state_decl(&mut automaton, decl),
            _ => {} // Skip EOI
        }
    }

    apply_roles(&mut automaton, roles)?;
    analyze(&automaton)?;

    Ok(automaton)
}

/// Adds one state declaration's transitions to the automaton.
fn parse_state_decl(automaton: &mut Automaton, decl: Pair<Rule>) {
    let mut pairs = decl.into_inner();
    let source_name = pairs.next().unwrap().as_str();
    let source = automaton.add_state(source_name);

    for pair in pairs {
        if pair.as_rule() == Rule::transition {
            let transition = parse_transition(automaton, pair);
            automaton.add_transition(source, transition);
        }
    }
}

/// Builds one transition, creating its destination state on demand.
fn parse_transition(automaton: &mut Automaton, pair: Pair<Rule>) -> Transition {
    let mut symbol = None;
    let mut target: StateId = 0;
    let mut read = None;
    let mut write = None;
    let mut direction = None;

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::symbol => symbol = Some(parse_symbol(part.as_str())),
            Rule::name => target = automaton.add_state(part.as_str()),
            Rule::tape_op => {
                let clause = part.into_inner().next().unwrap();
                match clause.as_rule() {
                    Rule::move_op => {
                        for inner in clause.into_inner() {
                            match inner.as_rule() {
                                Rule::direction => direction = Some(parse_direction(inner.as_str())),
                                Rule::write_sym => write = Some(parse_symbol(inner.as_str())),
                                _ => {}
                            }
                        }
                    }
                    Rule::stack_op => {
                        for inner in clause.into_inner() {
                            match inner.as_rule() {
                                Rule::read_sym => read = Some(parse_symbol(inner.as_str())),
                                Rule::write_sym => write = Some(parse_symbol(inner.as_str())),
                                Rule::direction => direction = Some(parse_direction(inner.as_str())),
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Transition {
        symbol,
        target,
        read,
        write,
        direction,
    }
}

/// Resolves the collected role declarations against the finished state set.
fn apply_roles(automaton: &mut Automaton, roles: RoleDecls) -> Result<(), AutomatonError> {
    for name in &roles.finals {
        let id = automaton.state_id(name).ok_or_else(|| {
            AutomatonError::ValidationError(format!("No final state {} detected", name))
        })?;
        automaton.state_mut(id).is_final = true;
    }

    for name in &roles.rejects {
        let id = automaton.state_id(name).ok_or_else(|| {
            AutomatonError::ValidationError(format!("No reject state {} detected", name))
        })?;
        automaton.state_mut(id).is_reject = true;
    }

    if let Some(name) = &roles.start {
        let id = automaton.state_id(name).ok_or_else(|| {
            AutomatonError::ValidationError(format!("No start state {} detected", name))
        })?;
        automaton.set_start(id);
    }

    Ok(())
}

/// Extracts the character from a symbol token, unwrapping single quotes.
fn parse_symbol(text: &str) -> char {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some('\''), Some(inner)) => inner,
        (Some(first), _) => first,
        _ => BLANK_SYMBOL,
    }
}

fn parse_direction(text: &str) -> Direction {
    match text {
        "L" => Direction::Left,
        _ => Direction::Right,
    }
}

/// Whether a character may appear unquoted in names and symbols.
pub(crate) fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "~`!@$%^&*-_+=[{}]\\|\"<./?".contains(c)
}

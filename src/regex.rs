//! The regex-to-NFA compiler.
//!
//! Compilation runs in four stages: a finite-state validity scan over the
//! whitespace-stripped pattern, insertion of explicit concatenation markers,
//! shunting-yard reduction to postfix form, and Thompson construction by
//! evaluating the postfix form over a stack of partially-built automata.
//!
//! Supported grammar: alphanumeric literals, juxtaposition for
//! concatenation, `|` for alternation, postfix `*` and `+`, and `(` `)` for
//! grouping.

use crate::automaton::Automaton;
use crate::types::AutomatonError;

/// Reserved marker for explicit concatenation. Literals are alphanumeric,
/// so it can never collide with one.
const CONCAT: char = '_';

/// Compiles a regular expression into a nondeterministic finite automaton.
///
/// The empty pattern (after whitespace stripping) compiles to a single
/// state that is both start and final, accepting exactly the empty word.
///
/// # Errors
///
/// * `AutomatonError::InvalidRegex` when the pattern is outside the grammar.
/// * `AutomatonError::UnbalancedParens` on parenthesis mismatch.
pub fn regex_to_nfa(pattern: &str) -> Result<Automaton, AutomatonError> {
    let stripped: String = pattern.chars().filter(|c| !c.is_whitespace()).collect();
    if !is_valid(&stripped) {
        return Err(AutomatonError::InvalidRegex(pattern.to_string()));
    }

    if stripped.is_empty() {
        let mut automaton = Automaton::new();
        let q0 = automaton.add_state("q0");
        automaton.state_mut(q0).is_final = true;
        automaton.set_start(q0);
        return Ok(automaton);
    }

    let postfix = to_postfix(&explicit_concat(&stripped))?;

    let mut stack: Vec<Automaton> = Vec::new();
    for c in postfix.chars() {
        if c.is_alphanumeric() {
            stack.push(Automaton::literal(c));
        } else {
            match c {
                '*' => {
                    let operand = pop_operand(&mut stack, pattern)?;
                    stack.push(operand.star());
                }
                '+' => {
                    let operand = pop_operand(&mut stack, pattern)?;
                    stack.push(operand.plus());
                }
                '|' => {
                    let right = pop_operand(&mut stack, pattern)?;
                    let left = pop_operand(&mut stack, pattern)?;
                    stack.push(left.union(right));
                }
                CONCAT => {
                    let right = pop_operand(&mut stack, pattern)?;
                    let left = pop_operand(&mut stack, pattern)?;
                    stack.push(left.concat(right));
                }
                _ => {}
            }
        }
    }

    pop_operand(&mut stack, pattern)
}

fn pop_operand(
    stack: &mut Vec<Automaton>,
    pattern: &str,
) -> Result<Automaton, AutomatonError> {
    stack
        .pop()
        .ok_or_else(|| AutomatonError::InvalidRegex(pattern.to_string()))
}

/// Scanner states for the validity check. The `Group*` states mirror the
/// top-level ones inside at least one open parenthesis; depth is tracked
/// separately.
#[derive(Clone, Copy, PartialEq)]
enum Scan {
    /// Nothing consumed yet, or only completed groups at depth zero.
    Empty,
    /// A literal at the top level.
    Atom,
    /// A `*`/`+`-suffixed item at the top level.
    Suffixed,
    /// A trailing `|` waiting for its right operand.
    Alternation,
    /// Immediately after `(`; the group still needs an atom.
    GroupOpen,
    /// A literal inside a group.
    GroupAtom,
    /// A `*`/`+`-suffixed item inside a group.
    GroupSuffixed,
    /// A trailing `|` inside a group.
    GroupAlternation,
    /// Immediately after `)`.
    GroupClosed,
}

/// Checks the pattern against the supported grammar: one pass tracking the
/// legal next-token set and the parenthesis balance. `|*` and `()` are the
/// canonical rejections; acceptance requires a complete expression and a
/// balance of zero.
fn is_valid(pattern: &str) -> bool {
    use Scan::*;

    let mut state = Empty;
    let mut depth: i32 = 0;

    for c in pattern.chars() {
        let next = match state {
            Empty | Alternation => match c {
                c if c.is_alphanumeric() => Some(Atom),
                '(' => Some(GroupOpen),
                _ => None,
            },
            Atom => match c {
                c if c.is_alphanumeric() => Some(Atom),
                '*' | '+' => Some(Suffixed),
                '|' => Some(Alternation),
                '(' => Some(GroupOpen),
                _ => None,
            },
            Suffixed => match c {
                c if c.is_alphanumeric() => Some(Atom),
                '|' => Some(Alternation),
                '(' => Some(GroupOpen),
                _ => None,
            },
            GroupOpen | GroupAlternation => match c {
                c if c.is_alphanumeric() => Some(GroupAtom),
                '(' => Some(GroupOpen),
                _ => None,
            },
            GroupAtom => match c {
                c if c.is_alphanumeric() => Some(GroupAtom),
                '*' | '+' => Some(GroupSuffixed),
                '|' => Some(GroupAlternation),
                ')' => Some(GroupClosed),
                '(' => Some(GroupOpen),
                _ => None,
            },
            GroupSuffixed => match c {
                c if c.is_alphanumeric() => Some(GroupAtom),
                '|' => Some(GroupAlternation),
                ')' => Some(GroupClosed),
                '(' => Some(GroupOpen),
                _ => None,
            },
            GroupClosed => match c {
                c if c.is_alphanumeric() => Some(GroupAtom),
                '*' | '+' => Some(GroupSuffixed),
                ')' => Some(GroupClosed),
                '|' => Some(GroupAlternation),
                '(' => Some(GroupOpen),
                _ => None,
            },
        };

        state = match next {
            Some(s) => s,
            None => return false,
        };
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }

    depth == 0
        && matches!(
            state,
            Empty | Atom | Suffixed | GroupAtom | GroupSuffixed | GroupClosed
        )
}

/// Inserts the explicit concatenation marker wherever two expressions are
/// juxtaposed: an item from {literal, `*`/`+`-suffixed item, `)`} followed
/// by an item from {literal, `(`}.
fn explicit_concat(pattern: &str) -> String {
    let mut output = String::with_capacity(pattern.len() * 2);
    let chars: Vec<char> = pattern.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        output.push(c);
        if let Some(&next) = chars.get(i + 1) {
            let ends_value = c.is_alphanumeric() || c == '*' || c == '+' || c == ')';
            let opens_value = next.is_alphanumeric() || next == '(';
            if ends_value && opens_value {
                output.push(CONCAT);
            }
        }
    }

    output
}

fn precedence(op: char) -> u8 {
    match op {
        '*' | '+' => 3,
        CONCAT => 2,
        '|' => 1,
        _ => 0,
    }
}

/// Shunting-yard reduction to postfix (Reverse-Polish) form over the
/// alphabet {literal, `*`, `+`, `|`, concatenation marker}.
fn to_postfix(pattern: &str) -> Result<String, AutomatonError> {
    let mut output = String::with_capacity(pattern.len());
    let mut operators: Vec<char> = Vec::new();

    for c in pattern.chars() {
        if c.is_alphanumeric() {
            output.push(c);
        } else if c == '(' {
            operators.push(c);
        } else if c == ')' {
            loop {
                match operators.pop() {
                    Some('(') => break,
                    Some(op) => output.push(op),
                    None => return Err(AutomatonError::UnbalancedParens),
                }
            }
        } else {
            while let Some(&top) = operators.last() {
                if top == '(' || precedence(top) < precedence(c) {
                    break;
                }
                output.push(top);
                operators.pop();
            }
            operators.push(c);
        }
    }

    while let Some(op) = operators.pop() {
        if op == '(' {
            return Err(AutomatonError::UnbalancedParens);
        }
        output.push(op);
    }

    Ok(output)
}

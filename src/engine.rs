//! The unified execution engine: deterministic transition-following for
//! DFAs, configuration-set simulation with per-state stack multiplicities
//! for NFAs and PDAs, and tape-per-configuration simulation for Turing
//! machines.
//!
//! Nondeterminism is logical breadth-first branching over an explicit
//! configuration set, not concurrency: every branch of a step is explored
//! before the next step begins, and every branch owns a private clone of its
//! stack or tape. The engine assumes a structurally valid automaton (see
//! `analyzer`); simulation itself cannot fail, it only accepts or rejects.

use std::thread;

use crate::automaton::{Automaton, StateId, Transition};
use crate::classifier::classify;
use crate::stack::Stack;
use crate::types::{MachineClass, Outcome, RunOptions};

/// The set of configurations reachable at one point of a run: each entry
/// pairs an active state with the independent stack or tape contents held
/// there. Entries keep insertion order, and sweeps are index-based so states
/// appended mid-pass still get processed; that ordering is what makes the
/// in-step epsilon closure converge.
#[derive(Debug, Default)]
struct ConfigSet {
    entries: Vec<(StateId, Vec<Stack>)>,
}

impl ConfigSet {
    fn new() -> Self {
        Self::default()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn state_at(&self, index: usize) -> StateId {
        self.entries[index].0
    }

    fn position(&self, state: StateId) -> Option<usize> {
        self.entries.iter().position(|(id, _)| *id == state)
    }

    /// Activates a state with no stacks yet. Returns false when it was
    /// already present.
    fn insert(&mut self, state: StateId) -> bool {
        if self.position(state).is_some() {
            return false;
        }
        self.entries.push((state, Vec::new()));
        true
    }

    /// The stacks currently held at a state. A state may be active with
    /// none, e.g. the start state before any push.
    fn stacks(&self, state: StateId) -> &[Stack] {
        match self.position(state) {
            Some(index) => &self.entries[index].1,
            None => &[],
        }
    }

    /// Adds one stack under a state, activating the state if needed.
    fn add_stack(&mut self, state: StateId, stack: Stack) {
        self.insert(state);
        let index = self.position(state).expect("state was just inserted");
        self.entries[index].1.push(stack);
    }

    fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }
}

/// Classifies the automaton and runs the matching simulation algorithm.
pub fn run(automaton: &Automaton, input: &str, options: &RunOptions) -> Outcome {
    run_classified(automaton, classify(automaton), input, options)
}

/// Runs an already-classified automaton. Batch callers classify once and
/// dispatch here per input line.
pub fn run_classified(
    automaton: &Automaton,
    class: MachineClass,
    input: &str,
    options: &RunOptions,
) -> Outcome {
    match class {
        MachineClass::Dfa => run_dfa(automaton, input, options),
        MachineClass::Nfa | MachineClass::Pda => run_nondeterministic(automaton, input, options),
        MachineClass::TuringMachine => run_turing(automaton, input, options),
    }
}

/// Deterministic run: follow the unique matching transition per input
/// character. A character with no matching transition rejects immediately
/// without consuming the rest of the input.
pub fn run_dfa(automaton: &Automaton, input: &str, options: &RunOptions) -> Outcome {
    let Some(mut current) = automaton.start_id() else {
        return Outcome::Rejected;
    };

    let chars: Vec<char> = input.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if options.trace {
            let rest: String = chars[i + 1..].iter().collect();
            println!("[{}]{}:", c, rest);
        }

        let state = automaton.state(current);
        let Some(transition) = state.transitions.iter().find(|t| t.symbol == Some(c)) else {
            return Outcome::Rejected;
        };

        if options.trace {
            let target = automaton.state(transition.target);
            let mark = if target.is_final { " [F]" } else { "" };
            println!("\t{} > {}{}", state.name, target.name, mark);
        }

        current = transition.target;
        pause(options);
    }

    if automaton.state(current).is_final {
        Outcome::Accepted
    } else {
        Outcome::Rejected
    }
}

/// Nondeterministic NFA/PDA run over a configuration set.
///
/// Per input character: epsilon transitions enrich the current set in place
/// (so states reached without consuming input are matched within the same
/// step), symbol matches build the next set, and one more epsilon pass runs
/// over the next set. An empty next set rejects immediately. After the input
/// is exhausted, any active final state accepts.
pub fn run_nondeterministic(automaton: &Automaton, input: &str, options: &RunOptions) -> Outcome {
    let Some(start) = automaton.start_id() else {
        return Outcome::Rejected;
    };

    let mut current = ConfigSet::new();
    current.insert(start);

    // The per-character loop closes the current set as it goes; only the
    // empty input needs an explicit up-front closure.
    if input.is_empty() {
        if options.trace {
            println!("[]:");
        }
        close_epsilon(automaton, &mut current, options);
    }

    let chars: Vec<char> = input.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if options.trace {
            let rest: String = chars[i + 1..].iter().collect();
            println!("[{}]{}:", c, rest);
        }

        let mut next = ConfigSet::new();

        let mut index = 0;
        while index < current.len() {
            let state = current.state_at(index);
            for transition in &automaton.state(state).transitions {
                if transition.is_epsilon() {
                    let stacks = current.stacks(state).to_vec();
                    advance(transition, stacks, &mut current);
                }
                if transition.symbol == Some(c) {
                    let stacks = current.stacks(state).to_vec();
                    let activated = advance(transition, stacks, &mut next);
                    if activated && options.trace {
                        trace_step(automaton, state, transition, &next, false);
                    }
                }
            }
            index += 1;
        }

        close_epsilon(automaton, &mut next, options);
        pause(options);

        current = next;
        if current.is_empty() {
            return Outcome::Rejected;
        }
    }

    if current.states().any(|id| automaton.state(id).is_final) {
        Outcome::Accepted
    } else {
        Outcome::Rejected
    }
}

/// Turing-machine run. Each configuration carries its own tape, seeded with
/// the whole input and the head on the leftmost cell; transitions are driven
/// by the symbol under the head rather than an input cursor. The loop has no
/// inherent bound: termination comes from the machine reaching a final state
/// (accept), every surviving state being a reject state, the configuration
/// set draining (reject), or the optional `max_steps` bound (reject).
pub fn run_turing(automaton: &Automaton, input: &str, options: &RunOptions) -> Outcome {
    let Some(start) = automaton.start_id() else {
        return Outcome::Rejected;
    };

    let mut current = ConfigSet::new();
    current.add_stack(start, Stack::from_input(input));

    let mut steps = 0usize;
    loop {
        if options.trace {
            println!("---------------");
        }

        let mut next = ConfigSet::new();

        for index in 0..current.len() {
            let state = current.state_at(index);
            for transition in &automaton.state(state).transitions {
                match transition.symbol {
                    None => {
                        // Epsilon moves fire regardless of the tape, but
                        // still apply their write and head move.
                        next.insert(transition.target);
                        for tape in current.stacks(state) {
                            next.add_stack(transition.target, shifted(tape, transition));
                        }
                    }
                    Some(symbol) => {
                        let mut activated = false;
                        for tape in current.stacks(state) {
                            if tape.read() == symbol {
                                activated = true;
                                next.add_stack(transition.target, shifted(tape, transition));
                            }
                        }
                        if activated {
                            next.insert(transition.target);
                            if options.trace {
                                trace_step(automaton, state, transition, &next, true);
                            }
                        }
                    }
                }
            }
        }

        propagate_epsilon(automaton, &mut next, options);
        pause(options);

        current = next;
        if current.is_empty() {
            return Outcome::Rejected;
        }

        let mut rejecting = 0;
        for state in current.states() {
            let s = automaton.state(state);
            if s.is_final {
                return Outcome::Accepted;
            }
            if s.is_reject {
                rejecting += 1;
            }
        }
        if rejecting == current.len() {
            return Outcome::Rejected;
        }

        steps += 1;
        if let Some(limit) = options.max_steps {
            if steps >= limit {
                return Outcome::Rejected;
            }
        }
    }
}

/// Applies a transition's stack rule to a snapshot of the source state's
/// stacks, contributing the results to `target` under the destination state.
/// Returns whether the destination was activated.
///
/// * no read, no write: carry every stack forward unmodified; the
///   destination activates even when the source holds no stacks.
/// * write only: push onto a clone of every stack, or start a fresh stack
///   when the source holds none.
/// * read (and optionally write): fires only for stacks whose top equals the
///   read symbol; each match is cloned, popped, and optionally pushed. This
///   per-instance filtering is the heart of nondeterministic branching: the
///   same destination may end a step holding several independent stacks.
fn advance(transition: &Transition, source_stacks: Vec<Stack>, target: &mut ConfigSet) -> bool {
    match (transition.read, transition.write) {
        (None, None) => {
            target.insert(transition.target);
            for stack in source_stacks {
                target.add_stack(transition.target, stack);
            }
            true
        }
        (None, Some(write)) => {
            if source_stacks.is_empty() {
                let mut fresh = Stack::new();
                fresh.push(write);
                target.add_stack(transition.target, fresh);
            } else {
                for mut stack in source_stacks {
                    stack.push(write);
                    target.add_stack(transition.target, stack);
                }
            }
            true
        }
        (Some(read), write) => {
            let mut matched = false;
            for mut stack in source_stacks {
                if stack.peek() == Some(read) {
                    matched = true;
                    stack.pop();
                    if let Some(symbol) = write {
                        stack.push(symbol);
                    }
                    target.add_stack(transition.target, stack);
                }
            }
            matched
        }
    }
}

/// Epsilon closure over a configuration set, in place. The sweep is
/// index-based, so states activated by one epsilon move have their own
/// epsilon transitions applied later in the same pass.
fn close_epsilon(automaton: &Automaton, set: &mut ConfigSet, options: &RunOptions) {
    let mut index = 0;
    while index < set.len() {
        let state = set.state_at(index);
        for transition in &automaton.state(state).transitions {
            if transition.is_epsilon() {
                let stacks = set.stacks(state).to_vec();
                let activated = advance(transition, stacks, set);
                if activated && options.trace {
                    trace_step(automaton, state, transition, set, false);
                }
            }
        }
        index += 1;
    }
}

/// Single-level epsilon propagation for Turing machines, run once over a
/// freshly built configuration set. Tape contents follow an epsilon edge
/// only when its target state is newly activated, so chains of consecutive
/// epsilon moves through already-active states are not fully closed. This
/// is a documented limitation of the step semantics, not an oversight; a
/// fixed-point closure would change machine behavior.
fn propagate_epsilon(automaton: &Automaton, set: &mut ConfigSet, options: &RunOptions) {
    let mut index = 0;
    while index < set.len() {
        let state = set.state_at(index);
        for transition in &automaton.state(state).transitions {
            if transition.is_epsilon() {
                let tapes = set.stacks(state).to_vec();
                let activated = set.insert(transition.target);
                if activated {
                    for tape in tapes {
                        set.add_stack(transition.target, shifted(&tape, transition));
                    }
                }
                if options.trace {
                    trace_step(automaton, state, transition, set, true);
                }
            }
        }
        index += 1;
    }
}

/// Clones a tape and applies a TM transition's write and head move.
fn shifted(tape: &Stack, transition: &Transition) -> Stack {
    let mut copy = tape.clone();
    if let Some(symbol) = transition.write {
        copy.write(symbol);
    }
    if let Some(direction) = transition.direction {
        copy.move_head(direction);
    }
    copy
}

fn trace_step(
    automaton: &Automaton,
    from: StateId,
    transition: &Transition,
    target_set: &ConfigSet,
    tape_mode: bool,
) {
    let target = automaton.state(transition.target);
    let mut line = format!("\t{} > {}", automaton.state(from).name, target.name);
    if target.is_final {
        line.push_str(" [F]");
    }
    if target.is_reject {
        line.push_str(" [R]");
    }
    for stack in target_set.stacks(transition.target) {
        line.push(' ');
        if tape_mode {
            line.push_str(&tape_view(stack));
        } else {
            line.push_str(&stack.contents());
        }
    }
    println!("{}", line);
}

/// Renders a tape with the head position bracketed, e.g. `a[b]c`.
fn tape_view(tape: &Stack) -> String {
    let mut out = String::new();
    for (i, &c) in tape.cells().iter().enumerate() {
        if i == tape.head() {
            out.push('[');
            out.push(c);
            out.push(']');
        } else {
            out.push(c);
        }
    }
    if tape.head() >= tape.cells().len() {
        out.push_str("[_]");
    }
    out
}

fn pause(options: &RunOptions) {
    if let Some(delay) = options.delay {
        thread::sleep(delay);
    }
}

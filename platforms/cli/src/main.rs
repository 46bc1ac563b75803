use clap::Parser;
use std::path::Path;
use std::process;
use std::time::Duration;

use automa::loader::{read_inputs, DefinitionLoader};
use automa::programs::DemoLibrary;
use automa::types::{AutomatonError, RunOptions};
use automa::{classify, encode, engine, regex_to_nfa, unreachable_states, Automaton};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Automaton definition file to run
    #[clap(short, long, group = "source")]
    file: Option<String>,

    /// Regular expression to compile into an NFA
    #[clap(short, long, group = "source")]
    regex: Option<String>,

    /// Built-in demo automaton to run
    #[clap(long, group = "source")]
    demo: Option<String>,

    /// List the built-in demo automata and exit
    #[clap(long)]
    list_demos: bool,

    /// Input strings to run against the automaton
    #[clap(short, long)]
    input: Vec<String>,

    /// File of newline-delimited input strings
    #[clap(long)]
    input_file: Option<String>,

    /// Print each configuration transition while running
    #[clap(short, long)]
    trace: bool,

    /// Seconds to pause between simulation steps
    #[clap(short, long)]
    delay: Option<f64>,

    /// Abort Turing machine runs after this many steps
    #[clap(long)]
    max_steps: Option<usize>,

    /// Print the automaton definition before running
    #[clap(short, long)]
    show: bool,

    /// Dump the automaton as JSON and exit
    #[clap(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.list_demos {
        for name in DemoLibrary::names() {
            println!("{}", name);
        }
        return;
    }

    let automaton = match load_automaton(&cli) {
        Ok(automaton) => automaton,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&automaton) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
        return;
    }

    if cli.show {
        print!("{}", encode(&automaton));
    }

    let unreachable = unreachable_states(&automaton);
    if !unreachable.is_empty() {
        eprintln!("Warning: unreachable states: {}", unreachable.join(", "));
    }

    let options = RunOptions {
        trace: cli.trace,
        delay: cli.delay.map(Duration::from_secs_f64),
        max_steps: cli.max_steps,
    };

    let class = classify(&automaton);
    if cli.trace {
        println!("Running as {}", class);
    }

    for input in &cli.input {
        let outcome = engine::run_classified(&automaton, class, input, &options);
        println!("=>{}\n\t{}", input, outcome);
    }

    if let Some(path) = &cli.input_file {
        let inputs = match read_inputs(Path::new(path)) {
            Ok(inputs) => inputs,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        };
        for input in &inputs {
            let outcome = engine::run_classified(&automaton, class, input, &options);
            println!("=>{}\n\t{}", input, outcome);
        }
    }
}

fn load_automaton(cli: &Cli) -> Result<Automaton, AutomatonError> {
    if let Some(path) = &cli.file {
        return DefinitionLoader::load_file(Path::new(path));
    }
    if let Some(pattern) = &cli.regex {
        return regex_to_nfa(pattern);
    }
    if let Some(name) = &cli.demo {
        return DemoLibrary::by_name(name);
    }
    Err(AutomatonError::ValidationError(
        "No automaton given; use --file, --regex, or --demo".to_string(),
    ))
}

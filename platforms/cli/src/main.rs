use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use turing_sd::{
    alphabet, diagnostics, encode_canonical, CompiledTable, DescriptionLoader, Halt, Machine,
    Program, ProgramManager, StateId, Step, Tape,
};

/// Decode and run Turing machine standard descriptions.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  turing-sd run 'DADDCRDAA;DAADDRDAAA;DAAADDCCRDAAAA;DAAAADDRDA;' --blanks 40
  turing-sd run --program ones-to-zeros --debug
  turing-sd convert --from number 31332531173113353111731113322531111731111335317")]
struct Cli {
    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a description and run it on a tape
    Run(RunArgs),
    /// Decode a description and print its transition table
    Decode(DecodeArgs),
    /// Show a description as machine number, letters and base 7
    Convert {
        /// The notation TEXT is written in
        #[clap(long, value_enum, default_value_t = Notation::Number)]
        from: Notation,
        text: String,
    },
    /// List the embedded programs
    List,
}

/// Where the description comes from.
#[derive(Args)]
struct Source {
    /// Standard description, or `-` to read it from stdin
    description: Option<String>,

    /// Load a `.sd` program file
    #[clap(short, long, conflicts_with = "description")]
    file: Option<PathBuf>,

    /// Use an embedded program by name
    #[clap(short, long, conflicts_with_all = ["description", "file"])]
    program: Option<String>,
}

#[derive(Args)]
struct RunArgs {
    #[clap(flatten)]
    source: Source,

    /// Initial tape of `_`, `0` and `1`
    #[clap(short, long, conflicts_with = "blanks")]
    tape: Option<String>,

    /// Start from this many blank cells
    #[clap(short, long)]
    blanks: Option<usize>,

    /// Stop after this many steps
    #[clap(long)]
    max_steps: Option<usize>,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print a JSON report instead of the bare tape
    #[clap(long)]
    json: bool,
}

#[derive(Args)]
struct DecodeArgs {
    #[clap(flatten)]
    source: Source,

    /// Print the canonical quintuple form
    #[clap(long)]
    canonical: bool,

    /// Print the table as JSON
    #[clap(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Notation {
    /// Digits 1-7
    Number,
    /// Letters A C D L R N ;
    Letters,
    /// Digits 0-6
    Base7,
}

#[derive(Serialize)]
struct RunReport<'a> {
    name: &'a str,
    tape: String,
    halt: Halt,
    steps: usize,
    state: StateId,
    head: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = execute(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn execute(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Run(args) => run(args),
        Command::Decode(args) => decode(args),
        Command::Convert { from, text } => {
            convert(from, &text);
            Ok(())
        }
        Command::List => {
            list()?;
            Ok(())
        }
    }
}

/// Resolves the program named by the source arguments.
fn load_program(source: &Source) -> Result<Program, Box<dyn Error>> {
    if let Some(name) = &source.program {
        return Ok(ProgramManager::get_program_by_name(name)?);
    }

    if let Some(path) = &source.file {
        return Ok(DescriptionLoader::load_program(path)?);
    }

    match source.description.as_deref() {
        Some("-") => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Failed to read from stdin: {}", e))?;
            Ok(DescriptionLoader::load_program_from_string("stdin", &buffer)?)
        }
        Some(text) => Ok(DescriptionLoader::load_program_from_string(
            "command line",
            text,
        )?),
        None => Err("no description given; pass one, or use --file or --program".into()),
    }
}

fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let program = load_program(&args.source)?;

    let tape: Tape = match (&args.tape, args.blanks, &program.tape) {
        (Some(text), _, _) => text.parse()?,
        (None, Some(len), _) => Tape::blank(len),
        (None, None, Some(text)) => text.parse()?,
        (None, None, None) => return Err("no tape given; use --tape or --blanks".into()),
    };

    for problem in diagnostics(&program.table) {
        warn!(?problem, "table analysis");
    }

    let compiled = CompiledTable::compile(&program.table);
    let mut machine = Machine::new(&compiled, tape);

    let halt = if args.debug {
        trace_run(&mut machine, args.max_steps)
    } else {
        match args.max_steps {
            Some(limit) => machine.run_for(limit),
            None => machine.run(),
        }
    };

    if args.json {
        let report = RunReport {
            name: &program.name,
            tape: machine.tape().to_string(),
            halt,
            steps: machine.step_count(),
            state: machine.state(),
            head: machine.head(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if let Halt::StepLimit(limit) = halt {
            eprintln!("Stopped after {} steps without halting.", limit);
        }
        println!("{}", machine.tape());
    }

    Ok(())
}

/// Steps the machine one transition at a time, printing every configuration.
fn trace_run(machine: &mut Machine<'_>, max_steps: Option<usize>) -> Halt {
    let print_state = |machine: &Machine<'_>| {
        let head = machine
            .head()
            .map_or_else(|| "-".to_string(), |h| h.to_string());
        eprintln!(
            "Step: {}, State: {}, Head: {}, Tape: {}",
            machine.step_count(),
            machine.state(),
            head,
            machine.tape()
        );
    };

    print_state(machine);

    loop {
        if max_steps.is_some_and(|limit| machine.step_count() >= limit) && !machine.is_halted() {
            return Halt::StepLimit(machine.step_count());
        }

        match machine.step() {
            Step::Continue => print_state(machine),
            Step::Halt(halt) => {
                eprintln!("\nMachine halted: {:?}", halt);
                return halt;
            }
        }
    }
}

fn decode(args: DecodeArgs) -> Result<(), Box<dyn Error>> {
    let program = load_program(&args.source)?;
    let table = &program.table;

    if args.json {
        println!("{}", serde_json::to_string_pretty(table)?);
    } else if args.canonical {
        println!("{}", encode_canonical(table));
    } else {
        for t in table.iter() {
            println!(
                "q{}: {} -> {}, {}, q{}",
                t.state,
                t.read,
                t.write,
                t.direction.letter(),
                t.next_state
            );
        }
    }

    for problem in diagnostics(table) {
        eprintln!("warning: {:?}", problem);
    }

    Ok(())
}

fn convert(from: Notation, text: &str) {
    let number = match from {
        Notation::Number => text.to_string(),
        Notation::Letters => alphabet::standard_description_to_machine_number(text),
        Notation::Base7 => alphabet::base7_to_machine_number(text),
    };

    println!("number:  {}", number);
    println!(
        "letters: {}",
        alphabet::machine_number_to_standard_description(&number)
    );
    println!("base7:   {}", alphabet::machine_number_to_base7(&number));
}

fn list() -> Result<(), Box<dyn Error>> {
    for index in 0..ProgramManager::get_program_count() {
        let info = ProgramManager::get_program_info(index)?;
        println!(
            "{:>2}  {:<16} {} state(s)  {}",
            info.index, info.name, info.state_count, info.description
        );
    }

    Ok(())
}

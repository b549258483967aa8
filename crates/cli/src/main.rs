//! SIC/XE emulator CLI.
//!
//! This binary drives the emulator through its public command surface. It provides:
//! 1. **Run:** Load an object program, run it to completion and print the final state.
//! 2. **Step:** Execute a fixed number of instructions, printing the state after each.
//! 3. **Symbols:** Load a program and list its control sections and symbols.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sicsim_core::common::Reg;
use sicsim_core::{Config, SimError, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "sicsim",
    author,
    version,
    about = "SIC/XE machine emulator",
    long_about = "Load linked SIC/XE object programs and execute them.\n\nDevices are files named <DEVICE>.<extension> in the device directory.\n\nExamples:\n  sicsim run copy.obj\n  sicsim step copy.obj -n 10 --device-dir ./device\n  sicsim symbols copy.obj"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Instruction catalog definition file (overrides the built-in catalog).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory holding device files.
    #[arg(long, global = true)]
    device_dir: Option<PathBuf>,

    /// Log every executed instruction.
    #[arg(long, global = true)]
    trace: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program to completion.
    Run {
        /// Object program.
        object: PathBuf,

        /// Stop after this many instructions.
        #[arg(long)]
        max_steps: Option<u64>,
    },

    /// Execute a program one instruction at a time.
    Step {
        /// Object program.
        object: PathBuf,

        /// Number of instructions to execute.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,
    },

    /// Print the symbol table of a program.
    Symbols {
        /// Object program.
        object: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match build_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    };
    init_tracing(cli.global.trace || config.general.trace_instructions);

    let result = match cli.command {
        Commands::Run { object, max_steps } => {
            cmd_run(&config, &object, max_steps.or(config.general.max_steps))
        }
        Commands::Step { object, count } => cmd_step(&config, &object, count),
        Commands::Symbols { object } => cmd_symbols(&config, &object),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Merges the configuration file with command-line overrides.
fn build_config(opts: &GlobalOpts) -> Result<Config, SimError> {
    let mut config = match &opts.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(catalog) = &opts.catalog {
        config.catalog.path = Some(catalog.clone());
    }
    if let Some(dir) = &opts.device_dir {
        config.devices.directory.clone_from(dir);
    }
    Ok(config)
}

fn init_tracing(trace: bool) {
    let default = if trace { "trace" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open(config: &Config, object: &Path) -> Result<Simulator, SimError> {
    let mut sim = Simulator::new(config)?;
    let info = sim.load_file(object)?;
    println!(
        "Program: {}  Start: {:06X}  Length: {:06X}  First instruction: {:06X}",
        info.name, info.start_address, info.length, info.first_instruction
    );
    Ok(sim)
}

fn cmd_run(config: &Config, object: &Path, max_steps: Option<u64>) -> Result<(), SimError> {
    let mut sim = open(config, object)?;
    let outcome = match max_steps {
        Some(limit) => sim.run_for(limit).map(|running| {
            if running {
                println!("Stopped after {limit} steps; program still running.");
            }
        }),
        None => sim.run(),
    };
    print_state(&sim);
    println!();
    println!("Executed {} instructions:", sim.log().len());
    let log: Vec<&str> = sim.log().iter().map(|m| m.as_str()).collect();
    println!("{}", log.join(" "));
    outcome
}

fn cmd_step(config: &Config, object: &Path, count: u64) -> Result<(), SimError> {
    let mut sim = open(config, object)?;
    for i in 1..=count {
        let continues = sim.step()?;
        println!();
        println!(
            "[{i}] {:06X}  {:<8}  {}",
            sim.current_address().unwrap_or_default(),
            sim.current_object_code().unwrap_or_default(),
            sim.disassembly().unwrap_or_default()
        );
        print_state(&sim);
        if !continues {
            println!("Program finished.");
            break;
        }
    }
    Ok(())
}

fn cmd_symbols(config: &Config, object: &Path) -> Result<(), SimError> {
    let sim = open(config, object)?;
    if let Some(program) = sim.program() {
        println!();
        println!("{:<8} {:>6} {:>6}", "SECTION", "START", "LENGTH");
        for section in &program.sections {
            println!("{:<8} {:06X} {:06X}", section.name, section.start, section.length);
        }
    }
    println!();
    println!("{:<8} {:>6}", "SYMBOL", "ADDR");
    for symbol in sim.symbols() {
        println!("{:<8} {:06X}", symbol.name, symbol.address);
    }
    Ok(())
}

fn print_state(sim: &Simulator) {
    let regs = sim.registers();
    for reg in Reg::ALL {
        print!("{:>2}={}  ", reg.name(), regs.hex(reg));
    }
    println!("F(acc)={}", regs.f);
    println!(
        "CC={}  Target={}  Device={}",
        sim.condition_code(),
        sim.last_target()
            .map_or_else(|| "-".to_owned(), |ta| format!("{ta:06X}")),
        sim.last_device().unwrap_or("-")
    );
}

//! CLI entry point for the Acc8 emulator binary.
//!
//! Every command works on a state file: it is loaded, acted on, and written
//! back when the command changes it.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use acc8_core::{Breakpoint, BreakpointKey, CoreConfig, Emulator, RunOutcome};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
#[cfg(test)]
use tempfile as _;

#[derive(Parser, Debug)]
#[command(
    name = "acc8",
    version,
    about = "Acc8 accumulator machine emulator",
    long_about = "Run, inspect and set breakpoints on Acc8 machine state files.\n\nExamples:\n  acc8 run program.state --steps 100\n  acc8 break add program.state 6 exit\n  acc8 list program.state"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Load a state file, execute instructions and save the result.
    Run {
        /// State file to load.
        state: PathBuf,

        /// Maximum number of instructions to execute.
        #[arg(short, long, default_value_t = 1)]
        steps: u32,

        /// Where to save the resulting state (default: overwrite STATE).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Log every executed instruction at trace level.
        #[arg(long)]
        trace: bool,
    },

    /// Print the program listing of a state file.
    List {
        /// State file to load.
        state: PathBuf,
    },

    /// Print registers, cycle count and breakpoints of a state file.
    Info {
        /// State file to load.
        state: PathBuf,
    },

    /// Edit the breakpoints stored in a state file.
    Break {
        #[command(subcommand)]
        action: BreakCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum BreakCommand {
    /// Add a named breakpoint.
    Add {
        /// State file to edit.
        state: PathBuf,
        /// Instruction address.
        address: u16,
        /// Breakpoint name (no whitespace).
        name: String,
    },
    /// Delete a breakpoint by address or by name.
    Del {
        /// State file to edit.
        state: PathBuf,
        /// Address (a number) or name of the breakpoint.
        target: String,
    },
}

fn level_for(verbose: u8, trace: bool) -> LevelFilter {
    if trace {
        return LevelFilter::Trace;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// A number selects by address when a breakpoint sits there; otherwise the
/// target is taken as a name, so numeric names stay deletable.
fn resolve_key<'t>(emu: &Emulator, target: &'t str) -> BreakpointKey<'t> {
    target
        .parse::<u16>()
        .ok()
        .map(BreakpointKey::Address)
        .filter(|key| emu.find_breakpoint(*key).is_some())
        .unwrap_or(BreakpointKey::Name(target))
}

fn load(path: &Path, config: CoreConfig) -> Result<Emulator> {
    let mut emu = Emulator::with_config(config);
    emu.load_state(path)
        .with_context(|| format!("failed to load state file {}", path.display()))?;
    log::info!("loaded {}", path.display());
    Ok(emu)
}

fn save(emu: &Emulator, path: &Path) -> Result<()> {
    emu.save_state(path)
        .with_context(|| format!("failed to save state file {}", path.display()))?;
    log::info!("saved {}", path.display());
    Ok(())
}

fn print_registers(emu: &Emulator) {
    println!("cycles: {}", emu.cycles());
    println!("acc:    {}", emu.read_accumulator());
    println!("pc:     {}", emu.read_program_counter());
}

fn run_program(state: &Path, steps: u32, output: Option<&Path>, trace: bool) -> Result<ExitCode> {
    let config = CoreConfig {
        tracing_enabled: trace,
        ..CoreConfig::default()
    };
    let mut emu = load(state, config)?;
    let outcome = emu.run(steps);

    let code = match outcome {
        RunOutcome::Completed { steps } => {
            println!("completed {steps} steps");
            ExitCode::SUCCESS
        }
        RunOutcome::Breakpoint { steps, address } => {
            let name = emu
                .find_breakpoint(BreakpointKey::Address(u16::from(address)))
                .map_or("?", Breakpoint::name);
            println!("stopped at breakpoint {name} ({address}) after {steps} steps");
            ExitCode::SUCCESS
        }
        RunOutcome::Fault { steps, cause, pc } => {
            eprintln!("fault at pc {pc} after {steps} steps: {cause}");
            ExitCode::FAILURE
        }
    };
    print_registers(&emu);
    save(&emu, output.unwrap_or(state))?;
    Ok(code)
}

fn list_program(state: &Path) -> Result<ExitCode> {
    let emu = load(state, CoreConfig::default())?;
    for row in emu.list_program() {
        println!("{row}");
    }
    Ok(ExitCode::SUCCESS)
}

fn show_info(state: &Path) -> Result<ExitCode> {
    let emu = load(state, CoreConfig::default())?;
    print_registers(&emu);
    println!("breakpoints: {}", emu.num_breakpoints());
    for breakpoint in emu.breakpoints() {
        println!("  {breakpoint}");
    }
    Ok(ExitCode::SUCCESS)
}

fn edit_breakpoints(action: BreakCommand) -> Result<ExitCode> {
    match action {
        BreakCommand::Add {
            state,
            address,
            name,
        } => {
            let mut emu = load(&state, CoreConfig::default())?;
            emu.insert_breakpoint(address, &name)
                .with_context(|| format!("cannot add breakpoint {name} at {address}"))?;
            save(&emu, &state)?;
            println!("added breakpoint {name} at {address}");
        }
        BreakCommand::Del { state, target } => {
            let mut emu = load(&state, CoreConfig::default())?;
            let key = resolve_key(&emu, &target);
            let removed = emu
                .delete_breakpoint(key)
                .with_context(|| format!("cannot delete breakpoint {target}"))?;
            save(&emu, &state)?;
            println!("deleted breakpoint {removed}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn dispatch(command: Command) -> Result<ExitCode> {
    match command {
        Command::Run {
            state,
            steps,
            output,
            trace,
        } => run_program(&state, steps, output.as_deref(), trace),
        Command::List { state } => list_program(&state),
        Command::Info { state } => show_info(&state),
        Command::Break { action } => edit_breakpoints(action),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let trace = matches!(cli.command, Command::Run { trace: true, .. });
    init_logging(level_for(cli.verbose, trace));

    match dispatch(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use acc8_core::{BreakpointKey, Emulator};
    use clap::Parser;
    use log::LevelFilter;

    use super::{level_for, resolve_key, BreakCommand, Cli, Command};

    #[test]
    fn parses_run_with_defaults() {
        let cli = Cli::try_parse_from(["acc8", "run", "prog.state"]).expect("valid args");
        assert_eq!(cli.verbose, 0);
        assert_eq!(
            cli.command,
            Command::Run {
                state: PathBuf::from("prog.state"),
                steps: 1,
                output: None,
                trace: false,
            }
        );
    }

    #[test]
    fn parses_run_options_and_global_verbosity() {
        let cli = Cli::try_parse_from([
            "acc8", "run", "prog.state", "--steps", "50", "-o", "out.state", "-vv",
        ])
        .expect("valid args");
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Command::Run {
                state: PathBuf::from("prog.state"),
                steps: 50,
                output: Some(PathBuf::from("out.state")),
                trace: false,
            }
        );
    }

    #[test]
    fn parses_breakpoint_subcommands() {
        let add = Cli::try_parse_from(["acc8", "break", "add", "s", "6", "exit"]).expect("add");
        assert_eq!(
            add.command,
            Command::Break {
                action: BreakCommand::Add {
                    state: PathBuf::from("s"),
                    address: 6,
                    name: "exit".to_string(),
                }
            }
        );

        let del = Cli::try_parse_from(["acc8", "break", "del", "s", "exit"]).expect("del");
        assert_eq!(
            del.command,
            Command::Break {
                action: BreakCommand::Del {
                    state: PathBuf::from("s"),
                    target: "exit".to_string(),
                }
            }
        );
    }

    #[test]
    fn rejects_missing_state_and_bad_numbers() {
        assert!(Cli::try_parse_from(["acc8", "info"]).is_err());
        assert!(Cli::try_parse_from(["acc8", "run", "s", "--steps", "-3"]).is_err());
        assert!(Cli::try_parse_from(["acc8", "break", "add", "s", "six", "exit"]).is_err());
        assert!(Cli::try_parse_from(["acc8", "frobnicate"]).is_err());
    }

    #[test]
    fn delete_target_prefers_address_then_name() {
        let mut emu = Emulator::new();
        emu.insert_breakpoint(12, "loop").expect("insert");
        emu.insert_breakpoint(4, "30").expect("insert");
        emu.insert_breakpoint(6, "+8").expect("insert");

        assert_eq!(resolve_key(&emu, "12"), BreakpointKey::Address(12));
        assert_eq!(resolve_key(&emu, "loop"), BreakpointKey::Name("loop"));
        assert_eq!(resolve_key(&emu, "30"), BreakpointKey::Name("30"));
        assert_eq!(resolve_key(&emu, "+8"), BreakpointKey::Name("+8"));
        assert_eq!(resolve_key(&emu, "12a"), BreakpointKey::Name("12a"));
    }

    #[test]
    fn verbosity_maps_to_log_levels() {
        assert_eq!(level_for(0, false), LevelFilter::Warn);
        assert_eq!(level_for(1, false), LevelFilter::Info);
        assert_eq!(level_for(2, false), LevelFilter::Debug);
        assert_eq!(level_for(3, false), LevelFilter::Trace);
        assert_eq!(level_for(9, false), LevelFilter::Trace);
        assert_eq!(level_for(0, true), LevelFilter::Trace);
    }
}

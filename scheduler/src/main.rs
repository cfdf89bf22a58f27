mod input;
mod output;
mod scheduler;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use input::Prompter;
use log::info;
use scheduler::{ProcessRunner, Simulation};
use std::{
    io::{self, Write},
    num::NonZeroU64,
    path::PathBuf,
};

/// Simulate single-CPU scheduling policies over a set of processes.
#[derive(Debug, Parser)]
#[command(name = "cpu-scheduling-simulator")]
struct Opts {
    /// Read processes from a CSV file of `pid,arrival,burst,priority`
    /// records (pid optional). Without it processes are entered
    /// interactively.
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Policies to run: any of 1/fcfs, 2/srtf, 3/priority, 4/rr, or
    /// 0/all. Prompted for when absent.
    #[arg(short, long, value_name = "LIST")]
    algorithms: Option<String>,

    /// Round Robin time quantum. Prompted for when Round Robin is
    /// selected and this is absent.
    #[arg(short, long, value_parser = input::parse_quantum)]
    quantum: Option<NonZeroU64>,

    /// Replay the finished runs tick by tick in the terminal.
    #[arg(long)]
    replay: bool,

    /// Enable verbose output. Specify multiple times to increase
    /// verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) -> Result<()> {
    let llv = match verbose {
        0 => simplelog::LevelFilter::Warn,
        1 => simplelog::LevelFilter::Info,
        2 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Off)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

fn replay(results: Vec<scheduler::SimulationResult>) -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All))?;

    let mut runner = ProcessRunner::new(results).context("Failed to set up the terminal")?;
    while runner.run()? {}
    drop(runner);

    execute!(io::stdout(), Clear(ClearType::All))?;
    Ok(())
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    init_logging(opts.verbose)?;

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
    println!("System Scheduler Simulator");

    let set = match &opts.csv {
        Some(path) => input::read_csv(path)
            .with_context(|| format!("Failed to load processes from {}", path.display()))?,
        None => prompter
            .read_processes()
            .context("Failed to read processes from the console")?,
    };
    info!("Loaded {} processes", set.len());

    let policies = match &opts.algorithms {
        Some(selection) => input::select_policies(selection),
        None => prompter.read_selection()?,
    };
    if policies.is_empty() {
        bail!("No known scheduling policy selected");
    }

    let quantum = match opts.quantum {
        None if policies.iter().any(|p| p.needs_quantum()) => Some(prompter.read_quantum()?),
        quantum => quantum,
    };

    let simulation = Simulation::new(set);
    let mut results = Vec::with_capacity(policies.len());
    let mut out = io::stdout().lock();
    for policy in policies {
        let result = simulation
            .run(policy, quantum)
            .with_context(|| format!("Failed to run {policy}"))?;
        output::write_result(&mut out, &result)?;
        writeln!(out, "---------------------------------------------")?;
        results.push(result);
    }

    if results.len() > 1 {
        output::write_comparison(&mut out, &results)?;
    }
    writeln!(out, "Simulation complete.")?;
    out.flush()?;
    drop(out);

    if opts.replay {
        replay(results)?;
    }
    Ok(())
}

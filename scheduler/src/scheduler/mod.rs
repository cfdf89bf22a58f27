mod display;
mod fcfs;
mod metrics;
mod priority;
mod process;
mod round_robin;
mod runner;
mod simulation;
mod srtf;
mod timeline;

use log::{debug, trace};
use std::{fmt, str::FromStr};

pub use fcfs::FcfsScheduler;
pub use metrics::Report;
pub use priority::PriorityScheduler;
pub use process::Process;
pub use round_robin::RoundRobinScheduler;
pub use runner::ProcessRunner;
pub use simulation::{ConfigError, ProcessSet, Simulation, SimulationResult};
pub use srtf::SrtfScheduler;
pub use timeline::Timeline;

pub type Pid = u32;
pub type Ticks = u64;

/// A single-CPU dispatch policy.
///
/// `schedule` receives a freshly reset copy of the process set, records
/// start, response and completion on it, and returns the CPU occupancy
/// of every simulated tick.
pub trait Scheduler {
    const NAME: &'static str;

    fn schedule(&self, processes: &mut [Process]) -> Timeline;
}

/// Shared loop of the tick-granular preemptive policies: before every
/// tick `select` picks the index of the process to run among those ready
/// at `now`, or `None` to leave the CPU idle.
fn run_preemptive<F>(processes: &mut [Process], select: F) -> Timeline
where
    F: Fn(&[Process], Ticks) -> Option<usize>,
{
    let mut timeline = Timeline::new();
    let mut now: Ticks = 0;
    let mut completed = processes.iter().filter(|p| p.is_finished()).count();
    let mut previous: Option<usize> = None;

    while completed < processes.len() {
        let Some(index) = select(&*processes, now) else {
            trace!("t={now} idle");
            timeline.push_idle();
            previous = None;
            now += 1;
            continue;
        };

        let process = &mut processes[index];
        if previous != Some(index) {
            debug!("t={now} dispatch P{}", process.pid());
        }
        process.dispatch(now);
        timeline.push(process.pid());
        if process.execute(now) {
            debug!("t={} P{} completed", now + 1, process.pid());
            completed += 1;
        }
        previous = Some(index);
        now += 1;
    }

    timeline
}

/// The policies a run can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    Fcfs,
    Srtf,
    Priority,
    RoundRobin,
}

impl Policy {
    pub const ALL: [Policy; 4] = [
        Policy::Fcfs,
        Policy::Srtf,
        Policy::Priority,
        Policy::RoundRobin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Fcfs => FcfsScheduler::NAME,
            Policy::Srtf => SrtfScheduler::NAME,
            Policy::Priority => PriorityScheduler::NAME,
            Policy::RoundRobin => RoundRobinScheduler::NAME,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::Srtf => "SRTF",
            Policy::Priority => "Priority",
            Policy::RoundRobin => "RR",
        }
    }

    pub fn needs_quantum(&self) -> bool {
        matches!(self, Policy::RoundRobin)
    }

    /// Parses a selection such as `"1 3"`, `"fcfs,rr"` or `"all"`.
    /// An empty selection, `0` or `all` selects every policy. Unknown
    /// identifiers are returned separately so the caller can report them.
    pub fn parse_selection(selection: &str) -> (Vec<Policy>, Vec<String>) {
        let tokens: Vec<&str> = selection
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .collect();

        let selects_all = |token: &&str| *token == "0" || token.eq_ignore_ascii_case("all");
        if tokens.is_empty() || tokens.iter().any(selects_all) {
            return (Policy::ALL.to_vec(), Vec::new());
        }

        let mut policies = Vec::new();
        let mut unknown = Vec::new();
        for token in tokens {
            match token.parse::<Policy>() {
                Ok(policy) => policies.push(policy),
                Err(_) => unknown.push(token.to_owned()),
            }
        }
        (policies, unknown)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicy(pub String);

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scheduling policy: {:?}", self.0)
    }
}

impl std::error::Error for UnknownPolicy {}

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "fcfs" => Ok(Policy::Fcfs),
            "2" | "srtf" | "sjf" => Ok(Policy::Srtf),
            "3" | "priority" | "prio" => Ok(Policy::Priority),
            "4" | "rr" | "round-robin" | "roundrobin" => Ok(Policy::RoundRobin),
            _ => Err(UnknownPolicy(s.to_owned())),
        }
    }
}

use super::{
    FcfsScheduler, Pid, Policy, PriorityScheduler, Process, Report, RoundRobinScheduler,
    Scheduler, SrtfScheduler, Timeline,
};
use log::info;
use std::{collections::HashSet, fmt, num::NonZeroU64};

/// Rejected run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Fewer than one process was supplied.
    InvalidProcessCount(i64),
    /// Round Robin needs a positive time quantum.
    InvalidQuantum(String),
    /// A process needs at least one tick of CPU time.
    ZeroBurst(Pid),
    /// Pids identify processes in the timeline and must be unique.
    DuplicatePid(Pid),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidProcessCount(count) => {
                write!(f, "invalid process count {count}: expected a positive integer")
            }
            ConfigError::InvalidQuantum(value) => {
                write!(f, "invalid time quantum {value:?}: expected a positive integer")
            }
            ConfigError::ZeroBurst(pid) => write!(f, "P{pid} has a burst time of zero"),
            ConfigError::DuplicatePid(pid) => write!(f, "P{pid} appears more than once"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A validated, pid-ordered list of processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSet {
    processes: Vec<Process>,
}

impl ProcessSet {
    pub fn new(mut processes: Vec<Process>) -> Result<Self, ConfigError> {
        if processes.is_empty() {
            return Err(ConfigError::InvalidProcessCount(0));
        }

        let mut seen = HashSet::with_capacity(processes.len());
        for process in &processes {
            if process.burst() == 0 {
                return Err(ConfigError::ZeroBurst(process.pid()));
            }
            if !seen.insert(process.pid()) {
                return Err(ConfigError::DuplicatePid(process.pid()));
            }
        }

        // Preemptive policies break ties by slice order, so keep it by pid.
        processes.sort_by_key(Process::pid);
        Ok(Self { processes })
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// An independent copy with every process reset, ready for a run.
    pub fn fresh_copy(&self) -> Vec<Process> {
        let mut copy = self.processes.clone();
        copy.iter_mut().for_each(Process::reset);
        copy
    }
}

/// Outcome of one policy run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub policy: Policy,
    pub quantum: Option<NonZeroU64>,
    pub processes: Vec<Process>,
    pub timeline: Timeline,
    pub report: Report,
}

impl SimulationResult {
    pub fn title(&self) -> String {
        match self.quantum {
            Some(quantum) => format!("{} (Quantum={quantum})", self.policy.name()),
            None => self.policy.name().to_owned(),
        }
    }
}

/// Runs policies over a canonical process set. Every run works on its own
/// reset copy, so runs never observe each other.
pub struct Simulation {
    set: ProcessSet,
}

impl Simulation {
    pub fn new(set: ProcessSet) -> Self {
        Self { set }
    }

    pub fn run(
        &self,
        policy: Policy,
        quantum: Option<NonZeroU64>,
    ) -> Result<SimulationResult, ConfigError> {
        let mut used_quantum = None;
        let (processes, timeline) = match policy {
            Policy::Fcfs => self.run_with(&FcfsScheduler),
            Policy::Srtf => self.run_with(&SrtfScheduler),
            Policy::Priority => self.run_with(&PriorityScheduler),
            Policy::RoundRobin => {
                let quantum =
                    quantum.ok_or_else(|| ConfigError::InvalidQuantum("none".into()))?;
                used_quantum = Some(quantum);
                self.run_with(&RoundRobinScheduler::new(quantum))
            }
        };

        let report = Report::compute(&processes, &timeline);
        info!(
            "{}: {} ticks, {} context switches",
            policy,
            timeline.len(),
            report.context_switches
        );

        Ok(SimulationResult {
            policy,
            quantum: used_quantum,
            processes,
            timeline,
            report,
        })
    }

    fn run_with<S: Scheduler>(&self, scheduler: &S) -> (Vec<Process>, Timeline) {
        let mut processes = self.set.fresh_copy();
        let timeline = scheduler.schedule(&mut processes);
        (processes, timeline)
    }
}

#[cfg(test)]
impl ProcessSet {
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }
}

#[cfg(test)]
impl Simulation {
    pub fn processes(&self) -> &ProcessSet {
        &self.set
    }
}

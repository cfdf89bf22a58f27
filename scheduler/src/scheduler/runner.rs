use std::{fmt, io};

use super::{display::DisplayTerminal, Process, SimulationResult, Ticks, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerEvent {
    Quit,
    Pause,
    Resume,
    Step,
    Next,
    Tick,
    None,
}

/// Where a process stands after a number of replayed ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    NotArrived,
    Waiting,
    Running,
    Finished,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProcessState::NotArrived => "not arrived",
            ProcessState::Waiting => "waiting",
            ProcessState::Running => "running",
            ProcessState::Finished => "finished",
        })
    }
}

pub fn process_state(process: &Process, timeline: &Timeline, tick: Ticks) -> ProcessState {
    if timeline.executed_before(process.pid(), tick) >= process.burst() {
        ProcessState::Finished
    } else if tick > 0 && timeline.slot(tick - 1) == Some(Some(process.pid())) {
        ProcessState::Running
    } else if process.arrival() > tick {
        ProcessState::NotArrived
    } else {
        ProcessState::Waiting
    }
}

/// Replay position: which run is shown and how many of its ticks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ReplayState {
    current: usize,
    tick: Ticks,
    paused: bool,
}

impl ReplayState {
    fn advance(&mut self, results: &[SimulationResult]) {
        if let Some(result) = results.get(self.current) {
            self.tick = (self.tick + 1).min(result.timeline.len());
        }
    }

    fn next_result(&mut self, results: &[SimulationResult]) {
        if !results.is_empty() {
            self.current = (self.current + 1) % results.len();
        }
        self.tick = 0;
    }

    // Returns false if the program should quit
    fn handle(&mut self, event: RunnerEvent, results: &[SimulationResult]) -> bool {
        match event {
            RunnerEvent::Quit => return false,
            RunnerEvent::Pause if !self.paused => self.paused = true,
            RunnerEvent::Resume if self.paused => self.paused = false,
            RunnerEvent::Step if self.paused => self.advance(results),
            RunnerEvent::Tick if !self.paused => self.advance(results),
            RunnerEvent::Next => self.next_result(results),
            _ => {}
        }
        true
    }
}

/// Replays finished runs tick by tick in the terminal.
pub struct ProcessRunner {
    terminal: DisplayTerminal,
    results: Vec<SimulationResult>,
    state: ReplayState,
}

impl ProcessRunner {
    pub fn new(results: Vec<SimulationResult>) -> Result<Self, io::Error> {
        let terminal = DisplayTerminal::new()?;

        Ok(Self {
            terminal,
            results,
            state: ReplayState::default(),
        })
    }

    // Returns false if the program should quit
    pub fn run(&mut self) -> Result<bool, io::Error> {
        let Some(result) = self.results.get(self.state.current) else {
            return Ok(false);
        };
        self.terminal.draw(result, self.state.tick, self.state.paused)?;

        let event = self.terminal.get_input();
        Ok(self.state.handle(event, &self.results))
    }
}

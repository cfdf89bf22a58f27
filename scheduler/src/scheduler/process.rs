use super::{Pid, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pid: Pid,
    arrival: Ticks,
    burst: Ticks,
    priority: i32,
    remaining: Ticks,
    start: Option<Ticks>,
    completion: Option<Ticks>,
    response: Option<Ticks>,
}

impl Process {
    pub fn with_priority(pid: Pid, arrival: Ticks, burst: Ticks, priority: i32) -> Self {
        Self {
            pid,
            arrival,
            burst,
            priority,
            remaining: burst,
            start: None,
            completion: None,
            response: None,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn arrival(&self) -> Ticks {
        self.arrival
    }

    pub fn burst(&self) -> Ticks {
        self.burst
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn remaining(&self) -> Ticks {
        self.remaining
    }

    pub fn start(&self) -> Option<Ticks> {
        self.start
    }

    pub fn completion(&self) -> Option<Ticks> {
        self.completion
    }

    pub fn response(&self) -> Option<Ticks> {
        self.response
    }

    pub fn reset(&mut self) {
        self.remaining = self.burst;
        self.start = None;
        self.completion = None;
        self.response = None;
    }

    pub fn has_arrived(&self, now: Ticks) -> bool {
        self.arrival <= now
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    pub fn is_ready(&self, now: Ticks) -> bool {
        self.has_arrived(now) && !self.is_finished()
    }

    /// Hands the CPU to the process at `now`. Only the first dispatch
    /// defines the start and response times.
    pub fn dispatch(&mut self, now: Ticks) {
        if self.start.is_none() {
            self.start = Some(now);
            self.response = Some(now - self.arrival);
        }
    }

    /// Runs the tick `[now, now + 1)`. Returns true once the process has
    /// no work left, in which case its completion is `now + 1`.
    pub fn execute(&mut self, now: Ticks) -> bool {
        debug_assert!(self.remaining > 0, "P{} executed with no work left", self.pid);
        self.remaining -= 1;
        if self.remaining == 0 {
            self.completion = Some(now + 1);
            return true;
        }
        false
    }
}

#[cfg(test)]
impl Process {
    pub fn new(pid: Pid, arrival: Ticks, burst: Ticks) -> Self {
        Process::with_priority(pid, arrival, burst, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_dispatch_defines_response() {
        let mut process = Process::new(1, 2, 3);
        process.dispatch(5);
        process.execute(5);
        process.dispatch(9);

        assert_eq!(process.start(), Some(5));
        assert_eq!(process.response(), Some(3));
        assert_eq!(process.remaining(), 2);
    }

    #[test]
    fn test_execute_records_completion() {
        let mut process = Process::new(1, 0, 2);
        process.dispatch(0);
        assert!(!process.execute(0));
        assert!(process.execute(1));
        assert_eq!(process.completion(), Some(2));
        assert!(process.is_finished());
        assert!(!process.is_ready(2));
    }

    #[test]
    fn test_reset_clears_run_state() {
        let mut process = Process::with_priority(4, 1, 2, 7);
        process.dispatch(1);
        process.execute(1);
        process.execute(2);
        process.reset();

        assert_eq!(process, Process::with_priority(4, 1, 2, 7));
    }

    #[test]
    fn test_not_ready_before_arrival() {
        let process = Process::new(1, 3, 1);
        assert!(!process.is_ready(2));
        assert!(process.is_ready(3));
    }
}

use super::{Pid, Process, Ticks, Timeline};

/// Timing of a single process over a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: i32,
    pub start: Ticks,
    pub completion: Ticks,
    pub waiting: Ticks,
    pub turnaround: Ticks,
    pub response: Ticks,
}

/// Per-process and aggregate metrics of one policy run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub processes: Vec<ProcessMetrics>,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    pub avg_response: f64,
    pub context_switches: usize,
    /// Percentage of ticks the CPU was busy.
    pub cpu_utilization: f64,
    /// Completed processes per tick.
    pub throughput: f64,
}

impl Report {
    /// Derives the report from a drained process set and its timeline.
    /// Every process must have completed.
    pub fn compute(processes: &[Process], timeline: &Timeline) -> Self {
        let per_process: Vec<ProcessMetrics> = processes.iter().map(process_metrics).collect();

        let n = per_process.len();
        let mean = |value: fn(&ProcessMetrics) -> Ticks| {
            if n == 0 {
                0.0
            } else {
                per_process.iter().map(value).sum::<Ticks>() as f64 / n as f64
            }
        };

        let elapsed = timeline.len().max(1) as f64;
        let total_burst: Ticks = processes.iter().map(Process::burst).sum();
        let completed = processes
            .iter()
            .filter(|process| process.completion().is_some())
            .count();

        Self {
            avg_waiting: mean(|m| m.waiting),
            avg_turnaround: mean(|m| m.turnaround),
            avg_response: mean(|m| m.response),
            context_switches: context_switches(timeline),
            cpu_utilization: total_burst as f64 / elapsed * 100.0,
            throughput: completed as f64 / elapsed,
            processes: per_process,
        }
    }
}

fn process_metrics(process: &Process) -> ProcessMetrics {
    debug_assert!(
        process.completion().is_some(),
        "P{} missing completion time",
        process.pid()
    );
    let completion = process.completion().unwrap_or_default();
    let start = process.start().unwrap_or_default();
    let turnaround = completion.saturating_sub(process.arrival());

    ProcessMetrics {
        pid: process.pid(),
        arrival: process.arrival(),
        burst: process.burst(),
        priority: process.priority(),
        start,
        completion,
        waiting: turnaround.saturating_sub(process.burst()),
        turnaround,
        response: process
            .response()
            .unwrap_or_else(|| start.saturating_sub(process.arrival())),
    }
}

/// Counts ticks whose occupant differs from the previous tick while the
/// previous tick was running a process. Leaving idle is never a switch.
pub fn context_switches(timeline: &Timeline) -> usize {
    timeline
        .slots()
        .windows(2)
        .filter(|pair| pair[0].is_some() && pair[0] != pair[1])
        .count()
}

#[cfg(test)]
impl Report {
    pub fn process(&self, pid: Pid) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|metrics| metrics.pid == pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(
        pid: Pid,
        arrival: Ticks,
        burst: Ticks,
        start: Ticks,
        completion: Ticks,
    ) -> Process {
        let mut process = Process::new(pid, arrival, burst);
        process.dispatch(start);
        for tick in (completion - burst)..completion {
            process.execute(tick);
        }
        process
    }

    #[test]
    fn test_metric_identities() {
        let timeline: Timeline = [Some(1); 8].into_iter().chain([Some(2); 4]).collect();
        let processes = vec![finished(1, 0, 8, 0, 8), finished(2, 1, 4, 8, 12)];
        let report = Report::compute(&processes, &timeline);

        let p2 = report.process(2).unwrap();
        assert_eq!(p2.turnaround, 11);
        assert_eq!(p2.waiting, 7);
        assert_eq!(p2.response, 7);
        assert_eq!(p2.turnaround, p2.waiting + p2.burst);
        assert_eq!(report.avg_waiting, 3.5);
        assert_eq!(report.avg_turnaround, 9.5);
        assert_eq!(report.context_switches, 1);
        assert_eq!(report.cpu_utilization, 100.0);
        assert_eq!(report.throughput, 2.0 / 12.0);
    }

    #[test]
    fn test_idle_ticks_lower_utilization() {
        let timeline: Timeline = [None, None, Some(1), Some(1)].into_iter().collect();
        let processes = vec![finished(1, 2, 2, 2, 4)];
        let report = Report::compute(&processes, &timeline);

        assert_eq!(report.cpu_utilization, 50.0);
        assert_eq!(report.context_switches, 0);
    }

    #[test]
    fn test_leaving_idle_is_not_a_switch() {
        let timeline: Timeline = [Some(1), None, Some(2), Some(3), Some(3), Some(1)]
            .into_iter()
            .collect();
        // 1 -> idle, 2 -> 3, 3 -> 1
        assert_eq!(context_switches(&timeline), 3);
    }

    #[test]
    fn test_empty_run() {
        let report = Report::compute(&[], &Timeline::new());
        assert_eq!(report.avg_waiting, 0.0);
        assert_eq!(report.throughput, 0.0);
        assert_eq!(report.cpu_utilization, 0.0);
        assert_eq!(report.context_switches, 0);
    }
}

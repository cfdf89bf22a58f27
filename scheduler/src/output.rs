use crate::scheduler::{Report, SimulationResult, Timeline};
use std::io::{self, Write};

const TICK_WIDTH: usize = 6;

pub fn write_result<W: Write>(out: &mut W, result: &SimulationResult) -> io::Result<()> {
    writeln!(out, "=== {} ===", result.title())?;
    write_report(out, &result.report)?;
    write_gantt(out, &result.timeline)
}

pub fn write_report<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    for p in &report.processes {
        writeln!(
            out,
            "P{} : Arrival={}, Burst={}, Priority={}, Start={}, Completion={}, WT={}, TAT={}, Resp={}",
            p.pid,
            p.arrival,
            p.burst,
            p.priority,
            p.start,
            p.completion,
            p.waiting,
            p.turnaround,
            p.response
        )?;
    }

    writeln!(out, "\nSummary:")?;
    writeln!(out, "Avg Waiting Time  = {:.3}", report.avg_waiting)?;
    writeln!(out, "Avg Turnaround    = {:.3}", report.avg_turnaround)?;
    writeln!(out, "Avg Response Time = {:.3}", report.avg_response)?;
    writeln!(out, "Context Switches  = {}", report.context_switches)?;
    writeln!(out, "Throughput (proc/unit time) = {:.3}", report.throughput)?;
    writeln!(out, "CPU Utilization = {:.3} %\n", report.cpu_utilization)
}

/// One cell per tick, followed by a row of tick boundaries.
pub fn write_gantt<W: Write>(out: &mut W, timeline: &Timeline) -> io::Result<()> {
    writeln!(out, "\nGantt Chart:")?;
    write!(out, "|")?;
    for slot in timeline.slots() {
        match slot {
            Some(pid) => write!(out, " P{pid:<3}|")?,
            None => write!(out, " Idle |")?,
        }
    }
    writeln!(out)?;

    write!(out, "0")?;
    for tick in 1..=timeline.len() {
        write!(out, "{tick:>TICK_WIDTH$}")?;
    }
    writeln!(out, "\n")
}

/// Side-by-side aggregates of several runs.
pub fn write_comparison<W: Write>(out: &mut W, results: &[SimulationResult]) -> io::Result<()> {
    writeln!(out, "Comparison:")?;
    writeln!(
        out,
        "{:<10} {:>10} {:>10} {:>10} {:>9} {:>11} {:>9}",
        "Policy", "Avg WT", "Avg TAT", "Avg Resp", "Switches", "Throughput", "CPU %"
    )?;
    for result in results {
        let report = &result.report;
        writeln!(
            out,
            "{:<10} {:>10.3} {:>10.3} {:>10.3} {:>9} {:>11.3} {:>9.3}",
            result.policy.short_name(),
            report.avg_waiting,
            report.avg_turnaround,
            report.avg_response,
            report.context_switches,
            report.throughput,
            report.cpu_utilization
        )?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{Policy, Process, ProcessSet, Simulation};
    use std::num::NonZeroU64;

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn fcfs_result() -> SimulationResult {
        let set = ProcessSet::new(vec![Process::new(1, 0, 2), Process::new(2, 3, 1)]).unwrap();
        Simulation::new(set).run(Policy::Fcfs, None).unwrap()
    }

    #[test]
    fn test_gantt_chart() {
        let chart = render(|out| write_gantt(out, &fcfs_result().timeline));
        assert_eq!(
            chart,
            "\nGantt Chart:\n| P1  | P1  | Idle | P2  |\n0     1     2     3     4\n\n"
        );
    }

    #[test]
    fn test_report_lines() {
        let text = render(|out| write_report(out, &fcfs_result().report));
        assert!(text.contains(
            "P2 : Arrival=3, Burst=1, Priority=0, Start=3, Completion=4, WT=0, TAT=1, Resp=0\n"
        ));
        assert!(text.contains("Avg Turnaround    = 1.500\n"));
        assert!(text.contains("Context Switches  = 1\n"));
        assert!(text.contains("CPU Utilization = 75.000 %\n"));
    }

    #[test]
    fn test_result_title_includes_quantum() {
        let set = ProcessSet::new(vec![Process::new(1, 0, 1)]).unwrap();
        let result = Simulation::new(set)
            .run(Policy::RoundRobin, NonZeroU64::new(3))
            .unwrap();
        let text = render(|out| write_result(out, &result));
        assert!(text.starts_with("=== Round Robin (Quantum=3) ===\n"));
    }

    #[test]
    fn test_comparison_has_a_row_per_run() {
        let results = vec![fcfs_result(), fcfs_result()];
        let text = render(|out| write_comparison(out, &results));
        assert_eq!(text.lines().filter(|line| line.starts_with("FCFS")).count(), 2);
    }
}

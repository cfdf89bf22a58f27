use super::{run_preemptive, Process, Scheduler, Ticks, Timeline};

/// Preemptive shortest-job-first, re-evaluated at every tick.
///
/// Among equally short candidates the first in slice order wins, which is
/// the lowest pid for a pid-sorted set.
pub struct SrtfScheduler;

impl SrtfScheduler {
    fn select(processes: &[Process], now: Ticks) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (index, process) in processes.iter().enumerate() {
            if !process.is_ready(now) {
                continue;
            }
            match best {
                Some(current) if processes[current].remaining() <= process.remaining() => {}
                _ => best = Some(index),
            }
        }
        best
    }
}

impl Scheduler for SrtfScheduler {
    const NAME: &'static str = "SRTF (Preemptive SJF)";

    fn schedule(&self, processes: &mut [Process]) -> Timeline {
        run_preemptive(processes, SrtfScheduler::select)
    }
}

use super::{Process, Scheduler, Ticks, Timeline};
use log::{debug, trace};
use std::{collections::VecDeque, num::NonZeroU64};

pub struct RoundRobinScheduler {
    quantum: NonZeroU64,
}

/// FIFO of process indices. A process is queued at most once; the flag
/// stays set while it is running so that the arrival scan skips it.
struct ReadyQueue {
    queue: VecDeque<usize>,
    queued: Vec<bool>,
}

impl ReadyQueue {
    fn new(len: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(len),
            queued: vec![false; len],
        }
    }

    /// Appends, in index order, every process that has arrived by `now`
    /// and is neither queued nor finished.
    fn admit_arrivals(&mut self, processes: &[Process], now: Ticks) {
        for (index, process) in processes.iter().enumerate() {
            if !self.queued[index] && process.is_ready(now) {
                trace!("t={now} P{} joins the ready queue", process.pid());
                self.queue.push_back(index);
                self.queued[index] = true;
            }
        }
    }

    fn pop(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    fn requeue(&mut self, index: usize) {
        self.queue.push_back(index);
    }
}

impl RoundRobinScheduler {
    pub fn new(quantum: NonZeroU64) -> Self {
        Self { quantum }
    }
}

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "Round Robin";

    fn schedule(&self, processes: &mut [Process]) -> Timeline {
        let mut timeline = Timeline::new();
        let mut ready = ReadyQueue::new(processes.len());
        let mut now: Ticks = 0;
        let mut completed = processes.iter().filter(|p| p.is_finished()).count();

        while completed < processes.len() {
            ready.admit_arrivals(processes, now);

            let Some(index) = ready.pop() else {
                trace!("t={now} idle");
                timeline.push_idle();
                now += 1;
                continue;
            };

            let slice = self.quantum.get().min(processes[index].remaining());
            debug!("t={now} dispatch P{} for {slice}", processes[index].pid());
            processes[index].dispatch(now);

            for _ in 0..slice {
                timeline.push(processes[index].pid());
                processes[index].execute(now);
                now += 1;
                // Arrivals during the slice queue up ahead of the preempted process.
                ready.admit_arrivals(processes, now);
            }

            if processes[index].is_finished() {
                debug!("t={now} P{} completed", processes[index].pid());
                completed += 1;
            } else {
                ready.requeue(index);
            }
        }

        timeline
    }
}

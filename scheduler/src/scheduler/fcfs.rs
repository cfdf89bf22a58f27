use super::{Process, Scheduler, Ticks, Timeline};
use log::{debug, trace};

/// Non-preemptive: processes run to completion in arrival order.
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    const NAME: &'static str = "FCFS (Non-preemptive)";

    fn schedule(&self, processes: &mut [Process]) -> Timeline {
        let mut order: Vec<usize> = (0..processes.len()).collect();
        order.sort_by_key(|&index| (processes[index].arrival(), processes[index].pid()));

        let mut timeline = Timeline::new();
        let mut now: Ticks = 0;

        for index in order {
            let process = &mut processes[index];
            while now < process.arrival() {
                trace!("t={now} idle");
                timeline.push_idle();
                now += 1;
            }

            debug!("t={now} dispatch P{}", process.pid());
            process.dispatch(now);
            while !process.is_finished() {
                timeline.push(process.pid());
                process.execute(now);
                now += 1;
            }
        }

        timeline
    }
}

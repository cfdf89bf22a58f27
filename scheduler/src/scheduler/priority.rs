use super::{run_preemptive, Process, Scheduler, Ticks, Timeline};

/// Preemptive priority scheduling, lower value runs first.
///
/// Equal priorities fall back to the shorter remaining time, then to the
/// first candidate in slice order.
pub struct PriorityScheduler;

impl PriorityScheduler {
    fn select(processes: &[Process], now: Ticks) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (index, process) in processes.iter().enumerate() {
            if !process.is_ready(now) {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => {
                    let current = &processes[current];
                    (process.priority(), process.remaining())
                        < (current.priority(), current.remaining())
                }
            };
            if better {
                best = Some(index);
            }
        }
        best
    }
}

impl Scheduler for PriorityScheduler {
    const NAME: &'static str = "Preemptive Priority Scheduling";

    fn schedule(&self, processes: &mut [Process]) -> Timeline {
        run_preemptive(processes, PriorityScheduler::select)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgent_arrival_preempts() {
        let mut processes = vec![
            Process::with_priority(1, 0, 4, 3),
            Process::with_priority(2, 1, 2, 1),
        ];
        let timeline = PriorityScheduler.schedule(&mut processes);

        assert_eq!(
            timeline.slots(),
            &[Some(1), Some(2), Some(2), Some(1), Some(1), Some(1)]
        );
        assert_eq!(processes[1].completion(), Some(3));
        assert_eq!(processes[0].completion(), Some(6));
    }

    #[test]
    fn test_equal_priority_prefers_shorter_remaining() {
        let mut processes = vec![
            Process::with_priority(1, 0, 5, 2),
            Process::with_priority(2, 0, 2, 2),
        ];
        let timeline = PriorityScheduler.schedule(&mut processes);

        assert_eq!(timeline.first_tick_of(2), Some(0));
        assert_eq!(timeline.first_tick_of(1), Some(2));
    }

    #[test]
    fn test_full_tie_goes_to_first_in_order() {
        let mut processes = vec![
            Process::with_priority(1, 0, 2, 0),
            Process::with_priority(2, 0, 2, 0),
        ];
        let timeline = PriorityScheduler.schedule(&mut processes);

        assert_eq!(timeline.slots(), &[Some(1), Some(1), Some(2), Some(2)]);
    }

    #[test]
    fn test_low_priority_waits_but_finishes() {
        let mut processes = vec![
            Process::with_priority(1, 0, 1, 9),
            Process::with_priority(2, 0, 3, 0),
            Process::with_priority(3, 1, 3, 0),
        ];
        PriorityScheduler.schedule(&mut processes);

        assert_eq!(processes[0].completion(), Some(7));
    }
}

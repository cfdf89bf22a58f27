use super::{Pid, Ticks};

/// What the CPU was doing during one tick: `None` when idle.
pub type Slot = Option<Pid>;

/// CPU occupancy of a finished run, one slot per simulated tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    slots: Vec<Slot>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_idle(&mut self) {
        self.slots.push(None);
    }

    pub fn push(&mut self, pid: Pid) {
        self.slots.push(Some(pid));
    }

    pub fn len(&self) -> Ticks {
        self.slots.len() as Ticks
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, tick: Ticks) -> Option<Slot> {
        self.slots.get(tick as usize).copied()
    }

    /// Ticks spent running `pid` strictly before `tick`.
    pub fn executed_before(&self, pid: Pid, tick: Ticks) -> Ticks {
        let end = (tick as usize).min(self.slots.len());
        self.slots[..end]
            .iter()
            .filter(|slot| **slot == Some(pid))
            .count() as Ticks
    }
}

impl FromIterator<Slot> for Timeline {
    fn from_iter<I: IntoIterator<Item = Slot>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl Timeline {
    pub fn occupied_by(&self, pid: Pid) -> Ticks {
        self.executed_before(pid, self.len())
    }

    pub fn first_tick_of(&self, pid: Pid) -> Option<Ticks> {
        self.slots
            .iter()
            .position(|slot| *slot == Some(pid))
            .map(|tick| tick as Ticks)
    }
}

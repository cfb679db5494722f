//! Per-slot counts of people still eligible for assignment.

use crate::grid::{Slot, TimeGrid};
use crate::roster::Roster;

/// Number of people Empty and under the maximum quota, per cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityCounts {
    slots_per_day: usize,
    counts: Vec<u32>,
}

impl AvailabilityCounts {
    /// Scan every schedule in the roster.
    pub fn collect(roster: &Roster, grid: &TimeGrid, max_quota: u32) -> Self {
        let mut counts = vec![0u32; grid.cell_count()];
        for person in roster.iter().filter(|p| p.num_works() < max_quota) {
            for slot in grid.slots() {
                if person.is_eligible(slot, max_quota) {
                    counts[grid.flat(slot)] += 1;
                }
            }
        }
        Self {
            slots_per_day: grid.slots_per_day(),
            counts,
        }
    }

    #[inline]
    pub fn get(&self, slot: Slot) -> u32 {
        self.counts[slot.day * self.slots_per_day + slot.index]
    }

    /// Cells nobody can take any more.
    pub fn dead_cells(&self) -> usize {
        self.counts.iter().filter(|&&c| c == 0).count()
    }
}

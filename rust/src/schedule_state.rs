//! Per-person schedule state: cell grid, assigned units and weight vector.

use thiserror::Error;

use crate::grid::{Slot, TimeGrid};
use crate::models::{CellState, PersonRecord};

/// Attempt to assign work to a cell that was not Empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cell (day {}, slot {}) is {state:?}, not Empty", .slot.day, .slot.index)]
pub struct OccupiedCell {
    pub slot: Slot,
    pub state: CellState,
}

/// Mutable schedule of one person during matching.
#[derive(Clone, Debug)]
pub struct PersonSchedule {
    id: String,
    slots_per_day: usize,
    cells: Vec<CellState>,
    /// Recomputed every iteration; meaningless between iterations.
    weights: Vec<f64>,
    num_works: u32,
}

impl PersonSchedule {
    /// Build from a parsed record. The record length must match the grid.
    pub fn from_record(record: PersonRecord, grid: &TimeGrid) -> Self {
        debug_assert_eq!(record.cells.len(), grid.cell_count());
        let cells = record.cells;
        Self {
            id: record.id,
            slots_per_day: grid.slots_per_day(),
            weights: vec![0.0; cells.len()],
            cells,
            num_works: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Assigned units so far.
    pub fn num_works(&self) -> u32 {
        self.num_works
    }

    #[inline]
    fn flat(&self, slot: Slot) -> usize {
        slot.day * self.slots_per_day + slot.index
    }

    #[inline]
    pub fn state(&self, slot: Slot) -> CellState {
        self.cells[self.flat(slot)]
    }

    /// Cell states of one day, in slot order.
    pub fn day(&self, day: usize) -> &[CellState] {
        let start = day * self.slots_per_day;
        &self.cells[start..start + self.slots_per_day]
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Empty here and still under the maximum quota.
    pub fn is_eligible(&self, slot: Slot, max_quota: u32) -> bool {
        self.num_works < max_quota && self.state(slot) == CellState::Empty
    }

    /// Whether any edge slot of the week holds work.
    pub fn has_edge_work(&self, grid: &TimeGrid) -> bool {
        let last = grid.slots_per_day() - 1;
        (0..grid.days()).any(|day| {
            let cells = self.day(day);
            cells[0] == CellState::Work || cells[last] == CellState::Work
        })
    }

    #[inline]
    pub fn weight(&self, slot: Slot) -> f64 {
        self.weights[self.flat(slot)]
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Replace the weight vector with a freshly computed one.
    pub fn set_weights(&mut self, weights: Vec<f64>) {
        debug_assert_eq!(weights.len(), self.cells.len());
        self.weights = weights;
    }

    /// Flip an Empty cell to Work and add its duration.
    pub fn assign_work(&mut self, slot: Slot, grid: &TimeGrid) -> Result<(), OccupiedCell> {
        let idx = self.flat(slot);
        let state = self.cells[idx];
        if state != CellState::Empty {
            return Err(OccupiedCell { slot, state });
        }
        self.cells[idx] = CellState::Work;
        self.num_works += grid.duration(slot.index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_person(grid: &TimeGrid, class_cells: &[Slot]) -> PersonSchedule {
        let mut record = PersonRecord::uniform("amy", grid.cell_count(), CellState::Empty);
        for &slot in class_cells {
            record.cells[grid.flat(slot)] = CellState::Class;
        }
        PersonSchedule::from_record(record, grid)
    }

    #[test]
    fn test_assign_work_adds_duration() {
        let grid = TimeGrid::default_week();
        let mut person = make_person(&grid, &[]);

        person.assign_work(Slot::new(0, 0), &grid).unwrap();
        assert_eq!(person.num_works(), 3);
        person.assign_work(Slot::new(2, 7), &grid).unwrap();
        assert_eq!(person.num_works(), 4);
        assert_eq!(person.state(Slot::new(2, 7)), CellState::Work);
    }

    #[test]
    fn test_assign_to_class_fails() {
        let grid = TimeGrid::default_week();
        let mut person = make_person(&grid, &[Slot::new(1, 3)]);

        let err = person.assign_work(Slot::new(1, 3), &grid).unwrap_err();
        assert_eq!(err.slot, Slot::new(1, 3));
        assert_eq!(err.state, CellState::Class);
        assert_eq!(person.num_works(), 0);
        assert_eq!(person.state(Slot::new(1, 3)), CellState::Class);
    }

    #[test]
    fn test_work_is_terminal() {
        let grid = TimeGrid::default_week();
        let mut person = make_person(&grid, &[]);
        person.assign_work(Slot::new(0, 4), &grid).unwrap();

        let err = person.assign_work(Slot::new(0, 4), &grid).unwrap_err();
        assert_eq!(err.state, CellState::Work);
        assert_eq!(person.num_works(), 1);
    }

    #[test]
    fn test_eligibility() {
        let grid = TimeGrid::default_week();
        let mut person = make_person(&grid, &[Slot::new(0, 2)]);

        assert!(person.is_eligible(Slot::new(0, 1), 13));
        assert!(!person.is_eligible(Slot::new(0, 2), 13));
        person.assign_work(Slot::new(0, 0), &grid).unwrap();
        assert!(!person.is_eligible(Slot::new(0, 1), 3));
    }

    #[test]
    fn test_edge_work_detection() {
        let grid = TimeGrid::default_week();
        let mut person = make_person(&grid, &[]);
        assert!(!person.has_edge_work(&grid));
        person.assign_work(Slot::new(3, 7), &grid).unwrap();
        assert!(!person.has_edge_work(&grid));
        person.assign_work(Slot::new(4, 15), &grid).unwrap();
        assert!(person.has_edge_work(&grid));
    }
}

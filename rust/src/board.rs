//! Append-only board of slot occupants.

use thiserror::Error;

use crate::grid::{Slot, TimeGrid};
use crate::roster::PersonIdx;

/// Rejected board writes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Slot (day {}, slot {}) is full ({capacity} occupants)", .slot.day, .slot.index)]
    Full { slot: Slot, capacity: usize },
    #[error("Person {person} already occupies slot (day {}, slot {})", .slot.day, .slot.index)]
    Duplicate { slot: Slot, person: PersonIdx },
}

/// Per-slot occupant lists. Occupancy only ever grows.
#[derive(Clone, Debug)]
pub struct AssignmentBoard {
    slots_per_day: usize,
    days: usize,
    capacity: usize,
    cells: Vec<Vec<PersonIdx>>,
}

impl AssignmentBoard {
    pub fn new(grid: &TimeGrid, capacity: usize) -> Self {
        Self {
            slots_per_day: grid.slots_per_day(),
            days: grid.days(),
            capacity,
            cells: vec![Vec::with_capacity(capacity); grid.cell_count()],
        }
    }

    #[inline]
    fn flat(&self, slot: Slot) -> usize {
        slot.day * self.slots_per_day + slot.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a person to a slot.
    pub fn assign(&mut self, slot: Slot, person: PersonIdx) -> Result<(), BoardError> {
        let capacity = self.capacity;
        let idx = self.flat(slot);
        let occupants = &mut self.cells[idx];
        if occupants.len() >= capacity {
            return Err(BoardError::Full { slot, capacity });
        }
        if occupants.contains(&person) {
            return Err(BoardError::Duplicate { slot, person });
        }
        occupants.push(person);
        Ok(())
    }

    /// Occupants of a slot in assignment order.
    #[inline]
    pub fn occupants(&self, slot: Slot) -> &[PersonIdx] {
        &self.cells[self.flat(slot)]
    }

    #[inline]
    pub fn occupancy(&self, slot: Slot) -> usize {
        self.cells[self.flat(slot)].len()
    }

    #[inline]
    pub fn is_full(&self, slot: Slot) -> bool {
        self.occupancy(slot) >= self.capacity
    }

    /// Total assignments across the week.
    pub fn total(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// Full grid `[day][slot]` of occupant lists, mapped through `resolve`.
    pub fn snapshot<T, F>(&self, mut resolve: F) -> Vec<Vec<Vec<T>>>
    where
        F: FnMut(PersonIdx) -> T,
    {
        (0..self.days)
            .map(|day| {
                (0..self.slots_per_day)
                    .map(|index| {
                        self.occupants(Slot { day, index })
                            .iter()
                            .map(|&p| resolve(p))
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }
}

//! Core data types for the shift matcher.

use std::collections::HashMap;

/// State of one person's cell in the week grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    /// Free and assignable.
    #[default]
    Empty,
    /// Occupied by a class; never changes.
    Class,
    /// Assigned work; terminal once set.
    Work,
}

/// One parsed input record: a person and their fixed class grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonRecord {
    pub id: String,
    /// Day-major cell states; only `Empty` and `Class` appear in input.
    pub cells: Vec<CellState>,
}

impl PersonRecord {
    pub fn new(id: impl Into<String>, cells: Vec<CellState>) -> Self {
        Self {
            id: id.into(),
            cells,
        }
    }

    /// Record with every cell set to the same state.
    pub fn uniform(id: impl Into<String>, cells: usize, state: CellState) -> Self {
        Self::new(id, vec![state; cells])
    }
}

/// Outcome of a matching run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchResult {
    /// Occupants per cell, indexed `[day][slot]`, in assignment order.
    pub board: Vec<Vec<Vec<String>>>,
    /// Person id -> assigned units, in roster order.
    pub work_totals: Vec<(String, u32)>,
    /// People who ended below the minimum quota, in roster order.
    pub under_quota: Vec<String>,
    /// Loop iterations run, including a final one that found no candidate.
    pub iterations: usize,
    /// Number of (person, slot) assignments made.
    pub assignments: usize,
}

impl MatchResult {
    /// Work totals keyed by person id.
    pub fn totals_map(&self) -> HashMap<String, u32> {
        self.work_totals.iter().cloned().collect()
    }

    /// Units assigned to a person, if present.
    pub fn total_for(&self, person: &str) -> Option<u32> {
        self.work_totals
            .iter()
            .find(|(id, _)| id == person)
            .map(|(_, units)| *units)
    }

    /// Occupants of a cell.
    pub fn occupants(&self, day: usize, slot: usize) -> &[String] {
        &self.board[day][slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_record() {
        let record = PersonRecord::uniform("amy", 4, CellState::Class);
        assert_eq!(record.id, "amy");
        assert_eq!(record.cells, vec![CellState::Class; 4]);
    }

    #[test]
    fn test_result_lookups() {
        let result = MatchResult {
            board: vec![vec![vec!["amy".to_string()], vec![]]],
            work_totals: vec![("amy".to_string(), 3), ("bob".to_string(), 0)],
            under_quota: vec!["bob".to_string()],
            iterations: 2,
            assignments: 1,
        };
        assert_eq!(result.total_for("amy"), Some(3));
        assert_eq!(result.total_for("zed"), None);
        assert_eq!(result.totals_map().get("bob"), Some(&0));
        assert_eq!(result.occupants(0, 0), ["amy".to_string()]);
        assert!(result.occupants(0, 1).is_empty());
    }
}

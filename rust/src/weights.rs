//! Per-cell weight model.
//!
//! Each rule is a pure function over a person's schedule and one slot.
//! [`compute_weights`] composes them into the weight vector the matcher
//! scans: `(scarcity + contiguity) * proximity * quota`, with infeasible
//! cells masked to negative infinity.

use crate::availability::AvailabilityCounts;
use crate::board::AssignmentBoard;
use crate::config::MatchingConfig;
use crate::grid::{Slot, TimeGrid};
use crate::models::CellState;
use crate::schedule_state::PersonSchedule;

/// Weight of a cell that can never be chosen.
pub const INFEASIBLE: f64 = f64::NEG_INFINITY;

/// Scarcity numerator for a slot: edge slots are worth more than mid-day ones.
pub fn slot_priority(grid: &TimeGrid, index: usize, config: &MatchingConfig) -> f64 {
    if grid.is_edge(index) {
        config.edge_priority
    } else {
        config.interior_priority
    }
}

/// Priority divided by the number of remaining candidates.
///
/// Formula: `priority / (eligible + epsilon)`
pub fn scarcity(priority: f64, eligible: u32, epsilon: f64) -> f64 {
    priority / (eligible as f64 + epsilon)
}

/// Bonus for extending existing work runs on one day.
///
/// The cells just before and just after each maximal run of Work get
/// `singleton_bonus` when the run is one slot long, else `run_bonus`.
/// Cells separated from the run by a gap in wall-clock time get nothing.
pub fn contiguity_bonuses(day: &[CellState], grid: &TimeGrid, config: &MatchingConfig) -> Vec<f64> {
    let mut bonus = vec![0.0; day.len()];
    let mut run_start: Option<usize> = None;

    for index in 0..day.len() {
        if day[index] == CellState::Work && run_start.is_none() {
            run_start = Some(index);
        }
        let run_ends = index + 1 == day.len() || day[index + 1] != CellState::Work;
        if let (Some(start), true) = (run_start, run_ends) {
            let end = index;
            let amount = if start == end {
                config.singleton_bonus
            } else {
                config.run_bonus
            };
            if start > 0 && grid.adjacent(start - 1, start) {
                bonus[start - 1] += amount;
            }
            if end + 1 < day.len() && grid.adjacent(end, end + 1) {
                bonus[end + 1] += amount;
            }
            run_start = None;
        }
    }
    bonus
}

/// First and last Class slot of a day, if the person has class that day.
pub fn class_window(day: &[CellState]) -> Option<(usize, usize)> {
    let first = day.iter().position(|&c| c == CellState::Class)?;
    let last = day.iter().rposition(|&c| c == CellState::Class)?;
    Some((first, last))
}

/// Decay for slots outside the class window.
///
/// Formula: `1 - decay * d^2`, `d` being the gap in units to the nearest
/// window edge. Inside the window, or with no class that day, returns 1.0.
pub fn proximity_factor(
    grid: &TimeGrid,
    index: usize,
    window: Option<(usize, usize)>,
    decay: f64,
) -> f64 {
    let Some((first, last)) = window else {
        return 1.0;
    };
    let distance = if index < first {
        grid.distance(index, first)
    } else if index > last {
        grid.distance(last, index)
    } else {
        return 1.0;
    };
    let d = distance as f64;
    1.0 - decay * d * d
}

/// Person-wide multiplier from assigned units.
///
/// Returns `None` once the maximum quota is reached (every cell infeasible).
/// Between the minimum and maximum quota the factor is damped further.
pub fn quota_factor(num_works: u32, config: &MatchingConfig) -> Option<f64> {
    if num_works >= config.max_quota {
        return None;
    }
    let mut factor = 1.0 - config.workload_decay * num_works as f64;
    if num_works >= config.min_quota {
        factor *= config.fill_damping;
    }
    Some(factor)
}

/// Whether taking a slot of `duration` units would overshoot the maximum quota.
#[inline]
pub fn exceeds_quota(num_works: u32, duration: u32, max_quota: u32) -> bool {
    num_works + duration > max_quota
}

/// Edge slots are closed to a person who already works one.
#[inline]
pub fn edge_blocked(grid: &TimeGrid, index: usize, has_edge_work: bool, exclusive: bool) -> bool {
    exclusive && has_edge_work && grid.is_edge(index)
}

/// Compute the full weight vector of one person, in day-major order.
pub fn compute_weights(
    person: &PersonSchedule,
    counts: &AvailabilityCounts,
    board: &AssignmentBoard,
    grid: &TimeGrid,
    config: &MatchingConfig,
) -> Vec<f64> {
    let Some(quota) = quota_factor(person.num_works(), config) else {
        return vec![INFEASIBLE; grid.cell_count()];
    };
    let has_edge_work = person.has_edge_work(grid);
    let mut weights = Vec::with_capacity(grid.cell_count());

    for day in 0..grid.days() {
        let cells = person.day(day);
        let bonuses = contiguity_bonuses(cells, grid, config);
        let window = class_window(cells);

        for (index, &state) in cells.iter().enumerate() {
            let slot = Slot { day, index };
            let masked = state != CellState::Empty
                || board.is_full(slot)
                || exceeds_quota(person.num_works(), grid.duration(index), config.max_quota)
                || edge_blocked(grid, index, has_edge_work, config.edge_exclusive);
            if masked {
                weights.push(INFEASIBLE);
                continue;
            }

            let base = scarcity(
                slot_priority(grid, index, config),
                counts.get(slot),
                config.scarcity_epsilon,
            ) + bonuses[index];
            let proximity = proximity_factor(grid, index, window, config.proximity_decay);
            weights.push(base * proximity * quota);
        }
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonRecord;
    use crate::roster::Roster;

    const E: CellState = CellState::Empty;
    const C: CellState = CellState::Class;
    const W: CellState = CellState::Work;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn day_of(pattern: &[(usize, CellState)]) -> Vec<CellState> {
        let mut day = vec![E; 16];
        for &(index, state) in pattern {
            day[index] = state;
        }
        day
    }

    #[test]
    fn test_scarcity_prefers_few_candidates() {
        assert!(approx(scarcity(100.0, 1, 1.0), 50.0));
        assert!(approx(scarcity(100.0, 3, 1.0), 25.0));
        assert!(scarcity(100.0, 0, 1.0) > scarcity(100.0, 1, 1.0));
    }

    #[test]
    fn test_edge_priority_dominates() {
        let grid = TimeGrid::default_week();
        let config = MatchingConfig::default();
        assert!(approx(slot_priority(&grid, 0, &config), 300.0));
        assert!(approx(slot_priority(&grid, 15, &config), 300.0));
        assert!(approx(slot_priority(&grid, 8, &config), 100.0));
    }

    #[test]
    fn test_singleton_bonus_larger() {
        let grid = TimeGrid::default_week();
        let config = MatchingConfig::default();

        let single = contiguity_bonuses(&day_of(&[(7, W)]), &grid, &config);
        assert!(approx(single[6], 50.0));
        assert!(approx(single[8], 50.0));
        assert!(approx(single[5], 0.0));

        let run = contiguity_bonuses(&day_of(&[(7, W), (8, W)]), &grid, &config);
        assert!(approx(run[6], 10.0));
        assert!(approx(run[9], 10.0));
        assert!(approx(run[7], 0.0));
    }

    #[test]
    fn test_bonus_stops_at_lunch_gap() {
        let grid = TimeGrid::default_week();
        let config = MatchingConfig::default();
        let bonus = contiguity_bonuses(&day_of(&[(4, W)]), &grid, &config);
        assert!(approx(bonus[3], 50.0));
        assert!(approx(bonus[5], 0.0));
    }

    #[test]
    fn test_bonus_between_two_runs_accumulates() {
        let grid = TimeGrid::default_week();
        let config = MatchingConfig::default();
        let bonus = contiguity_bonuses(&day_of(&[(7, W), (9, W)]), &grid, &config);
        assert!(approx(bonus[8], 100.0));
    }

    #[test]
    fn test_class_window() {
        assert_eq!(class_window(&day_of(&[])), None);
        assert_eq!(class_window(&day_of(&[(3, C), (9, C)])), Some((3, 9)));
        assert_eq!(class_window(&day_of(&[(3, W)])), None);
    }

    #[test]
    fn test_proximity_decay() {
        let grid = TimeGrid::default_week();
        let window = Some((7, 8));
        assert!(approx(proximity_factor(&grid, 6, window, 0.01), 1.0)); // touching
        assert!(approx(proximity_factor(&grid, 5, window, 0.01), 0.99)); // 1 unit away
        assert!(approx(proximity_factor(&grid, 11, window, 0.01), 0.96)); // 2 units away
        assert!(approx(proximity_factor(&grid, 4, window, 0.01), 1.0 - 0.01 * 16.0)); // across lunch
        assert!(approx(proximity_factor(&grid, 0, None, 0.01), 1.0));
        assert!(approx(proximity_factor(&grid, 7, window, 0.01), 1.0));
    }

    #[test]
    fn test_quota_factor_bands() {
        let config = MatchingConfig::default();
        assert!(approx(quota_factor(0, &config).unwrap(), 1.0));
        assert!(approx(quota_factor(9, &config).unwrap(), 0.91));
        assert!(approx(quota_factor(10, &config).unwrap(), 0.45));
        assert!(approx(quota_factor(12, &config).unwrap(), 0.44));
        assert_eq!(quota_factor(13, &config), None);
        assert_eq!(quota_factor(20, &config), None);
    }

    #[test]
    fn test_exceeds_quota() {
        assert!(!exceeds_quota(10, 3, 13));
        assert!(exceeds_quota(11, 3, 13));
        assert!(!exceeds_quota(12, 1, 13));
    }

    #[test]
    fn test_edge_blocked() {
        let grid = TimeGrid::default_week();
        assert!(edge_blocked(&grid, 0, true, true));
        assert!(!edge_blocked(&grid, 0, true, false));
        assert!(!edge_blocked(&grid, 0, false, true));
        assert!(!edge_blocked(&grid, 3, true, true));
    }

    fn setup(records: Vec<PersonRecord>) -> (TimeGrid, Roster, AssignmentBoard) {
        let grid = TimeGrid::default_week();
        let roster = Roster::from_records(records, &grid).unwrap();
        let board = AssignmentBoard::new(&grid, 1);
        (grid, roster, board)
    }

    #[test]
    fn test_compute_weights_masks() {
        let grid = TimeGrid::default_week();
        let mut amy = PersonRecord::uniform("amy", grid.cell_count(), E);
        amy.cells[grid.flat(Slot::new(0, 3))] = C;
        let (grid, mut roster, mut board) = setup(vec![amy]);
        let config = MatchingConfig::default();

        roster.person_mut(0).assign_work(Slot::new(1, 0), &grid).unwrap();
        board.assign(Slot::new(1, 0), 0).unwrap();

        let counts = AvailabilityCounts::collect(&roster, &grid, config.max_quota);
        let weights = compute_weights(roster.person(0), &counts, &board, &grid, &config);
        let w = |day, index| weights[grid.flat(Slot::new(day, index))];

        assert_eq!(w(0, 3), INFEASIBLE); // class
        assert_eq!(w(1, 0), INFEASIBLE); // work
        assert_eq!(w(1, 15), INFEASIBLE); // same-day edge
        assert_eq!(w(3, 0), INFEASIBLE); // other-day edge
        assert!(w(2, 7).is_finite());
        assert!(w(1, 1) > w(1, 2)); // singleton bonus next to the edge shift
    }

    #[test]
    fn test_compute_weights_full_board_slot() {
        let grid = TimeGrid::default_week();
        let amy = PersonRecord::uniform("amy", grid.cell_count(), E);
        let bob = PersonRecord::uniform("bob", grid.cell_count(), E);
        let (grid, roster, mut board) = setup(vec![amy, bob]);
        let config = MatchingConfig::default();

        board.assign(Slot::new(2, 2), 0).unwrap();
        let counts = AvailabilityCounts::collect(&roster, &grid, config.max_quota);
        let weights = compute_weights(roster.person(1), &counts, &board, &grid, &config);
        assert_eq!(weights[grid.flat(Slot::new(2, 2))], INFEASIBLE);
        assert!(weights[grid.flat(Slot::new(2, 3))].is_finite());
    }

    #[test]
    fn test_compute_weights_saturated_person() {
        let grid = TimeGrid::default_week();
        let amy = PersonRecord::uniform("amy", grid.cell_count(), E);
        let (grid, mut roster, board) = setup(vec![amy]);
        let config = MatchingConfig {
            max_quota: 3,
            min_quota: 1,
            ..MatchingConfig::default()
        };

        roster.person_mut(0).assign_work(Slot::new(0, 0), &grid).unwrap();
        let counts = AvailabilityCounts::collect(&roster, &grid, config.max_quota);
        let weights = compute_weights(roster.person(0), &counts, &board, &grid, &config);
        assert!(weights.iter().all(|&w| w == INFEASIBLE));
    }

    #[test]
    fn test_compute_weights_overshoot_masked() {
        let grid = TimeGrid::default_week();
        let amy = PersonRecord::uniform("amy", grid.cell_count(), E);
        let (grid, roster, board) = setup(vec![amy]);
        let config = MatchingConfig {
            min_quota: 1,
            max_quota: 2,
            ..MatchingConfig::default()
        };

        let counts = AvailabilityCounts::collect(&roster, &grid, config.max_quota);
        let weights = compute_weights(roster.person(0), &counts, &board, &grid, &config);
        assert_eq!(weights[grid.flat(Slot::new(0, 0))], INFEASIBLE); // 3-unit edge
        assert!(weights[grid.flat(Slot::new(0, 1))].is_finite());
    }

    #[test]
    fn test_edge_exclusivity_can_be_disabled() {
        let grid = TimeGrid::default_week();
        let amy = PersonRecord::uniform("amy", grid.cell_count(), E);
        let (grid, mut roster, board) = setup(vec![amy]);
        let config = MatchingConfig {
            edge_exclusive: false,
            ..MatchingConfig::default()
        };

        roster.person_mut(0).assign_work(Slot::new(0, 0), &grid).unwrap();
        let counts = AvailabilityCounts::collect(&roster, &grid, config.max_quota);
        let weights = compute_weights(roster.person(0), &counts, &board, &grid, &config);
        assert!(weights[grid.flat(Slot::new(2, 15))].is_finite());
    }
}

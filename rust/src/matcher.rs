//! Greedy iterate-score-select-assign matcher.

use thiserror::Error;

use crate::availability::AvailabilityCounts;
use crate::board::{AssignmentBoard, BoardError};
use crate::config::{ConfigError, MatchingConfig};
use crate::grid::{Slot, TimeGrid};
use crate::models::{MatchResult, PersonRecord};
use crate::roster::{PersonIdx, Roster};
use crate::schedule_state::OccupiedCell;
use crate::weights::{compute_weights, INFEASIBLE};
use crate::{log_changes, log_checks, log_debug};

/// Errors that abort a matching run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Duplicate person id: {0}")]
    DuplicatePerson(String),
    #[error("Record for {id} has {found} cells, grid has {expected}")]
    RecordLength {
        id: String,
        expected: usize,
        found: usize,
    },
    #[error("Invariant violated assigning {person}: {source}")]
    OccupiedCell {
        person: String,
        #[source]
        source: OccupiedCell,
    },
    #[error("Invariant violated on board: {0}")]
    Board(#[from] BoardError),
}

/// Phase of the matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPhase {
    Running,
    Done,
}

/// Winning candidate of one iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub slot: Slot,
    pub person: PersonIdx,
    pub weight: f64,
}

/// Greedy matcher over an explicit roster.
///
/// Each step recounts eligible candidates, recomputes every weight vector,
/// and assigns the single best (slot, person) pair.
///
/// Tie-break: cells are scanned day-major, then slot, then person in roster
/// order, and a candidate replaces the incumbent only if strictly heavier.
/// The first maximal candidate in scan order wins.
pub struct GreedyMatcher {
    grid: TimeGrid,
    config: MatchingConfig,
    roster: Roster,
    board: AssignmentBoard,
    phase: MatchPhase,
    iterations: usize,
}

impl GreedyMatcher {
    /// Create a matcher from parsed records.
    pub fn new(
        records: Vec<PersonRecord>,
        grid: TimeGrid,
        config: MatchingConfig,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        let expected = grid.cell_count();
        if let Some(bad) = records.iter().find(|r| r.cells.len() != expected) {
            return Err(MatchError::RecordLength {
                id: bad.id.clone(),
                expected,
                found: bad.cells.len(),
            });
        }
        let roster = Roster::from_records(records, &grid).map_err(MatchError::DuplicatePerson)?;
        let board = AssignmentBoard::new(&grid, config.occupancy);
        Ok(Self {
            grid,
            config,
            roster,
            board,
            phase: MatchPhase::Running,
            iterations: 0,
        })
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn board(&self) -> &AssignmentBoard {
        &self.board
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Upper bound on iterations: every cell filled to capacity.
    pub fn iteration_limit(&self) -> usize {
        self.grid.cell_count() * self.config.occupancy
    }

    /// Recount candidates and refresh every person's weight vector.
    fn refresh_weights(&mut self) {
        let counts = AvailabilityCounts::collect(&self.roster, &self.grid, self.config.max_quota);
        log_checks!(
            self.config.verbosity,
            "Iteration {}: {} cells without candidates",
            self.iterations,
            counts.dead_cells()
        );
        let (grid, board, config) = (&self.grid, &self.board, &self.config);
        for person in self.roster.iter_mut() {
            let weights = compute_weights(person, &counts, board, grid, config);
            log_debug!(config.verbosity, "  {} weights: {:?}", person.id(), weights);
            person.set_weights(weights);
        }
    }

    /// Scan all weights for the global maximum, honoring the tie-break order.
    fn select(&self) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for slot in self.grid.slots() {
            for (idx, person) in self.roster.iter().enumerate() {
                let weight = person.weight(slot);
                let incumbent = best.map_or(INFEASIBLE, |c| c.weight);
                if weight > incumbent {
                    best = Some(Candidate {
                        slot,
                        person: idx as PersonIdx,
                        weight,
                    });
                }
            }
        }
        best
    }

    fn assign(&mut self, candidate: Candidate) -> Result<(), MatchError> {
        let Candidate { slot, person, .. } = candidate;
        let schedule = self.roster.person_mut(person);
        schedule
            .assign_work(slot, &self.grid)
            .map_err(|source| MatchError::OccupiedCell {
                person: schedule.id().to_string(),
                source,
            })?;
        self.board.assign(slot, person)?;
        let schedule = self.roster.person(person);
        log_changes!(
            self.config.verbosity,
            "Assigned {} to day {} slot {} (weight {:.3}, total {} units)",
            schedule.id(),
            slot.day,
            slot.index,
            candidate.weight,
            schedule.num_works()
        );
        Ok(())
    }

    /// Run one iteration. Returns the assigned candidate, or `None` once done.
    pub fn step(&mut self) -> Result<Option<Candidate>, MatchError> {
        if self.phase == MatchPhase::Done {
            return Ok(None);
        }
        if self.iterations >= self.iteration_limit() {
            self.phase = MatchPhase::Done;
            return Ok(None);
        }
        self.iterations += 1;
        self.refresh_weights();

        match self.select() {
            Some(candidate) => {
                log_checks!(
                    self.config.verbosity,
                    "  best: person {} at day {} slot {} ({:.3})",
                    candidate.person,
                    candidate.slot.day,
                    candidate.slot.index,
                    candidate.weight
                );
                self.assign(candidate)?;
                Ok(Some(candidate))
            }
            None => {
                self.phase = MatchPhase::Done;
                Ok(None)
            }
        }
    }

    /// Iterate until no feasible candidate remains or the bound is hit.
    pub fn run(&mut self) -> Result<MatchResult, MatchError> {
        while self.step()?.is_some() {}
        let result = self.result();
        log_changes!(
            self.config.verbosity,
            "Matching done after {} iterations: {} assignments, {} under quota",
            result.iterations,
            result.assignments,
            result.under_quota.len()
        );
        Ok(result)
    }

    /// Snapshot of the board and per-person totals.
    pub fn result(&self) -> MatchResult {
        let roster = &self.roster;
        let board = self
            .board
            .snapshot(|idx| roster.person(idx).id().to_string());
        let work_totals = roster
            .iter()
            .map(|p| (p.id().to_string(), p.num_works()))
            .collect();
        let under_quota = roster
            .iter()
            .filter(|p| p.num_works() < self.config.min_quota)
            .map(|p| p.id().to_string())
            .collect();
        MatchResult {
            board,
            work_totals,
            under_quota,
            iterations: self.iterations,
            assignments: self.board.total(),
        }
    }
}

/// Run the matcher over parsed records in one call.
pub fn run_matching(
    records: Vec<PersonRecord>,
    grid: TimeGrid,
    config: MatchingConfig,
) -> Result<MatchResult, MatchError> {
    GreedyMatcher::new(records, grid, config)?.run()
}

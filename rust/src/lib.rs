//! Weekly work-shift matcher.
//!
//! Assigns work slots to people from their fixed class grids. A greedy loop
//! repeatedly scores every (day, slot, person) cell and assigns the heaviest,
//! favoring scarce slots, slots that extend existing shifts and slots close
//! to class hours, while keeping each person within a min/max work quota.
//!
//! ```
//! use shift_match::{parse_availability, run_matching, MatchingConfig, TimeGrid};
//!
//! let grid = TimeGrid::default_week();
//! let text = format!("amy {}\n", "0".repeat(grid.cell_count()));
//! let records = parse_availability(&text, &grid).unwrap();
//! let result = run_matching(records, grid, MatchingConfig::default()).unwrap();
//! assert_eq!(result.total_for("amy"), Some(13));
//! ```

// Allow clippy warning triggered by PyO3 macro expansion
#![cfg_attr(feature = "python", allow(clippy::useless_conversion))]

pub mod availability;
pub mod board;
mod config;
pub mod grid;
pub mod logging;
pub mod matcher;
mod models;
pub mod parser;
pub mod report;
pub mod roster;
pub mod schedule_state;
pub mod weights;

#[cfg(feature = "python")]
mod python;

pub use config::{ConfigError, MatchingConfig};
pub use grid::{GridError, Slot, SlotInterval, TimeGrid};
pub use matcher::{run_matching, GreedyMatcher, MatchError, MatchPhase};
pub use models::{CellState, MatchResult, PersonRecord};
pub use parser::{load_availability, parse_availability, ParseError};

//! Static week layout: days, slots, wall-clock intervals and slot relations.

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

/// Minutes in one duration unit. Quotas and work totals are counted in units.
pub const UNIT_MINUTES: u32 = 30;

/// Working days in the default week.
pub const DEFAULT_DAYS: usize = 5;

/// Default day layout as (start, end) in (hour, minute).
const DEFAULT_DAY_LAYOUT: [((u32, u32), (u32, u32)); 16] = [
    ((8, 30), (10, 0)),
    ((10, 0), (10, 30)),
    ((10, 30), (11, 0)),
    ((11, 0), (11, 30)),
    ((11, 30), (12, 0)),
    ((13, 0), (13, 30)),
    ((13, 30), (14, 0)),
    ((14, 0), (14, 30)),
    ((14, 30), (15, 0)),
    ((15, 0), (15, 30)),
    ((15, 30), (16, 0)),
    ((16, 0), (16, 30)),
    ((16, 30), (17, 0)),
    ((17, 0), (17, 30)),
    ((17, 30), (18, 0)),
    ((18, 0), (19, 30)),
];

/// Errors raised when building a grid from a custom layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid must have at least one day and one slot")]
    Empty,
    #[error("Slot {index} ends before it starts ({start}-{end})")]
    Inverted {
        index: usize,
        start: NaiveTime,
        end: NaiveTime,
    },
    #[error("Slot {index} overlaps the previous slot")]
    Overlap { index: usize },
    #[error("Slot {index} boundary is not aligned to a 30-minute unit")]
    Misaligned { index: usize },
}

/// A cell coordinate in the week grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub day: usize,
    pub index: usize,
}

impl Slot {
    pub fn new(day: usize, index: usize) -> Self {
        Self { day, index }
    }
}

/// One slot's wall-clock interval, shared by every day of the week.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SlotInterval {
    fn start_units(&self) -> u32 {
        minutes_of(self.start) / UNIT_MINUTES
    }

    fn end_units(&self) -> u32 {
        minutes_of(self.end) / UNIT_MINUTES
    }

    /// Duration in units.
    pub fn units(&self) -> u32 {
        self.end_units() - self.start_units()
    }
}

fn minutes_of(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Fixed day/slot structure of the scheduling week.
///
/// Every day uses the same slot layout. Slots within a day are ordered by
/// start time and never overlap, so index order equals time order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeGrid {
    days: usize,
    intervals: Vec<SlotInterval>,
}

impl TimeGrid {
    /// Build a grid from a day layout, validating ordering and alignment.
    pub fn new(days: usize, intervals: Vec<SlotInterval>) -> Result<Self, GridError> {
        if days == 0 || intervals.is_empty() {
            return Err(GridError::Empty);
        }
        for (index, iv) in intervals.iter().enumerate() {
            if iv.end <= iv.start {
                return Err(GridError::Inverted {
                    index,
                    start: iv.start,
                    end: iv.end,
                });
            }
            let aligned = |t: NaiveTime| t.second() == 0 && minutes_of(t) % UNIT_MINUTES == 0;
            if !aligned(iv.start) || !aligned(iv.end) {
                return Err(GridError::Misaligned { index });
            }
            if index > 0 && iv.start < intervals[index - 1].end {
                return Err(GridError::Overlap { index });
            }
        }
        Ok(Self { days, intervals })
    }

    /// The five-day week with sixteen slots per day and a lunch gap at noon.
    pub fn default_week() -> Self {
        let intervals = DEFAULT_DAY_LAYOUT
            .iter()
            .map(|&((sh, sm), (eh, em))| SlotInterval {
                start: NaiveTime::from_hms_opt(sh, sm, 0).expect("layout time is valid"),
                end: NaiveTime::from_hms_opt(eh, em, 0).expect("layout time is valid"),
            })
            .collect();
        Self {
            days: DEFAULT_DAYS,
            intervals,
        }
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn slots_per_day(&self) -> usize {
        self.intervals.len()
    }

    /// Total number of cells (days x slots).
    pub fn cell_count(&self) -> usize {
        self.days * self.intervals.len()
    }

    /// Flat day-major index of a slot.
    #[inline]
    pub fn flat(&self, slot: Slot) -> usize {
        slot.day * self.intervals.len() + slot.index
    }

    /// All slots in day-major, slot-minor order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        let per_day = self.intervals.len();
        (0..self.days).flat_map(move |day| (0..per_day).map(move |index| Slot { day, index }))
    }

    pub fn interval(&self, index: usize) -> SlotInterval {
        self.intervals[index]
    }

    pub fn intervals(&self) -> &[SlotInterval] {
        &self.intervals
    }

    /// Duration of a slot index in units.
    #[inline]
    pub fn duration(&self, index: usize) -> u32 {
        self.intervals[index].units()
    }

    /// First or last slot of a day.
    #[inline]
    pub fn is_edge(&self, index: usize) -> bool {
        index == 0 || index + 1 == self.intervals.len()
    }

    /// Two slot indices are adjacent when one ends exactly where the other begins.
    pub fn adjacent(&self, a: usize, b: usize) -> bool {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        lo != hi && self.intervals[lo].end == self.intervals[hi].start
    }

    /// Gap in units between the end of the earlier slot and the start of the later one.
    pub fn distance(&self, a: usize, b: usize) -> u32 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if lo == hi {
            return 0;
        }
        self.intervals[hi]
            .start_units()
            .saturating_sub(self.intervals[lo].end_units())
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self::default_week()
    }
}

//! Insertion-ordered registry of person schedules.
//!
//! Maps string person ids to dense integer positions. Position order is the
//! input order and is the person component of the matcher's tie-break.

use rustc_hash::FxHashMap;

use crate::grid::TimeGrid;
use crate::models::PersonRecord;
use crate::schedule_state::PersonSchedule;

/// Dense person index (position in the roster).
pub type PersonIdx = u32;

/// Registry of person schedules, passed to the matcher by reference.
#[derive(Debug, Clone)]
pub struct Roster {
    index: FxHashMap<String, PersonIdx>,
    people: Vec<PersonSchedule>,
}

impl Roster {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            people: Vec::with_capacity(capacity),
        }
    }

    /// Build from parsed records, keeping their order.
    ///
    /// Returns the id of the first duplicate, if any.
    pub fn from_records(records: Vec<PersonRecord>, grid: &TimeGrid) -> Result<Self, String> {
        let mut roster = Self::with_capacity(records.len());
        for record in records {
            roster
                .insert(PersonSchedule::from_record(record, grid))
                .map_err(|rejected| rejected.id().to_string())?;
        }
        Ok(roster)
    }

    /// Add a schedule, returning its index. A taken id hands the schedule back.
    pub fn insert(&mut self, schedule: PersonSchedule) -> Result<PersonIdx, PersonSchedule> {
        if self.index.contains_key(schedule.id()) {
            return Err(schedule);
        }
        let idx = self.people.len() as PersonIdx;
        self.index.insert(schedule.id().to_string(), idx);
        self.people.push(schedule);
        Ok(idx)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<PersonIdx> {
        self.index.get(id).copied()
    }

    #[inline]
    pub fn person(&self, idx: PersonIdx) -> &PersonSchedule {
        &self.people[idx as usize]
    }

    #[inline]
    pub fn person_mut(&mut self, idx: PersonIdx) -> &mut PersonSchedule {
        &mut self.people[idx as usize]
    }

    pub fn by_id(&self, id: &str) -> Option<&PersonSchedule> {
        self.get(id).map(|idx| self.person(idx))
    }

    /// Schedules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PersonSchedule> {
        self.people.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PersonSchedule> {
        self.people.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

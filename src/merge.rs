use crate::models::{LeaderboardRow, Moment, ReportCard, Week};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Identity used when combining records from several documents.
pub trait Dedup {
    type Key: Eq + Hash;

    fn dedup_key(&self) -> Self::Key;
}

impl Dedup for Moment {
    type Key = String;

    fn dedup_key(&self) -> String {
        self.quote.clone()
    }
}

impl Dedup for LeaderboardRow {
    type Key = String;

    fn dedup_key(&self) -> String {
        self.name.clone()
    }
}

impl Dedup for ReportCard {
    type Key = (String, String);

    fn dedup_key(&self) -> (String, String) {
        (self.name.clone(), self.week.clone())
    }
}

/// Every primary record in its original order, then each secondary record
/// whose key is not already present. Primary records are never dropped.
pub fn merge<T: Dedup>(primary: Vec<T>, secondary: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<T::Key> = primary.iter().map(Dedup::dedup_key).collect();
    let mut merged = primary;
    merged.reserve(secondary.len());

    for record in secondary {
        if seen.insert(record.dedup_key()) {
            merged.push(record);
        }
    }

    merged
}

/// Unions two week lists by start date. Weeks present in both keep the primary
/// summary and quotes and gain any report cards the primary lacks. The result
/// is stably ordered by start date, earliest first.
pub fn merge_weeks(primary: Vec<Week>, secondary: Vec<Week>) -> Vec<Week> {
    let mut merged: Vec<Week> = Vec::with_capacity(primary.len() + secondary.len());
    let mut by_start: HashMap<String, usize> = HashMap::new();

    for week in primary.into_iter().chain(secondary) {
        match by_start.get(&week.start_date) {
            Some(&index) => {
                let existing = &mut merged[index];
                let rows = std::mem::take(&mut existing.pagelle);
                existing.pagelle = merge(rows, week.pagelle);
                if existing.stats.is_none() {
                    existing.stats = week.stats;
                }
            }
            None => {
                by_start.insert(week.start_date.clone(), merged.len());
                merged.push(week);
            }
        }
    }

    merged.sort_by(|a, b| a.start_date.cmp(&b.start_date));
    merged
}

//! Turns raw documents into canonical records.
//!
//! All defaulting happens here, once, so the query and ranking layers never
//! need to care which source a record came from.

use crate::models::{
    ClassificaDoc, LeaderboardRow, Moment, QuickStats, RawMoment, RawReportCard,
    RawWeek, ReportCard, Week, YearDataset, YearDoc, YearStats, HOURS, WEEKDAYS,
};
use crate::stats::buckets;

pub const DEFAULT_CATEGORY: &str = "momenti";
pub const MAX_BEST_QUOTES: usize = 3;

/// Leading four characters of a date string, when they form a year.
pub fn year_from_date(date: &str) -> Option<i32> {
    let prefix = date.get(..4)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

/// Normalizes a moment. `fetched_for` is the year of the per-year document it
/// came from, or `None` for the primary `best-of.json`.
///
/// The quote text is carried over verbatim since it is the dedup key.
pub fn normalize_moment(raw: RawMoment, fetched_for: Option<i32>) -> Moment {
    let date = raw.date.filter(|d| !d.is_empty());
    let year = raw
        .year
        .or(fetched_for)
        .or_else(|| date.as_deref().and_then(year_from_date));
    let date = match (date, year) {
        (Some(date), _) => Some(date),
        (None, Some(year)) => Some(format!("{year:04}-01-01")),
        (None, None) => None,
    };
    let category = raw
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    Moment {
        quote: raw.quote.unwrap_or_default(),
        author: raw.author.unwrap_or_default(),
        date,
        category,
        context: raw.context,
        year,
    }
}

pub fn normalize_moments(raw: Vec<RawMoment>, fetched_for: Option<i32>) -> Vec<Moment> {
    raw.into_iter()
        .map(|moment| normalize_moment(moment, fetched_for))
        .collect()
}

fn normalize_report_card(raw: RawReportCard, week: &str) -> ReportCard {
    ReportCard {
        name: raw.name,
        week: week.to_string(),
        voto: raw.voto,
        giudizio: raw.giudizio,
        messaggi: raw.messaggi,
        media_giornaliera: raw.media_giornaliera,
        highlights: raw.highlights,
    }
}

pub fn normalize_week(raw: RawWeek) -> Week {
    let pagelle = raw
        .pagelle
        .into_iter()
        .map(|card| normalize_report_card(card, &raw.start_date))
        .collect();
    let mut best_quotes = raw.best_quotes;
    best_quotes.truncate(MAX_BEST_QUOTES);

    Week {
        start_date: raw.start_date,
        pagelle,
        summary: raw.riassunto,
        best_quotes,
        stats: raw.stats,
    }
}

pub fn normalize_weeks(raw: Vec<RawWeek>) -> Vec<Week> {
    raw.into_iter().map(normalize_week).collect()
}

/// Dataset for a single year, from `anni/{year}.json`.
pub fn year_dataset(doc: YearDoc) -> YearDataset {
    YearDataset {
        stats: doc.stats,
        leaderboard: doc.classifica,
        hourly_activity: buckets::<HOURS>(&doc.hourly_activity),
        daily_activity: buckets::<WEEKDAYS>(&doc.daily_activity),
    }
}

/// Dataset for the "all" pseudo-year, from `classifica.json` and `stats.json`.
pub fn all_time_dataset(doc: ClassificaDoc, quick: Option<&QuickStats>) -> YearDataset {
    let total_messages = match quick {
        Some(quick) => quick.total_messages,
        None => doc.members.iter().map(|row| row.message_count).sum(),
    };
    let total_members = match quick {
        Some(quick) => quick.total_members,
        None => doc.members.len() as u64,
    };
    let mvp = quick
        .map(|quick| quick.most_active.clone())
        .filter(|name| !name.is_empty())
        .or_else(|| top_member(&doc.members))
        .unwrap_or_default();

    YearDataset {
        stats: YearStats {
            total_messages,
            total_members,
            mvp,
            trend: None,
        },
        hourly_activity: buckets::<HOURS>(&doc.hourly_total),
        daily_activity: buckets::<WEEKDAYS>(&doc.daily_total),
        leaderboard: doc.members,
    }
}

/// First member with the highest count, mirroring the leaderboard's stable order.
fn top_member(rows: &[LeaderboardRow]) -> Option<String> {
    let mut best: Option<&LeaderboardRow> = None;
    for row in rows {
        if best.is_none_or(|current| row.message_count > current.message_count) {
            best = Some(row);
        }
    }
    best.map(|row| row.name.clone())
}

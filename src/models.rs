use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// `stats.json`: the homepage quick stats.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct QuickStats {
    pub total_messages: u64,
    pub total_members: u64,
    pub most_active: String,
    pub last_update: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaderboardRow {
    pub name: String,
    pub message_count: u64,
}

/// Activity counts as they appear in the documents. Generators emit either a
/// plain array (possibly short, possibly with nulls) or an index-keyed object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivitySeries {
    Dense(Vec<Option<u64>>),
    Sparse(BTreeMap<String, u64>),
}

impl Default for ActivitySeries {
    fn default() -> Self {
        ActivitySeries::Dense(Vec::new())
    }
}

/// `classifica.json`: the all-time leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassificaDoc {
    pub members: Vec<LeaderboardRow>,
    pub hourly_total: ActivitySeries,
    pub daily_total: ActivitySeries,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct YearSummary {
    pub year: i32,
    pub total_messages: u64,
    pub mvp: String,
    pub trend: Option<f64>,
    pub highlights: Option<String>,
}

/// `anni-overview.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OverviewDoc {
    pub years: Vec<YearSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct YearStats {
    pub total_messages: u64,
    pub total_members: u64,
    pub mvp: String,
    pub trend: Option<f64>,
}

/// `anni/{year}.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct YearDoc {
    pub stats: YearStats,
    pub classifica: Vec<LeaderboardRow>,
    pub hourly_activity: ActivitySeries,
    pub daily_activity: ActivitySeries,
    pub best_of: Vec<RawMoment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RawMoment {
    pub quote: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub context: Option<String>,
    pub year: Option<i32>,
}

/// `best-of.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BestOfDoc {
    pub moments: Vec<RawMoment>,
    pub hall_of_fame: Option<Vec<RawMoment>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawReportCard {
    pub name: String,
    pub voto: Option<f64>,
    pub giudizio: String,
    pub messaggi: u64,
    pub media_giornaliera: f64,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BestQuote {
    Text(String),
    Attributed {
        quote: String,
        #[serde(default)]
        author: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WeekStats {
    pub total_messages: u64,
    pub active_members: u64,
    pub avg_per_member: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawWeek {
    pub start_date: String,
    pub pagelle: Vec<RawReportCard>,
    pub riassunto: String,
    pub best_quotes: Vec<BestQuote>,
    pub stats: Option<WeekStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CumulativeRow {
    pub name: String,
    pub media_voto: f64,
    pub settimane_attive: u32,
    pub total_messaggi: u64,
    pub best_voto: f64,
    pub worst_voto: f64,
    pub signature: Option<String>,
}

/// `pagelle.json` and `pagelle/{year}.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PagelleDoc {
    pub year: Option<i32>,
    pub weeks: Vec<RawWeek>,
    pub cumulative: Vec<CumulativeRow>,
    pub total_weeks: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberStats {
    pub message_count: u64,
    pub rank: u32,
    pub avg_words_per_message: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MemberProfile {
    pub name: String,
    pub title: Option<String>,
    pub description: String,
    pub traits: Vec<String>,
    pub catchphrase: Option<String>,
    pub stats: Option<MemberStats>,
    pub superpower: Option<String>,
    pub emoji: Option<String>,
    pub photo: Option<String>,
}

/// `membri.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MembersDoc {
    pub members: Vec<MemberProfile>,
}

/// One term of the lider title.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LiderReign {
    pub name: String,
    pub alias: Option<String>,
    pub period: String,
    pub highlight: String,
    pub quote: Option<String>,
    pub start_date: Option<String>,
    /// `Some(None)` is an explicit `null`: the title is still held.
    /// A missing key stays `None` and does not mark the reign as current.
    #[serde(deserialize_with = "explicit_null")]
    pub end_date: Option<Option<String>>,
}

impl LiderReign {
    pub fn is_current(&self) -> bool {
        matches!(self.end_date, Some(None))
    }
}

fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LongestReign {
    pub name: String,
    pub years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MostReigns {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LiderStats {
    pub total_liders: usize,
    pub longest_reign: Option<LongestReign>,
    pub most_reigns: Option<MostReigns>,
}

/// `lider.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LiderDoc {
    pub description: String,
    pub rules: Vec<String>,
    pub timeline: Vec<LiderReign>,
    pub stats: Option<LiderStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistoryEvent {
    pub date: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct YearRecap {
    pub messages: u64,
    pub active_members: u64,
    pub mvp: Option<String>,
    pub highlight: Option<String>,
}

/// `history.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryDoc {
    pub years_active: Option<u32>,
    pub total_messages: Option<u64>,
    pub founding_date: Option<String>,
    pub founder: Option<String>,
    pub timeline: Vec<HistoryEvent>,
    pub yearly_stats: BTreeMap<String, YearRecap>,
    pub evolution_narrative: Option<String>,
}

/// A notable chat moment after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moment {
    pub quote: String,
    pub author: String,
    pub date: Option<String>,
    pub category: String,
    pub context: Option<String>,
    pub year: Option<i32>,
}

/// One member's grade for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCard {
    pub name: String,
    pub week: String,
    pub voto: Option<f64>,
    pub giudizio: String,
    pub messaggi: u64,
    pub media_giornaliera: f64,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub start_date: String,
    pub pagelle: Vec<ReportCard>,
    pub summary: String,
    pub best_quotes: Vec<BestQuote>,
    pub stats: Option<WeekStats>,
}

pub const HOURS: usize = 24;
pub const WEEKDAYS: usize = 7;

/// Everything a leaderboard view needs for one year, or for all time.
#[derive(Debug, Clone, Serialize)]
pub struct YearDataset {
    pub stats: YearStats,
    pub leaderboard: Vec<LeaderboardRow>,
    pub hourly_activity: [u64; HOURS],
    pub daily_activity: [u64; WEEKDAYS],
}

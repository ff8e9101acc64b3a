//! Assembles what each page shows from the loaded documents.

use crate::merge::{merge, merge_weeks};
use crate::models::{
    BestOfDoc, ClassificaDoc, CumulativeRow, MemberProfile, MembersDoc, Moment, OverviewDoc,
    PagelleDoc, QuickStats, Week, YearDataset, YearDoc, YearStats,
};
use crate::normalize::{all_time_dataset, normalize_moments, normalize_weeks, year_dataset};
use crate::query::{filter, sort_by_date_descending, YearFilter};
use crate::state::AppState;
use crate::stats::{
    build_archive, build_history, build_lider, cumulative_stats, histogram_bars,
    rank_leaderboard, ArchiveOverview, Bar, HistoryView, LiderView, RankedEntry,
};
use crate::view::{ViewState, WeekStep};
use serde::Serialize;
use tracing::debug;

pub const HALL_OF_FAME_SIZE: usize = 3;
pub const CATEGORIES: [&str; 4] = ["battute", "fails", "quotes", "momenti"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardView {
    pub year: YearFilter,
    pub stats: YearStats,
    pub entries: Vec<RankedEntry>,
    pub hourly: Vec<Bar>,
    pub daily: Vec<Bar>,
}

impl LeaderboardView {
    fn from_dataset(year: YearFilter, dataset: YearDataset) -> Self {
        Self {
            year,
            hourly: histogram_bars(&dataset.hourly_activity),
            daily: histogram_bars(&dataset.daily_activity),
            entries: rank_leaderboard(dataset.leaderboard),
            stats: dataset.stats,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestOfView {
    pub view: ViewState,
    pub moments: Vec<Moment>,
    pub hall_of_fame: Vec<Moment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagelleView {
    pub year: Option<i32>,
    pub view: ViewState,
    pub week: Option<Week>,
    pub cumulative: Vec<CumulativeRow>,
}

#[derive(Debug, Default, Clone)]
pub struct WeekSelection {
    pub index: Option<usize>,
    pub step: Option<WeekStep>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCard {
    #[serde(flatten)]
    pub profile: MemberProfile,
    pub display_title: String,
    pub avatar_fallback: String,
}

/// Up to two uppercase initials, one per word.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

pub async fn quick_stats(state: &AppState) -> Option<QuickStats> {
    state.loader.load("stats.json").await
}

/// `All` reads the all-time leaderboard; a year reads that year's document.
pub async fn leaderboard(state: &AppState, year: YearFilter) -> Option<LeaderboardView> {
    let dataset = match year {
        YearFilter::All => {
            let (doc, quick) = tokio::join!(
                state.loader.load::<ClassificaDoc>("classifica.json"),
                quick_stats(state)
            );
            all_time_dataset(doc?, quick.as_ref())
        }
        YearFilter::Year(y) => {
            let doc = state.loader.load::<YearDoc>(&format!("anni/{y}.json")).await?;
            year_dataset(doc)
        }
    };
    Some(LeaderboardView::from_dataset(year, dataset))
}

pub async fn archive(state: &AppState) -> Option<ArchiveOverview> {
    let overview: OverviewDoc = state.loader.load("anni-overview.json").await?;
    if overview.years.is_empty() {
        return None;
    }
    Some(build_archive(&overview.years, state.config.last_year))
}

/// Years for which the site has something to select, oldest first.
pub async fn available_years(state: &AppState) -> Vec<i32> {
    match state.loader.load::<OverviewDoc>("anni-overview.json").await {
        Some(overview) if !overview.years.is_empty() => {
            let mut years: Vec<i32> = overview.years.iter().map(|y| y.year).collect();
            years.sort_unstable();
            years.dedup();
            years
        }
        _ => state.config.years().collect(),
    }
}

/// `best-of.json` first, then the `bestOf` sections of every per-year
/// document in year order; a quote already seen is never repeated.
pub async fn best_of(state: &AppState, view: ViewState) -> Option<BestOfView> {
    let (primary, per_year) = tokio::join!(
        state.loader.load::<BestOfDoc>("best-of.json"),
        state.loader.load_years::<YearDoc>("anni", state.config.years())
    );

    let mut secondary = Vec::new();
    for (y, doc) in per_year {
        secondary.extend(normalize_moments(doc.best_of, Some(y)));
    }
    let (mut all, hall_of_fame) = match primary {
        Some(doc) => (
            normalize_moments(doc.moments, None),
            doc.hall_of_fame.map(|hall| normalize_moments(hall, None)),
        ),
        None => (Vec::new(), None),
    };
    all = merge(all, secondary);
    if all.is_empty() {
        return None;
    }
    debug!("best-of: {} distinct moments", all.len());

    let hall_of_fame = hall_of_fame
        .filter(|hall| !hall.is_empty())
        .unwrap_or_else(|| all.iter().take(HALL_OF_FAME_SIZE).cloned().collect());
    let moments = sort_by_date_descending(filter(all, view.year(), view.category()));

    Some(BestOfView {
        view,
        moments,
        hall_of_fame,
    })
}

/// Weeks for `year` (the primary document's year when not given), merged from
/// `pagelle.json` and `pagelle/{year}.json`, with the selected week resolved
/// through the view state.
pub async fn pagelle(
    state: &AppState,
    year: YearFilter,
    selection: WeekSelection,
) -> Option<PagelleView> {
    let primary = state.loader.load::<PagelleDoc>("pagelle.json").await;
    let target = year.year().or_else(|| primary.as_ref().and_then(|doc| doc.year));
    let primary = primary.filter(|doc| target.is_none() || doc.year.is_none() || doc.year == target);
    let secondary = match target {
        Some(y) => state.loader.load::<PagelleDoc>(&format!("pagelle/{y}.json")).await,
        None => None,
    };

    let (weeks, cumulative) = match (primary, secondary) {
        (Some(p), Some(s)) => {
            let weeks = merge_weeks(normalize_weeks(p.weeks), normalize_weeks(s.weeks));
            let cumulative = cumulative_stats(&weeks);
            (weeks, cumulative)
        }
        (Some(doc), None) | (None, Some(doc)) => {
            let weeks = normalize_weeks(doc.weeks);
            let cumulative = if doc.cumulative.is_empty() {
                cumulative_stats(&weeks)
            } else {
                doc.cumulative
            };
            (weeks, cumulative)
        }
        (None, None) => return None,
    };
    if weeks.is_empty() {
        return None;
    }

    let mut view = ViewState::new(target.map_or(YearFilter::All, YearFilter::Year), weeks.len());
    if let Some(index) = selection.index {
        view.select_week(index);
    }
    if let Some(step) = selection.step {
        view.step(step);
    }
    let week = weeks.into_iter().nth(view.week_index());

    Some(PagelleView {
        year: target,
        view,
        week,
        cumulative,
    })
}

pub async fn members(state: &AppState) -> Option<Vec<MemberCard>> {
    let doc: MembersDoc = state.loader.load("membri.json").await?;
    if doc.members.is_empty() {
        return None;
    }
    let cards = doc
        .members
        .into_iter()
        .map(|profile| MemberCard {
            display_title: profile
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Membro".to_string()),
            avatar_fallback: profile
                .emoji
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| initials(&profile.name)),
            profile,
        })
        .collect();
    Some(cards)
}

pub async fn lider(state: &AppState) -> Option<LiderView> {
    state.loader.load("lider.json").await.map(build_lider)
}

pub async fn history(state: &AppState) -> Option<HistoryView> {
    state.loader.load("history.json").await.map(build_history)
}

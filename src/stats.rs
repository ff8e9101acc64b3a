use crate::models::{
    ActivitySeries, CumulativeRow, HistoryDoc, HistoryEvent, LeaderboardRow, LiderDoc,
    LiderReign, LiderStats, MostReigns, Week, YearRecap, YearSummary,
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Podium {
    Gold,
    Silver,
    Bronze,
}

impl Podium {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Podium::Gold),
            2 => Some(Podium::Silver),
            3 => Some(Podium::Bronze),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: usize,
    pub podium: Option<Podium>,
    pub name: String,
    pub message_count: u64,
    pub bar_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub value: u64,
    pub percent: f64,
}

/// `value / max * 100`, or 0 when there is nothing to scale against.
pub fn bar_percent(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    value / max * 100.0
}

/// Stable descending sort on `measure`; equal measures keep their input order.
pub fn rank_by<T>(mut items: Vec<T>, measure: impl Fn(&T) -> f64) -> Vec<T> {
    items.sort_by(|a, b| measure(b).total_cmp(&measure(a)));
    items
}

pub fn rank_leaderboard(rows: Vec<LeaderboardRow>) -> Vec<RankedEntry> {
    let ranked = rank_by(rows, |row| row.message_count as f64);
    let max = ranked.first().map_or(0, |row| row.message_count);

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, row)| RankedEntry {
            rank: index + 1,
            podium: Podium::for_rank(index + 1),
            bar_percent: bar_percent(row.message_count as f64, max as f64),
            name: row.name,
            message_count: row.message_count,
        })
        .collect()
}

pub fn histogram_bars(values: &[u64]) -> Vec<Bar> {
    let max = values.iter().copied().max().unwrap_or(0);
    values
        .iter()
        .map(|&value| Bar {
            value,
            percent: bar_percent(value as f64, max as f64),
        })
        .collect()
}

/// Fixed-width bucketing: indices past `N` are dropped, missing ones are zero.
pub fn buckets<const N: usize>(series: &ActivitySeries) -> [u64; N] {
    let mut out = [0u64; N];
    match series {
        ActivitySeries::Dense(values) => {
            for (slot, value) in out.iter_mut().zip(values) {
                *slot = value.unwrap_or(0);
            }
        }
        ActivitySeries::Sparse(values) => {
            for (key, value) in values {
                if let Some(slot) = key.trim().parse::<usize>().ok().and_then(|i| out.get_mut(i)) {
                    *slot = *value;
                }
            }
        }
    }
    out
}

#[derive(Default)]
struct MemberTally {
    votes: Vec<f64>,
    messages: u64,
    weeks: u32,
    signature: Option<String>,
}

/// Season table from weekly report cards, best mean grade first.
pub fn cumulative_stats(weeks: &[Week]) -> Vec<CumulativeRow> {
    let mut order: Vec<String> = Vec::new();
    let mut tallies: HashMap<String, MemberTally> = HashMap::new();

    for card in weeks.iter().flat_map(|week| &week.pagelle) {
        if card.name.is_empty() {
            continue;
        }
        // A zero grade marks a week the member was not graded.
        let Some(voto) = card.voto.filter(|v| *v > 0.0) else {
            continue;
        };
        let tally = tallies.entry(card.name.clone()).or_insert_with(|| {
            order.push(card.name.clone());
            MemberTally::default()
        });
        tally.votes.push(voto);
        tally.messages = tally.messages.saturating_add(card.messaggi);
        tally.weeks += 1;
        if tally.signature.is_none() {
            tally.signature = card.highlights.first().cloned();
        }
    }

    let rows = order
        .into_iter()
        .filter_map(|name| {
            let tally = tallies.remove(&name)?;
            let count = tally.votes.len() as f64;
            let mean = tally.votes.iter().sum::<f64>() / count;
            Some(CumulativeRow {
                media_voto: round2(mean),
                best_voto: tally.votes.iter().copied().fold(f64::MIN, f64::max),
                worst_voto: tally.votes.iter().copied().fold(f64::MAX, f64::min),
                settimane_attive: tally.weeks,
                total_messaggi: tally.messages,
                signature: tally.signature,
                name,
            })
        })
        .collect();

    rank_by(rows, |row| row.media_voto)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeBand {
    Alto,
    Medio,
    Basso,
}

impl GradeBand {
    pub fn for_voto(voto: f64) -> Self {
        if voto >= 7.0 {
            GradeBand::Alto
        } else if voto >= 5.0 {
            GradeBand::Medio
        } else {
            GradeBand::Basso
        }
    }
}

pub fn first_name(full: &str) -> &str {
    full.split_whitespace().next().unwrap_or("")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MvpTally {
    pub name: String,
    pub years: u32,
}

/// Most frequent yearly MVP by first name. On a tie the name met first wins.
pub fn all_time_mvp(years: &[YearSummary]) -> Option<MvpTally> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u32> = HashMap::new();

    for summary in years {
        let name = first_name(&summary.mvp);
        if name.is_empty() {
            continue;
        }
        let count = counts.entry(name).or_insert_with(|| {
            order.push(name);
            0
        });
        *count += 1;
    }

    let mut best: Option<MvpTally> = None;
    for name in order {
        let years = counts[name];
        if best.as_ref().is_none_or(|current| years > current.years) {
            best = Some(MvpTally {
                name: name.to_string(),
                years,
            });
        }
    }
    best
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Positive,
    Negative,
    Flat,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBar {
    pub year: i32,
    pub height_percent: f64,
    pub current: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCard {
    pub year: i32,
    pub total_messages: u64,
    pub mvp: String,
    pub trend_label: String,
    pub trend: TrendDirection,
    pub highlights: Option<String>,
    pub current: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveOverview {
    pub total_messages: u64,
    pub total_years: usize,
    pub peak_year: Option<i32>,
    pub all_time_mvp: Option<MvpTally>,
    pub trend_bars: Vec<TrendBar>,
    pub cards: Vec<YearCard>,
}

pub fn trend_label(trend: Option<f64>) -> (String, TrendDirection) {
    match trend {
        Some(t) if t > 0.0 => (format!("+{t}%"), TrendDirection::Positive),
        Some(t) if t < 0.0 => (format!("{t}%"), TrendDirection::Negative),
        _ => ("-".to_string(), TrendDirection::Flat),
    }
}

/// Cross-year totals, the trend chart in document order and the year cards
/// newest first. `current_year` is the one still in progress.
pub fn build_archive(years: &[YearSummary], current_year: i32) -> ArchiveOverview {
    let total_messages = years.iter().map(|y| y.total_messages).sum();
    let mut peak: Option<&YearSummary> = None;
    for summary in years {
        if peak.is_none_or(|p| summary.total_messages > p.total_messages) {
            peak = Some(summary);
        }
    }
    let max = peak.map_or(0, |p| p.total_messages);

    let trend_bars = years
        .iter()
        .map(|y| TrendBar {
            year: y.year,
            height_percent: bar_percent(y.total_messages as f64, max as f64),
            current: y.year == current_year,
        })
        .collect();

    let mut sorted: Vec<&YearSummary> = years.iter().collect();
    sorted.sort_by(|a, b| b.year.cmp(&a.year));
    let cards = sorted
        .into_iter()
        .map(|y| {
            let (trend_label, trend) = trend_label(y.trend);
            YearCard {
                year: y.year,
                total_messages: y.total_messages,
                mvp: first_name(&y.mvp).to_string(),
                trend_label,
                trend,
                highlights: y.highlights.clone().filter(|h| !h.is_empty()),
                current: y.year == current_year,
            }
        })
        .collect();

    ArchiveOverview {
        total_messages,
        total_years: years.len(),
        peak_year: peak.map(|p| p.year),
        all_time_mvp: all_time_mvp(years),
        trend_bars,
        cards,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberedReign {
    pub number: usize,
    pub current: bool,
    #[serde(flatten)]
    pub reign: LiderReign,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiderView {
    pub description: String,
    pub rules: Vec<String>,
    pub current: Option<LiderReign>,
    pub timeline: Vec<NumberedReign>,
    pub stats: LiderStats,
}

/// Derived when the document carries no stats block. Reign length needs
/// parseable dates, so `longest_reign` is only ever taken from the document.
pub fn lider_stats(timeline: &[LiderReign]) -> LiderStats {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for reign in timeline {
        let count = counts.entry(reign.name.as_str()).or_insert_with(|| {
            order.push(reign.name.as_str());
            0
        });
        *count += 1;
    }

    let mut most: Option<MostReigns> = None;
    for name in order {
        let count = counts[name];
        if most.as_ref().is_none_or(|m| count > m.count) {
            most = Some(MostReigns {
                name: name.to_string(),
                count,
            });
        }
    }

    LiderStats {
        total_liders: timeline.len(),
        longest_reign: None,
        most_reigns: most,
    }
}

/// The timeline comes oldest first; the view lists it newest first, numbered
/// down from the total.
pub fn build_lider(doc: LiderDoc) -> LiderView {
    let stats = doc.stats.unwrap_or_else(|| lider_stats(&doc.timeline));
    let current = doc.timeline.iter().find(|r| r.is_current()).cloned();
    let total = doc.timeline.len();
    let timeline = doc
        .timeline
        .into_iter()
        .rev()
        .enumerate()
        .map(|(index, reign)| NumberedReign {
            number: total - index,
            current: reign.is_current(),
            reign,
        })
        .collect();

    LiderView {
        description: doc.description,
        rules: doc.rules,
        current,
        timeline,
        stats,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecapCard {
    pub year: i32,
    #[serde(flatten)]
    pub recap: YearRecap,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub years_active: Option<u32>,
    pub total_messages: Option<u64>,
    pub founding_date: Option<String>,
    pub founder: Option<String>,
    pub timeline: Vec<HistoryEvent>,
    pub yearly_recap: Vec<RecapCard>,
    pub evolution_narrative: Option<String>,
}

/// Yearly recap newest first; keys that are not years are skipped.
pub fn build_history(doc: HistoryDoc) -> HistoryView {
    let mut yearly_recap: Vec<RecapCard> = doc
        .yearly_stats
        .into_iter()
        .filter_map(|(key, recap)| {
            let year = key.trim().parse().ok()?;
            Some(RecapCard { year, recap })
        })
        .collect();
    yearly_recap.sort_by(|a, b| b.year.cmp(&a.year));

    HistoryView {
        years_active: doc.years_active,
        total_messages: doc.total_messages,
        founding_date: doc.founding_date,
        founder: doc.founder,
        timeline: doc.timeline,
        yearly_recap,
        evolution_narrative: doc.evolution_narrative.filter(|n| !n.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportCard, HOURS, WEEKDAYS};
    use std::collections::BTreeMap;

    fn row(name: &str, count: u64) -> LeaderboardRow {
        LeaderboardRow {
            name: name.into(),
            message_count: count,
        }
    }

    fn week(cards: &[(&str, f64, u64)]) -> Week {
        Week {
            start_date: String::new(),
            pagelle: cards
                .iter()
                .map(|(name, voto, messaggi)| ReportCard {
                    name: (*name).into(),
                    week: String::new(),
                    voto: Some(*voto),
                    giudizio: String::new(),
                    messaggi: *messaggi,
                    media_giornaliera: 0.0,
                    highlights: Vec::new(),
                })
                .collect(),
            summary: String::new(),
            best_quotes: Vec::new(),
            stats: None,
        }
    }

    fn summary(year: i32, total: u64, mvp: &str) -> YearSummary {
        YearSummary {
            year,
            total_messages: total,
            mvp: mvp.into(),
            trend: None,
            highlights: None,
        }
    }

    #[test]
    fn leaderboard_ranks_and_scales_bars() {
        let ranked = rank_leaderboard(vec![row("X", 10), row("Y", 30)]);
        assert_eq!(ranked[0].name, "Y");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].podium, Some(Podium::Gold));
        assert_eq!(ranked[0].bar_percent, 100.0);
        assert_eq!(ranked[1].name, "X");
        assert!((ranked[1].bar_percent - 33.333).abs() < 0.01);
    }

    #[test]
    fn leaderboard_marks_top_three_only() {
        let ranked = rank_leaderboard(vec![row("A", 4), row("B", 3), row("C", 2), row("D", 1)]);
        let podiums: Vec<_> = ranked.iter().map(|e| e.podium).collect();
        assert_eq!(
            podiums,
            [Some(Podium::Gold), Some(Podium::Silver), Some(Podium::Bronze), None]
        );
        assert_eq!(ranked[3].rank, 4);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let ranked = rank_leaderboard(vec![row("P", 5), row("Q", 9), row("R", 5), row("S", 5)]);
        let names: Vec<_> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Q", "P", "R", "S"]);
    }

    #[test]
    fn zero_max_gives_zero_width_bars() {
        let ranked = rank_leaderboard(vec![row("A", 0), row("B", 0)]);
        assert!(ranked.iter().all(|e| e.bar_percent == 0.0));
        assert!(histogram_bars(&[0, 0, 0]).iter().all(|b| b.percent == 0.0));
        assert!(rank_leaderboard(Vec::new()).is_empty());
    }

    #[test]
    fn buckets_always_have_fixed_width() {
        let short = ActivitySeries::Dense(vec![Some(4), None, Some(2)]);
        let hourly = buckets::<HOURS>(&short);
        assert_eq!(hourly.len(), 24);
        assert_eq!(&hourly[..4], &[4, 0, 2, 0]);

        let long = ActivitySeries::Dense((0..30).map(Some).collect());
        let daily = buckets::<WEEKDAYS>(&long);
        assert_eq!(daily, [0, 1, 2, 3, 4, 5, 6]);

        let sparse = ActivitySeries::Sparse(BTreeMap::from([
            ("6".to_string(), 9),
            ("99".to_string(), 1),
            ("sabato".to_string(), 3),
        ]));
        assert_eq!(buckets::<WEEKDAYS>(&sparse), [0, 0, 0, 0, 0, 0, 9]);
        assert_eq!(buckets::<HOURS>(&ActivitySeries::default()), [0; HOURS]);
    }

    #[test]
    fn cumulative_stats_from_two_weeks() {
        let rows = cumulative_stats(&[week(&[("X", 6.0, 10)]), week(&[("X", 8.0, 5)])]);
        assert_eq!(rows.len(), 1);
        let x = &rows[0];
        assert_eq!(x.name, "X");
        assert_eq!(x.settimane_attive, 2);
        assert_eq!(x.media_voto, 7.0);
        assert_eq!(x.best_voto, 8.0);
        assert_eq!(x.worst_voto, 6.0);
        assert_eq!(x.total_messaggi, 15);
    }

    #[test]
    fn cumulative_stats_sort_by_mean_and_round() {
        let rows = cumulative_stats(&[
            week(&[("A", 6.0, 0), ("B", 7.0, 0), ("", 10.0, 0)]),
            week(&[("A", 6.5, 0), ("B", 8.0, 0)]),
            week(&[("A", 6.5, 0)]),
        ]);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        assert_eq!(rows[1].media_voto, 6.33);
        assert!(cumulative_stats(&[]).is_empty());
    }

    #[test]
    fn cumulative_stats_skip_ungraded_weeks() {
        let rows = cumulative_stats(&[
            week(&[("X", 6.0, 4), ("Y", 0.0, 9)]),
            week(&[("X", 0.0, 7)]),
            week(&[("X", 8.0, 2)]),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].settimane_attive, 2);
        assert_eq!(rows[0].media_voto, 7.0);
        assert_eq!(rows[0].worst_voto, 6.0);
        assert_eq!(rows[0].total_messaggi, 6);
    }

    #[test]
    fn grade_bands() {
        assert_eq!(GradeBand::for_voto(7.0), GradeBand::Alto);
        assert_eq!(GradeBand::for_voto(5.5), GradeBand::Medio);
        assert_eq!(GradeBand::for_voto(4.0), GradeBand::Basso);
    }

    #[test]
    fn all_time_mvp_counts_first_names_and_keeps_first_on_tie() {
        let years = [
            summary(2020, 1, "Bruno Rossi"),
            summary(2021, 1, "Anna Bianchi"),
            summary(2022, 1, "Anna"),
            summary(2023, 1, "Bruno Verdi"),
        ];
        let mvp = all_time_mvp(&years).unwrap();
        assert_eq!(mvp.name, "Bruno");
        assert_eq!(mvp.years, 2);
        assert_eq!(all_time_mvp(&[]), None);
    }

    #[test]
    fn archive_totals_peak_and_ordering() {
        let mut years = vec![
            summary(2024, 500, "Anna B"),
            summary(2025, 800, "Bruno R"),
            summary(2026, 800, "Anna B"),
        ];
        years[1].trend = Some(60.0);
        years[2].trend = Some(-12.5);

        let archive = build_archive(&years, 2026);
        assert_eq!(archive.total_messages, 2100);
        assert_eq!(archive.total_years, 3);
        assert_eq!(archive.peak_year, Some(2025));
        assert_eq!(archive.all_time_mvp.unwrap().name, "Anna");
        assert_eq!(archive.trend_bars[0].height_percent, 62.5);
        assert!(archive.trend_bars[2].current);

        let card_years: Vec<_> = archive.cards.iter().map(|c| c.year).collect();
        assert_eq!(card_years, [2026, 2025, 2024]);
        assert_eq!(archive.cards[0].trend_label, "-12.5%");
        assert_eq!(archive.cards[1].trend_label, "+60%");
        assert_eq!(archive.cards[2].trend_label, "-");
        assert_eq!(archive.cards[2].mvp, "Anna");
    }

    #[test]
    fn empty_archive_is_neutral() {
        let archive = build_archive(&[], 2026);
        assert_eq!(archive.total_messages, 0);
        assert_eq!(archive.peak_year, None);
        assert!(archive.cards.is_empty());
    }

    #[test]
    fn lider_view_orders_newest_first() {
        let doc: LiderDoc = serde_json::from_str(
            r#"{"description": "d", "timeline": [
                {"name": "Anna", "period": "2019-2021", "endDate": "2021-01-01"},
                {"name": "Bruno", "period": "2021-2023", "endDate": "2023-01-01"},
                {"name": "Anna", "period": "2023-", "endDate": null}
            ]}"#,
        )
        .unwrap();
        let view = build_lider(doc);

        assert_eq!(view.current.as_ref().map(|r| r.name.as_str()), Some("Anna"));
        let numbers: Vec<_> = view.timeline.iter().map(|r| r.number).collect();
        assert_eq!(numbers, [3, 2, 1]);
        assert!(view.timeline[0].current);
        assert_eq!(view.stats.total_liders, 3);
        assert_eq!(
            view.stats.most_reigns,
            Some(MostReigns { name: "Anna".into(), count: 2 })
        );
    }

    #[test]
    fn history_recap_sorted_newest_first() {
        let doc: HistoryDoc = serde_json::from_str(
            r#"{"yearlyStats": {
                "2019": {"messages": 10, "activeMembers": 3},
                "2021": {"messages": 30, "activeMembers": 5, "mvp": "Anna"},
                "boh": {"messages": 1}
            }}"#,
        )
        .unwrap();
        let view = build_history(doc);
        let years: Vec<_> = view.yearly_recap.iter().map(|r| r.year).collect();
        assert_eq!(years, [2021, 2019]);
        assert!(view.timeline.is_empty());
    }
}

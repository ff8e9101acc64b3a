use crate::models::{Moment, ReportCard};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const ALL: &str = "all";

/// Fields the filter engine needs from a record.
pub trait Record {
    fn year(&self) -> Option<i32>;

    fn category(&self) -> Option<&str> {
        None
    }

    fn date(&self) -> Option<&str> {
        None
    }
}

impl Record for Moment {
    fn year(&self) -> Option<i32> {
        self.year
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

impl Record for ReportCard {
    fn year(&self) -> Option<i32> {
        crate::normalize::year_from_date(&self.week)
    }

    fn date(&self) -> Option<&str> {
        Some(&self.week)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl YearFilter {
    pub fn year(self) -> Option<i32> {
        match self {
            YearFilter::All => None,
            YearFilter::Year(year) => Some(year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidYear(pub String);

impl fmt::Display for InvalidYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anno must be a year or '{ALL}', got '{}'", self.0)
    }
}

impl FromStr for YearFilter {
    type Err = InvalidYear;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            return Ok(YearFilter::All);
        }
        s.parse()
            .map(YearFilter::Year)
            .map_err(|_| InvalidYear(s.to_string()))
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => f.write_str(ALL),
            YearFilter::Year(year) => write!(f, "{year}"),
        }
    }
}

impl Serialize for YearFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            YearFilter::All => serializer.serialize_str(ALL),
            YearFilter::Year(year) => serializer.serialize_i32(*year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => CategoryFilter::All,
            Some(c) if c.eq_ignore_ascii_case(ALL) => CategoryFilter::All,
            Some(c) => CategoryFilter::Only(c.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL,
            CategoryFilter::Only(category) => category,
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Records without a resolvable year only survive the `All` filter.
pub fn filter_by_year<R: Record>(records: Vec<R>, year: YearFilter) -> Vec<R> {
    match year {
        YearFilter::All => records,
        YearFilter::Year(wanted) => records
            .into_iter()
            .filter(|record| record.year() == Some(wanted))
            .collect(),
    }
}

pub fn filter_by_category<R: Record>(records: Vec<R>, category: &CategoryFilter) -> Vec<R> {
    match category {
        CategoryFilter::All => records,
        CategoryFilter::Only(wanted) => records
            .into_iter()
            .filter(|record| record.category() == Some(wanted.as_str()))
            .collect(),
    }
}

pub fn filter<R: Record>(records: Vec<R>, year: YearFilter, category: &CategoryFilter) -> Vec<R> {
    filter_by_category(filter_by_year(records, year), category)
}

/// Newest first. Dates are zero-padded ISO strings so byte order is date order;
/// undated records compare as the empty string and land at the end.
pub fn sort_by_date_descending<R: Record>(mut records: Vec<R>) -> Vec<R> {
    records.sort_by(|a, b| b.date().unwrap_or("").cmp(a.date().unwrap_or("")));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moment(quote: &str, date: Option<&str>, category: &str) -> Moment {
        Moment {
            quote: quote.into(),
            author: String::new(),
            date: date.map(str::to_string),
            category: category.into(),
            context: None,
            year: date.and_then(crate::normalize::year_from_date),
        }
    }

    fn sample() -> Vec<Moment> {
        vec![
            moment("a", Some("2024-03-01"), "fails"),
            moment("b", Some("2025-06-30"), "battute"),
            moment("c", None, "fails"),
            moment("d", Some("2024-11-12"), "momenti"),
        ]
    }

    fn quotes(records: &[Moment]) -> Vec<&str> {
        records.iter().map(|m| m.quote.as_str()).collect()
    }

    #[test]
    fn year_filter_parses_all_and_years() {
        assert_eq!("all".parse::<YearFilter>(), Ok(YearFilter::All));
        assert_eq!("".parse::<YearFilter>(), Ok(YearFilter::All));
        assert_eq!("2024".parse::<YearFilter>(), Ok(YearFilter::Year(2024)));
        assert!("duemila".parse::<YearFilter>().is_err());
        assert_eq!(YearFilter::Year(2024).to_string(), "2024");
    }

    #[test]
    fn filter_by_year_excludes_undated() {
        let filtered = filter_by_year(sample(), YearFilter::Year(2024));
        assert_eq!(quotes(&filtered), ["a", "d"]);
        assert_eq!(filter_by_year(sample(), YearFilter::All).len(), 4);
    }

    #[test]
    fn all_after_year_is_idempotent() {
        let once = filter_by_year(sample(), YearFilter::Year(2024));
        let twice = filter_by_year(once.clone(), YearFilter::All);
        assert_eq!(once, twice);
    }

    #[test]
    fn year_and_category_filters_commute() {
        let category = CategoryFilter::Only("fails".into());
        let a = filter_by_category(filter_by_year(sample(), YearFilter::Year(2024)), &category);
        let b = filter_by_year(filter_by_category(sample(), &category), YearFilter::Year(2024));
        assert_eq!(a, b);
        assert_eq!(quotes(&a), ["a"]);
    }

    #[test]
    fn unknown_category_matches_verbatim() {
        let mut records = sample();
        records.push(moment("e", None, "sfottò"));
        let filtered = filter_by_category(records, &CategoryFilter::parse(Some("sfottò")));
        assert_eq!(quotes(&filtered), ["e"]);
    }

    #[test]
    fn sort_puts_newest_first_and_undated_last() {
        let sorted = sort_by_date_descending(sample());
        assert_eq!(quotes(&sorted), ["b", "d", "a", "c"]);
    }

    #[test]
    fn report_cards_filter_and_sort_by_week() {
        let card = |name: &str, week: &str| ReportCard {
            name: name.into(),
            week: week.into(),
            voto: Some(6.0),
            giudizio: String::new(),
            messaggi: 0,
            media_giornaliera: 0.0,
            highlights: Vec::new(),
        };
        let cards = vec![
            card("X", "2024-12-30"),
            card("X", "2025-01-06"),
            card("Y", "2025-01-13"),
        ];
        let in_2025 = sort_by_date_descending(filter_by_year(cards.clone(), YearFilter::Year(2025)));
        let names: Vec<_> = in_2025.iter().map(|c| c.week.as_str()).collect();
        assert_eq!(names, ["2025-01-13", "2025-01-06"]);
        assert!(filter_by_category(cards, &CategoryFilter::Only("fails".into())).is_empty());
    }

    #[test]
    fn empty_inputs_stay_empty() {
        let empty: Vec<Moment> = Vec::new();
        assert!(filter(empty.clone(), YearFilter::Year(2020), &CategoryFilter::All).is_empty());
        assert!(sort_by_date_descending(empty).is_empty());
    }
}

use crate::query::{CategoryFilter, YearFilter};
use serde::Serialize;

/// What the visitor is currently looking at on a page. Lives for one request;
/// every transition is clamped so the week index always points into the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    year: YearFilter,
    week_index: usize,
    week_count: usize,
    category: CategoryFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekStep {
    Prev,
    Next,
}

impl WeekStep {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "prev" | "precedente" => Some(WeekStep::Prev),
            "next" | "successiva" => Some(WeekStep::Next),
            _ => None,
        }
    }
}

impl ViewState {
    /// Starts on the most recent week of `year`.
    pub fn new(year: YearFilter, week_count: usize) -> Self {
        let mut state = Self {
            year,
            week_index: 0,
            week_count: 0,
            category: CategoryFilter::All,
        };
        state.set_year(year, week_count);
        state
    }

    pub fn year(&self) -> YearFilter {
        self.year
    }

    pub fn week_index(&self) -> usize {
        self.week_index
    }

    pub fn week_count(&self) -> usize {
        self.week_count
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    /// Switching years lands on that year's latest week, never a stale index.
    pub fn set_year(&mut self, year: YearFilter, week_count: usize) {
        self.year = year;
        self.week_count = week_count;
        self.week_index = week_count.saturating_sub(1);
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    pub fn select_week(&mut self, index: usize) {
        self.week_index = index.min(self.week_count.saturating_sub(1));
    }

    pub fn next_week(&mut self) {
        if self.has_next() {
            self.week_index += 1;
        }
    }

    pub fn prev_week(&mut self) {
        if self.has_prev() {
            self.week_index -= 1;
        }
    }

    pub fn step(&mut self, step: WeekStep) {
        match step {
            WeekStep::Prev => self.prev_week(),
            WeekStep::Next => self.next_week(),
        }
    }

    pub fn has_prev(&self) -> bool {
        self.week_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.week_index + 1 < self.week_count
    }

    /// The state one step away, for rendering prev/next links.
    pub fn stepped(&self, step: WeekStep) -> Self {
        let mut next = self.clone();
        next.step(step);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_latest_week() {
        let state = ViewState::new(YearFilter::Year(2025), 10);
        assert_eq!(state.week_index(), 9);
        assert!(!state.has_next());
        assert!(state.has_prev());
    }

    #[test]
    fn next_week_clamps_at_last() {
        let mut state = ViewState::new(YearFilter::All, 4);
        state.select_week(0);
        state.set_year(YearFilter::Year(2024), 5);
        state.select_week(0);
        for _ in 0..5 {
            state.next_week();
        }
        assert_eq!(state.week_index(), 4);
        state.next_week();
        state.next_week();
        assert_eq!(state.week_index(), 4);
    }

    #[test]
    fn prev_week_clamps_at_first() {
        let mut state = ViewState::new(YearFilter::All, 2);
        state.prev_week();
        state.prev_week();
        state.prev_week();
        assert_eq!(state.week_index(), 0);
        assert!(!state.has_prev());
    }

    #[test]
    fn set_year_resets_stale_index() {
        let mut state = ViewState::new(YearFilter::Year(2025), 40);
        assert_eq!(state.week_index(), 39);
        state.set_year(YearFilter::Year(2019), 3);
        assert_eq!(state.week_index(), 2);
        state.set_year(YearFilter::Year(2018), 0);
        assert_eq!(state.week_index(), 0);
    }

    #[test]
    fn empty_year_ignores_navigation() {
        let mut state = ViewState::new(YearFilter::Year(2020), 0);
        state.next_week();
        state.prev_week();
        state.select_week(7);
        assert_eq!(state.week_index(), 0);
        assert!(!state.has_next());
    }

    #[test]
    fn category_is_independent_of_weeks() {
        let mut state = ViewState::new(YearFilter::Year(2025), 3);
        state.select_week(1);
        state.set_category(CategoryFilter::Only("fails".into()));
        assert_eq!(state.week_index(), 1);
        assert_eq!(state.year(), YearFilter::Year(2025));
        assert_eq!(state.category().as_str(), "fails");
    }

    #[test]
    fn stepped_leaves_original_untouched() {
        let state = ViewState::new(YearFilter::All, 3);
        let prev = state.stepped(WeekStep::Prev);
        assert_eq!(prev.week_index(), 1);
        assert_eq!(state.week_index(), 2);
        assert_eq!(WeekStep::parse("next"), Some(WeekStep::Next));
        assert_eq!(WeekStep::parse("sideways"), None);
    }
}

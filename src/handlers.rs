use crate::errors::AppError;
use crate::models::QuickStats;
use crate::pages::{self, BestOfView, LeaderboardView, MemberCard, PagelleView, WeekSelection};
use crate::query::{CategoryFilter, YearFilter};
use crate::state::AppState;
use crate::stats::{ArchiveOverview, HistoryView, LiderView};
use crate::ui;
use crate::view::{ViewState, WeekStep};
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;

/// Query-string selection shared by every page.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub anno: Option<String>,
    pub categoria: Option<String>,
    pub settimana: Option<usize>,
    pub vai: Option<String>,
}

impl ViewQuery {
    fn year(&self) -> Result<YearFilter, AppError> {
        Ok(self.anno.as_deref().unwrap_or("").parse::<YearFilter>()?)
    }

    fn category(&self) -> CategoryFilter {
        CategoryFilter::parse(self.categoria.as_deref())
    }

    /// Best-of has no weeks: only the year and category axes move.
    fn best_of_view(&self) -> Result<ViewState, AppError> {
        let mut view = ViewState::new(self.year()?, 0);
        view.set_category(self.category());
        Ok(view)
    }

    fn week(&self) -> WeekSelection {
        WeekSelection {
            index: self.settimana,
            step: self.vai.as_deref().and_then(WeekStep::parse),
        }
    }
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let stats = pages::quick_stats(&state).await;
    Html(ui::render_home(stats.as_ref()))
}

pub async fn classifica(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Html<String>, AppError> {
    let year = query.year()?;
    let (view, years) = tokio::join!(
        pages::leaderboard(&state, year),
        pages::available_years(&state)
    );
    Ok(Html(ui::render_classifica(view.as_ref(), year, &years)))
}

pub async fn archivio(State(state): State<AppState>) -> Html<String> {
    let view = pages::archive(&state).await;
    Html(ui::render_archivio(view.as_ref()))
}

pub async fn best_of(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Html<String>, AppError> {
    let selection = query.best_of_view()?;
    let (view, years) = tokio::join!(
        pages::best_of(&state, selection.clone()),
        pages::available_years(&state)
    );
    Ok(Html(ui::render_best_of(view.as_ref(), &selection, &years)))
}

pub async fn pagelle(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Html<String>, AppError> {
    let year = query.year()?;
    let (view, years) = tokio::join!(
        pages::pagelle(&state, year, query.week()),
        pages::available_years(&state)
    );
    Ok(Html(ui::render_pagelle(view.as_ref(), year, &years)))
}

pub async fn membri(State(state): State<AppState>) -> Html<String> {
    let members = pages::members(&state).await;
    Html(ui::render_membri(members.as_deref()))
}

pub async fn lider(State(state): State<AppState>) -> Html<String> {
    let view = pages::lider(&state).await;
    Html(ui::render_lider(view.as_ref()))
}

pub async fn storia(State(state): State<AppState>) -> Html<String> {
    let view = pages::history(&state).await;
    Html(ui::render_storia(view.as_ref()))
}

// JSON API: an absent dataset is `null`, never an error status.

pub async fn get_stats(State(state): State<AppState>) -> Json<Option<QuickStats>> {
    Json(pages::quick_stats(&state).await)
}

pub async fn get_classifica(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Option<LeaderboardView>>, AppError> {
    let year = query.year()?;
    Ok(Json(pages::leaderboard(&state, year).await))
}

pub async fn get_archivio(State(state): State<AppState>) -> Json<Option<ArchiveOverview>> {
    Json(pages::archive(&state).await)
}

pub async fn get_best_of(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Option<BestOfView>>, AppError> {
    let selection = query.best_of_view()?;
    Ok(Json(pages::best_of(&state, selection).await))
}

pub async fn get_pagelle(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Option<PagelleView>>, AppError> {
    let year = query.year()?;
    Ok(Json(pages::pagelle(&state, year, query.week()).await))
}

pub async fn get_membri(State(state): State<AppState>) -> Json<Option<Vec<MemberCard>>> {
    Json(pages::members(&state).await)
}

pub async fn get_lider(State(state): State<AppState>) -> Json<Option<LiderView>> {
    Json(pages::lider(&state).await)
}

pub async fn get_storia(State(state): State<AppState>) -> Json<Option<HistoryView>> {
    Json(pages::history(&state).await)
}

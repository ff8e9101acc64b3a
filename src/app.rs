use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/classifica", get(handlers::classifica))
        .route("/archivio", get(handlers::archivio))
        .route("/best-of", get(handlers::best_of))
        .route("/pagelle", get(handlers::pagelle))
        .route("/membri", get(handlers::membri))
        .route("/lider", get(handlers::lider))
        .route("/storia", get(handlers::storia))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/classifica", get(handlers::get_classifica))
        .route("/api/archivio", get(handlers::get_archivio))
        .route("/api/best-of", get(handlers::get_best_of))
        .route("/api/pagelle", get(handlers::get_pagelle))
        .route("/api/membri", get(handlers::get_membri))
        .route("/api/lider", get(handlers::get_lider))
        .route("/api/storia", get(handlers::get_storia))
        .with_state(state)
}

pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod pages;
pub mod query;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::Config;
pub use state::AppState;

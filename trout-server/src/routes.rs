use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Form, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use trout_common::{DateWindow, LakeRecord};

use crate::error::{AppError, AppResult};
use crate::render::{IndexPage, LakeMap, PageRenderer, StockingChart};
use crate::service::{LakeService, LakeSnapshot, Populated};

/// Shared state for all handlers
pub struct AppState {
    pub service: LakeService,
    pub renderer: PageRenderer,
    /// `days` shown on the index page before a filter is posted
    pub default_days: u32,
    /// Fixed "today" for the date window; local date when `None`
    pub today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(service: LakeService, renderer: PageRenderer, default_days: u32) -> Self {
        Self {
            service,
            renderer,
            default_days,
            today: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Debug, Deserialize)]
pub struct DaysForm {
    days: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).post(index_filtered))
        .route("/fullscreen", get(fullscreen))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Map and chart over every cached row.
///
/// The `days` box shows the configured default but no filter is applied
/// until the form is posted.
async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let snapshot = state.service.snapshot(Populated::Full).await?;
    let map = LakeMap::build(&snapshot.stocked);
    let chart = StockingChart::new(&snapshot.totals);

    render_index(&state, &snapshot, &map, &chart, state.default_days).await
}

/// Map and chart limited to the last `days` days.
async fn index_filtered(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DaysForm>,
) -> AppResult<Html<String>> {
    let days = parse_days(form.days.as_deref())?;
    let snapshot = state.service.snapshot(Populated::Full).await?;

    let window = DateWindow::last_days(state.today(), days);
    let filtered = state.service.filtered(window).await?;
    tracing::info!(
        "Showing {} lakes stocked between {} and {}",
        filtered.stocked.len(),
        window.start,
        window.end
    );

    let map = LakeMap::build(&filtered.stocked);
    let chart = StockingChart::new(&filtered.totals);

    render_index(&state, &snapshot, &map, &chart, days).await
}

async fn fullscreen(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let snapshot = state.service.snapshot(Populated::StockedOnly).await?;
    let map = LakeMap::build(&snapshot.stocked);
    Ok(Html(state.renderer.render_fullscreen(&map).await?))
}

async fn render_index(
    state: &AppState,
    snapshot: &LakeSnapshot,
    map: &LakeMap,
    chart: &StockingChart,
    days: u32,
) -> AppResult<Html<String>> {
    let derby_lakes = snapshot.derby_set();
    let most_recent: Vec<&LakeRecord> = snapshot.most_recent();

    let html = state
        .renderer
        .render_index(&IndexPage {
            map,
            chart,
            derby_lakes: &derby_lakes,
            most_recent: &most_recent,
            days,
            data_updated: snapshot.data_updated(),
        })
        .await?;
    Ok(Html(html))
}

fn parse_days(days: Option<&str>) -> AppResult<u32> {
    let days = days
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::InvalidDays("missing 'days' field".to_string()))?;
    days.parse::<u32>()
        .map_err(|_| AppError::InvalidDays(format!("'{}' is not a whole number of days", days)))
}

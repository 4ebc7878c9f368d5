use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Datelike;
use serde::Deserialize;
use wealthdesk_core::errors::{Error as CoreError, ValidationError};
use wealthdesk_core::portfolio::performance::{PerformanceView, YearWindow};
use wealthdesk_core::utils::time_utils::today_in;

use super::portfolio_id;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

async fn get_performance(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PerformanceView>> {
    let id = portfolio_id(&id)?;
    let view = state.performance_service.load_view(id).await?;
    Ok(Json(view))
}

/// Last view committed by any refresh, including the one that follows an
/// IRR recalculation. Does not contact the backend.
async fn get_latest_performance(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PerformanceView>> {
    let id = portfolio_id(&id)?;
    state
        .performance_service
        .cached_view(id)
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("No performance view loaded for portfolio {id}"))
        })
}

#[derive(Deserialize)]
struct YearQuery {
    year: Option<String>,
}

/// Defaults to the current year in the reporting timezone.
async fn get_activities(
    Path(id): Path<String>,
    Query(q): Query<YearQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<YearWindow>> {
    let id = portfolio_id(&id)?;
    let year = match q.year.as_deref().map(str::trim).filter(|y| !y.is_empty()) {
        Some(raw) => raw.parse::<i32>().map_err(|_| {
            CoreError::from(ValidationError::InvalidInput(format!("Invalid year {raw:?}")))
        })?,
        None => today_in(state.timezone).year(),
    };
    let window = state.performance_service.year_window(id, year).await?;
    Ok(Json(window))
}

async fn export_performance(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let id = portfolio_id(&id)?;
    let csv = state.performance_service.export_csv(id).await?;
    let disposition = format!("attachment; filename=\"portfolio-{}-performance.csv\"", id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolios/{id}/performance", get(get_performance))
        .route("/portfolios/{id}/performance/latest", get(get_latest_performance))
        .route("/portfolios/{id}/performance/export", get(export_performance))
        .route("/portfolios/{id}/activities", get(get_activities))
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use wealthdesk_core::errors::{Error as CoreError, ValidationError};
use wealthdesk_core::portfolio::irr::{RecalculationOutcome, RecalculationState};
use wealthdesk_core::utils::time_utils::parse_iso_date;

use super::portfolio_id;
use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AsOfBody {
    as_of_date: Option<String>,
}

/// Runs the recalculation. With `asOfDate` in the body the date is selected
/// first; with `{}` the previously selected date is used.
async fn recalculate(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AsOfBody>,
) -> ApiResult<Json<RecalculationOutcome>> {
    let id = portfolio_id(&id)?;
    let outcome = match body.as_of_date.as_deref() {
        Some(raw) => {
            let as_of = parse_iso_date(raw)?;
            state.recalculation.recalculate_as_of(id, as_of).await?
        }
        None => state.recalculation.recalculate(id).await?,
    };
    Ok(Json(outcome))
}

async fn select_date(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AsOfBody>,
) -> ApiResult<Json<RecalculationState>> {
    let id = portfolio_id(&id)?;
    let raw = body
        .as_of_date
        .ok_or_else(|| CoreError::from(ValidationError::MissingField("asOfDate".to_string())))?;
    let as_of = parse_iso_date(&raw)?;
    Ok(Json(state.recalculation.select_date(id, as_of)?))
}

async fn reset_date(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RecalculationState>> {
    let id = portfolio_id(&id)?;
    state.recalculation.reset(id)?;
    Ok(Json(state.recalculation.state(id)))
}

async fn get_state(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RecalculationState>> {
    let id = portfolio_id(&id)?;
    Ok(Json(state.recalculation.state(id)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolios/{id}/irr/recalculate", post(recalculate))
        .route("/portfolios/{id}/irr/date", post(select_date).delete(reset_date))
        .route("/portfolios/{id}/irr/state", get(get_state))
}

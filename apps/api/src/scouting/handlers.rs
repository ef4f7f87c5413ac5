use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::report::MarketBrief;
use crate::scouting::search_market;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MarketSearchRequest {
    pub query: String,
}

/// POST /api/v1/market/search — search-grounded market summary with sources.
pub async fn handle_market_search(
    State(state): State<AppState>,
    Json(req): Json<MarketSearchRequest>,
) -> Result<Json<MarketBrief>, AppError> {
    let query = req.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query must not be empty".to_string()));
    }
    let brief = search_market(&state.llm, query).await?;
    Ok(Json(brief))
}

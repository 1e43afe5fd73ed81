use hub_ws::AppState;

use axum::{
    Json,
    extract::{Query, State},
};
use log::warn;
use serde::Deserialize;
use serde_json::value::RawValue;

pub const DEFAULT_RECENT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// GET /debug/recent?limit=n - Most recent broadcast envelopes, oldest first
pub async fn recent_broadcasts(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Json<Vec<Box<RawValue>>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);

    let envelopes = state
        .hub
        .recent(limit)
        .into_iter()
        .filter_map(|payload| match RawValue::from_string(payload.as_str().to_owned()) {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!("Skipping unreadable replay entry: {e}");
                None
            }
        })
        .collect();

    Json(envelopes)
}

use std::collections::{BTreeMap, HashMap};

use axum::Json;
use axum::extract::{Query, State};
use chrono::{Duration, NaiveDate, Utc};
use common::{Mood, mood::trend_for_average};
use sea_orm::*;
use tracing::instrument;

use crate::entity::entry;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::analytics::*;
use crate::services::page_cache::dashboard_path;
use crate::state::AppState;

use super::find_user;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Fold a window of entries into the per-day timeline and overall summary.
/// Days without entries are omitted rather than zero-filled.
pub(crate) fn aggregate(period: Period, entries: &[entry::Model]) -> AnalyticsResponse {
    let mut days: BTreeMap<NaiveDate, (i64, u64)> = BTreeMap::new();
    for entry in entries {
        let day = days.entry(entry.created_at.date_naive()).or_default();
        day.0 += i64::from(entry.mood_score);
        day.1 += 1;
    }

    let timeline = days
        .into_iter()
        .map(|(date, (score_sum, count))| DayStat {
            date,
            average_score: round1(score_sum as f64 / count as f64),
            entry_count: count,
        })
        .collect();

    let total_entries = entries.len() as u64;
    let average_score = if entries.is_empty() {
        0.0
    } else {
        round1(
            entries.iter().map(|e| f64::from(e.mood_score)).sum::<f64>() / total_entries as f64,
        )
    };

    let mut counts: HashMap<Mood, u64> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.mood).or_default() += 1;
    }
    // Ties go to the brighter mood.
    let most_frequent_mood = counts
        .into_iter()
        .max_by_key(|&(mood, count)| (count, mood.score()))
        .map(|(mood, _)| mood);

    let mood_trend = if entries.is_empty() {
        "Start journaling to see your trend".to_string()
    } else {
        trend_for_average(average_score).to_string()
    };

    AnalyticsResponse {
        period: period.as_str().to_string(),
        timeline,
        summary: AnalyticsSummary {
            total_entries,
            average_score,
            most_frequent_mood,
            mood_trend,
        },
    }
}

/// Mood analytics over a trailing window.
#[utoipa::path(
    get,
    path = "/",
    tag = "Analytics",
    operation_id = "getAnalytics",
    summary = "Mood analytics",
    description = "Per-day mood timeline plus window totals. Responses are cached per user and window until the next write invalidates them.",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Aggregated analytics", body = AnalyticsResponse),
        (status = 400, description = "Unknown period (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown account (USER_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn get_analytics(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let period = match query.period.as_deref() {
        Some(raw) => Period::parse(raw).ok_or_else(|| {
            AppError::Validation(format!("Unknown period '{raw}', expected 7d, 30d or 90d"))
        })?,
        None => Period::Month,
    };

    let user = find_user(&state.db, &auth_user.subject).await?;

    // Keyed under the user's dashboard prefix so any write to their journal
    // drops every cached window at once.
    let cache_key = format!("{}analytics/{}", dashboard_path(user.id), period.as_str());
    if let Some(cached) = state.pages.get(&cache_key) {
        return Ok(Json(cached));
    }

    let cutoff = Utc::now() - Duration::days(period.days());
    let entries = entry::Entity::find()
        .filter(entry::Column::UserId.eq(user.id))
        .filter(entry::Column::CreatedAt.gte(cutoff))
        .order_by_asc(entry::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let response = aggregate(period, &entries);
    let body = serde_json::to_value(&response).map_err(|e| AppError::Internal(e.to_string()))?;
    state.pages.put(&cache_key, body.clone());

    Ok(Json(body))
}

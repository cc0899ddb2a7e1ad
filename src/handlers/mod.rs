//! HTTP request handlers
use crate::domain::{Health, LaunchRecord, LaunchStats, Page};
use crate::errors::{ApiError, ApiResult, QueryError};
use crate::services::LaunchService;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub launch_service: Arc<LaunchService>,
}

/// Full launch detail
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchResponse {
    pub launch_id: String,
    pub mission_name: String,
    pub flight_number: Option<i32>,
    pub launch_date_utc: String,
    pub success: Option<bool>,
    pub details: Option<String>,
    pub rocket_id: String,
    pub launchpad_id: String,
    pub payloads: Vec<String>,
    pub patch_small_link: Option<String>,
    pub patch_large_link: Option<String>,
    pub webcast_link: Option<String>,
    pub article_link: Option<String>,
    pub wikipedia_link: Option<String>,
    pub status: String,
}

impl From<LaunchRecord> for LaunchResponse {
    fn from(record: LaunchRecord) -> Self {
        Self {
            launch_id: record.id,
            mission_name: record.mission_name,
            flight_number: record.flight_number,
            launch_date_utc: record.launch_date_utc,
            success: record.success,
            details: record.details,
            rocket_id: record.rocket_id,
            launchpad_id: record.launchpad_id,
            payloads: record.payloads,
            patch_small_link: record.patch_small_link,
            patch_large_link: record.patch_large_link,
            webcast_link: record.webcast_link,
            article_link: record.article_link,
            wikipedia_link: record.wikipedia_link,
            status: record.status,
        }
    }
}

/// Reduced projection used by list endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSummaryResponse {
    pub launch_id: String,
    pub mission_name: String,
    pub flight_number: Option<i32>,
    pub launch_date_utc: String,
    pub status: String,
    pub rocket_id: String,
}

impl From<LaunchRecord> for LaunchSummaryResponse {
    fn from(record: LaunchRecord) -> Self {
        Self {
            launch_id: record.id,
            mission_name: record.mission_name,
            flight_number: record.flight_number,
            launch_date_utc: record.launch_date_utc,
            status: record.status,
            rocket_id: record.rocket_id,
        }
    }
}

fn summaries(records: Vec<LaunchRecord>) -> Vec<LaunchSummaryResponse> {
    records.into_iter().map(LaunchSummaryResponse::from).collect()
}

/// Query string of the paginated listing.
///
/// An empty `page=` or `size=` falls back to the default like an absent one.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub size: Option<i64>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("`{}` is not an integer", value))),
    }
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Get one launch in full detail
pub async fn get_launch(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<LaunchResponse>> {
    state
        .launch_service
        .find_by_id(&id)
        .await?
        .map(|record| Json(LaunchResponse::from(record)))
        .ok_or_else(|| ApiError::NotFound(format!("Launch {} not found", id)))
}

/// List every launch
pub async fn list_launches(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LaunchSummaryResponse>>> {
    let launches = state.launch_service.find_all().await?;
    Ok(Json(summaries(launches)))
}

/// List one page of launches, optionally filtered by status
pub async fn list_launches_paginated(
    params: Result<Query<PageParams>, QueryRejection>,
    State(state): State<AppState>,
) -> ApiResult<Json<Page<LaunchSummaryResponse>>> {
    let Query(params) = params.map_err(|rejection| QueryError::invalid(rejection.body_text()))?;
    let page = state
        .launch_service
        .find_page(
            params.status.as_deref(),
            params.page.unwrap_or(0),
            params.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(page.map(LaunchSummaryResponse::from)))
}

pub async fn list_launches_by_status(
    Path(status): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LaunchSummaryResponse>>> {
    let launches = state.launch_service.find_by_status(&status).await?;
    Ok(Json(summaries(launches)))
}

pub async fn list_launches_by_rocket(
    Path(rocket_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LaunchSummaryResponse>>> {
    let launches = state.launch_service.find_by_vehicle(&rocket_id).await?;
    Ok(Json(summaries(launches)))
}

pub async fn list_successful_launches(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LaunchSummaryResponse>>> {
    let launches = state.launch_service.find_successful().await?;
    Ok(Json(summaries(launches)))
}

pub async fn list_failed_launches(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LaunchSummaryResponse>>> {
    let launches = state.launch_service.find_failed().await?;
    Ok(Json(summaries(launches)))
}

/// Aggregate counters over the whole table
pub async fn get_launch_stats(State(state): State<AppState>) -> ApiResult<Json<LaunchStats>> {
    let stats = state.launch_service.compute_stats().await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::launch;

    #[test]
    fn test_summary_projection() {
        let summary = LaunchSummaryResponse::from(launch("abc", "failed", "falcon1"));
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "launchId": "abc",
                "missionName": "Mission abc",
                "flightNumber": 1,
                "launchDateUtc": "2006-03-24T22:30:00.000Z",
                "status": "failed",
                "rocketId": "falcon1"
            })
        );
    }

    #[test]
    fn test_detail_keeps_unknown_outcome_as_null() {
        let detail = LaunchResponse::from(launch("abc", "upcoming", "falcon9"));
        let json = serde_json::to_value(&detail).unwrap();

        assert!(json["success"].is_null());
        assert!(json["webcastLink"].is_null());
        assert_eq!(json["launchpadId"], "5e9e4502f5090995de566f86");
        assert_eq!(json["payloads"], serde_json::json!(["5eb0e4b5b6c3bb0006eeb1e1"]));
        assert_eq!(json.as_object().unwrap().len(), 15);
    }

    #[test]
    fn test_summaries_preserve_order() {
        let list = summaries(vec![
            launch("b", "success", "f9"),
            launch("a", "success", "f9"),
        ]);
        let ids: Vec<_> = list.iter().map(|s| s.launch_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    fn page_params(query: &str) -> Result<PageParams, QueryRejection> {
        let uri: axum::http::Uri = format!("/launches/paginated?{}", query).parse().unwrap();
        Query::<PageParams>::try_from_uri(&uri).map(|Query(params)| params)
    }

    #[test]
    fn test_page_params_empty_values_are_absent() {
        let params = page_params("status=&page=&size=").unwrap();
        assert_eq!(params.status.as_deref(), Some(""));
        assert_eq!(params.page, None);
        assert_eq!(params.size, None);
    }

    #[test]
    fn test_page_params_parse_numbers() {
        let params = page_params("page=2&size=5").unwrap();
        assert_eq!(params.page, Some(2));
        assert_eq!(params.size, Some(5));
        assert_eq!(page_params("page=-1").unwrap().page, Some(-1));
    }

    #[test]
    fn test_page_params_reject_non_integers() {
        assert!(page_params("page=abc").is_err());
        assert!(page_params("size=1.5").is_err());
    }
}

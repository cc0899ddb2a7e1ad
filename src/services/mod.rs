//! Business logic services layer
use crate::clients::{SpaceXClient, SpaceXLaunch};
use crate::domain::{status, LaunchRecord, LaunchStats, Page};
use crate::errors::{QueryError, QueryResult, SyncError};
use crate::repo::{LaunchRepository, LaunchWriter};
use crate::utils::require_non_blank;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

const LAUNCH_ID_NULL_OR_EMPTY: &str = "Launch ID cannot be null or empty";
const STATUS_NULL_OR_EMPTY: &str = "Status cannot be null or empty";
const ROCKET_ID_NULL_OR_EMPTY: &str = "Rocket ID cannot be null or empty";
const INVALID_PAGINATION_PARAMS: &str =
    "Invalid pagination parameters: page number must be >= 0 and page size must be > 0";

/// Read-only queries over the launches table.
///
/// Every call re-reads storage; nothing is cached between calls.
#[derive(Clone)]
pub struct LaunchService {
    repo: Arc<dyn LaunchRepository>,
}

impl LaunchService {
    pub fn new(repo: Arc<dyn LaunchRepository>) -> Self {
        Self { repo }
    }

    /// Look up a single launch; an absent id is `Ok(None)`, not an error
    pub async fn find_by_id(&self, id: &str) -> QueryResult<Option<LaunchRecord>> {
        let id = require_non_blank(id, LAUNCH_ID_NULL_OR_EMPTY)?;

        self.repo
            .get_by_key(id)
            .await
            .map_err(|e| QueryError::storage(format!("Error retrieving launch with ID: {}", id), e))
    }

    /// Full snapshot in storage order
    pub async fn find_all(&self) -> QueryResult<Vec<LaunchRecord>> {
        self.repo
            .scan_all()
            .await
            .map_err(|e| QueryError::storage("Error retrieving all launches", e))
    }

    pub async fn find_by_status(&self, status: &str) -> QueryResult<Vec<LaunchRecord>> {
        let status = require_non_blank(status, STATUS_NULL_OR_EMPTY)?;

        let launches = self.repo.scan_all().await.map_err(|e| {
            QueryError::storage(format!("Error retrieving launches by status: {}", status), e)
        })?;

        Ok(filter_by_status(launches, status))
    }

    pub async fn find_by_vehicle(&self, rocket_id: &str) -> QueryResult<Vec<LaunchRecord>> {
        let rocket_id = require_non_blank(rocket_id, ROCKET_ID_NULL_OR_EMPTY)?;

        let launches = self.repo.scan_all().await.map_err(|e| {
            QueryError::storage(
                format!("Error retrieving launches by rocket ID: {}", rocket_id),
                e,
            )
        })?;

        Ok(launches
            .into_iter()
            .filter(|launch| launch.rocket_id == rocket_id)
            .collect())
    }

    pub async fn find_successful(&self) -> QueryResult<Vec<LaunchRecord>> {
        self.find_by_status(status::SUCCESS).await
    }

    /// Strictly `status == "failed"`; upcoming launches are excluded
    pub async fn find_failed(&self) -> QueryResult<Vec<LaunchRecord>> {
        self.find_by_status(status::FAILED).await
    }

    /// One page of launches, optionally narrowed to a status first.
    ///
    /// Validation happens before storage is touched. A page past the end is
    /// an empty page, not an error.
    pub async fn find_page(
        &self,
        status: Option<&str>,
        page: i64,
        size: i64,
    ) -> QueryResult<Page<LaunchRecord>> {
        if page < 0 || size <= 0 {
            return Err(QueryError::invalid(INVALID_PAGINATION_PARAMS));
        }
        let invalid = |_| QueryError::invalid(INVALID_PAGINATION_PARAMS);
        let number = usize::try_from(page).map_err(invalid)?;
        let size = usize::try_from(size).map_err(invalid)?;

        let mut launches = self
            .repo
            .scan_all()
            .await
            .map_err(|e| QueryError::storage("Error retrieving paginated launches", e))?;

        if let Some(status) = status.filter(|s| !s.is_empty()) {
            launches = filter_by_status(launches, status);
        }

        Ok(Page::slice(launches, number, size))
    }

    pub async fn compute_stats(&self) -> QueryResult<LaunchStats> {
        let launches = self.find_all().await?;
        Ok(LaunchStats::compute(&launches))
    }
}

fn filter_by_status(launches: Vec<LaunchRecord>, status: &str) -> Vec<LaunchRecord> {
    launches
        .into_iter()
        .filter(|launch| launch.status == status)
        .collect()
}

/// Outcome of one ingest run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncSummary {
    pub total_fetched: usize,
    pub processed: usize,
    pub failed: usize,
    pub finished_at: DateTime<Utc>,
}

/// Copies launches from the SpaceX API into the table
pub struct SyncService {
    client: SpaceXClient,
    writer: Arc<dyn LaunchWriter>,
}

impl SyncService {
    pub fn new(client: SpaceXClient, writer: Arc<dyn LaunchWriter>) -> Self {
        Self { client, writer }
    }

    /// Fetch every launch and upsert it
    pub async fn run(&self) -> Result<SyncSummary, SyncError> {
        tracing::info!(url = %self.client.url(), "Starting SpaceX launch sync");
        let launches = self.client.fetch_launches().await?;

        if launches.is_empty() {
            tracing::warn!("No launch data received from SpaceX API");
        }

        store_launches(self.writer.as_ref(), launches).await
    }
}

/// Split fetched launches into storable records and a count of rejects
pub fn prepare_records(launches: Vec<SpaceXLaunch>) -> (Vec<LaunchRecord>, usize) {
    let mut records = Vec::with_capacity(launches.len());
    let mut rejected = 0;

    for launch in launches {
        let name = launch.name.clone();
        match launch.into_record() {
            Some(record) => records.push(record),
            None => {
                tracing::warn!(mission = ?name, "Skipping launch with missing ID");
                rejected += 1;
            }
        }
    }

    (records, rejected)
}

async fn store_launches(
    writer: &dyn LaunchWriter,
    launches: Vec<SpaceXLaunch>,
) -> Result<SyncSummary, SyncError> {
    let total_fetched = launches.len();
    let (records, failed) = prepare_records(launches);

    let processed = if records.is_empty() {
        0
    } else {
        writer.put_all(&records).await?
    };

    let summary = SyncSummary {
        total_fetched,
        processed,
        failed,
        finished_at: Utc::now(),
    };
    tracing::info!(
        total_fetched = summary.total_fetched,
        processed = summary.processed,
        failed = summary.failed,
        "Sync completed"
    );
    Ok(summary)
}

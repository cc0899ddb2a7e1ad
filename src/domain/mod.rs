//! Domain models for the launches API
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Status literals stored in the `status` attribute
pub mod status {
    pub const SUCCESS: &str = "success";
    pub const FAILED: &str = "failed";
    pub const UPCOMING: &str = "upcoming";
}

/// Derived launch classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStatus {
    Success,
    Failed,
    Upcoming,
}

impl LaunchStatus {
    /// Derive the status from the nullable success flag.
    /// An unknown outcome means the launch has not happened yet.
    pub fn from_success(success: Option<bool>) -> Self {
        match success {
            Some(true) => LaunchStatus::Success,
            Some(false) => LaunchStatus::Failed,
            None => LaunchStatus::Upcoming,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchStatus::Success => status::SUCCESS,
            LaunchStatus::Failed => status::FAILED,
            LaunchStatus::Upcoming => status::UPCOMING,
        }
    }
}

impl fmt::Display for LaunchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored launch, keyed by `launch_id`.
///
/// Field names match the table's attribute names. `status` is kept as the
/// raw stored string: unknown literals are tolerated and simply never match
/// a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    #[serde(rename = "launch_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mission_name: String,
    #[serde(default)]
    pub flight_number: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub launch_date_utc: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rocket_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub launchpad_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payloads: Vec<String>,
    #[serde(default)]
    pub patch_small_link: Option<String>,
    #[serde(default)]
    pub patch_large_link: Option<String>,
    #[serde(default)]
    pub webcast_link: Option<String>,
    #[serde(default)]
    pub article_link: Option<String>,
    #[serde(default)]
    pub wikipedia_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// Read an explicit null the same way as a missing attribute
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A bounded slice of a (possibly filtered) result set
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: usize,
    pub size: usize,
    pub total_elements: usize,
}

impl<T> Page<T> {
    /// Cut page `number` of `size` elements out of `items`.
    ///
    /// A page past the end yields empty content rather than an error;
    /// `total_elements` is always the length of `items`.
    pub fn slice(items: Vec<T>, number: usize, size: usize) -> Self {
        let total_elements = items.len();
        let start = number.saturating_mul(size);
        let content = if start >= total_elements {
            Vec::new()
        } else {
            let end = start.saturating_add(size).min(total_elements);
            items.into_iter().skip(start).take(end - start).collect()
        };

        Self {
            content,
            number,
            size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> usize {
        if self.size == 0 {
            1
        } else {
            self.total_elements.div_ceil(self.size)
        }
    }

    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    pub fn is_last(&self) -> bool {
        self.number + 1 >= self.total_pages()
    }

    /// Convert the content while keeping the pagination metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

impl<T: Serialize> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut page = serializer.serialize_struct("Page", 7)?;
        page.serialize_field("content", &self.content)?;
        page.serialize_field("number", &self.number)?;
        page.serialize_field("size", &self.size)?;
        page.serialize_field("totalElements", &self.total_elements)?;
        page.serialize_field("totalPages", &self.total_pages())?;
        page.serialize_field("first", &self.is_first())?;
        page.serialize_field("last", &self.is_last())?;
        page.end()
    }
}

/// Aggregate counters over the whole collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchStats {
    pub total_launches: usize,
    pub success_rate: f64,
    pub successful_launches: usize,
    pub failed_launches: usize,
    pub upcoming_launches: usize,
}

impl LaunchStats {
    /// Single pass over the records. Unknown status literals count toward
    /// the total only. The rate is a percentage on a 0-100 scale.
    pub fn compute(records: &[LaunchRecord]) -> Self {
        let mut stats = LaunchStats {
            total_launches: records.len(),
            success_rate: 0.0,
            successful_launches: 0,
            failed_launches: 0,
            upcoming_launches: 0,
        };

        for record in records {
            match record.status.as_str() {
                status::SUCCESS => stats.successful_launches += 1,
                status::FAILED => stats.failed_launches += 1,
                status::UPCOMING => stats.upcoming_launches += 1,
                _ => {}
            }
        }

        if stats.total_launches > 0 {
            stats.success_rate =
                stats.successful_launches as f64 / stats.total_launches as f64 * 100.0;
        }

        stats
    }
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}


#[cfg(test)]
mod tests {
    use super::fixtures::launch;
    use super::*;

    #[test]
    fn test_status_from_success_flag() {
        assert_eq!(LaunchStatus::from_success(Some(true)), LaunchStatus::Success);
        assert_eq!(LaunchStatus::from_success(Some(false)), LaunchStatus::Failed);
        assert_eq!(LaunchStatus::from_success(None), LaunchStatus::Upcoming);
        assert_eq!(LaunchStatus::Upcoming.to_string(), "upcoming");
    }

    #[test]
    fn test_page_slice_middle() {
        let page = Page::slice((0..10).collect::<Vec<_>>(), 1, 4);
        assert_eq!(page.content, vec![4, 5, 6, 7]);
        assert_eq!(page.total_elements, 10);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.is_first());
        assert!(!page.is_last());
    }

    #[test]
    fn test_page_slice_last_partial() {
        let page = Page::slice((0..10).collect::<Vec<_>>(), 2, 4);
        assert_eq!(page.content, vec![8, 9]);
        assert!(page.is_last());
    }

    #[test]
    fn test_page_slice_out_of_range_is_empty() {
        let page = Page::slice((0..10).collect::<Vec<_>>(), 7, 4);
        assert!(page.content.is_empty());
        assert_eq!(page.number, 7);
        assert_eq!(page.total_elements, 10);
        assert!(page.is_last());
    }

    #[test]
    fn test_page_slice_huge_index_does_not_overflow() {
        let page = Page::slice(vec![1, 2, 3], usize::MAX, 2);
        assert!(page.content.is_empty());
    }

    #[test]
    fn test_pages_partition_the_input() {
        let items: Vec<u32> = (0..23).collect();
        let size = 5;
        let mut seen = Vec::new();
        let mut number = 0;
        loop {
            let page = Page::slice(items.clone(), number, size);
            assert!(page.content.len() <= size);
            seen.extend(page.content.iter().copied());
            if page.is_last() {
                break;
            }
            number += 1;
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn test_total_pages_zero_size_is_one() {
        let page: Page<u8> = Page {
            content: vec![],
            number: 0,
            size: 0,
            total_elements: 5,
        };
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_empty_page_is_first_and_last() {
        let page = Page::slice(Vec::<u8>::new(), 0, 20);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_first());
        assert!(page.is_last());
    }

    #[test]
    fn test_page_serializes_metadata() {
        let page = Page::slice(vec!["a", "b", "c"], 0, 2);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": ["a", "b"],
                "number": 0,
                "size": 2,
                "totalElements": 3,
                "totalPages": 2,
                "first": true,
                "last": false
            })
        );
    }

    #[test]
    fn test_stats_empty_collection() {
        let stats = LaunchStats::compute(&[]);
        assert_eq!(stats.total_launches, 0);
        assert_eq!(stats.successful_launches, 0);
        assert_eq!(stats.failed_launches, 0);
        assert_eq!(stats.upcoming_launches, 0);
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn test_stats_mixed_statuses() {
        let records = vec![
            launch("a", "success", "r1"),
            launch("b", "success", "r1"),
            launch("c", "failed", "r2"),
            launch("d", "upcoming", "r2"),
        ];
        let stats = LaunchStats::compute(&records);
        assert_eq!(stats.total_launches, 4);
        assert_eq!(stats.successful_launches, 2);
        assert_eq!(stats.failed_launches, 1);
        assert_eq!(stats.upcoming_launches, 1);
        assert_eq!(stats.success_rate, 50.0);
    }

    #[test]
    fn test_stats_unknown_status_counts_toward_total_only() {
        let records = vec![launch("a", "success", "r1"), launch("b", "scrubbed", "r1")];
        let stats = LaunchStats::compute(&records);
        assert_eq!(stats.total_launches, 2);
        assert_eq!(stats.successful_launches, 1);
        assert_eq!(stats.failed_launches + stats.upcoming_launches, 0);
        assert_eq!(stats.success_rate, 50.0);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let json = serde_json::to_value(LaunchStats::compute(&[])).unwrap();
        assert!(json.get("totalLaunches").is_some());
        assert!(json.get("successRate").is_some());
        assert!(json.get("upcomingLaunches").is_some());
    }

    #[test]
    fn test_record_deserializes_with_missing_optionals() {
        let record: LaunchRecord = serde_json::from_value(serde_json::json!({
            "launch_id": "abc",
            "mission_name": "FalconSat",
            "status": "upcoming"
        }))
        .unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.success, None);
        assert!(record.payloads.is_empty());
        assert_eq!(record.webcast_link, None);
    }

    #[test]
    fn test_record_deserializes_explicit_nulls_as_defaults() {
        let record: LaunchRecord = serde_json::from_value(serde_json::json!({
            "launch_id": "abc",
            "mission_name": null,
            "rocket_id": null,
            "payloads": null,
            "status": "success"
        }))
        .unwrap();
        assert_eq!(record.mission_name, "");
        assert_eq!(record.rocket_id, "");
        assert!(record.payloads.is_empty());
        assert_eq!(record.status, "success");
    }
}

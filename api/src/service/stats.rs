//! Stats Aggregator
//!
//! Per-user status counts and the monthly application trend shown on the
//! stats page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::job::JobStatus;
use crate::repository::job_repository;

/// Number of distinct calendar months kept in the trend.
pub const TREND_WINDOW: i64 = 6;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub interview: i64,
    pub declined: i64,
}

impl StatusCounts {
    pub fn from_groups(groups: impl IntoIterator<Item = (JobStatus, i64)>) -> Self {
        let mut counts = StatusCounts::default();
        for (status, count) in groups {
            match status {
                JobStatus::Pending => counts.pending += count,
                JobStatus::Interview => counts.interview += count,
                JobStatus::Declined => counts.declined += count,
            }
        }
        counts
    }

    pub fn total(&self) -> i64 {
        self.pending + self.interview + self.declined
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyApplications {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    #[serde(rename = "defaultStats")]
    pub status_counts: StatusCounts,
    #[serde(rename = "monthlyApplications")]
    pub monthly_trend: Vec<MonthlyApplications>,
}

/// `"Jan 2024"` style label for a calendar month.
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{:02} {}", month, year))
}

/// Takes `(year, month, count)` groups newest first, keeps the most recent
/// [`TREND_WINDOW`] months and returns them oldest first.
pub fn shape_trend(newest_first: Vec<(i32, u32, i64)>) -> Vec<MonthlyApplications> {
    let mut months: Vec<MonthlyApplications> = newest_first
        .into_iter()
        .take(TREND_WINDOW as usize)
        .map(|(year, month, count)| MonthlyApplications {
            date: month_label(year, month),
            count,
        })
        .collect();
    months.reverse();
    months
}

pub async fn job_stats(pool: &SqlitePool, owner: Uuid) -> Result<JobStats, sqlx::Error> {
    let groups = job_repository::count_by_status(pool, owner).await?;
    let status_counts = StatusCounts::from_groups(groups);

    let months = job_repository::count_by_month(pool, owner, TREND_WINDOW).await?;
    let monthly_trend = shape_trend(months);

    tracing::debug!(
        owner = %owner,
        total = status_counts.total(),
        months = monthly_trend.len(),
        "computed job stats"
    );

    Ok(JobStats {
        status_counts,
        monthly_trend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_statuses_default_to_zero() {
        let counts = StatusCounts::from_groups(vec![(JobStatus::Interview, 4)]);
        assert_eq!(
            counts,
            StatusCounts {
                pending: 0,
                interview: 4,
                declined: 0
            }
        );
        assert_eq!(StatusCounts::from_groups(vec![]).total(), 0);
    }

    #[test]
    fn labels_months() {
        assert_eq!(month_label(2024, 1), "Jan 2024");
        assert_eq!(month_label(2023, 12), "Dec 2023");
    }

    #[test]
    fn trend_keeps_six_most_recent_in_ascending_order() {
        let newest_first = vec![
            (2024, 8, 1),
            (2024, 7, 2),
            (2024, 5, 3),
            (2024, 2, 4),
            (2024, 1, 5),
            (2023, 12, 6),
            (2023, 11, 7),
        ];
        let trend = shape_trend(newest_first);
        let labels: Vec<&str> = trend.iter().map(|m| m.date.as_str()).collect();
        assert_eq!(
            labels,
            ["Dec 2023", "Jan 2024", "Feb 2024", "May 2024", "Jul 2024", "Aug 2024"]
        );
        assert_eq!(trend.first().map(|m| m.count), Some(6));
    }

    #[test]
    fn empty_history_gives_empty_trend() {
        assert!(shape_trend(vec![]).is_empty());
    }

    #[test]
    fn serializes_with_wire_names() {
        let stats = JobStats {
            status_counts: StatusCounts::default(),
            monthly_trend: vec![],
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["defaultStats"]["pending"], 0);
        assert!(json["monthlyApplications"].as_array().unwrap().is_empty());
    }
}

//! Job Query Builder
//!
//! Turns listing parameters into an owner-scoped, filtered, sorted and
//! paginated query over the `jobs` table.

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::models::job::Job;
use crate::repository::job_repository;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Sentinel meaning "no constraint" for the status and type filters.
const ALL: &str = "all";

const JOB_COLUMNS: &str = "id, company, position, job_status, job_type, job_location, \
                           created_by, created_at, updated_at";

/// Raw query string of `GET /jobs`. Everything is optional and loosely typed;
/// [`JobQuery::from_params`] normalizes it.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsParams {
    pub search: Option<String>,
    pub job_status: Option<String>,
    pub job_type: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Latest,
    Oldest,
    AToZ,
    ZToA,
}

impl SortKey {
    /// Unknown keys fall back to [`SortKey::Latest`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("oldest") => SortKey::Oldest,
            Some("a-z") => SortKey::AToZ,
            Some("z-a") => SortKey::ZToA,
            _ => SortKey::Latest,
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            SortKey::Latest => "created_at DESC, id ASC",
            SortKey::Oldest => "created_at ASC, id ASC",
            SortKey::AToZ => "position ASC, id ASC",
            SortKey::ZToA => "position DESC, id ASC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub owner: Uuid,
    pub search: Option<String>,
    pub job_status: Option<String>,
    pub job_type: Option<String>,
    pub sort: SortKey,
    pub page: i64,
    pub limit: i64,
}

impl JobQuery {
    pub fn new(owner: Uuid) -> Self {
        Self {
            owner,
            search: None,
            job_status: None,
            job_type: None,
            sort: SortKey::Latest,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn from_params(owner: Uuid, params: &ListJobsParams) -> Self {
        Self {
            owner,
            search: params
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            job_status: enum_filter(params.job_status.as_deref()),
            job_type: enum_filter(params.job_type.as_deref()),
            sort: SortKey::parse(params.sort.as_deref()),
            page: positive_or(params.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(params.limit.as_deref(), DEFAULT_LIMIT),
        }
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn page_count(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        total / self.limit + i64::from(total % self.limit != 0)
    }

    fn push_conditions(&self, qb: &mut QueryBuilder<'static, Sqlite>) {
        qb.push(" WHERE created_by = ").push_bind(self.owner);

        if let Some(status) = &self.job_status {
            qb.push(" AND job_status = ").push_bind(status.clone());
        }
        if let Some(job_type) = &self.job_type {
            qb.push(" AND job_type = ").push_bind(job_type.clone());
        }
        if let Some(search) = &self.search {
            let pattern = like_pattern(search);
            qb.push(" AND (position_folded LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR company_folded LIKE ")
                .push_bind(pattern)
                .push(r" ESCAPE '\')");
        }
    }

    pub fn count_query(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM jobs");
        self.push_conditions(&mut qb);
        qb
    }

    pub fn page_query(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM jobs", JOB_COLUMNS));
        self.push_conditions(&mut qb);
        qb.push(" ORDER BY ")
            .push(self.sort.order_by())
            .push(" LIMIT ")
            .push_bind(self.limit)
            .push(" OFFSET ")
            .push_bind(self.skip());
        qb
    }
}

#[derive(Debug, Clone)]
pub struct JobPage {
    pub items: Vec<Job>,
    pub total_count: i64,
    pub page_count: i64,
    pub current_page: i64,
}

/// Wire shape of `GET /jobs`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsResponse {
    pub total_jobs: i64,
    pub num_of_pages: i64,
    pub current_page: i64,
    pub jobs: Vec<Job>,
}

impl From<JobPage> for JobsResponse {
    fn from(page: JobPage) -> Self {
        JobsResponse {
            total_jobs: page.total_count,
            num_of_pages: page.page_count,
            current_page: page.current_page,
            jobs: page.items,
        }
    }
}

pub async fn list_jobs(pool: &SqlitePool, query: &JobQuery) -> Result<JobPage, sqlx::Error> {
    let total_count = job_repository::count_matching(pool, query).await?;
    let items = job_repository::find_matching(pool, query).await?;

    tracing::debug!(
        owner = %query.owner,
        total_count,
        page = query.page,
        "listed jobs"
    );

    Ok(JobPage {
        items,
        total_count,
        page_count: query.page_count(total_count),
        current_page: query.page,
    })
}

fn enum_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL)
        .map(str::to_string)
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

/// Case fold applied to stored `position`/`company` copies and to search
/// input alike. SQLite's own `LOWER` only folds ASCII.
pub fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in fold(search).chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

//! Job Repository
//!
//! Every read and write is scoped by the owner id; there is no unscoped
//! mutation path.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::models::job::{CreateJob, Job, JobStatus, UpdateJob};
use crate::service::query::{fold, JobQuery};

pub async fn create<'e>(
    executor: impl SqliteExecutor<'e>,
    owner: Uuid,
    req: &CreateJob,
    created_at: DateTime<Utc>,
) -> Result<Job, sqlx::Error> {
    sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs (id, company, position, job_status, job_type, job_location,
                          position_folded, company_folded, created_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, company, position, job_status, job_type, job_location,
                  created_by, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.company.trim())
    .bind(req.position.trim())
    .bind(req.job_status)
    .bind(req.job_type)
    .bind(req.location())
    .bind(fold(&req.position))
    .bind(fold(&req.company))
    .bind(owner)
    .bind(created_at)
    .bind(created_at)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>(
        r#"
        SELECT id, company, position, job_status, job_type, job_location,
               created_by, created_at, updated_at
        FROM jobs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn count_matching(pool: &SqlitePool, query: &JobQuery) -> Result<i64, sqlx::Error> {
    let mut qb = query.count_query();
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn find_matching(pool: &SqlitePool, query: &JobQuery) -> Result<Vec<Job>, sqlx::Error> {
    let mut qb = query.page_query();
    qb.build_query_as::<Job>().fetch_all(pool).await
}

/// Applies the present fields of `changes`. Returns `None` when no job with
/// that id belongs to `owner`.
pub async fn update(
    pool: &SqlitePool,
    id: Uuid,
    owner: Uuid,
    changes: &UpdateJob,
) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs
        SET company = COALESCE(?, company),
            position = COALESCE(?, position),
            job_status = COALESCE(?, job_status),
            job_type = COALESCE(?, job_type),
            job_location = COALESCE(?, job_location),
            position_folded = COALESCE(?, position_folded),
            company_folded = COALESCE(?, company_folded),
            updated_at = ?
        WHERE id = ? AND created_by = ?
        RETURNING id, company, position, job_status, job_type, job_location,
                  created_by, created_at, updated_at
        "#,
    )
    .bind(changes.company.as_deref().map(str::trim))
    .bind(changes.position.as_deref().map(str::trim))
    .bind(changes.job_status)
    .bind(changes.job_type)
    .bind(changes.job_location.as_deref())
    .bind(changes.position.as_deref().map(fold))
    .bind(changes.company.as_deref().map(fold))
    .bind(Utc::now())
    .bind(id)
    .bind(owner)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &SqlitePool, id: Uuid, owner: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = ? AND created_by = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_by_owner<'e>(
    executor: impl SqliteExecutor<'e>,
    owner: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE created_by = ?")
        .bind(owner)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub async fn count_all(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
        .fetch_one(pool)
        .await
}

pub async fn count_by_status(
    pool: &SqlitePool,
    owner: Uuid,
) -> Result<Vec<(JobStatus, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (JobStatus, i64)>(
        r#"
        SELECT job_status, COUNT(*)
        FROM jobs
        WHERE created_by = ?
        GROUP BY job_status
        "#,
    )
    .bind(owner)
    .fetch_all(pool)
    .await
}

/// `(year, month, count)` for the `limit` most recent months with at least
/// one job, newest first.
pub async fn count_by_month(
    pool: &SqlitePool,
    owner: Uuid,
    limit: i64,
) -> Result<Vec<(i32, u32, i64)>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, i64, i64)>(
        r#"
        SELECT CAST(strftime('%Y', created_at) AS INTEGER) AS year,
               CAST(strftime('%m', created_at) AS INTEGER) AS month,
               COUNT(*) AS count
        FROM jobs
        WHERE created_by = ?
        GROUP BY year, month
        ORDER BY year DESC, month DESC
        LIMIT ?
        "#,
    )
    .bind(owner)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(year, month, count)| (year as i32, month as u32, count))
        .collect())
}

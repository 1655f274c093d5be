//! Demo data population
//!
//! Loads a JSON array of jobs and makes them the complete job list of the
//! demo account, which is flagged read-only in the process.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::models::job::{CreateJob, JobStatus, JobType};
use crate::repository::{job_repository, user_repository};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedJob {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub job_status: JobStatus,
    #[serde(default)]
    pub job_type: JobType,
    pub job_location: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

pub fn parse_jobs(raw: &str) -> Result<Vec<SeedJob>> {
    serde_json::from_str(raw).context("seed file is not a JSON array of jobs")
}

/// Returns the number of jobs inserted. Runs in one transaction: on any
/// error the account and its previous jobs are left untouched.
pub async fn populate(pool: &SqlitePool, email: &str, jobs: Vec<SeedJob>) -> Result<usize> {
    let email = email.trim().to_lowercase();
    let user = user_repository::find_by_email(pool, &email)
        .await?
        .with_context(|| format!("no account registered with email {}", email))?;

    let now = Utc::now();
    let rows = jobs
        .into_iter()
        .enumerate()
        .map(|(i, job)| {
            let req = CreateJob {
                company: job.company,
                position: job.position,
                job_status: job.job_status,
                job_type: job.job_type,
                job_location: job.job_location,
            };
            req.validate()
                .with_context(|| format!("seed job #{} is invalid", i + 1))?;
            Ok((req, job.created_at.unwrap_or(now)))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut tx = pool.begin().await?;
    user_repository::set_read_only(&mut *tx, user.id, true).await?;
    let removed = job_repository::delete_by_owner(&mut *tx, user.id).await?;
    for (req, created_at) in &rows {
        job_repository::create(&mut *tx, user.id, req, *created_at).await?;
    }
    tx.commit().await?;

    tracing::info!(user_id = %user.id, removed, count = rows.len(), "data populated");
    Ok(rows.len())
}

pub async fn populate_from_file(pool: &SqlitePool, email: &str, file: &Path) -> Result<usize> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    populate(pool, email, parse_jobs(&raw)?).await
}

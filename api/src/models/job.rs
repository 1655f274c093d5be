use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_LOCATION: &str = "my city";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Interview,
    Declined,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Internship,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub company: String,
    pub position: String,
    #[serde(rename = "jobStatus")]
    pub job_status: JobStatus,
    #[serde(rename = "jobType")]
    pub job_type: JobType,
    #[serde(rename = "jobLocation")]
    pub job_location: String,
    #[serde(rename = "createdBy")]
    pub created_by: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJob {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Please provide company"))]
    pub company: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Please provide position"))]
    pub position: String,
    #[serde(default)]
    pub job_status: JobStatus,
    #[serde(default)]
    pub job_type: JobType,
    pub job_location: Option<String>,
}

impl CreateJob {
    pub fn location(&self) -> &str {
        self.job_location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(DEFAULT_LOCATION)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJob {
    #[validate(length(min = 1, max = 50, message = "company cannot be empty"))]
    pub company: Option<String>,
    #[validate(length(min = 1, max = 100, message = "position cannot be empty"))]
    pub position: Option<String>,
    pub job_status: Option<JobStatus>,
    pub job_type: Option<JobType>,
    pub job_location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: Job,
}

#[derive(Debug, Serialize)]
pub struct JobModifiedResponse {
    pub message: String,
    pub job: Job,
}

//! Repository Module
//!
//! Data access layer. Each repository handles the SQL for one entity.

pub mod job;
pub mod user;

pub use job as job_repository;
pub use user as user_repository;

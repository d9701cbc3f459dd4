//! Boundary to the remote data service that owns job-board records.

pub mod rest_service;
pub mod storage_service;

use async_trait::async_trait;
use url::Url;

use crate::dto::application_dto::{CandidateKey, NewApplication};
use crate::dto::company_dto::NewCompany;
use crate::dto::job_dto::{JobCriteria, JobKey, NewJob, RecruiterKey};
use crate::dto::saved_dto::SaveKey;
use crate::error::{Error, Result};
use crate::models::{Application, ApplicationStatus, Company, Job, SavedJob};

pub use rest_service::RestDataService;
pub use storage_service::StorageService;

/// Typed CRUD over jobs, companies, applications and saved jobs.
///
/// Every call carries the caller's bearer token; write operations echo the
/// affected rows the way the service returns them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobBoardService: Send + Sync {
    async fn query_jobs(&self, token: &str, criteria: &JobCriteria) -> Result<Vec<Job>>;

    async fn list_jobs_for_recruiter(&self, token: &str, key: &RecruiterKey) -> Result<Vec<Job>>;

    /// Fails with [`Error::NotFound`] when no row matches.
    async fn get_job(&self, token: &str, key: &JobKey) -> Result<Job>;

    async fn create_job(&self, token: &str, job: &NewJob) -> Result<Vec<Job>>;

    async fn set_job_open_state(&self, token: &str, key: &JobKey, is_open: bool)
        -> Result<Vec<Job>>;

    async fn delete_job(&self, token: &str, key: &JobKey) -> Result<()>;

    async fn list_companies(&self, token: &str) -> Result<Vec<Company>>;

    /// Uploads the logo, then inserts the company with the resolved logo URL.
    async fn create_company(&self, token: &str, company: &NewCompany) -> Result<Vec<Company>>;

    async fn list_applications_for_candidate(
        &self,
        token: &str,
        key: &CandidateKey,
    ) -> Result<Vec<Application>>;

    async fn set_application_status(
        &self,
        token: &str,
        key: &JobKey,
        status: ApplicationStatus,
    ) -> Result<Vec<Application>>;

    /// Uploads the resume, then inserts the application pointing at it.
    async fn submit_application(
        &self,
        token: &str,
        application: &NewApplication,
    ) -> Result<Vec<Application>>;

    async fn list_saved_jobs(&self, token: &str) -> Result<Vec<SavedJob>>;

    /// Deletes the (candidate, job) row when `is_saved`, inserts it otherwise.
    async fn toggle_saved_job(
        &self,
        token: &str,
        is_saved: bool,
        key: &SaveKey,
    ) -> Result<Vec<SavedJob>>;
}

pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("Data service URL cannot be a base: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

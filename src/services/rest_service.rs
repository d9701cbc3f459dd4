use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};
use url::Url;

use crate::config::Config;
use crate::dto::application_dto::{ApplicationRow, CandidateKey, NewApplication, StatusPatch};
use crate::dto::company_dto::{CompanyRow, NewCompany};
use crate::dto::job_dto::{JobCriteria, JobKey, NewJob, OpenStatePatch, RecruiterKey};
use crate::dto::saved_dto::SaveKey;
use crate::error::{Error, Result};
use crate::models::{Application, ApplicationStatus, Company, Job, SavedJob};
use crate::services::{endpoint, JobBoardService, StorageService};
use crate::utils::token::object_name;

const JOB_SELECT: &str =
    "*,company:companies(name,logo_url),applications:applications(*),saved:saved_jobs(id)";
const CANDIDATE_APPLICATION_SELECT: &str = "*,job:jobs(title,company:companies(name))";
const SAVED_JOB_SELECT: &str = "*,job:jobs(*,company:companies(name,logo_url))";

const RESUME_BUCKET: &str = "resumes";
const LOGO_BUCKET: &str = "company-logo";

/// [`JobBoardService`] over the PostgREST tables and object storage of the
/// hosted data service.
#[derive(Clone)]
pub struct RestDataService {
    client: Client,
    base_url: Url,
    api_key: String,
    storage: StorageService,
}

impl RestDataService {
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let api_key = api_key.into();
        let storage = StorageService::new(client.clone(), base_url.clone(), api_key.clone());
        info!(base_url = %base_url, "data service client configured");
        Ok(Self {
            client,
            base_url,
            api_key,
            storage,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Self::new(client, &config.data_url, config.api_key.clone())
    }

    fn table(&self, table: &str) -> Result<Url> {
        endpoint(&self.base_url, &["rest", "v1", table])
    }

    fn request(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
    }

    fn returning(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.request(method, url, token)
            .header("Prefer", "return=representation")
    }

    async fn execute(&self, req: RequestBuilder, what: &str) -> Result<String> {
        let resp = req.send().await.map_err(|e| {
            error!("{} request failed: {:?}", what, e);
            Error::from(e)
        })?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("{} failed with status {}: {}", what, status.as_u16(), body);
            return Err(Error::RemoteOperationFailed(format!(
                "{} failed with status {}: {}",
                what,
                status.as_u16(),
                body
            )));
        }
        resp.text().await.map_err(|e| {
            error!("{} response body could not be read: {:?}", what, e);
            Error::RemoteOperationFailed(format!("{} response body could not be read: {}", what, e))
        })
    }

    async fn rows<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<Vec<T>> {
        let body = self.execute(req, what).await?;
        let rows: Vec<T> = serde_json::from_str(&body)
            .map_err(|e| Error::DataIntegrity(format!("{} returned malformed rows: {}", what, e)))?;
        debug!(rows = rows.len(), "{} ok", what);
        Ok(rows)
    }
}

pub(crate) fn job_query_url(mut url: Url, criteria: &JobCriteria) -> Url {
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("select", JOB_SELECT);
        if let Some(location) = criteria.location() {
            pairs.append_pair("location", &format!("eq.{}", location));
        }
        if let Some(company_id) = criteria.company_id() {
            pairs.append_pair("company_id", &format!("eq.{}", company_id));
        }
        if let Some(query) = criteria.search_query() {
            pairs.append_pair("title", &format!("ilike.*{}*", query));
        }
    }
    url
}

fn with_pairs(mut url: Url, pairs: &[(&str, String)]) -> Url {
    {
        let mut query = url.query_pairs_mut();
        for (key, value) in pairs {
            query.append_pair(key, value);
        }
    }
    url
}

#[async_trait]
impl JobBoardService for RestDataService {
    async fn query_jobs(&self, token: &str, criteria: &JobCriteria) -> Result<Vec<Job>> {
        let url = job_query_url(self.table("jobs")?, criteria);
        self.rows(self.request(Method::GET, url, token), "fetching jobs")
            .await
    }

    async fn list_jobs_for_recruiter(&self, token: &str, key: &RecruiterKey) -> Result<Vec<Job>> {
        let url = with_pairs(
            self.table("jobs")?,
            &[
                ("select", JOB_SELECT.to_string()),
                ("recruiter_id", format!("eq.{}", key.recruiter_id)),
            ],
        );
        self.rows(self.request(Method::GET, url, token), "fetching recruiter jobs")
            .await
    }

    async fn get_job(&self, token: &str, key: &JobKey) -> Result<Job> {
        let url = with_pairs(
            self.table("jobs")?,
            &[
                ("select", JOB_SELECT.to_string()),
                ("id", format!("eq.{}", key.job_id)),
            ],
        );
        let rows: Vec<Job> = self
            .rows(self.request(Method::GET, url, token), "fetching job")
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("job {}", key.job_id)))
    }

    async fn create_job(&self, token: &str, job: &NewJob) -> Result<Vec<Job>> {
        let url = with_pairs(self.table("jobs")?, &[("select", "*".to_string())]);
        let req = self.returning(Method::POST, url, token).json(&[job]);
        self.rows(req, "creating job").await
    }

    async fn set_job_open_state(
        &self,
        token: &str,
        key: &JobKey,
        is_open: bool,
    ) -> Result<Vec<Job>> {
        let url = with_pairs(
            self.table("jobs")?,
            &[
                ("id", format!("eq.{}", key.job_id)),
                ("select", "*".to_string()),
            ],
        );
        let req = self
            .returning(Method::PATCH, url, token)
            .json(&OpenStatePatch { is_open });
        self.rows(req, "updating hiring status").await
    }

    async fn delete_job(&self, token: &str, key: &JobKey) -> Result<()> {
        let url = with_pairs(self.table("jobs")?, &[("id", format!("eq.{}", key.job_id))]);
        self.execute(self.request(Method::DELETE, url, token), "deleting job")
            .await?;
        Ok(())
    }

    async fn list_companies(&self, token: &str) -> Result<Vec<Company>> {
        let url = with_pairs(self.table("companies")?, &[("select", "*".to_string())]);
        self.rows(self.request(Method::GET, url, token), "fetching companies")
            .await
    }

    async fn create_company(&self, token: &str, company: &NewCompany) -> Result<Vec<Company>> {
        let name = object_name("logo", &company.name);
        let logo_url = self
            .storage
            .upload(token, LOGO_BUCKET, &name, &company.logo)
            .await?;

        let url = with_pairs(self.table("companies")?, &[("select", "*".to_string())]);
        let row = CompanyRow {
            name: &company.name,
            logo_url: logo_url.as_str(),
        };
        let req = self.returning(Method::POST, url, token).json(&[row]);
        self.rows(req, "adding company").await
    }

    async fn list_applications_for_candidate(
        &self,
        token: &str,
        key: &CandidateKey,
    ) -> Result<Vec<Application>> {
        let url = with_pairs(
            self.table("applications")?,
            &[
                ("select", CANDIDATE_APPLICATION_SELECT.to_string()),
                ("candidate_id", format!("eq.{}", key.candidate_id)),
            ],
        );
        self.rows(self.request(Method::GET, url, token), "fetching applications")
            .await
    }

    async fn set_application_status(
        &self,
        token: &str,
        key: &JobKey,
        status: ApplicationStatus,
    ) -> Result<Vec<Application>> {
        let url = with_pairs(
            self.table("applications")?,
            &[
                ("job_id", format!("eq.{}", key.job_id)),
                ("select", "*".to_string()),
            ],
        );
        let req = self
            .returning(Method::PATCH, url, token)
            .json(&StatusPatch { status });
        let rows: Vec<Application> = self.rows(req, "updating application status").await?;
        if rows.is_empty() {
            return Err(Error::RemoteOperationFailed(format!(
                "no applications matched job {}",
                key.job_id
            )));
        }
        Ok(rows)
    }

    async fn submit_application(
        &self,
        token: &str,
        application: &NewApplication,
    ) -> Result<Vec<Application>> {
        let name = object_name("resume", &application.candidate_id);
        let resume_url = self
            .storage
            .upload(token, RESUME_BUCKET, &name, &application.resume)
            .await?;

        let url = with_pairs(self.table("applications")?, &[("select", "*".to_string())]);
        let row = ApplicationRow::new(application, resume_url.as_str());
        let req = self.returning(Method::POST, url, token).json(&[row]);
        self.rows(req, "submitting application").await
    }

    async fn list_saved_jobs(&self, token: &str) -> Result<Vec<SavedJob>> {
        let url = with_pairs(
            self.table("saved_jobs")?,
            &[("select", SAVED_JOB_SELECT.to_string())],
        );
        self.rows(self.request(Method::GET, url, token), "fetching saved jobs")
            .await
    }

    async fn toggle_saved_job(
        &self,
        token: &str,
        is_saved: bool,
        key: &SaveKey,
    ) -> Result<Vec<SavedJob>> {
        if is_saved {
            let url = with_pairs(
                self.table("saved_jobs")?,
                &[
                    ("user_id", format!("eq.{}", key.candidate_id)),
                    ("job_id", format!("eq.{}", key.job_id)),
                ],
            );
            self.execute(self.request(Method::DELETE, url, token), "removing saved job")
                .await?;
            return Ok(Vec::new());
        }

        let url = with_pairs(
            self.table("saved_jobs")?,
            &[
                ("on_conflict", "user_id,job_id".to_string()),
                ("select", "*".to_string()),
            ],
        );
        let req = self
            .request(Method::POST, url, token)
            .header("Prefer", "return=representation,resolution=merge-duplicates")
            .json(&[key]);
        self.rows(req, "saving job").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobs_url() -> Url {
        Url::parse("https://data.example.com/rest/v1/jobs").unwrap()
    }

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn unconstrained_query_only_selects() {
        let url = job_query_url(jobs_url(), &JobCriteria::default());
        assert_eq!(pairs(&url), vec![("select".to_string(), JOB_SELECT.to_string())]);
    }

    #[test]
    fn criteria_become_postgrest_filters() {
        let criteria = JobCriteria::default()
            .with_location("Pune")
            .with_company(3)
            .with_search(" rust ");
        let url = job_query_url(jobs_url(), &criteria);
        let pairs = pairs(&url);

        assert!(pairs.contains(&("location".into(), "eq.Pune".into())));
        assert!(pairs.contains(&("company_id".into(), "eq.3".into())));
        assert!(pairs.contains(&("title".into(), "ilike.* rust *".into())));
    }

    #[test]
    fn blank_location_is_not_sent() {
        let criteria = JobCriteria::default().with_location("  ");
        let url = job_query_url(jobs_url(), &criteria);
        assert!(pairs(&url).iter().all(|(k, _)| k != "location"));
    }
}

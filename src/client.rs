use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::config::Config;
use crate::dto::application_dto::{CandidateKey, NewApplication};
use crate::dto::company_dto::NewCompany;
use crate::dto::job_dto::{JobCriteria, JobKey, NewJob, RecruiterKey};
use crate::dto::saved_dto::SaveKey;
use crate::error::Result;
use crate::fetch::{AsyncOperation, SettlementPolicy};
use crate::identity::{Identity, Session};
use crate::listing::{JobListing, Listing};
use crate::models::{Application, ApplicationStatus, Company, Job, JobId, SavedJob};
use crate::saved::SaveToggle;
use crate::services::JobBoardService;

const DEFAULT_PAGE_SIZE: usize = 9;

pub type JobsOperation = AsyncOperation<JobCriteria, (), Vec<Job>>;
pub type RecruiterJobsOperation = AsyncOperation<RecruiterKey, (), Vec<Job>>;
pub type ApplicationsOperation = AsyncOperation<CandidateKey, (), Vec<Application>>;

/// "My jobs" screen content, chosen by the signed-in user's role.
pub enum Dashboard {
    Recruiter(RecruiterJobsOperation),
    Candidate(ApplicationsOperation),
}

/// Entry point for screens: builds one operation per remote call, each bound
/// to the session's credentials and lifetime.
#[derive(Clone)]
pub struct JobBoardClient {
    service: Arc<dyn JobBoardService>,
    session: Session,
    policy: SettlementPolicy,
    page_size: NonZeroUsize,
}

impl JobBoardClient {
    pub fn new(service: Arc<dyn JobBoardService>, session: Session) -> Self {
        Self {
            service,
            session,
            policy: SettlementPolicy::default(),
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }

    pub fn from_config(
        config: &Config,
        service: Arc<dyn JobBoardService>,
        session: Session,
    ) -> Self {
        Self::new(service, session)
            .with_policy(config.settlement)
            .with_page_size(config.page_size)
    }

    pub fn with_policy(mut self, policy: SettlementPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn identity(&self) -> &Identity {
        self.session.identity()
    }

    /// Ends the session; every operation built from it is cancelled.
    pub fn sign_out(&self) {
        self.session.end();
    }

    pub fn job_listing(&self) -> JobListing {
        JobListing::new(self.page_size)
    }

    pub fn application_listing(&self) -> Listing<Application> {
        Listing::new(self.page_size)
    }

    fn operation<P, A, T, F, Fut>(&self, name: &'static str, params: P, call: F) -> AsyncOperation<P, A, T>
    where
        P: Clone + Send + Sync + 'static,
        A: Send + 'static,
        T: Clone + Send + Sync + 'static,
        F: Fn(Arc<dyn JobBoardService>, String, P, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let service = self.service.clone();
        AsyncOperation::new(name, self.session.credentials(), params, move |token, params, args| {
            call(service.clone(), token, params, args)
        })
        .with_policy(self.policy)
        .with_lifetime(&self.session.lifetime())
    }

    pub fn jobs(&self, criteria: JobCriteria) -> JobsOperation {
        self.operation("query_jobs", criteria, |service, token, criteria, _: ()| async move {
            service.query_jobs(&token, &criteria).await
        })
    }

    pub fn recruiter_jobs(&self) -> RecruiterJobsOperation {
        let key = RecruiterKey {
            recruiter_id: self.identity().id.clone(),
        };
        self.operation("list_jobs_for_recruiter", key, |service, token, key, _: ()| async move {
            service.list_jobs_for_recruiter(&token, &key).await
        })
    }

    pub fn job(&self, job_id: JobId) -> AsyncOperation<JobKey, (), Job> {
        self.operation("get_job", JobKey { job_id }, |service, token, key, _: ()| async move {
            service.get_job(&token, &key).await
        })
    }

    pub fn create_job(&self) -> AsyncOperation<(), NewJob, Vec<Job>> {
        self.operation("create_job", (), |service, token, _, job: NewJob| async move {
            service.create_job(&token, &job).await
        })
    }

    pub fn hiring_status(&self, job_id: JobId) -> AsyncOperation<JobKey, bool, Vec<Job>> {
        self.operation(
            "set_job_open_state",
            JobKey { job_id },
            |service, token, key, is_open: bool| async move {
                service.set_job_open_state(&token, &key, is_open).await
            },
        )
    }

    pub fn delete_job(&self, job_id: JobId) -> AsyncOperation<JobKey, (), ()> {
        self.operation("delete_job", JobKey { job_id }, |service, token, key, _: ()| async move {
            service.delete_job(&token, &key).await
        })
    }

    pub fn companies(&self) -> AsyncOperation<(), (), Vec<Company>> {
        self.operation("list_companies", (), |service, token, _, _: ()| async move {
            service.list_companies(&token).await
        })
    }

    pub fn create_company(&self) -> AsyncOperation<(), NewCompany, Vec<Company>> {
        self.operation("create_company", (), |service, token, _, company: NewCompany| async move {
            service.create_company(&token, &company).await
        })
    }

    pub fn candidate_applications(&self) -> ApplicationsOperation {
        let key = CandidateKey {
            candidate_id: self.identity().id.clone(),
        };
        self.operation(
            "list_applications_for_candidate",
            key,
            |service, token, key, _: ()| async move {
                service.list_applications_for_candidate(&token, &key).await
            },
        )
    }

    pub fn application_status(
        &self,
        job_id: JobId,
    ) -> AsyncOperation<JobKey, ApplicationStatus, Vec<Application>> {
        self.operation(
            "set_application_status",
            JobKey { job_id },
            |service, token, key, status: ApplicationStatus| async move {
                service.set_application_status(&token, &key, status).await
            },
        )
    }

    pub fn submit_application(&self) -> AsyncOperation<(), NewApplication, Vec<Application>> {
        self.operation(
            "submit_application",
            (),
            |service, token, _, application: NewApplication| async move {
                service.submit_application(&token, &application).await
            },
        )
    }

    pub fn saved_jobs(&self) -> AsyncOperation<(), (), Vec<SavedJob>> {
        self.operation("list_saved_jobs", (), |service, token, _, _: ()| async move {
            service.list_saved_jobs(&token).await
        })
    }

    pub fn save_toggle(&self, job_id: JobId, saved_initially: bool) -> SaveToggle {
        let key = SaveKey {
            candidate_id: self.identity().id.clone(),
            job_id,
        };
        let operation = self.operation(
            "toggle_saved_job",
            key,
            |service, token, key, is_saved: bool| async move {
                service.toggle_saved_job(&token, is_saved, &key).await
            },
        );
        SaveToggle::new(operation, saved_initially)
    }

    pub fn dashboard(&self) -> Dashboard {
        if self.identity().is_recruiter() {
            Dashboard::Recruiter(self.recruiter_jobs())
        } else {
            Dashboard::Candidate(self.candidate_applications())
        }
    }
}

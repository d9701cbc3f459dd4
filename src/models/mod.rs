pub mod application;
pub mod company;
pub mod job;
pub mod saved_job;

pub use application::{Application, ApplicationId, ApplicationStatus};
pub use company::{Company, CompanyId, CompanySummary};
pub use job::{Job, JobId, JobState};
pub use saved_job::SavedJob;

use serde::{Deserialize, Serialize};

use crate::dto::upload_dto::Blob;
use crate::models::application::ApplicationStatus;
use crate::models::job::JobId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateKey {
    pub candidate_id: String,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: JobId,
    pub candidate_id: String,
    pub name: String,
    pub experience: i32,
    pub skills: String,
    pub education: String,
    pub status: ApplicationStatus,
    pub resume: Blob,
}

/// Row written to the applications table once the resume is stored.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ApplicationRow<'a> {
    pub job_id: JobId,
    pub candidate_id: &'a str,
    pub name: &'a str,
    pub experience: i32,
    pub skills: &'a str,
    pub education: &'a str,
    pub status: ApplicationStatus,
    pub resume: &'a str,
}

impl<'a> ApplicationRow<'a> {
    pub fn new(application: &'a NewApplication, resume_url: &'a str) -> Self {
        Self {
            job_id: application.job_id,
            candidate_id: &application.candidate_id,
            name: &application.name,
            experience: application.experience,
            skills: &application.skills,
            education: &application.education,
            status: application.status,
            resume: resume_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusPatch {
    pub status: ApplicationStatus,
}

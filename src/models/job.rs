use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::models::application::Application;
use crate::models::company::CompanySummary;

pub type JobId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanySummary>,
    pub recruiter_id: String,
    #[serde(rename = "isOpen")]
    pub is_open: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub applications: Vec<Application>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub saved: Vec<SavedMarker>,
}

/// Presence of a marker row means the current candidate saved the job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMarker {
    pub id: i64,
}

/// Open/closed hiring state of a job, used as a grouping dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Open,
    Closed,
}

impl JobState {
    pub const ALL: [JobState; 2] = [JobState::Open, JobState::Closed];

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Open => "open",
            JobState::Closed => "closed",
        }
    }
}

impl std::str::FromStr for JobState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| Error::DataIntegrity(format!("unknown job state '{}'", s)))
    }
}

impl From<bool> for JobState {
    fn from(is_open: bool) -> Self {
        if is_open {
            JobState::Open
        } else {
            JobState::Closed
        }
    }
}

impl Job {
    pub fn state(&self) -> JobState {
        JobState::from(self.is_open)
    }

    pub fn is_saved(&self) -> bool {
        !self.saved.is_empty()
    }

    pub fn applicant_count(&self) -> usize {
        self.applications.len()
    }
}

pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::models::job::JobId;

pub type ApplicationId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: String,
    pub job_id: JobId,
    pub resume: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub experience: Option<i32>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<AppliedJobSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedJobSummary {
    pub title: String,
    #[serde(default)]
    pub company: Option<AppliedCompanySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCompanySummary {
    pub name: String,
}

/// Hiring pipeline stage. Stored lowercase; anything else is rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::DataIntegrity(format!("unknown application status '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_parsing_is_case_sensitive() {
        assert_eq!(
            "interviewing".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Interviewing
        );
        assert!(matches!(
            "Hired".parse::<ApplicationStatus>(),
            Err(Error::DataIntegrity(_))
        ));
    }

    #[test]
    fn unknown_status_fails_to_decode() {
        let res = serde_json::from_value::<Application>(json!({
            "id": 1,
            "candidate_id": "user_2",
            "job_id": 3,
            "resume": "https://example.com/resume.pdf",
            "status": "ghosted"
        }));
        assert!(res.is_err());
    }
}

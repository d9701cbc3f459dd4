use serde::{Deserialize, Serialize};

use crate::models::company::CompanyId;
use crate::models::job::JobId;

/// Active job-list filters. Blank fields place no constraint on their dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobCriteria {
    pub location: Option<String>,
    pub company_id: Option<CompanyId>,
    pub search_query: Option<String>,
}

impl JobCriteria {
    pub fn location(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    pub fn search_query(&self) -> Option<&str> {
        non_blank(self.search_query.as_deref())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.location().is_none() && self.company_id.is_none() && self.search_query().is_none()
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobKey {
    pub job_id: JobId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterKey {
    pub recruiter_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub company_id: CompanyId,
    pub recruiter_id: String,
    #[serde(rename = "isOpen")]
    pub is_open: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct OpenStatePatch {
    #[serde(rename = "isOpen")]
    pub is_open: bool,
}

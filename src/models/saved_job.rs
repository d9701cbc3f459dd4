use serde::{Deserialize, Serialize};

use crate::models::job::{Job, JobId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedJob {
    pub id: i64,
    pub user_id: String,
    pub job_id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
}

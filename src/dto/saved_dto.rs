use serde::{Deserialize, Serialize};

use crate::models::job::JobId;

/// Identifies a (candidate, job) saved-job pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveKey {
    #[serde(rename = "user_id")]
    pub candidate_id: String,
    pub job_id: JobId,
}

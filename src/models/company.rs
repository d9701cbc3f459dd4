use serde::{Deserialize, Serialize};

pub type CompanyId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub logo_url: String,
}

/// Company fields embedded in job rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

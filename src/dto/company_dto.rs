use serde::Serialize;

use crate::dto::upload_dto::Blob;

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub logo: Blob,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CompanyRow<'a> {
    pub name: &'a str,
    pub logo_url: &'a str,
}

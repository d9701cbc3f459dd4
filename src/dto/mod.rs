pub mod application_dto;
pub mod company_dto;
pub mod job_dto;
pub mod saved_dto;
pub mod upload_dto;

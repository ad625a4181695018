pub mod application_dto;
pub mod auth_dto;
pub mod campaign_dto;
pub mod profile_dto;
pub mod waitlist_dto;

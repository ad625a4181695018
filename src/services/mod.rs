pub mod application_service;
pub mod campaign_service;
pub mod email_service;
pub mod profile_service;
pub mod session_service;
pub mod visibility;
pub mod waitlist_service;

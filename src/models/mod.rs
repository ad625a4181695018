pub mod application;
pub mod campaign;
pub mod profile;
pub mod session;
pub mod waitlist;

pub use application::{
    Application, ApplicationStatus, ApplicationWithAdvertiser, ApplicationWithCampaign, Decision,
};
pub use campaign::{Campaign, CampaignStatus, CampaignWithCounts, CompensationType};
pub use profile::{UserProfile, UserType};
pub use session::Session;
pub use waitlist::WaitlistSignup;

//! Repository layer: one zero-sized struct per table with async query methods.

pub mod contact_message_repo;
pub mod project_repo;
pub mod service_repo;
pub mod session_repo;
pub mod site_setting_repo;
pub mod user_repo;

pub use contact_message_repo::ContactMessageRepo;
pub use project_repo::ProjectRepo;
pub use service_repo::ServiceRepo;
pub use session_repo::SessionRepo;
pub use site_setting_repo::SiteSettingRepo;
pub use user_repo::UserRepo;

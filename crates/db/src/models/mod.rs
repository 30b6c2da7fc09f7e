pub mod contact_message;
pub mod project;
pub mod service;
pub mod session;
pub mod site_setting;
pub mod user;

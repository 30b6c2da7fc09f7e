//! Domain logic shared by the Enki Media backend crates.
//!
//! Nothing in here talks to the database or HTTP; the upload store is the
//! only module that touches the filesystem.

pub mod contact;
pub mod error;
pub mod pagination;
pub mod search;
pub mod settings;
pub mod types;
pub mod uploads;

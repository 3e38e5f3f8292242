//! Top-level pages.

pub mod home;
pub mod not_found;

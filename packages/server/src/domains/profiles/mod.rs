//! Profiles domain - one basher's club standing plus external platform stats

pub mod actions;
pub mod data;

pub use data::ProfileData;

//! Members domain - bashers, their roles and their Bash Points ledger

pub mod actions;
pub mod data;
pub mod models;

pub use data::MemberData;
pub use models::{Member, MemberRole};

//! Clans domain

pub mod actions;
pub mod data;
pub mod models;

pub use data::ClanData;
pub use models::{Clan, ClanStanding};

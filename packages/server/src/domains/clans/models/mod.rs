pub mod clan;

pub use clan::{Clan, ClanStanding};

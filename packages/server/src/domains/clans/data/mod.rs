pub mod clan;

pub use clan::{ClanData, ClanInput};

pub mod member;
pub mod points_entry;

pub use member::{CreateMember, Member, MemberRole, ProfileUpdate};
pub use points_entry::PointsEntry;

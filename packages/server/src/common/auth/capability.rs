/// Operations reserved for club organisers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create, edit and remove bashers
    ManageMembers,

    /// Award or deduct Bash Points
    AwardPoints,

    /// Create clans and move bashers between them
    ManageClans,

    /// Schedule events and mark attendance
    ManageEvents,

    /// Define achievements and hand them out
    ManageAchievements,

    /// Send a notification to every basher
    BroadcastNotifications,
}

impl Capability {
    pub fn describe(&self) -> &'static str {
        match self {
            Capability::ManageMembers => "manage members",
            Capability::AwardPoints => "award points",
            Capability::ManageClans => "manage clans",
            Capability::ManageEvents => "manage events",
            Capability::ManageAchievements => "manage achievements",
            Capability::BroadcastNotifications => "broadcast notifications",
        }
    }
}

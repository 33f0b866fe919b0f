use super::{AuthError, Capability};
use crate::common::entity_ids::MemberId;
use tracing::debug;

/// Entry point for authorization checks:
///
/// ```rust,ignore
/// Actor::new(user.member_id, user.is_organiser)
///     .can(Capability::ManageEvents)
///     .check()?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    actor_id: MemberId,
    is_organiser: bool,
}

impl Actor {
    /// `is_organiser` comes from a verified session token.
    pub fn new(actor_id: MemberId, is_organiser: bool) -> Self {
        Self {
            actor_id,
            is_organiser,
        }
    }

    pub fn id(&self) -> MemberId {
        self.actor_id
    }

    pub fn is_organiser(&self) -> bool {
        self.is_organiser
    }

    pub fn can(self, capability: Capability) -> CapabilityBuilder {
        CapabilityBuilder {
            actor: self,
            capability,
        }
    }

    /// Members may act on their own records; organisers on anyone's.
    pub fn owns(&self, owner_id: MemberId) -> Result<(), AuthError> {
        if self.actor_id == owner_id || self.is_organiser {
            Ok(())
        } else {
            Err(AuthError::PermissionDenied(
                "resource belongs to another basher".to_string(),
            ))
        }
    }
}

pub struct CapabilityBuilder {
    actor: Actor,
    capability: Capability,
}

impl CapabilityBuilder {
    /// Organiser status comes from the session token.
    pub fn check(self) -> Result<(), AuthError> {
        if self.actor.is_organiser {
            return Ok(());
        }

        debug!(
            actor = %self.actor.actor_id,
            capability = self.capability.describe(),
            "Organiser capability denied"
        );

        Err(AuthError::OrganiserRequired)
    }
}

/// Dependencies that take part in authorization checks.
pub trait HasAuthContext: Send + Sync {
    /// GitHub logins that are organisers regardless of their stored role.
    fn organiser_github_usernames(&self) -> &[String];

    fn is_configured_organiser(&self, github_username: &str) -> bool {
        self.organiser_github_usernames()
            .iter()
            .any(|login| login.eq_ignore_ascii_case(github_username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestDeps {
        organisers: Vec<String>,
    }

    impl HasAuthContext for TestDeps {
        fn organiser_github_usernames(&self) -> &[String] {
            &self.organisers
        }
    }

    fn deps() -> TestDeps {
        TestDeps {
            organisers: vec!["Octocat".to_string()],
        }
    }

    #[test]
    fn organiser_passes_capability_check() {
        let result = Actor::new(MemberId::new(), true)
            .can(Capability::ManageEvents)
            .check();
        assert!(result.is_ok());
    }

    #[test]
    fn basher_is_rejected() {
        let result = Actor::new(MemberId::new(), false)
            .can(Capability::AwardPoints)
            .check();
        assert!(matches!(result, Err(AuthError::OrganiserRequired)));
    }

    #[test]
    fn owners_and_organisers_may_touch_a_record() {
        let owner = MemberId::new();
        assert!(Actor::new(owner, false).owns(owner).is_ok());
        assert!(Actor::new(MemberId::new(), true).owns(owner).is_ok());
        assert!(matches!(
            Actor::new(MemberId::new(), false).owns(owner),
            Err(AuthError::PermissionDenied(_))
        ));
    }

    #[test]
    fn configured_organisers_match_case_insensitively() {
        assert!(deps().is_configured_organiser("octocat"));
        assert!(!deps().is_configured_organiser("hubot"));
    }
}

//! Role → capability mapping.
//!
//! Pure functions only. Callers decide where to check; the storage layer
//! never consults this table.

use curriculum_sdk::{Capability, Role, User};

/// Capabilities granted by a role on its own.
#[must_use]
pub fn capabilities_for(role: Role) -> &'static [Capability] {
    use Capability::{
        CreateTests, HoldCredits, ManageCredits, ManageQuestions, ManageTaxonomy, ManageUsers,
    };

    match role {
        Role::Admin => &[
            ManageUsers,
            ManageTaxonomy,
            ManageQuestions,
            CreateTests,
            ManageCredits,
            HoldCredits,
        ],
        Role::Dealer => &[ManageUsers, ManageCredits, HoldCredits],
        Role::Institution => &[ManageUsers, CreateTests, HoldCredits],
        Role::Teacher => &[ManageQuestions, CreateTests, HoldCredits],
        Role::Student => &[CreateTests, HoldCredits],
    }
}

#[must_use]
pub fn role_allows(role: Role, capability: Capability) -> bool {
    capabilities_for(role).contains(&capability)
}

/// Inactive accounts hold nothing; superusers hold everything.
#[must_use]
pub fn user_allows(user: &User, capability: Capability) -> bool {
    if !user.is_active {
        return false;
    }
    user.is_superuser || role_allows(user.role, capability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn user(role: Role, is_active: bool, is_superuser: bool) -> User {
        User {
            id: Uuid::nil(),
            username: "u".to_owned(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            role,
            is_active,
            is_staff: false,
            is_superuser,
            date_joined: OffsetDateTime::UNIX_EPOCH,
            last_login: None,
        }
    }

    #[test]
    fn admin_holds_every_capability() {
        for cap in [
            Capability::ManageUsers,
            Capability::ManageTaxonomy,
            Capability::ManageQuestions,
            Capability::CreateTests,
            Capability::ManageCredits,
            Capability::HoldCredits,
        ] {
            assert!(role_allows(Role::Admin, cap), "{cap:?}");
        }
    }

    #[test]
    fn student_cannot_author_content() {
        assert!(role_allows(Role::Student, Capability::CreateTests));
        assert!(!role_allows(Role::Student, Capability::ManageQuestions));
        assert!(!role_allows(Role::Student, Capability::ManageTaxonomy));
    }

    #[test]
    fn only_admin_manages_taxonomy() {
        let holders: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|r| role_allows(*r, Capability::ManageTaxonomy))
            .collect();
        assert_eq!(holders, vec![Role::Admin]);
    }

    #[test]
    fn every_role_can_hold_credits() {
        assert!(Role::ALL
            .into_iter()
            .all(|r| role_allows(r, Capability::HoldCredits)));
    }

    #[test]
    fn superuser_and_inactive_overrides() {
        assert!(user_allows(
            &user(Role::Student, true, true),
            Capability::ManageTaxonomy
        ));
        assert!(!user_allows(
            &user(Role::Admin, false, true),
            Capability::HoldCredits
        ));
        assert!(user_allows(
            &user(Role::Teacher, true, false),
            Capability::ManageQuestions
        ));
    }
}

use crate::types::{AppView, AuthUser, Profile, UserRole};

/// Where the shell should send a user after auth state or profile changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Landing,
    Setup,
    CoachHome,
    AthleteHome,
}

/// The single authorization decision. Every redirect in the app goes through
/// here so the role rules live in one testable place.
pub fn resolve_destination(user: Option<&AuthUser>, profile: Option<&Profile>) -> Destination {
    if user.is_none() {
        return Destination::Landing;
    }
    match profile.and_then(|p| p.role) {
        None => Destination::Setup,
        // Users with both roles land on the coach side by default.
        Some(UserRole::Coach) | Some(UserRole::Both) => Destination::CoachHome,
        Some(UserRole::Athlete) => Destination::AthleteHome,
    }
}

impl Destination {
    pub fn into_view(self) -> AppView {
        match self {
            Destination::Landing => AppView::Login,
            Destination::Setup => AppView::Setup,
            Destination::CoachHome => AppView::CoachHome,
            Destination::AthleteHome => AppView::AthleteHome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            id: "u1".into(),
            email: "u1@example.com".into(),
        }
    }

    fn profile(role: Option<UserRole>) -> Profile {
        Profile {
            id: "u1".into(),
            email: "u1@example.com".into(),
            full_name: Some("Ulla Larsson".into()),
            role,
        }
    }

    #[test]
    fn anonymous_goes_to_landing() {
        assert_eq!(resolve_destination(None, None), Destination::Landing);
        // A stale profile without a live user still lands on the login page.
        let p = profile(Some(UserRole::Coach));
        assert_eq!(resolve_destination(None, Some(&p)), Destination::Landing);
    }

    #[test]
    fn missing_profile_or_role_goes_to_setup() {
        let u = user();
        assert_eq!(resolve_destination(Some(&u), None), Destination::Setup);
        let p = profile(None);
        assert_eq!(resolve_destination(Some(&u), Some(&p)), Destination::Setup);
    }

    #[test]
    fn role_picks_dashboard() {
        let u = user();
        let coach = profile(Some(UserRole::Coach));
        let athlete = profile(Some(UserRole::Athlete));
        let both = profile(Some(UserRole::Both));

        assert_eq!(
            resolve_destination(Some(&u), Some(&coach)),
            Destination::CoachHome
        );
        assert_eq!(
            resolve_destination(Some(&u), Some(&athlete)),
            Destination::AthleteHome
        );
        assert_eq!(
            resolve_destination(Some(&u), Some(&both)),
            Destination::CoachHome
        );
    }
}

use std::fmt;

use crate::profile::{Role, UserProfile};

/// Identity of the signed-in user, shared by every screen.
///
/// Written only by session start, profile/password completions and account
/// deletion. Each write bumps `revision` so the shell knows to re-render.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<UserProfile>,
    role: Option<Role>,
    token: Option<String>,
    revision: u64,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.as_ref().map(|u| &u.id))
            .field("role", &self.role)
            .field("token_present", &self.token.is_some())
            .field("revision", &self.revision)
            .finish()
    }
}

impl Session {
    /// Starts a session from a login result.
    #[must_use]
    pub fn start(user: UserProfile, token: String) -> Self {
        let mut session = Self::default();
        session.set_role(Some(user.role));
        session.set_current_user(Some(user));
        session.set_token(Some(token));
        session
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn set_current_user(&mut self, user: Option<UserProfile>) {
        self.user = user;
        self.revision += 1;
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn set_role(&mut self, role: Option<Role>) {
        self.role = role;
        self.revision += 1;
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
        self.revision += 1;
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drops every piece of identity. Revision keeps counting.
    pub fn clear(&mut self) {
        self.set_token(None);
        self.set_current_user(None);
        self.set_role(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Address, Phone};

    fn user() -> UserProfile {
        UserProfile {
            id: "u-9".into(),
            email: "dev@example.com".into(),
            first_name: "Dev".into(),
            last_name: "Eloper".into(),
            role: Role::Developer,
            phone: Phone::default(),
            address: Address::default(),
        }
    }

    #[test]
    fn start_populates_user_role_and_token() {
        let session = Session::start(user(), "tok".into());
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Developer));
        assert_eq!(session.token(), Some("tok"));
        assert_eq!(session.current_user().map(|u| u.id.as_str()), Some("u-9"));
    }

    #[test]
    fn clear_empties_everything_and_bumps_revision() {
        let mut session = Session::start(user(), "tok".into());
        let before = session.revision();
        session.clear();
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), None);
        assert_eq!(session.token(), None);
        assert!(session.revision() > before);
    }

    #[test]
    fn debug_hides_the_token() {
        let session = Session::start(user(), "super-secret-token".into());
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("super-secret-token"));
        assert!(rendered.contains("token_present: true"));
    }
}

// Values captured from responses while the run progresses. Nothing here
// outlives the process.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

/// What a login returned for one role. Either field may be missing if the
/// login failed or the body was not what we expected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub token: Option<String>,
    pub user_id: Option<String>,
}

/// Role name -> bearer token and user id.
#[derive(Debug, Clone, Default)]
pub struct Session {
    identities: HashMap<Role, Identity>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of a login. A role is logged in once per run, so a
    /// second call for the same role is ignored.
    pub fn login(&mut self, role: Role, identity: Identity) {
        self.identities.entry(role).or_insert(identity);
    }

    pub fn identity(&self, role: Role) -> Option<&Identity> {
        self.identities.get(&role)
    }

    pub fn token(&self, role: Role) -> Option<&str> {
        self.identities.get(&role).and_then(|i| i.token.as_deref())
    }

    pub fn user_id(&self, role: Role) -> Option<&str> {
        self.identities.get(&role).and_then(|i| i.user_id.as_deref())
    }
}

/// Entity ids picked up along the way. Each is written at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub upgrade_request_id: Option<String>,
    pub question_id: Option<String>,
    pub category_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_login_wins() {
        let mut s = Session::new();
        s.login(
            Role::Admin,
            Identity { token: Some("t1".into()), user_id: Some("u1".into()) },
        );
        s.login(
            Role::Admin,
            Identity { token: Some("t2".into()), user_id: None },
        );
        assert_eq!(s.token(Role::Admin), Some("t1"));
        assert_eq!(s.user_id(Role::Admin), Some("u1"));
        assert_eq!(s.token(Role::User), None);
    }

    #[test]
    fn failed_login_leaves_empty_identity() {
        let mut s = Session::new();
        s.login(Role::User, Identity::default());
        assert!(s.identity(Role::User).is_some());
        assert_eq!(s.token(Role::User), None);
    }
}

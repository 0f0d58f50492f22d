use sendra_core::AuthUser;

/// Authenticated-user identity. Set on a successful login callback or
/// session probe, cleared on logout or probe failure.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    user: Option<AuthUser>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user(&mut self, user: Option<AuthUser>) {
        self.user = user;
    }

    pub fn clear(&mut self) {
        self.user = None;
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sendra_core::AuthUser;

    fn user() -> AuthUser {
        AuthUser {
            id: "u1".to_string(),
            email: "dev@example.com".to_string(),
            name: None,
            avatar: None,
        }
    }

    #[test]
    fn lifecycle() {
        let mut store = SessionStore::new();
        assert!(!store.is_authenticated());

        store.set_user(Some(user()));
        assert!(store.is_authenticated());
        assert_eq!(store.user().map(|u| u.display_name()), Some("dev@example.com"));

        store.clear();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }
}

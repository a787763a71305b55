use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Credenciales inválidas")]
    InvalidCredentials,
}

#[derive(Debug, Default)]
pub struct AuthSession {
    user: Option<User>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, AuthError> {
        let user = match (email, password) {
            ("admin", "admin") => User {
                id: "1".to_string(),
                name: "Admin".to_string(),
                email: "admin@vive-medellin.com".to_string(),
                role: Role::Admin,
            },
            ("user1", "user1") => User {
                id: "2".to_string(),
                name: "User 1".to_string(),
                email: "user1@vive-medellin.com".to_string(),
                role: Role::User,
            },
            _ => {
                tracing::warn!(email, "rejected login");
                return Err(AuthError::InvalidCredentials);
            }
        };
        tracing::info!(user_id = %user.id, role = ?user.role, "logged in");
        Ok(self.user.insert(user))
    }

    pub fn logout(&mut self) {
        self.user = None;
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Role {
        self.user.as_ref().map(|user| user.role).unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    pub fn identity(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_login_grants_admin_role() {
        let mut session = AuthSession::new();
        let user = session.login("admin", "admin").expect("admin login");
        assert_eq!(user.role, Role::Admin);
        assert!(session.is_admin());
        assert_eq!(session.identity(), Some("1"));
    }

    #[test]
    fn regular_user_and_anonymous_are_not_admin() {
        let mut session = AuthSession::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), Role::User);

        session.login("user1", "user1").expect("user login");
        assert!(!session.is_admin());
        session.logout();
        assert!(session.current_user().is_none());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let mut session = AuthSession::new();
        let err = session.login("admin", "hunter2").unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(err.to_string(), "Credenciales inválidas");
        assert!(!session.is_authenticated());
    }
}

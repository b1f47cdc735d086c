//! Demo sign-in. Two fixed accounts, no sessions or tokens behind it.

use std::fmt::Display;

use tracing::{info, warn};

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub role: Role,
}

impl Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.username, self.role)
    }
}

pub fn authenticate(username: &str, password: &str) -> Result<User, AuthError> {
    let role = match (username, password) {
        ("admin", "admin") => Role::Admin,
        ("user", "user") => Role::User,
        _ => {
            warn!(username, "sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }
    };
    info!(username, %role, "signed in");
    Ok(User {
        username: username.to_string(),
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_accounts() {
        let admin = authenticate("admin", "admin").unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.to_string(), "admin (admin)");
        assert_eq!(authenticate("user", "user").unwrap().role, Role::User);
    }

    #[test]
    fn test_rejected() {
        assert_eq!(
            authenticate("admin", "user"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(authenticate("", ""), Err(AuthError::InvalidCredentials));
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }
}

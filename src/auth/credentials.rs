//! Credential lookup.

/// What a successful login is allowed to call itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Administrator,
    User,
}

impl Role {
    pub fn login_message(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrator login successful",
            Role::User => "User login successful",
        }
    }
}

pub trait Authenticator: Send + Sync {
    /// The role of a matching account, `None` when the pair is unknown.
    fn authenticate(&self, username: &str, password: &str) -> Option<Role>;
}

/// Two built-in accounts: `admin/admin123` and `user/user123`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCredentials;

const ACCOUNTS: [(&str, &str, Role); 2] = [
    ("admin", "admin123", Role::Administrator),
    ("user", "user123", Role::User),
];

impl Authenticator for StaticCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        ACCOUNTS
            .iter()
            .find(|(u, p, _)| *u == username && *p == password)
            .map(|(_, _, role)| *role)
    }
}

/// The token handed out on a successful login.
pub fn mock_token(username: &str) -> String {
    format!("mock-jwt-token-{}", username)
}

use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

pub(crate) type Username = String;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) enum Role {
    Admin,
    Pro,
    #[default]
    Basic,
}

impl Role {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Pro => "Pro",
            Role::Basic => "Basic",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Pro" => Ok(Role::Pro),
            "Basic" => Ok(Role::Basic),
            other => Err(format!("unknown role {other}")),
        }
    }
}

/// A stored account. `password_hash` is a bcrypt hash, never the password.
#[derive(Clone)]
pub(crate) struct User {
    pub(crate) id: i32,
    pub(crate) username: Username,
    pub(crate) password_hash: String,
    pub(crate) role: Role,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

use serde::Serialize;

use crate::types::{Role, User};

#[derive(Serialize)]
pub(crate) struct Envelope<T: Serialize> {
    pub(crate) status: u16,
    pub(crate) result: T,
}

impl<T: Serialize> Envelope<T> {
    pub(crate) fn ok(result: T) -> Self {
        Self {
            status: 200,
            result,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ErrorBody<'a> {
    pub(crate) status: u16,
    pub(crate) error: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct UserResponse {
    pub(crate) id: i32,
    pub(crate) username: String,
    pub(crate) role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

use serde::Deserialize;

use crate::core::error::Error;

/// Body of `/auth/signup` and `/auth/login`.
#[derive(Deserialize)]
pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl Credentials {
    /// Both fields are required; an empty string counts as missing.
    pub(crate) fn require_fields(&self) -> Result<(), Error> {
        if self.username.is_empty() {
            return Err(Error::BadRequest("username is required".into()));
        }

        if self.password.is_empty() {
            return Err(Error::BadRequest("password is required".into()));
        }

        Ok(())
    }
}

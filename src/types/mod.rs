pub(crate) mod request;
pub(crate) mod response;
pub(crate) mod user;

pub(crate) use user::{Role, User, Username};

use std::env;

use gitling_core::object::Attribution;
use gitling_core::repo::{Error, Result};

use crate::Config;

/// Which person an identity is being looked up for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Author,
    Committer,
}

impl Role {
    fn env_prefix(self) -> &'static str {
        match self {
            Role::Author => "GIT_AUTHOR",
            Role::Committer => "GIT_COMMITTER",
        }
    }
}

/// Build the attribution for `role` from the process environment and
/// `config`. See [`identity_from`].
pub fn identity(config: &Config, role: Role) -> Result<Attribution> {
    identity_from(config, role, |key| env::var(key).ok())
}

/// Build the attribution for `role`.
///
/// `GIT_<ROLE>_NAME` and `GIT_<ROLE>_EMAIL` (read through `env`) take
/// precedence over `user.name` and `user.email`. `GIT_<ROLE>_DATE` sets
/// the timestamp; without it the current time is used.
pub fn identity_from<F>(config: &Config, role: Role, env: F) -> Result<Attribution>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = role.env_prefix();

    let name = env(&format!("{}_NAME", prefix))
        .or_else(|| config.get("user.name").map(str::to_string))
        .filter(|name| !name.trim().is_empty())
        .ok_or(Error::IdentityUnknown)?;

    let email = env(&format!("{}_EMAIL", prefix))
        .or_else(|| config.get("user.email").map(str::to_string))
        .ok_or(Error::IdentityUnknown)?;

    match env(&format!("{}_DATE", prefix)) {
        Some(date) => {
            Attribution::with_date(&name, &email, &date).ok_or(Error::InvalidDate(date))
        }
        None => Ok(Attribution::now(&name, &email)),
    }
}

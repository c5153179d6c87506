//! Stock filters.

mod gatekeeper;
mod log;
mod resource;

pub use self::gatekeeper::Gatekeeper;
pub use self::log::{LogFilter, LogLevel};
pub use self::resource::ResourceMapper;

use crate::error::{Error, Result};
use crate::servlet::Param;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Reads a filter's typed settings out of its parameter bag.
fn from_param<T: DeserializeOwned>(filter: &str, param: &Param) -> Result<T> {
    serde_json::from_value(Value::Object(param.clone()))
        .map_err(|e| Error::Config(format!("{}: {}", filter, e)))
}

/// Splits a `"a, b"` role list into trimmed lowercase names.
fn split_roles(roles: &str) -> impl Iterator<Item = String> + '_ {
    roles
        .split(',')
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())
}

use super::config::Param;
use super::request::Request;
use super::response::{Output, Response};
use crate::error::Result;

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

/// A named component producing the response of a matched route.
pub trait Servlet {
    fn init(&mut self, _param: &Param, _context: &Param) -> Result<()> {
        Ok(())
    }

    fn do_get(&mut self, _req: &mut Request, _res: &mut Response) -> Result<()> {
        Ok(())
    }

    fn do_post(&mut self, _req: &mut Request, _res: &mut Response) -> Result<()> {
        Ok(())
    }
}

/// Fallback used when no route matches.
pub trait NotFoundHandler: Send + Sync {
    fn do_get(&self) -> Output;
    fn do_post(&self) -> Output;
}

/// A function route, called with the route parameter values in binding
/// order.
pub type DirectHandler = Arc<dyn Fn(&[Option<&str>]) -> Output + Send + Sync>;

/// What a route dispatches to.
#[derive(Clone, Deserialize)]
#[serde(from = "String")]
pub enum HandlerRef {
    /// A servlet resolved from the registry by name.
    Named(String),
    /// A function whose return value is the output, bypassing the servlet
    /// lifecycle.
    Direct(DirectHandler),
}

impl HandlerRef {
    pub fn direct<F>(f: F) -> Self
    where
        F: Fn(&[Option<&str>]) -> Output + Send + Sync + 'static,
    {
        Self::Direct(Arc::new(f))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Direct(_) => None,
        }
    }
}

impl From<String> for HandlerRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<&str> for HandlerRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Direct(_) => f.write_str("Direct(..)"),
        }
    }
}

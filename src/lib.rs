#![forbid(unsafe_code)]

//! A servlet-style request router.
//!
//! A [`ServletContainer`] takes a raw request event, runs it through an
//! ordered chain of [`Filter`]s, matches it against a [`RouteTable`] and
//! dispatches it to named [`Servlet`]s or direct handler functions.

pub mod filters;
pub mod router;
pub mod servlet;

mod error;

pub use crate::error::{BoxError, Error, Result};
pub use crate::router::{Method, Params, Pattern, RouteTable, RouterError};
pub use crate::servlet::{
    Filter, HandlerRef, Output, Registry, Request, RequestEvent, Response, Servlet,
    ServletContainer, WebConfig,
};

//! Request/response model, filter chain and the dispatch container.

mod config;
mod container;
mod event;
mod filter;
mod handler;
mod not_found;
mod registry;
mod request;
mod response;
mod status;

pub use self::config::{FilterConfig, Param, RouteConfig, ServletConfig, WebConfig};
pub use self::container::{ServletContainer, DEFAULT_NOT_FOUND};
pub use self::event::{PostData, RequestEvent};
pub use self::filter::{Filter, FilterChain};
pub use self::handler::{DirectHandler, HandlerRef, NotFoundHandler, Servlet};
pub use self::not_found::{JsonNotFoundHandler, TextNotFoundHandler};
pub use self::registry::Registry;
pub use self::request::{Identity, PostBody, Request, RequestVars, Verb};
pub use self::response::{ContentType, MimeType, Output, Response, StatusCode};
pub use self::status::StatusObject;

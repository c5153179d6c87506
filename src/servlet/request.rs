use super::event::{PostData, RequestEvent};
use crate::router::{Method, Params};

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// The verbs a container dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostBody {
    Json(Value),
    Text(String),
}

impl PostBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub token: Option<String>,
    pub roles: Vec<String>,
}

/// Values handed from the router and filters to later filters and servlets.
#[derive(Debug, Clone, Default)]
pub struct RequestVars {
    /// Route parameters of a GET dispatch.
    pub get: Option<Params>,
    /// Route parameters of a POST dispatch.
    pub post: Option<Params>,
    pub identity: Option<Identity>,
    pub values: HashMap<String, Value>,
}

impl RequestVars {
    pub fn route_params(&self) -> Option<&Params> {
        self.get.as_ref().or_else(|| self.post.as_ref())
    }

    pub fn route_params_mut(&mut self) -> Option<&mut Params> {
        if self.get.is_some() {
            self.get.as_mut()
        } else {
            self.post.as_mut()
        }
    }

    pub fn set_route_params(&mut self, verb: Verb, params: Params) {
        match verb {
            Verb::Get => self.get = Some(params),
            Verb::Post => self.post = Some(params),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Verb,
    pub protocol: &'static str,
    pub secure: bool,
    /// Routed path, taken from the `url` parameter.
    pub url: String,
    pub param: HashMap<String, String>,
    pub params: HashMap<String, Vec<String>>,
    pub content_type: Option<String>,
    /// `None` when there is no body or a JSON body failed to parse.
    pub post_data: Option<PostBody>,
    pub raw: RequestEvent,
    pub var: RequestVars,
}

impl Request {
    pub fn new(method: Verb, event: RequestEvent) -> Self {
        let content_type = event.post_data.as_ref().map(|p| p.content_type.clone());
        let post_data = event.post_data.as_ref().and_then(parse_body);
        let param = event.parameter.clone();
        let params = event.parameters.clone();
        let url = match param.get("url") {
            Some(u) if !u.is_empty() => u.clone(),
            _ => "/".to_owned(),
        };

        Self {
            method,
            protocol: "https",
            secure: true,
            url,
            param,
            params,
            content_type,
            post_data,
            raw: event,
            var: RequestVars::default(),
        }
    }

    pub fn route_params(&self) -> Option<&Params> {
        self.var.route_params()
    }
}

fn parse_body(post: &PostData) -> Option<PostBody> {
    if !is_json(&post.content_type) {
        return Some(PostBody::Text(post.contents.clone()));
    }
    match serde_json::from_str(&post.contents) {
        Ok(v) => Some(PostBody::Json(v)),
        Err(e) => {
            debug!(error = %e, "discarding malformed json body");
            None
        }
    }
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map_or(false, |m| m.trim().eq_ignore_ascii_case("application/json"))
}

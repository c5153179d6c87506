use super::handler::HandlerRef;
use super::response::Output;
use crate::error::Result;
use crate::router::Pattern;

use regex::Regex;
use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Free-form configuration bag handed to filter and servlet initializers.
pub type Param = Map<String, Value>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub name: String,
    pub description: Option<String>,
    /// Variables shared by every servlet.
    pub context: Param,
    pub filters: Vec<FilterConfig>,
    pub servlets: Vec<ServletConfig>,
    pub routes: Vec<RouteConfig>,
}

impl WebConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn servlet(&self, name: &str) -> Option<&ServletConfig> {
        self.servlets.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Filters run in ascending order; ties keep declaration order.
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub param: Param,
}

impl FilterConfig {
    pub fn new(name: &str, order: i32) -> Self {
        Self {
            name: name.to_owned(),
            description: None,
            order,
            param: Param::new(),
        }
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.param = param;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServletConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub param: Param,
}

impl ServletConfig {
    pub fn new(name: &str, param: Param) -> Self {
        Self {
            name: name.to_owned(),
            description: None,
            param,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    /// Verbs the patterns are registered under; empty or `""` means any.
    #[serde(rename = "method", default, deserialize_with = "de_methods")]
    pub methods: Vec<String>,
    pub handler: HandlerRef,
    #[serde(alias = "pattern", deserialize_with = "de_patterns")]
    pub patterns: Vec<Pattern>,
}

impl RouteConfig {
    pub fn new<I, P>(method: &str, handler: impl Into<HandlerRef>, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Pattern>,
    {
        Self {
            methods: vec![method.to_owned()],
            handler: handler.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn direct<I, P, F>(method: &str, patterns: I, f: F) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Pattern>,
        F: Fn(&[Option<&str>]) -> Output + Send + Sync + 'static,
    {
        Self::new(method, HandlerRef::direct(f), patterns)
    }

    pub fn with_methods(mut self, methods: &[&str]) -> Self {
        self.methods = methods.iter().map(|m| (*m).to_owned()).collect();
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(v: OneOrMany<T>) -> Self {
        match v {
            OneOrMany::One(x) => vec![x],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternDef {
    Template(String),
    Regex { regex: String },
}

fn de_methods<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    OneOrMany::<String>::deserialize(d).map(Vec::from)
}

fn de_patterns<'de, D>(d: D) -> Result<Vec<Pattern>, D::Error>
where
    D: Deserializer<'de>,
{
    let defs = Vec::from(OneOrMany::<PatternDef>::deserialize(d)?);
    defs.into_iter()
        .map(|def| match def {
            PatternDef::Template(s) => Ok(Pattern::Template(s)),
            PatternDef::Regex { regex } => Regex::new(&regex)
                .map(Pattern::Regex)
                .map_err(D::Error::custom),
        })
        .collect()
}

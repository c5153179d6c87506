use super::filter::Filter;
use super::handler::{NotFoundHandler, Servlet};
use super::not_found::{JsonNotFoundHandler, TextNotFoundHandler};
use crate::filters::{Gatekeeper, LogFilter, ResourceMapper};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type FilterFactory = Box<dyn Fn() -> Box<dyn Filter> + Send + Sync>;
type ServletFactory = Box<dyn Fn() -> Box<dyn Servlet> + Send + Sync>;

/// Name-to-factory lookup for filters, servlets and not-found handlers.
///
/// Filters and servlets are created fresh for every request.
#[derive(Default)]
pub struct Registry {
    filters: HashMap<String, FilterFactory>,
    servlets: HashMap<String, ServletFactory>,
    not_found: HashMap<String, Arc<dyn NotFoundHandler>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the bundled filters and not-found handlers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .filter("LogFilter", LogFilter::default)
            .filter("Gatekeeper", Gatekeeper::default)
            .filter("ResourceMapper", ResourceMapper::default)
            .not_found("NotFoundHandler", TextNotFoundHandler)
            .not_found("ApiNotFoundHandler", JsonNotFoundHandler);
        registry
    }

    pub fn filter<F, T>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Filter + 'static,
    {
        let factory: FilterFactory = Box::new(move || Box::new(factory()));
        self.filters.insert(name.to_owned(), factory);
        self
    }

    pub fn servlet<F, T>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Servlet + 'static,
    {
        let factory: ServletFactory = Box::new(move || Box::new(factory()));
        self.servlets.insert(name.to_owned(), factory);
        self
    }

    pub fn not_found<H>(&mut self, name: &str, handler: H) -> &mut Self
    where
        H: NotFoundHandler + 'static,
    {
        self.not_found.insert(name.to_owned(), Arc::new(handler));
        self
    }

    pub fn resolve_filter(&self, name: &str) -> Option<Box<dyn Filter>> {
        self.filters.get(name).map(|f| f())
    }

    pub fn resolve_servlet(&self, name: &str) -> Option<Box<dyn Servlet>> {
        self.servlets.get(name).map(|f| f())
    }

    pub fn resolve_not_found(&self, name: &str) -> Option<Arc<dyn NotFoundHandler>> {
        self.not_found.get(name).cloned()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn names<V>(map: &HashMap<String, V>) -> Vec<&str> {
            let mut v: Vec<&str> = map.keys().map(String::as_str).collect();
            v.sort_unstable();
            v
        }

        f.debug_struct("Registry")
            .field("filters", &names(&self.filters))
            .field("servlets", &names(&self.servlets))
            .field("not_found", &names(&self.not_found))
            .finish()
    }
}

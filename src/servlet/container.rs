use super::config::{Param, WebConfig};
use super::event::RequestEvent;
use super::filter::FilterChain;
use super::handler::{HandlerRef, NotFoundHandler, Servlet};
use super::registry::Registry;
use super::request::{Request, Verb};
use super::response::{Output, Response, StatusCode};
use crate::error::{Error, Result};
use crate::router::{parse_method, RouteTable};

use std::fmt;
use std::sync::Arc;

use tracing::{debug, debug_span, trace, warn};

/// Registry name of the not-found handler used by [`ServletContainer::init`].
pub const DEFAULT_NOT_FOUND: &str = "NotFoundHandler";

/// Routes raw request events through the filter chain to named servlets or
/// direct handlers.
///
/// The container itself is immutable after `init`; every dispatch builds its
/// own request, response, filters and servlets.
pub struct ServletContainer {
    config: WebConfig,
    registry: Arc<Registry>,
    router: RouteTable<HandlerRef>,
    not_found: Arc<dyn NotFoundHandler>,
    base_path: String,
}

impl ServletContainer {
    pub fn init(config: WebConfig, registry: impl Into<Arc<Registry>>) -> Result<Self> {
        Self::init_with(config, registry, DEFAULT_NOT_FOUND)
    }

    /// Builds the route table from every route's verb × pattern product and
    /// resolves the not-found handler registered as `handler404`.
    pub fn init_with(
        mut config: WebConfig,
        registry: impl Into<Arc<Registry>>,
        handler404: &str,
    ) -> Result<Self> {
        let registry = registry.into();
        let not_found = registry
            .resolve_not_found(handler404)
            .ok_or_else(|| Error::MissingNotFoundHandler(handler404.to_owned()))?;

        config.filters.sort_by_key(|f| f.order);

        let mut router = RouteTable::new();
        for route in &config.routes {
            let methods = if route.methods.is_empty() {
                vec![None]
            } else {
                route
                    .methods
                    .iter()
                    .map(|m| parse_method(m))
                    .collect::<Result<Vec<_>, _>>()?
            };

            for method in methods {
                for pattern in &route.patterns {
                    router.try_add(method.clone(), pattern.clone(), Some(route.handler.clone()))?;
                }
            }
        }

        debug!(
            name = %config.name,
            routes = router.len(),
            filters = config.filters.len(),
            "servlet container initialized"
        );

        Ok(Self {
            config,
            registry,
            router,
            not_found,
            base_path: String::new(),
        })
    }

    /// Sets the URL relative redirect targets are resolved against.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable<HandlerRef> {
        &self.router
    }

    pub fn do_get(&self, event: RequestEvent) -> Result<Output> {
        self.dispatch(Verb::Get, event)
    }

    pub fn do_post(&self, event: RequestEvent) -> Result<Output> {
        self.dispatch(Verb::Post, event)
    }

    fn dispatch(&self, verb: Verb, event: RequestEvent) -> Result<Output> {
        let mut req = Request::new(verb, event);
        let mut res = Response::new();

        let span = debug_span!("dispatch", verb = %verb, url = %req.url);
        let _enter = span.enter();
        debug!("dispatching request");

        let filters = &self.config.filters;
        let mut chain = FilterChain::apply(filters, &self.registry, &mut req, &mut res)?;
        if res.is_committed() {
            return Ok(res.into_output());
        }

        let route = self.router.find(&verb.method(), &req.url);
        if route.is_empty() {
            debug!("no route matched");
            return Ok(match verb {
                Verb::Get => self.not_found.do_get(),
                Verb::Post => self.not_found.do_post(),
            });
        }

        let mut names = Vec::with_capacity(route.handlers.len());
        for handler in &route.handlers {
            match handler {
                HandlerRef::Named(name) => names.push(name.as_str()),
                HandlerRef::Direct(f) => {
                    trace!("invoking direct handler");
                    return Ok(f(route.params.values().as_slice()));
                }
            }
        }

        req.var.set_route_params(verb, route.params.clone());

        chain.before(verb, &mut req, &mut res)?;
        if res.is_committed() {
            return Ok(res.into_output());
        }

        let mut servlets = self.init_servlets(&names)?;
        for (name, servlet) in &mut servlets {
            trace!(servlet = *name, "invoking servlet");
            match verb {
                Verb::Get => servlet.do_get(&mut req, &mut res)?,
                Verb::Post => servlet.do_post(&mut req, &mut res)?,
            }
        }

        chain.after(verb, &mut req, &mut res)?;
        res.end();

        Ok(self.finish(res))
    }

    fn init_servlets<'n>(&self, names: &[&'n str]) -> Result<Vec<(&'n str, Box<dyn Servlet>)>> {
        let empty = Param::new();
        let mut servlets = Vec::with_capacity(names.len());

        for &name in names {
            let mut servlet = match self.registry.resolve_servlet(name) {
                Some(s) => s,
                None => {
                    warn!(servlet = name, "servlet not registered, skipping");
                    continue;
                }
            };
            let param = self.config.servlet(name).map_or(&empty, |c| &c.param);
            servlet.init(param, &self.config.context)?;
            servlets.push((name, servlet));
        }

        Ok(servlets)
    }

    /// Turns the response left by the servlets into the host output, rewriting
    /// temporary redirects into absolute ones. Responses committed by filters
    /// are returned as written.
    fn finish(&self, res: Response) -> Output {
        if res.status() != StatusCode::TEMPORARY_REDIRECT {
            return res.into_output();
        }

        let target = res.content();
        let location = if is_absolute(target) {
            target.to_owned()
        } else {
            format!("{}?url={}", self.base_path, target)
        };
        debug!(%location, "redirecting");
        Output::redirect(location)
    }
}

fn is_absolute(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .map_or(false, |s| s.eq_ignore_ascii_case(scheme))
    })
}

impl fmt::Debug for ServletContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServletContainer")
            .field("name", &self.config.name)
            .field("routes", &self.router.len())
            .field("registry", &self.registry)
            .field("base_path", &self.base_path)
            .finish()
    }
}

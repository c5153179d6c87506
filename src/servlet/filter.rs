use super::config::{FilterConfig, Param};
use super::registry::Registry;
use super::request::{Request, Verb};
use super::response::Response;
use crate::error::Result;

use tracing::debug;

/// Middleware run before routing. A filter rejects a request by committing
/// the response.
pub trait Filter {
    fn init(&mut self, _param: &Param) -> Result<()> {
        Ok(())
    }

    fn do_filter(&mut self, req: &mut Request, res: &mut Response) -> Result<()>;

    /// Runs after the route matched, with its parameters in `req.var`.
    fn before_get(&mut self, _req: &mut Request, _res: &mut Response) -> Result<()> {
        Ok(())
    }

    fn after_get(&mut self, _req: &mut Request, _res: &mut Response) -> Result<()> {
        Ok(())
    }

    fn before_post(&mut self, _req: &mut Request, _res: &mut Response) -> Result<()> {
        Ok(())
    }

    fn after_post(&mut self, _req: &mut Request, _res: &mut Response) -> Result<()> {
        Ok(())
    }
}

/// The filters instantiated for one request, in execution order.
pub struct FilterChain<'c> {
    filters: Vec<(&'c str, Box<dyn Filter>)>,
}

impl<'c> FilterChain<'c> {
    /// Resolves, initializes and runs each configured filter in turn.
    ///
    /// `configs` must already be sorted by order. Names missing from the
    /// registry are skipped. Iteration stops as soon as the response is
    /// committed; later filters are neither created nor initialized.
    pub fn apply(
        configs: &'c [FilterConfig],
        registry: &Registry,
        req: &mut Request,
        res: &mut Response,
    ) -> Result<Self> {
        let mut filters = Vec::with_capacity(configs.len());

        for config in configs {
            let name = config.name.as_str();
            match registry.resolve_filter(name) {
                Some(mut filter) => {
                    filter.init(&config.param)?;
                    filter.do_filter(req, res)?;
                    filters.push((name, filter));
                }
                None => debug!(filter = name, "filter not registered, skipping"),
            }

            if res.is_committed() {
                let status = res.status().as_u16();
                debug!(filter = name, status, "filter committed the response");
                break;
            }
        }

        Ok(Self { filters })
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Runs the `before_*` hooks, stopping once the response is committed.
    pub fn before(&mut self, verb: Verb, req: &mut Request, res: &mut Response) -> Result<()> {
        for (name, filter) in &mut self.filters {
            match verb {
                Verb::Get => filter.before_get(req, res)?,
                Verb::Post => filter.before_post(req, res)?,
            }
            if res.is_committed() {
                debug!(filter = *name, "before hook committed the response");
                break;
            }
        }
        Ok(())
    }

    pub fn after(&mut self, verb: Verb, req: &mut Request, res: &mut Response) -> Result<()> {
        for (_, filter) in &mut self.filters {
            match verb {
                Verb::Get => filter.after_get(req, res)?,
                Verb::Post => filter.after_post(req, res)?,
            }
        }
        Ok(())
    }
}

use super::error::RouterError;
use super::params::Params;
use super::pattern::{Matcher, Pattern};

pub use http::Method;
use smallvec::SmallVec;

/// An insertion-ordered list of `(method, pattern, handlers)` entries.
///
/// Entries are never merged or deduplicated. A lookup walks every entry, so
/// several patterns may funnel into the same handler and several entries may
/// contribute handlers to one request.
#[derive(Debug)]
pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
}

#[derive(Debug)]
struct Route<H> {
    method: Option<Method>,
    matcher: Matcher,
    handlers: SmallVec<[H; 2]>,
}

/// Result of [`RouteTable::find`]. No handlers means no route matched.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'a, H> {
    pub params: Params,
    pub handlers: SmallVec<[&'a H; 4]>,
}

impl<H> RouteMatch<'_, H> {
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn clear(&mut self) {
        self.routes.clear();
    }

    /// Appends an entry. `None` matches every method.
    ///
    /// # Panics
    /// Panics if the pattern does not compile, see [`RouteTable::try_add`].
    pub fn add<P, I>(&mut self, method: Option<Method>, pattern: P, handlers: I) -> &mut Self
    where
        P: Into<Pattern>,
        I: IntoIterator<Item = H>,
    {
        let pattern = pattern.into();
        if let Err(e) = self.push(method, &pattern, false, handlers) {
            panic!("{}: pattern = {:?}", e, pattern);
        }
        self
    }

    pub fn try_add<P, I>(
        &mut self,
        method: Option<Method>,
        pattern: P,
        handlers: I,
    ) -> Result<&mut Self, RouterError>
    where
        P: Into<Pattern>,
        I: IntoIterator<Item = H>,
    {
        self.push(method, &pattern.into(), false, handlers)?;
        Ok(self)
    }

    /// Appends a loose entry for every method: the pattern matches any path
    /// it is a segment prefix of.
    pub fn use_prefix<I>(&mut self, pattern: &str, handlers: I) -> &mut Self
    where
        I: IntoIterator<Item = H>,
    {
        if let Err(e) = self.push(None, &pattern.into(), true, handlers) {
            panic!("{}: pattern = {:?}", e, pattern);
        }
        self
    }

    pub fn try_use_prefix<I>(
        &mut self,
        pattern: &str,
        handlers: I,
    ) -> Result<&mut Self, RouterError>
    where
        I: IntoIterator<Item = H>,
    {
        self.push(None, &pattern.into(), true, handlers)?;
        Ok(self)
    }

    /// Collects the handlers of every entry matching `method` and `path`, in
    /// registration order.
    ///
    /// A `HEAD` lookup also accepts `GET` entries. Parameters bound by several
    /// matching entries keep the value of the last one.
    pub fn find<'s>(&'s self, method: &Method, path: &str) -> RouteMatch<'s, H> {
        let is_head = *method == Method::HEAD;
        let mut params = Params::new();
        let mut handlers: SmallVec<[&'s H; 4]> = SmallVec::new();

        for route in &self.routes {
            let accepted = match route.method {
                None => true,
                Some(ref m) => m == method || (is_head && *m == Method::GET),
            };
            if accepted && route.matcher.capture_into(path, &mut params) {
                handlers.extend(route.handlers.iter());
            }
        }

        RouteMatch { params, handlers }
    }
}

impl<H> RouteTable<H> {
    fn push<I>(
        &mut self,
        method: Option<Method>,
        pattern: &Pattern,
        loose: bool,
        handlers: I,
    ) -> Result<(), RouterError>
    where
        I: IntoIterator<Item = H>,
    {
        let matcher = Matcher::compile(pattern, loose)?;
        self.routes.push(Route {
            method,
            matcher,
            handlers: handlers.into_iter().collect(),
        });
        Ok(())
    }
}

/// Parses a configured verb. The empty string and `*` mean "any method".
pub fn parse_method(s: &str) -> Result<Option<Method>, RouterError> {
    let s = s.trim();
    if s.is_empty() || s == "*" {
        return Ok(None);
    }
    Method::from_bytes(s.to_ascii_uppercase().as_bytes())
        .map(Some)
        .map_err(|_| RouterError::InvalidMethod(s.to_owned()))
}

macro_rules! define_method {
    ($name:tt, $method:tt) => {
        pub fn $name<P, I>(&mut self, pattern: P, handlers: I) -> &mut Self
        where
            P: Into<Pattern>,
            I: IntoIterator<Item = H>,
        {
            self.add(Some(Method::$method), pattern, handlers)
        }
    };
}

impl<H> RouteTable<H> {
    define_method!(get, GET);
    define_method!(post, POST);
    define_method!(put, PUT);
    define_method!(delete, DELETE);
    define_method!(head, HEAD);
    define_method!(options, OPTIONS);
    define_method!(connect, CONNECT);
    define_method!(patch, PATCH);
    define_method!(trace, TRACE);

    pub fn all<P, I>(&mut self, pattern: P, handlers: I) -> &mut Self
    where
        P: Into<Pattern>,
        I: IntoIterator<Item = H>,
    {
        self.add(None, pattern, handlers)
    }
}

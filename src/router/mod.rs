mod error;
mod params;
mod pattern;
mod router_macro;
mod table;

pub use self::error::RouterError;
pub use self::params::{Iter as ParamsIter, Params};
pub use self::pattern::{Matcher, Pattern, WILDCARD_KEY};
pub use self::table::{parse_method, Method, RouteMatch, RouteTable};

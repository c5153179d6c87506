/// Builds a [`RouteTable`](crate::router::RouteTable) with one handler per entry.
///
/// ```
/// use servlet_router::route_table;
/// use servlet_router::router::Method;
///
/// let table = route_table! {
///     GET "/u/:uid" => 1,
///     POST "/u" => 2,
///     ALL "/ping" => 3,
///     USE "/admin" => 4
/// };
/// assert_eq!(*table.find(&Method::GET, "/u/asd").handlers[0], 1);
/// ```
#[macro_export]
macro_rules! route_table {
    {@entry $table:expr, GET, $pattern:expr, $data:expr} => {
        $table.get($pattern, ::std::iter::once($data))
    };
    {@entry $table:expr, POST, $pattern:expr, $data:expr} => {
        $table.post($pattern, ::std::iter::once($data))
    };
    {@entry $table:expr, PUT, $pattern:expr, $data:expr} => {
        $table.put($pattern, ::std::iter::once($data))
    };
    {@entry $table:expr, DELETE, $pattern:expr, $data:expr} => {
        $table.delete($pattern, ::std::iter::once($data))
    };
    {@entry $table:expr, HEAD, $pattern:expr, $data:expr} => {
        $table.head($pattern, ::std::iter::once($data))
    };
    {@entry $table:expr, OPTIONS, $pattern:expr, $data:expr} => {
        $table.options($pattern, ::std::iter::once($data))
    };
    {@entry $table:expr, CONNECT, $pattern:expr, $data:expr} => {
        $table.connect($pattern, ::std::iter::once($data))
    };
    {@entry $table:expr, PATCH, $pattern:expr, $data:expr} => {
        $table.patch($pattern, ::std::iter::once($data))
    };
    {@entry $table:expr, TRACE, $pattern:expr, $data:expr} => {
        $table.trace($pattern, ::std::iter::once($data))
    };
    {@entry $table:expr, ALL, $pattern:expr, $data:expr} => {
        $table.all($pattern, ::std::iter::once($data))
    };
    {@entry $table:expr, USE, $pattern:expr, $data:expr} => {
        $table.use_prefix($pattern, ::std::iter::once($data))
    };

    {$($method:tt $pattern:expr => $data:expr),+ $(,)?} => {{
        let mut __table = $crate::router::RouteTable::new();
        $($crate::route_table!(@entry __table, $method, $pattern, $data);)+
        __table
    }};
}

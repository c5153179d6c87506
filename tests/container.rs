use servlet_router::servlet::{
    Filter, MimeType, Output, Param, PostData, Registry, Request, RequestEvent, Response,
    RouteConfig, Servlet, ServletContainer, StatusCode, WebConfig,
};
use servlet_router::{Error, Result};

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

type Log = Arc<Mutex<Vec<String>>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Records every hook it runs; commits in `do_filter` when `commit` is set.
struct Recorder {
    tag: String,
    log: Log,
    commit: bool,
}

impl Recorder {
    fn push(&self, hook: &str) {
        self.log.lock().unwrap().push(format!("{} {}", hook, self.tag));
    }
}

impl Filter for Recorder {
    fn do_filter(&mut self, _req: &mut Request, res: &mut Response) -> Result<()> {
        self.push("filter");
        if self.commit {
            res.send(format!("rejected by {}", self.tag), Some(StatusCode::FORBIDDEN))?
                .end();
        }
        Ok(())
    }

    fn before_get(&mut self, _req: &mut Request, _res: &mut Response) -> Result<()> {
        self.push("before");
        Ok(())
    }

    fn after_get(&mut self, _req: &mut Request, res: &mut Response) -> Result<()> {
        self.push(&format!("after({})", res.status().as_u16()));
        Ok(())
    }
}

/// Writes the `msg` route parameter back as JSON.
struct Echo {
    log: Log,
}

impl Servlet for Echo {
    fn do_get(&mut self, req: &mut Request, res: &mut Response) -> Result<()> {
        self.log.lock().unwrap().push("servlet Echo".into());
        let msg = req.var.get.as_ref().and_then(|p| p.get("msg")).unwrap_or_default();
        res.json(msg, Some(StatusCode::OK))?;
        Ok(())
    }
}

/// Echoes its route parameters, identity and body.
#[derive(Default)]
struct Api {
    param: Param,
    context: Param,
}

impl Api {
    fn reply(&self, req: &Request, res: &mut Response, status: StatusCode) -> Result<()> {
        let params: serde_json::Map<String, Value> = req
            .route_params()
            .map(|p| p.iter().map(|(k, v)| (k.to_owned(), json!(v))).collect())
            .unwrap_or_default();
        let body = json!({
            "params": params,
            "identity": req.var.identity,
            "body": req.post_data.as_ref().and_then(|b| b.as_json()),
            "pageSize": self.param.get("pageSize"),
            "app": self.context.get("app"),
        });
        res.json(&body, Some(status))?;
        Ok(())
    }
}

impl Servlet for Api {
    fn init(&mut self, param: &Param, context: &Param) -> Result<()> {
        self.param = param.clone();
        self.context = context.clone();
        Ok(())
    }

    fn do_get(&mut self, req: &mut Request, res: &mut Response) -> Result<()> {
        self.reply(req, res, StatusCode::OK)
    }

    fn do_post(&mut self, req: &mut Request, res: &mut Response) -> Result<()> {
        assert!(req.var.get.is_none());
        self.reply(req, res, StatusCode::CREATED)
    }
}

fn registry(log: &Log) -> Registry {
    let mut registry = Registry::with_defaults();
    for &(tag, commit) in &[("zero", true), ("one", false), ("two", false), ("watch", false)] {
        let log = log.clone();
        registry.filter(tag, move || Recorder {
            tag: tag.to_owned(),
            log: log.clone(),
            commit,
        });
    }
    let echo_log = log.clone();
    registry
        .servlet("Echo", move || Echo { log: echo_log.clone() })
        .servlet("Api", Api::default);
    registry
}

fn container(config: Value, log: &Log) -> ServletContainer {
    init_tracing();
    let config: WebConfig = serde_json::from_value(config).unwrap();
    ServletContainer::init(config, registry(log)).unwrap()
}

fn get(container: &ServletContainer, url: &str) -> Output {
    container.do_get(RequestEvent::with_url(url)).unwrap()
}

fn json_body(out: &Output) -> Value {
    assert_eq!(out.mime(), Some(MimeType::Json));
    serde_json::from_str(out.content()).unwrap()
}

#[test]
fn filter_commit_short_circuits() {
    let log = Log::default();
    let c = container(
        json!({
            "filters": [
                {"name": "two", "order": 2},
                {"name": "zero", "order": 0},
                {"name": "one", "order": 1}
            ],
            "routes": [{"method": "GET", "handler": "Echo", "patterns": ["/echo/:msg"]}]
        }),
        &log,
    );

    let out = get(&c, "/echo/hello");
    assert_eq!(out, Output::text("rejected by zero"));
    assert_eq!(entries(&log), ["filter zero"]);
}

#[test]
fn echo_round_trip() {
    let log = Log::default();
    let c = container(
        json!({
            "filters": [{"name": "watch"}],
            "routes": [{"method": "GET", "handler": "Echo", "patterns": ["/echo/:msg"]}]
        }),
        &log,
    );

    let out = get(&c, "/echo/hello");
    assert_eq!(json_body(&out), json!("hello"));
    assert_eq!(
        entries(&log),
        ["filter watch", "before watch", "servlet Echo", "after(200) watch"]
    );
}

#[test]
fn not_found_skips_post_route_logic() {
    let log = Log::default();
    let c = container(
        json!({
            "filters": [{"name": "watch"}],
            "routes": [{"method": "GET", "handler": "Echo", "patterns": ["/echo/:msg"]}]
        }),
        &log,
    );

    assert_eq!(get(&c, "/missing"), Output::text("404 Not Found"));
    assert_eq!(get(&c, "/echo/"), Output::text("404 Not Found"));
    assert_eq!(entries(&log), ["filter watch", "filter watch"]);

    let out = c.do_post(RequestEvent::with_url("/echo/hello")).unwrap();
    assert_eq!(out, Output::text("404 Not Found"));
}

#[test]
fn api_not_found_handler() {
    let log = Log::default();
    let c = ServletContainer::init_with(WebConfig::default(), registry(&log), "ApiNotFoundHandler")
        .unwrap();
    let out = c.do_post(RequestEvent::with_url("/nothing")).unwrap();
    assert_eq!(json_body(&out), json!({"type": "error", "status": 404, "title": "Not Found"}));
}

#[test]
fn unknown_not_found_handler() {
    let log = Log::default();
    let r = ServletContainer::init_with(WebConfig::default(), registry(&log), "Nope");
    assert!(matches!(r, Err(Error::MissingNotFoundHandler(_))));
}

#[test]
fn direct_handlers() {
    let log = Log::default();
    let mut config = WebConfig::default();
    config.routes.push(RouteConfig::new("GET", "Echo", vec!["/hello/:first/:last"]));
    config.routes.push(RouteConfig::direct("GET", vec!["/hello/:first/:last"], |args| {
        let names: Vec<&str> = args.iter().map(|a| a.unwrap_or("?")).collect();
        Output::text(format!("Hi {}", names.join(" ")))
    }));
    config.routes.push(RouteConfig::direct("", vec!["/", "/index"], |args| {
        assert!(args.is_empty());
        Output::html("<h1>home</h1>")
    }));

    let c = ServletContainer::init(config, registry(&log)).unwrap();

    assert_eq!(get(&c, "/hello/ann/lee"), Output::text("Hi ann lee"));
    assert!(entries(&log).is_empty());

    assert_eq!(get(&c, "/"), Output::html("<h1>home</h1>"));
    let out = c.do_post(RequestEvent::with_url("/INDEX/")).unwrap();
    assert_eq!(out, Output::html("<h1>home</h1>"));
}

struct Login {
    target: &'static str,
}

impl Servlet for Login {
    fn do_get(&mut self, _req: &mut Request, res: &mut Response) -> Result<()> {
        res.redirect(self.target)
    }

    fn do_post(&mut self, _req: &mut Request, res: &mut Response) -> Result<()> {
        res.redirect(self.target)
    }
}

#[test]
fn redirects() {
    let log = Log::default();
    let mut registry = registry(&log);
    registry
        .servlet("Login", || Login { target: "/login" })
        .servlet("Away", || Login { target: "https://example.com/away" });

    let mut config = WebConfig::default();
    let private = RouteConfig::new("GET", "Login", vec!["/private"]).with_methods(&["GET", "POST"]);
    config.routes.push(private);
    config.routes.push(RouteConfig::new("GET", "Away", vec!["/away"]));

    let c = ServletContainer::init(config, registry)
        .unwrap()
        .with_base_path("https://script.example.com/exec");

    assert_eq!(
        get(&c, "/private"),
        Output::redirect("https://script.example.com/exec?url=/login")
    );
    assert_eq!(
        c.do_post(RequestEvent::with_url("/private")).unwrap(),
        Output::redirect("https://script.example.com/exec?url=/login")
    );
    assert_eq!(get(&c, "/away"), Output::redirect("https://example.com/away"));
}

/// Redirects every request to `/login` before routing.
struct Bounce;

impl Filter for Bounce {
    fn do_filter(&mut self, _req: &mut Request, res: &mut Response) -> Result<()> {
        res.redirect("/login")
    }
}

#[test]
fn filter_redirect_is_returned_as_written() {
    let log = Log::default();
    let mut registry = registry(&log);
    registry.filter("Bounce", || Bounce);

    let config: WebConfig = serde_json::from_value(json!({
        "filters": [{"name": "Bounce"}, {"name": "watch", "order": 1}],
        "routes": [{"method": "GET", "handler": "Echo", "patterns": ["/echo/:msg"]}]
    }))
    .unwrap();
    let c = ServletContainer::init(config, registry)
        .unwrap()
        .with_base_path("https://script.example.com/exec");

    let out = get(&c, "/echo/hello");
    assert_eq!(out, Output::text("/login"));
    assert_eq!(out.content(), "/login");
    assert!(entries(&log).is_empty());
}

#[test]
fn filter_order_ties_keep_declaration_order() {
    let log = Log::default();
    let c = container(
        json!({
            "filters": [
                {"name": "two", "order": 1},
                {"name": "watch", "order": 1},
                {"name": "one", "order": 0}
            ],
            "routes": [{"method": "GET", "handler": "Echo", "patterns": ["/echo/:msg"]}]
        }),
        &log,
    );

    get(&c, "/echo/hi");
    let filtered: Vec<String> =
        entries(&log).into_iter().filter(|e| e.starts_with("filter")).collect();
    assert_eq!(filtered, ["filter one", "filter two", "filter watch"]);
}

fn api_config() -> Value {
    json!({
        "name": "SheetAPI",
        "context": {"app": "demo"},
        "filters": [
            {"name": "LogFilter", "order": 0, "param": {"level": "info"}},
            {"name": "Gatekeeper", "order": 1, "param": {
                "identities": [
                    {"token": "t-admin", "roles": "admin"},
                    {"token": "t-viewer", "roles": "viewer"}
                ],
                "rules": [
                    {"rule": "customers.read", "roles": "admin,viewer"},
                    {"rule": "customers.create", "roles": "admin"}
                ]
            }},
            {"name": "ResourceMapper", "order": 2, "param": {
                "resources": [{
                    "name": "customers",
                    "sheet": "Customers",
                    "url": "https://docs.google.com/spreadsheets/d/abc123/edit"
                }]
            }}
        ],
        "servlets": [{"name": "Api", "param": {"pageSize": 20}}],
        "routes": [
            {"method": "GET", "handler": "Api", "patterns": ["/api/v1/:resource/:id?"]},
            {"method": "POST", "handler": "Api", "patterns": ["/api/v1/create/:resource"]}
        ]
    })
}

#[test]
fn gatekeeper_rejects() {
    let log = Log::default();
    let c = container(api_config(), &log);

    let out = get(&c, "/api/v1/customers");
    assert_eq!(json_body(&out), json!({"type": "error", "status": 401, "title": "Unauthorized"}));

    let event = RequestEvent::from_query("url=/api/v1/create/customers&token=t-viewer", None);
    let out = c.do_post(event).unwrap();
    assert_eq!(json_body(&out)["status"], 403);

    let event = RequestEvent::from_query("url=/home&token=t-admin", None);
    let out = c.do_get(event).unwrap();
    assert_eq!(json_body(&out)["status"], 403);
}

#[test]
fn api_get() {
    let log = Log::default();
    let c = container(api_config(), &log);

    let event = RequestEvent::from_query("url=%2Fapi%2Fv1%2Fcustomers%2F42&token=t-viewer", None);
    let body = json_body(&c.do_get(event).unwrap());

    assert_eq!(
        body["params"],
        json!({"resource": "Customers", "id": "42", "spreadsheetId": "abc123"})
    );
    assert_eq!(body["identity"], json!({"token": "t-viewer", "roles": ["viewer"]}));
    assert_eq!(body["pageSize"], 20);
    assert_eq!(body["app"], "demo");
}

#[test]
fn api_post() {
    let log = Log::default();
    let c = container(api_config(), &log);

    let post = PostData::new("application/json", r#"{"name": "ann"}"#);
    let event = RequestEvent::from_query("url=/api/v1/create/customers&token=t-admin", Some(post));
    let body = json_body(&c.do_post(event).unwrap());

    assert_eq!(
        body["params"],
        json!({"resource": "Customers", "spreadsheetId": "abc123"})
    );
    assert_eq!(body["body"], json!({"name": "ann"}));
}

#[test]
fn missing_parts_are_skipped() {
    let log = Log::default();
    let c = container(
        json!({
            "filters": [{"name": "Ghost"}, {"name": "watch"}],
            "routes": [{"method": "GET", "handler": "Phantom", "patterns": ["/x"]}]
        }),
        &log,
    );

    assert_eq!(get(&c, "/x"), Output::text(""));
    assert_eq!(entries(&log), ["filter watch", "before watch", "after(200) watch"]);
}

struct Twice;

impl Servlet for Twice {
    fn do_get(&mut self, _req: &mut Request, res: &mut Response) -> Result<()> {
        res.send("first", None)?.end();
        res.send("second", None)?;
        Ok(())
    }
}

#[test]
fn servlet_errors_propagate() {
    let log = Log::default();
    let mut registry = registry(&log);
    registry.servlet("Twice", || Twice);

    let mut config = WebConfig::default();
    config.routes.push(RouteConfig::new("GET", "Twice", vec!["/twice"]));
    let c = ServletContainer::init(config, registry).unwrap();

    let r = c.do_get(RequestEvent::with_url("/twice"));
    assert!(matches!(r, Err(Error::AlreadyCommitted)));
}

#[test]
fn container_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ServletContainer>();
}

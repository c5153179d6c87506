use crate::error::{Error, Result};
use crate::servlet::{Filter, Param, PostBody, Request, Response};

use serde_json::Value;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Debug
    }
}

impl LogLevel {
    /// Accepts a level name or its numeric code (`0` debug, `1` info, `2` error).
    pub fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "debug" => Some(Self::Debug),
                "info" => Some(Self::Info),
                "error" => Some(Self::Error),
                _ => None,
            },
            Value::Number(n) => match n.as_u64()? {
                0 => Some(Self::Debug),
                1 => Some(Self::Info),
                2 => Some(Self::Error),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Logs every request line and its body.
///
/// Params: `level` (`"debug"` when absent).
#[derive(Debug, Default)]
pub struct LogFilter {
    level: LogLevel,
}

impl LogFilter {
    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn emit(&self, message: &str) {
        match self.level {
            LogLevel::Debug => debug!(target: "servlet_router::access", "{}", message),
            LogLevel::Info => info!(target: "servlet_router::access", "{}", message),
            LogLevel::Error => error!(target: "servlet_router::access", "{}", message),
        }
    }
}

/// `{METHOD} {url} (k=v&...)`, keys sorted.
fn request_line(req: &Request) -> String {
    let mut keys: Vec<&String> = req.param.keys().collect();
    keys.sort();

    let pairs: Vec<String> = keys
        .into_iter()
        .map(|k| format!("{}={}", k, req.param[k]))
        .collect();
    format!("{} {} ({})", req.method, req.url, pairs.join("&"))
}

impl Filter for LogFilter {
    fn init(&mut self, param: &Param) -> Result<()> {
        self.level = match param.get("level") {
            None | Some(Value::Null) => LogLevel::Debug,
            Some(v) => LogLevel::from_value(v)
                .ok_or_else(|| Error::Config(format!("LogFilter: unknown level {}", v)))?,
        };
        Ok(())
    }

    fn do_filter(&mut self, req: &mut Request, _res: &mut Response) -> Result<()> {
        self.emit(&request_line(req));
        match &req.post_data {
            Some(PostBody::Json(v)) => self.emit(&v.to_string()),
            Some(PostBody::Text(s)) => self.emit(s),
            None => {}
        }
        Ok(())
    }
}

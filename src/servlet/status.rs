use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// JSON envelope used by the API filters and not-found handlers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StatusObject {
    Success { status: u16, results: Option<Value> },
    Error { status: u16, title: Option<String> },
}

impl StatusObject {
    pub fn of(status: StatusCode) -> Self {
        if status.is_success() {
            Self::Success {
                status: status.as_u16(),
                results: None,
            }
        } else {
            Self::Error {
                status: status.as_u16(),
                title: status.canonical_reason().map(str::to_owned),
            }
        }
    }

    pub fn success(results: Value) -> Self {
        Self::Success {
            status: StatusCode::OK.as_u16(),
            results: Some(results),
        }
    }

    pub fn status(&self) -> u16 {
        match *self {
            Self::Success { status, .. } | Self::Error { status, .. } => status,
        }
    }
}

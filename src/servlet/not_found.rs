use super::handler::NotFoundHandler;
use super::response::{MimeType, Output, StatusCode};
use super::status::StatusObject;

const NOT_FOUND_TEXT: &str = "404 Not Found";

/// Answers unmatched requests with a plain-text body.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNotFoundHandler;

impl NotFoundHandler for TextNotFoundHandler {
    fn do_get(&self) -> Output {
        Output::text(NOT_FOUND_TEXT)
    }

    fn do_post(&self) -> Output {
        Output::text(NOT_FOUND_TEXT)
    }
}

/// Answers unmatched requests with a JSON error status object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonNotFoundHandler;

impl JsonNotFoundHandler {
    fn output() -> Output {
        Output::json(&StatusObject::of(StatusCode::NOT_FOUND)).unwrap_or_else(|_| Output::Text {
            content: r#"{"type":"error","status":404,"title":"Not Found"}"#.to_owned(),
            mime: MimeType::Json,
        })
    }
}

impl NotFoundHandler for JsonNotFoundHandler {
    fn do_get(&self) -> Output {
        Self::output()
    }

    fn do_post(&self) -> Output {
        Self::output()
    }
}

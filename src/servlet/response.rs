use crate::error::{Error, Result};

use std::fmt::{self, Display};

pub use http::StatusCode;
use serde::Serialize;

/// Buffer family a response writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Html,
}

/// Mime type of the text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    Text,
    Json,
    Csv,
    JavaScript,
    Xml,
}

impl Default for MimeType {
    fn default() -> Self {
        Self::Text
    }
}

impl MimeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::JavaScript => "application/javascript",
            Self::Xml => "application/xml",
        }
    }
}

impl Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a dispatch hands back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Text { content: String, mime: MimeType },
    Html { content: String },
    Redirect { location: String },
}

impl Output {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            mime: MimeType::Text,
        }
    }

    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Text {
            content: serde_json::to_string(value)?,
            mime: MimeType::Json,
        })
    }

    pub fn html(content: impl Into<String>) -> Self {
        Self::Html {
            content: content.into(),
        }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
        }
    }

    /// An empty text output.
    pub fn ack() -> Self {
        Self::text("")
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Text { content, .. } | Self::Html { content } => content,
            Self::Redirect { location } => location,
        }
    }

    pub fn mime(&self) -> Option<MimeType> {
        match self {
            Self::Text { mime, .. } => Some(*mime),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct TextBuffer {
    content: String,
    mime: MimeType,
}

/// Response state of one in-flight request.
///
/// A response is open until [`Response::end`] (or a redirect) commits it.
/// Committing cannot be undone: `send` then fails and `json` does nothing.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    committed: bool,
    active: ContentType,
    output: ContentType,
    text: TextBuffer,
    html: Option<String>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            committed: false,
            active: ContentType::Text,
            output: ContentType::Text,
            text: TextBuffer::default(),
            html: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn content_type(&mut self, kind: ContentType) -> &mut Self {
        self.active = kind;
        self.output = kind;
        if kind == ContentType::Html && self.html.is_none() {
            self.html = Some(String::new());
        }
        self
    }

    pub fn mime(&mut self, mime: MimeType) -> &mut Self {
        self.text.mime = mime;
        self
    }

    /// Appends `body` to the active buffer.
    pub fn send(&mut self, body: impl Display, status: Option<StatusCode>) -> Result<&mut Self> {
        if self.committed {
            return Err(Error::AlreadyCommitted);
        }
        if let Some(status) = status {
            self.status = status;
        }

        let content = body.to_string();
        match self.active {
            ContentType::Text => self.text.content.push_str(&content),
            ContentType::Html => self.html.get_or_insert_with(String::new).push_str(&content),
        }
        self.output = self.active;
        Ok(self)
    }

    /// Serializes `body` into the text buffer as JSON. Does nothing once the
    /// response is committed.
    pub fn json<T: Serialize + ?Sized>(
        &mut self,
        body: &T,
        status: Option<StatusCode>,
    ) -> Result<&mut Self> {
        if self.committed {
            return Ok(self);
        }
        let content = serde_json::to_string(body)?;
        if let Some(status) = status {
            self.status = status;
        }
        self.mime(MimeType::Json);
        self.text.content.push_str(&content);
        self.output = ContentType::Text;
        Ok(self)
    }

    /// Writes `url` as a temporary redirect and commits.
    ///
    /// The url is appended to the text buffer, so anything already sent
    /// becomes part of the redirect target.
    pub fn redirect(&mut self, url: &str) -> Result<()> {
        self.status = StatusCode::TEMPORARY_REDIRECT;
        self.content_type(ContentType::Text).send(url, None)?.end();
        Ok(())
    }

    pub fn end(&mut self) {
        self.committed = true;
    }

    /// Content of the buffer that would be returned.
    pub fn content(&self) -> &str {
        match self.output {
            ContentType::Text => &self.text.content,
            ContentType::Html => self.html.as_deref().unwrap_or(""),
        }
    }

    pub fn into_output(self) -> Output {
        match self.output {
            ContentType::Text => Output::Text {
                content: self.text.content,
                mime: self.text.mime,
            },
            ContentType::Html => Output::Html {
                content: self.html.unwrap_or_default(),
            },
        }
    }
}

use super::error::RouterError;
use super::params::Params;

use std::fmt;

use regex::Regex;

const STAR: char = '*';
const COLON: char = ':';
const SLASH: char = '/';
const OPTIONAL: char = '?';
const DOT: char = '.';

/// Name bound by a `*` segment.
pub const WILDCARD_KEY: &str = "wild";

/// A route pattern as written by the user: a path template such as
/// `/api/:resource/:id?` or a raw regular expression.
#[derive(Clone)]
pub enum Pattern {
    Template(String),
    Regex(Regex),
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Self::Template(s.to_owned())
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Self::Template(s)
    }
}

impl From<Regex> for Pattern {
    fn from(r: Regex) -> Self {
        Self::Regex(r)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(s) => f.debug_tuple("Template").field(s).finish(),
            Self::Regex(r) => f.debug_tuple("Regex").field(&r.as_str()).finish(),
        }
    }
}

/// Compiled form of a [`Pattern`].
///
/// Templates compile to a case-insensitive regex plus the parameter names in
/// declaration order, one per capture group. Raw regexes keep no names and
/// report their named groups instead.
#[derive(Debug, Clone)]
pub struct Matcher {
    keys: Option<Vec<Box<str>>>,
    regex: Regex,
}

impl Matcher {
    /// `loose` accepts any suffix after a segment boundary, for prefix-style
    /// middleware; otherwise only an optional trailing slash is allowed.
    pub fn compile(pattern: &Pattern, loose: bool) -> Result<Self, RouterError> {
        match pattern {
            Pattern::Regex(regex) => Ok(Self {
                keys: None,
                regex: regex.clone(),
            }),
            Pattern::Template(template) => {
                let (keys, source) = parse_template(template, loose);
                let regex = Regex::new(&source).map_err(|e| RouterError::pattern(template, e))?;
                Ok(Self {
                    keys: Some(keys),
                    regex,
                })
            }
        }
    }

    /// Declared parameter names; empty for raw regexes and literal templates.
    pub fn keys(&self) -> &[Box<str>] {
        self.keys.as_deref().unwrap_or(&[])
    }

    pub fn is_raw(&self) -> bool {
        self.keys.is_none()
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn captures(&self, path: &str) -> Option<Params> {
        let mut params = Params::new();
        if self.capture_into(path, &mut params) {
            Some(params)
        } else {
            None
        }
    }

    /// Tests `path` and, on a match, binds the captured values into `params`,
    /// overwriting values already bound under the same names.
    pub fn capture_into(&self, path: &str, params: &mut Params) -> bool {
        let keys = match self.keys {
            None => {
                let caps = match self.regex.captures(path) {
                    Some(c) => c,
                    None => return false,
                };
                for name in self.regex.capture_names().flatten() {
                    params.insert(name, caps.name(name).map(|m| m.as_str().to_owned()));
                }
                return true;
            }
            Some(ref keys) if keys.is_empty() => return self.regex.is_match(path),
            Some(ref keys) => keys,
        };

        let caps = match self.regex.captures(path) {
            Some(c) => c,
            None => return false,
        };
        for (i, key) in keys.iter().enumerate() {
            params.insert(key, caps.get(i + 1).map(|m| m.as_str().to_owned()));
        }
        true
    }
}

fn parse_template(template: &str, loose: bool) -> (Vec<Box<str>>, String) {
    let mut keys: Vec<Box<str>> = Vec::new();
    let mut source = String::from("(?i)^");

    let mut parts = template.split(SLASH).peekable();
    if parts.peek() == Some(&"") {
        parts.next();
    }

    // an empty segment ends the template
    for part in parts.take_while(|p| !p.is_empty()) {
        if part.starts_with(STAR) {
            keys.push(WILDCARD_KEY.into());
            source.push_str("/(.*)");
        } else if let Some(rest) = part.strip_prefix(COLON) {
            let end = rest.find(|c: char| c == OPTIONAL || c == DOT).unwrap_or(rest.len());
            let optional = rest.contains(OPTIONAL);
            let ext: Option<String> = rest.find(DOT).map(|i| rest[i..].replace(OPTIONAL, ""));

            keys.push(rest[..end].into());
            match ext {
                None if optional => source.push_str("(?:/([^/]+?))?"),
                None => source.push_str("/([^/]+?)"),
                Some(ext) => {
                    source.push_str("/([^/]+?)");
                    source.push_str("(?:");
                    source.push_str(&regex::escape(&ext));
                    source.push(')');
                    if optional {
                        source.push(OPTIONAL);
                    }
                }
            }
        } else {
            source.push(SLASH);
            source.push_str(&regex::escape(part));
        }
    }

    source.push_str(if loose { "(?:$|/)" } else { "/?$" });
    (keys, source)
}

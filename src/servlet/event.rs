use std::borrow::Cow;
use std::collections::HashMap;

use serde::Deserialize;

/// The raw inbound call as handed over by the host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestEvent {
    pub query_string: Option<String>,
    /// First value of every query/form parameter.
    pub parameter: HashMap<String, String>,
    /// Every value of every query/form parameter.
    pub parameters: HashMap<String, Vec<String>>,
    pub context_path: String,
    pub content_length: i64,
    pub post_data: Option<PostData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostData {
    pub length: i64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub contents: String,
    pub name: String,
}

impl RequestEvent {
    /// Builds an event from a raw `a=1&b=2` query string.
    pub fn from_query(query: &str, post_data: Option<PostData>) -> Self {
        let mut parameter: HashMap<String, String> = HashMap::new();
        let mut parameters: HashMap<String, Vec<String>> = HashMap::new();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (k, v) = match pair.find('=') {
                Some(i) => (&pair[..i], &pair[i + 1..]),
                None => (pair, ""),
            };
            let (k, v) = (decode(k), decode(v));
            parameter.entry(k.clone()).or_insert_with(|| v.clone());
            parameters.entry(k).or_insert_with(Vec::new).push(v);
        }

        let content_length = post_data.as_ref().map_or(-1, |p| p.length);

        Self {
            query_string: Some(query.to_owned()),
            parameter,
            parameters,
            context_path: String::new(),
            content_length,
            post_data,
        }
    }

    /// Shorthand for an event carrying only a `url` parameter.
    pub fn with_url(url: &str) -> Self {
        let mut event = Self::default();
        event.parameter.insert("url".into(), url.into());
        event.parameters.insert("url".into(), vec![url.into()]);
        event
    }
}

impl PostData {
    pub fn new(content_type: &str, contents: &str) -> Self {
        Self {
            length: contents.len() as i64,
            content_type: content_type.to_owned(),
            contents: contents.to_owned(),
            name: "postData".to_owned(),
        }
    }
}

fn decode(s: &str) -> String {
    let plus = s.replace('+', " ");
    let decoded = urlencoding::decode(&plus).map(Cow::into_owned);
    match decoded {
        Ok(d) => d,
        Err(_) => plus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parsing() {
        let e = RequestEvent::from_query("url=%2Fapi%2Fv1%2Fusers&tag=a&tag=b+c&flag", None);
        assert_eq!(e.parameter["url"], "/api/v1/users");
        assert_eq!(e.parameter["tag"], "a");
        assert_eq!(e.parameters["tag"], ["a", "b c"]);
        assert_eq!(e.parameter["flag"], "");
        assert_eq!(e.content_length, -1);
    }

    #[test]
    fn host_json_shape() {
        let e: RequestEvent = serde_json::from_str(
            r#"{
                "queryString": "url=/echo",
                "parameter": {"url": "/echo"},
                "parameters": {"url": ["/echo"]},
                "contextPath": "",
                "contentLength": 13,
                "postData": {"length": 13, "type": "application/json", "contents": "{\"a\":1}", "name": "postData"}
            }"#,
        )
        .unwrap();
        assert_eq!(e.parameter["url"], "/echo");
        assert_eq!(e.post_data.unwrap().content_type, "application/json");
    }
}

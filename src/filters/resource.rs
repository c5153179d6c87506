use super::from_param;
use crate::error::Result;
use crate::servlet::{Filter, Param, Request, Response};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

static SPREADSHEET_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)spreadsheets/d/(?P<id>[a-zA-Z0-9_-]+)")
        .expect("spreadsheet id regex should be valid")
});

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    resources: Vec<ResourceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResourceRecord {
    name: String,
    sheet: String,
    url: String,
}

/// Maps the matched `resource` route parameter to its backing sheet.
///
/// Params: `resources: [{name, sheet, url}]`. On a match the `resource`
/// parameter is replaced by the sheet name and `spreadsheetId` is added.
#[derive(Debug, Default)]
pub struct ResourceMapper {
    resources: Vec<ResourceRecord>,
}

fn spreadsheet_id(url: &str) -> Option<&str> {
    SPREADSHEET_ID.captures(url)?.name("id").map(|m| m.as_str())
}

impl ResourceMapper {
    fn map(&self, req: &mut Request) {
        let params = match req.var.route_params_mut() {
            Some(p) => p,
            None => return,
        };
        let record = match params.get("resource") {
            Some(name) => self.resources.iter().find(|r| r.name.eq_ignore_ascii_case(name)),
            None => return,
        };

        match record {
            Some(rec) => {
                params.insert("resource", Some(rec.sheet.clone()));
                if let Some(id) = spreadsheet_id(&rec.url) {
                    params.insert("spreadsheetId", Some(id.to_owned()));
                }
            }
            None => debug!("resource is not mapped"),
        }
    }
}

impl Filter for ResourceMapper {
    fn init(&mut self, param: &Param) -> Result<()> {
        let settings: Settings = from_param("ResourceMapper", param)?;
        self.resources = settings.resources;
        Ok(())
    }

    fn do_filter(&mut self, _req: &mut Request, _res: &mut Response) -> Result<()> {
        Ok(())
    }

    fn before_get(&mut self, req: &mut Request, _res: &mut Response) -> Result<()> {
        self.map(req);
        Ok(())
    }

    fn before_post(&mut self, req: &mut Request, _res: &mut Response) -> Result<()> {
        self.map(req);
        Ok(())
    }
}

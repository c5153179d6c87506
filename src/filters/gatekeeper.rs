use super::{from_param, split_roles};
use crate::error::Result;
use crate::servlet::{Filter, Identity, Param, Request, Response, StatusCode, StatusObject};

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::info;

static API_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^/api/v1/(?P<action>create|update|delete)?/?(?P<resource>[^\s/]{2,36})/?(?P<id>[^\s/]{2,36})?(/|$)",
    )
    .expect("api path regex should be valid")
});

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Settings {
    default_role: Option<String>,
    identities: Vec<IdentityRecord>,
    rules: Vec<RuleRecord>,
}

#[derive(Debug, Deserialize)]
struct IdentityRecord {
    token: String,
    roles: String,
}

#[derive(Debug, Deserialize)]
struct RuleRecord {
    rule: String,
    roles: String,
}

/// Token authentication and role-based authorization for `/api/v1` paths.
///
/// A request carries its token in the `token` parameter. Requests without
/// one fall back to `defaultRole` when configured. An unknown caller gets
/// `401`; a caller whose roles do not allow `{resource}.{action}` gets `403`.
#[derive(Debug, Default)]
pub struct Gatekeeper {
    default_role: Option<String>,
    identities: HashMap<String, Vec<String>>,
    acl: HashMap<String, HashSet<String>>,
}

impl Gatekeeper {
    fn identify(&self, token: Option<&str>) -> Option<Identity> {
        match token.filter(|t| !t.is_empty()) {
            Some(token) => self.identities.get(token).map(|roles| Identity {
                token: Some(token.to_owned()),
                roles: roles.clone(),
            }),
            None => self.default_role.as_ref().map(|role| Identity {
                token: None,
                roles: vec![role.clone()],
            }),
        }
    }

    fn is_allowed(&self, permission: &str, role: &str) -> bool {
        self.acl.get(permission).map_or(false, |roles| roles.contains(role))
    }

    /// The permission a URL requires, or `None` outside the API.
    fn permission(url: &str) -> Option<String> {
        let caps = API_PATH.captures(url)?;
        let action = caps.name("action").map_or("read", |m| m.as_str());
        let resource = caps.name("resource")?.as_str();
        Some(format!("{}.{}", resource, action).to_lowercase())
    }

    fn reject(res: &mut Response, status: StatusCode) -> Result<()> {
        res.json(&StatusObject::of(status), Some(status))?.end();
        Ok(())
    }
}

impl Filter for Gatekeeper {
    fn init(&mut self, param: &Param) -> Result<()> {
        let settings: Settings = from_param("Gatekeeper", param)?;

        self.default_role = settings
            .default_role
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty());

        self.identities = settings
            .identities
            .into_iter()
            .map(|id| (id.token, split_roles(&id.roles).collect()))
            .collect();

        self.acl.clear();
        for rule in settings.rules {
            let roles = self
                .acl
                .entry(rule.rule.trim().to_lowercase())
                .or_insert_with(HashSet::new);
            roles.extend(split_roles(&rule.roles));
        }
        Ok(())
    }

    fn do_filter(&mut self, req: &mut Request, res: &mut Response) -> Result<()> {
        let token = req.param.get("token").map(String::as_str);
        let identity = match self.identify(token) {
            Some(id) => id,
            None => {
                info!(token = token.unwrap_or(""), "token is invalid");
                return Self::reject(res, StatusCode::UNAUTHORIZED);
            }
        };

        let authorized = Self::permission(&req.url).map_or(false, |permission| {
            identity.roles.iter().any(|role| self.is_allowed(&permission, role))
        });
        if !authorized {
            info!(url = %req.url, roles = ?identity.roles, "access denied");
            return Self::reject(res, StatusCode::FORBIDDEN);
        }

        req.var.identity = Some(identity);
        Ok(())
    }
}

//! Named-route export in the shape Ziggy's `route()` helper reads.

use std::collections::BTreeMap;

use axum::http::{header::HOST, HeaderMap, Method};
use serde::Serialize;

use super::{escape_script_json, RenderError};

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Scheme, host and port of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    pub protocol: String,
    pub domain: String,
    pub port: Option<u16>,
}

impl BaseUrl {
    /// Derives the base URL from `Host` and `X-Forwarded-Proto`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let protocol = headers
            .get(X_FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "http".to_string());

        let host = headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");

        let (domain, port) = match host.rsplit_once(':') {
            Some((domain, port)) => match port.parse::<u16>() {
                Ok(port) if port > 0 => (domain.to_string(), Some(port)),
                _ => (domain.to_string(), None),
            },
            None => (host.to_string(), None),
        };

        Self {
            protocol,
            domain,
            port,
        }
    }

    pub fn url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.protocol, self.domain, port),
            None => format!("{}://{}", self.protocol, self.domain),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub uri: String,
    pub methods: Vec<String>,
    /// Host the route is bound to; `null` for routes on any host.
    pub domain: Option<String>,
}

#[derive(Debug, Serialize)]
struct Ziggy<'a> {
    url: String,
    port: Option<u16>,
    domain: &'a str,
    protocol: &'a str,
    group: &'a str,
    routes: &'a BTreeMap<String, RouteEntry>,
}

/// Server routes exposed to the client by name.
///
/// axum doesn't expose its route table, so routes are registered here
/// alongside the router.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    group: String,
    routes: BTreeMap<String, RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RouteTable::add`].
    pub fn route(mut self, name: &str, uri: &str, method: Method) -> Self {
        self.add(name, uri, method);
        self
    }

    /// Names the route group the client helper filters on.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Binds an already registered route to `domain`.
    pub fn with_domain(mut self, name: &str, domain: &str) -> Self {
        match self.routes.get_mut(name) {
            Some(entry) => entry.domain = Some(domain.to_string()),
            None => tracing::warn!(name, domain, "Domain set for unregistered route"),
        }
        self
    }

    /// Registers `method` for the named route. Re-registering a name adds the
    /// method to the existing entry; the first URI wins.
    pub fn add(&mut self, name: &str, uri: &str, method: Method) {
        if name.is_empty() {
            tracing::debug!(uri, "Skipping unnamed route");
            return;
        }

        let method = method.as_str().to_string();
        let entry = self
            .routes
            .entry(name.to_string())
            .or_insert_with(|| RouteEntry {
                uri: uri.to_string(),
                methods: Vec::new(),
                domain: None,
            });
        if !entry.methods.contains(&method) {
            entry.methods.push(method);
        }
    }

    pub fn get(&self, name: &str) -> Option<&RouteEntry> {
        self.routes.get(name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Ziggy JSON for `base`.
    pub fn to_json(&self, base: &BaseUrl) -> Result<String, RenderError> {
        let ziggy = Ziggy {
            url: base.url(),
            port: base.port,
            domain: &base.domain,
            protocol: &base.protocol,
            group: &self.group,
            routes: &self.routes,
        };
        serde_json::to_string(&ziggy).map_err(RenderError::Routes)
    }

    /// `<script>` defining the global `Ziggy` object.
    pub fn script(&self, base: &BaseUrl) -> Result<String, RenderError> {
        let json = self.to_json(base)?;
        Ok(format!("<script>const Ziggy = {};</script>", escape_script_json(&json)))
    }
}

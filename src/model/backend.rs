//! Backend abstraction.
//!
//! # Responsibilities
//! - Describe one upstream target (url pattern, hosts, method, encoding)
//! - Shape its response (mapping, blacklist/whitelist, group, target)
//! - Carry plugin settings in `extra_config`
//! - Accumulate request/response modifiers into the modifier namespace
//!
//! # Design Decisions
//! - Method and encoding are validated on every assignment
//! - Several hosts mean client-side load balancing by the gateway
//! - Blacklist and whitelist are independent; setting both is left to the caller

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::model::extension::{self, namespace, ExtraConfig};
use crate::model::modifiers::{ModifierChain, ModifierEntry, ModifierLayout};
use crate::model::types::GeneratorResult;
use crate::model::vocabulary::{BackendEncoding, Method, Scope};

/// A single upstream target of an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Backend {
    #[serde(rename = "url_pattern")]
    uri: String,

    method: Method,

    encoding: BackendEncoding,

    host: Vec<String>,

    /// Fields removed from the response.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    blacklist: Vec<String>,

    /// The only fields kept in the response.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    whitelist: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    group: String,

    /// Renames response fields (old name → new name).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    mapping: BTreeMap<String, String>,

    /// Captures only this section of the response.
    #[serde(skip_serializing_if = "String::is_empty")]
    target: String,

    /// The response root is an array; the gateway wraps it under `collection`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_collection: bool,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    extra_config: ExtraConfig,

    #[serde(skip)]
    modifiers: ModifierChain,

    #[serde(skip)]
    modifier_layout: ModifierLayout,
}

impl Backend {
    /// Create a backend, rejecting methods and encodings outside their sets.
    pub fn new(
        method: &str,
        host: impl Into<String>,
        uri: impl Into<String>,
        encoding: &str,
    ) -> GeneratorResult<Self> {
        let method = method.parse::<Method>()?;
        let encoding = encoding.parse::<BackendEncoding>()?;
        Ok(Self {
            uri: uri.into(),
            method,
            encoding,
            host: vec![host.into()],
            blacklist: Vec::new(),
            whitelist: Vec::new(),
            group: String::new(),
            mapping: BTreeMap::new(),
            target: String::new(),
            is_collection: false,
            extra_config: ExtraConfig::new(),
            modifiers: ModifierChain::Empty,
            modifier_layout: ModifierLayout::Compatible,
        })
    }

    /// Backend whose responses are proxied untouched.
    pub fn no_op(method: &str, host: impl Into<String>, uri: impl Into<String>) -> GeneratorResult<Self> {
        Self::new(method, host, uri, BackendEncoding::NoOp.as_str())
    }

    pub fn json(method: &str, host: impl Into<String>, uri: impl Into<String>) -> GeneratorResult<Self> {
        Self::new(method, host, uri, BackendEncoding::Json.as_str())
    }

    pub fn xml(method: &str, host: impl Into<String>, uri: impl Into<String>) -> GeneratorResult<Self> {
        Self::new(method, host, uri, BackendEncoding::Xml.as_str())
    }

    pub fn rss(method: &str, host: impl Into<String>, uri: impl Into<String>) -> GeneratorResult<Self> {
        Self::new(method, host, uri, BackendEncoding::Rss.as_str())
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn encoding(&self) -> BackendEncoding {
        self.encoding
    }

    pub fn hosts(&self) -> &[String] {
        &self.host
    }

    pub fn blacklist(&self) -> &[String] {
        &self.blacklist
    }

    pub fn whitelist(&self) -> &[String] {
        &self.whitelist
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn mapping(&self) -> &BTreeMap<String, String> {
        &self.mapping
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_collection(&self) -> bool {
        self.is_collection
    }

    pub fn extra_config(&self) -> &ExtraConfig {
        &self.extra_config
    }

    pub fn modifiers(&self) -> &ModifierChain {
        &self.modifiers
    }

    pub fn set_encoding(&mut self, encoding: &str) -> GeneratorResult<&mut Self> {
        self.encoding = encoding.parse()?;
        Ok(self)
    }

    pub fn set_method(&mut self, method: &str) -> GeneratorResult<&mut Self> {
        self.method = method.parse()?;
        Ok(self)
    }

    /// Append hosts to the pool the gateway balances across.
    pub fn add_host<I, S>(&mut self, hosts: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.host.extend(hosts.into_iter().map(Into::into));
        self
    }

    /// Rename the response field `from` to `to`.
    pub fn add_mapping(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.mapping.insert(from.into(), to.into());
        self
    }

    /// Replace the list of response fields to drop.
    pub fn set_blacklist<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist = items.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the list of response fields to keep.
    pub fn set_whitelist<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_group(&mut self, group: impl Into<String>) -> &mut Self {
        self.group = group.into();
        self
    }

    pub fn set_target(&mut self, target: impl Into<String>) -> &mut Self {
        self.target = target.into();
        self
    }

    pub fn set_collection(&mut self, is_collection: bool) -> &mut Self {
        self.is_collection = is_collection;
        self
    }

    /// Store `config` under the `name` namespace, replacing any prior payload.
    pub fn set_config(&mut self, name: &str, config: Value) -> &mut Self {
        extension::upsert(&mut self.extra_config, name, config);
        self
    }

    /// Cache backend responses. Increases memory usage considerably.
    pub fn enable_cache(&mut self) -> &mut Self {
        self.set_config(namespace::HTTP_CACHE, json!({}))
    }

    /// Send traffic to this backend but discard its response.
    pub fn shadow_enabled(&mut self) -> &mut Self {
        self.set_config(namespace::PROXY, json!({ "shadow": true }))
    }

    /// Take failing hosts out of rotation.
    pub fn circuit_breaker(
        &mut self,
        interval: i64,
        timeout: i64,
        max_errors: i64,
        log_status_change: bool,
    ) -> &mut Self {
        self.set_config(
            namespace::CIRCUIT_BREAKER,
            json!({
                "interval": interval,
                "timeout": timeout,
                "maxErrors": max_errors,
                "logStatusChange": log_status_change,
            }),
        )
    }

    /// Choose how accumulated modifiers are emitted. Applies from the next modifier on.
    pub fn set_modifier_layout(&mut self, layout: ModifierLayout) -> &mut Self {
        self.modifier_layout = layout;
        self
    }

    fn add_modifier(&mut self, entry: ModifierEntry) -> &mut Self {
        self.modifiers.add(entry);
        if let Some(rendered) = self.modifiers.render(self.modifier_layout) {
            self.set_config(namespace::MARTIAN, rendered);
        }
        self
    }

    /// Drop headers from the backend response.
    pub fn remove_response_headers<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut params = Map::new();
        params.insert("names".to_string(), json!(names));
        self.add_modifier(ModifierEntry::new("header.Blacklist", vec![Scope::Response], params))
    }

    /// Set a header on the request to the backend, and optionally on its response.
    pub fn inject_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        also_to_response: bool,
    ) -> &mut Self {
        let mut scope = vec![Scope::Request];
        if also_to_response {
            scope.push(Scope::Response);
        }
        let mut params = Map::new();
        params.insert("name".to_string(), Value::String(name.into()));
        params.insert("value".to_string(), Value::String(value.into()));
        self.add_modifier(ModifierEntry::new("header.Modifier", scope, params))
    }

    /// Authenticate backend calls with a bearer token.
    pub fn bearer_auth(&mut self, token: &str) -> &mut Self {
        let token = token.replacen("Bearer ", "", 1);
        self.inject_header("Authorization", format!("Bearer {}", token), false)
    }

    /// Authenticate backend calls with HTTP basic credentials.
    pub fn basic_auth(&mut self, username: &str, password: &str) -> &mut Self {
        let token = STANDARD.encode(format!("{}:{}", username, password));
        self.inject_header("Authorization", format!("Basic {}", token), false)
    }
}

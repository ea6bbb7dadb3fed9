//! Endpoint definitions.
//!
//! An endpoint is one route exposed by the gateway. It owns copies of the
//! backends it aggregates: attaching a backend clones it, so later changes to
//! the caller's backend never reach the endpoint.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::model::auth::JwsValidator;
use crate::model::backend::Backend;
use crate::model::extension::{self, namespace, ExtraConfig};
use crate::model::types::{GeneratorError, GeneratorResult};
use crate::model::vocabulary::{EndpointEncoding, Method};

/// Headers forwarded to backends unless told otherwise.
pub const DEFAULT_HEADERS: &[&str] = &[
    "Accept-Encoding",
    "Host",
    "User-Agent",
    "X-Forwarded-For",
    "Content-Type",
    "Cache-Control",
    "Connection",
];

/// Marker that forwards every query string or header.
pub const PASS_ALL: &str = "*";

/// A route in the gateway backed by one or more backends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    #[serde(rename = "endpoint")]
    uri: String,

    method: Method,

    #[serde(rename = "output_encoding")]
    encoding: EndpointEncoding,

    /// Query strings forwarded to the backends.
    #[serde(rename = "querystring_params", skip_serializing_if = "Vec::is_empty")]
    query_strings: Vec<String>,

    /// Client headers forwarded to the backends. Adding "Cookie" forwards cookies too.
    #[serde(rename = "headers_to_pass", skip_serializing_if = "Vec::is_empty")]
    headers: Vec<String>,

    /// Parallel calls per backend request. Faster responses, more backend load.
    #[serde(skip_serializing_if = "Option::is_none")]
    concurrent_calls: Option<u32>,

    backend: Vec<Backend>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    extra_config: ExtraConfig,
}

impl Endpoint {
    /// Create an endpoint holding copies of `backends`.
    pub fn new<'a, I>(method: &str, uri: impl Into<String>, encoding: &str, backends: I) -> GeneratorResult<Self>
    where
        I: IntoIterator<Item = &'a Backend>,
    {
        let method = method.parse::<Method>()?;
        let encoding = encoding.parse::<EndpointEncoding>()?;
        Ok(Self {
            uri: uri.into(),
            method,
            encoding,
            query_strings: Vec::new(),
            headers: DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect(),
            concurrent_calls: None,
            backend: backends.into_iter().cloned().collect(),
            extra_config: ExtraConfig::new(),
        })
    }

    /// Proxy-only endpoint.
    pub fn no_op<'a, I>(method: &str, uri: impl Into<String>, backends: I) -> GeneratorResult<Self>
    where
        I: IntoIterator<Item = &'a Backend>,
    {
        Self::new(method, uri, EndpointEncoding::NoOp.as_str(), backends)
    }

    pub fn json<'a, I>(method: &str, uri: impl Into<String>, backends: I) -> GeneratorResult<Self>
    where
        I: IntoIterator<Item = &'a Backend>,
    {
        Self::new(method, uri, EndpointEncoding::Json.as_str(), backends)
    }

    /// Endpoint whose output encoding follows the backend's.
    pub fn negotiate<'a, I>(method: &str, uri: impl Into<String>, backends: I) -> GeneratorResult<Self>
    where
        I: IntoIterator<Item = &'a Backend>,
    {
        Self::new(method, uri, EndpointEncoding::Negotiate.as_str(), backends)
    }

    pub fn string<'a, I>(method: &str, uri: impl Into<String>, backends: I) -> GeneratorResult<Self>
    where
        I: IntoIterator<Item = &'a Backend>,
    {
        Self::new(method, uri, EndpointEncoding::String.as_str(), backends)
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn encoding(&self) -> EndpointEncoding {
        self.encoding
    }

    pub fn query_strings(&self) -> &[String] {
        &self.query_strings
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn concurrent_calls(&self) -> Option<u32> {
        self.concurrent_calls
    }

    pub fn backends(&self) -> &[Backend] {
        &self.backend
    }

    pub fn extra_config(&self) -> &ExtraConfig {
        &self.extra_config
    }

    pub fn set_method(&mut self, method: &str) -> GeneratorResult<&mut Self> {
        self.method = method.parse()?;
        Ok(self)
    }

    pub fn set_encoding(&mut self, encoding: &str) -> GeneratorResult<&mut Self> {
        self.encoding = encoding.parse()?;
        Ok(self)
    }

    /// Call each backend `calls` times in parallel and keep the first answer.
    pub fn set_concurrent(&mut self, calls: u32) -> GeneratorResult<&mut Self> {
        if calls <= 1 {
            return Err(GeneratorError::InvalidArgument(
                "number of concurrent calls must be more than 1".to_string(),
            ));
        }
        self.concurrent_calls = Some(calls);
        Ok(self)
    }

    /// Call the backends one after another instead of in parallel.
    pub fn requests_are_sequential(&mut self) -> &mut Self {
        self.set_config(namespace::PROXY, json!({ "sequential": true }))
    }

    pub fn pass_query_string<I, S>(&mut self, query_strings: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query_strings.extend(query_strings.into_iter().map(Into::into));
        self
    }

    pub fn pass_all_query_strings(&mut self) -> &mut Self {
        self.query_strings = vec![PASS_ALL.to_string()];
        self
    }

    pub fn pass_header<I, S>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers.extend(headers.into_iter().map(Into::into));
        self
    }

    pub fn pass_all_headers(&mut self) -> &mut Self {
        self.headers = vec![PASS_ALL.to_string()];
        self
    }

    /// Store `config` under the `name` namespace, replacing any prior payload.
    pub fn set_config(&mut self, name: &str, config: Value) -> &mut Self {
        extension::upsert(&mut self.extra_config, name, config);
        self
    }

    /// Attach copies of further backends, after the existing ones.
    pub fn add_backend<'a, I>(&mut self, backends: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a Backend>,
    {
        self.backend.extend(backends.into_iter().cloned());
        self
    }

    /// Require a valid token, and one of `roles` or the validator's default roles.
    pub fn authenticate<I, S>(&mut self, validator: &JwsValidator, roles: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let exported = validator.export_with_roles(roles);
        self.set_config(namespace::JOSE_VALIDATOR, exported)
    }
}

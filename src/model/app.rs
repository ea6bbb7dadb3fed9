//! Root of the gateway document.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::model::endpoint::Endpoint;
use crate::model::extension::{self, namespace, ExtraConfig};
use crate::model::types::GeneratorResult;
use crate::output;

/// Service level settings plus every endpoint the gateway handles.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct App {
    /// Document format version.
    version: u32,

    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,

    /// Listening port. The gateway command line may override it.
    port: u16,

    /// Default timeout for every request, e.g. "3000ms".
    #[serde(skip_serializing_if = "String::is_empty")]
    timeout: String,

    /// Default cache TTL for every response.
    #[serde(skip_serializing_if = "String::is_empty")]
    cache_ttl: String,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    extra_config: ExtraConfig,

    endpoints: Vec<Endpoint>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway with CORS, logging and metrics enabled.
    pub fn default_gateway() -> Self {
        let mut app = Self {
            name: "Api Gateway".to_string(),
            port: 8080,
            timeout: "10s".to_string(),
            cache_ttl: "300s".to_string(),
            ..Self::default()
        };
        app.set_config(
            namespace::CORS,
            json!({
                "max_age": "12h",
                "allow_credentials": true,
                "allow_origins": ["http://localhost:8080"],
                "allow_methods": ["GET", "HEAD", "POST", "PUT", "DELETE", "OPTIONS", "PATCH"],
                "allow_headers": ["*"],
                "expose_headers": ["*"],
            }),
        )
        .set_config(
            namespace::GOLOGGING,
            json!({
                "format": "logstash",
                "level": "DEBUG",
                "prefix": "[KRAKEND]",
                "stdout": true,
                "syslog": true,
            }),
        )
        .set_config(namespace::LOGSTASH, json!({ "enabled": true }))
        .set_config(namespace::METRICS, json!({ "listen_address": "8081" }));
        app
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> &str {
        &self.timeout
    }

    pub fn cache_ttl(&self) -> &str {
        &self.cache_ttl
    }

    pub fn extra_config(&self) -> &ExtraConfig {
        &self.extra_config
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn set_version(&mut self, version: u32) -> &mut Self {
        self.version = version;
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    /// Default timeout for every request, e.g. "3000ms". Empty omits it.
    pub fn set_timeout(&mut self, timeout: impl Into<String>) -> &mut Self {
        self.timeout = timeout.into();
        self
    }

    pub fn set_cache_ttl(&mut self, cache_ttl: impl Into<String>) -> &mut Self {
        self.cache_ttl = cache_ttl.into();
        self
    }

    /// Store `config` under the `name` namespace, replacing any prior payload.
    pub fn set_config(&mut self, name: &str, config: serde_json::Value) -> &mut Self {
        extension::upsert(&mut self.extra_config, name, config);
        self
    }

    /// Attach copies of `endpoints`, after the existing ones.
    pub fn add_endpoints<'a, I>(&mut self, endpoints: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a Endpoint>,
    {
        self.endpoints.extend(endpoints.into_iter().cloned());
        self
    }

    /// Encode the document and write it to `path`, replacing any existing file.
    pub fn generate(&self, path: impl AsRef<Path>) -> GeneratorResult<()> {
        let path = path.as_ref();
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            for backend in endpoint.backends() {
                if !backend.blacklist().is_empty() && !backend.whitelist().is_empty() {
                    tracing::warn!(
                        endpoint = endpoint.uri(),
                        index,
                        url_pattern = backend.uri(),
                        "Backend sets both blacklist and whitelist"
                    );
                }
            }
        }

        let bytes = output::encode(self)?;
        output::persist(path, &bytes)?;

        tracing::info!(
            path = %path.display(),
            endpoints = self.endpoints.len(),
            bytes = bytes.len(),
            "Gateway configuration generated"
        );
        Ok(())
    }
}

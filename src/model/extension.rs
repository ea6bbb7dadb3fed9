//! Extension map carried by every entity.
//!
//! Gateway plugins read their settings from `extra_config`, keyed by a
//! namespace string. Payloads are opaque here: whatever a caller or a canned
//! helper stores is emitted as-is. Storing a namespace again replaces its
//! payload entirely.

use std::collections::BTreeMap;

use serde_json::Value;

/// Namespaces written by the canned helpers.
pub mod namespace {
    pub const HTTP_CACHE: &str = "github.com/devopsfaith/krakend-httpcache";
    pub const PROXY: &str = "github.com/devopsfaith/krakend/proxy";
    pub const CIRCUIT_BREAKER: &str = "github.com/devopsfaith/krakend-circuitbreaker/gobreaker";
    pub const MARTIAN: &str = "github.com/devopsfaith/krakend-martian";
    pub const RATE_LIMIT: &str = "github.com/devopsfaith/krakend-ratelimit/juju/router";
    pub const JOSE_VALIDATOR: &str = "github.com/devopsfaith/krakend-jose/validator";

    // The service-level plugins register under underscored keys.
    pub const CORS: &str = "github_com/devopsfaith/krakend-cors";
    pub const GOLOGGING: &str = "github_com/devopsfaith/krakend-gologging";
    pub const LOGSTASH: &str = "github_com/devopsfaith/krakend-logstash";
    pub const METRICS: &str = "github_com/devopsfaith/krakend-metrics";
}

/// Namespace → payload mapping, emitted with namespaces in sorted order.
pub type ExtraConfig = BTreeMap<String, Value>;

/// Store `payload` under `name`, replacing whatever was there.
pub(crate) fn upsert(extra: &mut ExtraConfig, name: &str, payload: Value) {
    if extra.insert(name.to_string(), payload).is_some() {
        tracing::debug!(namespace = name, "Replaced extension payload");
    }
}

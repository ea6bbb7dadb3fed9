//! Blueprint schema definitions.
//!
//! A blueprint is a TOML description of a whole gateway document. Every
//! table maps onto the builder operations of the model, so a blueprint goes
//! through the same validation and merge rules as hand-written code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root of a blueprint file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Blueprint {
    /// Service level settings.
    pub app: AppBlueprint,

    /// Endpoints in emission order.
    pub endpoints: Vec<EndpointBlueprint>,
}

/// Service level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppBlueprint {
    /// Start from the default gateway (CORS, logging, metrics).
    pub defaults: bool,

    pub version: u32,

    pub name: Option<String>,

    pub port: Option<u16>,

    pub timeout: Option<String>,

    pub cache_ttl: Option<String>,

    /// Extra namespaces, applied after the defaults.
    pub extra_config: BTreeMap<String, Value>,
}

impl Default for AppBlueprint {
    fn default() -> Self {
        Self {
            defaults: false,
            version: 2,
            name: None,
            port: None,
            timeout: None,
            cache_ttl: None,
            extra_config: BTreeMap::new(),
        }
    }
}

/// One gateway route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointBlueprint {
    pub endpoint: String,

    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default = "default_encoding")]
    pub output_encoding: String,

    #[serde(default)]
    pub querystring_params: Vec<String>,

    /// Headers forwarded on top of the default set.
    #[serde(default)]
    pub headers_to_pass: Vec<String>,

    #[serde(default)]
    pub pass_all_query_strings: bool,

    #[serde(default)]
    pub pass_all_headers: bool,

    pub concurrent_calls: Option<u32>,

    /// Call backends one after another.
    #[serde(default)]
    pub sequential: bool,

    pub rate_limit: Option<RateLimitBlueprint>,

    pub auth: Option<AuthBlueprint>,

    #[serde(default)]
    pub extra_config: BTreeMap<String, Value>,

    #[serde(default)]
    pub backend: Vec<BackendBlueprint>,
}

/// Rate limit table. Must match one of the supported shapes, see [`RateLimitShape`].
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RateLimitBlueprint {
    pub max_rate: Option<u64>,
    pub client_max_rate: Option<u64>,
    /// "ip" or "header".
    pub strategy: Option<String>,
    /// Header identifying the client when the strategy is "header".
    pub key: Option<String>,
}

/// Resolved rate limit variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitShape {
    Global(u64),
    ByIp(u64),
    ByHeader { header: String, max: u64 },
    ByIpAndGlobal { client: u64, global: u64 },
    ByHeaderAndGlobal { header: String, client: u64, global: u64 },
}

impl RateLimitBlueprint {
    /// The supported variant this table describes, if any.
    pub fn shape(&self) -> Option<RateLimitShape> {
        match (self.max_rate, self.client_max_rate, self.strategy.as_deref(), self.key.as_deref()) {
            (Some(max), None, None, None) => Some(RateLimitShape::Global(max)),
            (None, Some(client), Some("ip"), None) => Some(RateLimitShape::ByIp(client)),
            (None, Some(client), Some("header"), Some(key)) => Some(RateLimitShape::ByHeader {
                header: key.to_string(),
                max: client,
            }),
            (Some(global), Some(client), Some("ip"), None) => {
                Some(RateLimitShape::ByIpAndGlobal { client, global })
            }
            (Some(global), Some(client), Some("header"), Some(key)) => {
                Some(RateLimitShape::ByHeaderAndGlobal {
                    header: key.to_string(),
                    client,
                    global,
                })
            }
            _ => None,
        }
    }
}

/// Token validation for an endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthBlueprint {
    pub alg: String,

    pub jwk_url: String,

    /// Seconds to cache the key set.
    pub cache_duration: Option<u64>,

    #[serde(default)]
    pub audience: Vec<String>,

    #[serde(default)]
    pub issuer: Vec<String>,

    pub roles_key: Option<String>,

    /// Roles granted by the validator itself.
    #[serde(default)]
    pub default_roles: Vec<String>,

    /// Roles required on this endpoint, listed before the default roles.
    #[serde(default)]
    pub roles: Vec<String>,

    pub cookie_key: Option<String>,

    #[serde(default)]
    pub disable_jwk_security: bool,

    #[serde(default)]
    pub jwk_fingerprints: Vec<String>,

    #[serde(default)]
    pub cipher_suites: Vec<u16>,

    pub jwk_local_ca: Option<String>,
}

/// One upstream target.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendBlueprint {
    pub url_pattern: String,

    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default)]
    pub host: Vec<String>,

    #[serde(default)]
    pub blacklist: Vec<String>,

    #[serde(default)]
    pub whitelist: Vec<String>,

    pub group: Option<String>,

    #[serde(default)]
    pub mapping: BTreeMap<String, String>,

    pub target: Option<String>,

    #[serde(default)]
    pub is_collection: bool,

    /// Cache responses in memory.
    #[serde(default)]
    pub cache: bool,

    /// Mirror traffic and discard the response.
    #[serde(default)]
    pub shadow: bool,

    pub circuit_breaker: Option<CircuitBreakerBlueprint>,

    #[serde(default)]
    pub remove_response_headers: Vec<String>,

    /// Header injected into backend requests.
    ///
    /// `headers`, `bearer_token` and `basic_auth` all register the same
    /// `header.Modifier`, so at most one of them may be set, holding at most
    /// one header.
    #[serde(default)]
    pub headers: Vec<HeaderBlueprint>,

    pub bearer_token: Option<String>,

    pub basic_auth: Option<BasicAuthBlueprint>,

    /// Emit modifiers wrapped in a group even when there is only one.
    #[serde(default)]
    pub always_envelope_modifiers: bool,

    #[serde(default)]
    pub extra_config: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CircuitBreakerBlueprint {
    pub interval: i64,
    pub timeout: i64,
    pub max_errors: i64,
    #[serde(default)]
    pub log_status_change: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeaderBlueprint {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub also_response: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicAuthBlueprint {
    pub username: String,
    pub password: String,
}

impl BackendBlueprint {
    /// Number of settings that each register the `header.Modifier` modifier.
    pub fn header_modifier_sources(&self) -> usize {
        self.headers.len()
            + usize::from(self.bearer_token.is_some())
            + usize::from(self.basic_auth.is_some())
    }
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_encoding() -> String {
    "json".to_string()
}

//! Token validation policy for securing endpoints.
//!
//! # Responsibilities
//! - Hold a reusable signature validation policy (algorithm, JWKS location, claims)
//! - Export it into an endpoint's extension map with call-site roles
//!
//! # Design Decisions
//! - Only algorithms from the signature set are accepted, on creation and on `set_alg`
//! - Export always carries `alg`, `jwk-url` and `disable_jwk_security`; every other
//!   field only when it differs from its default

use serde_json::{json, Map, Value};

use crate::model::types::GeneratorResult;
use crate::model::vocabulary::Algorithm;

/// Signature based authentication policy.
#[derive(Debug, Clone, PartialEq)]
pub struct JwsValidator {
    alg: Algorithm,
    jwk_url: String,
    cache: bool,
    /// Seconds the key set is cached.
    cache_duration: u64,
    audience: Vec<String>,
    roles_key: String,
    /// Roles authorized on every endpoint using this validator.
    roles: Vec<String>,
    issuer: Vec<String>,
    cookie_key: String,
    disable_jwk_security: bool,
    jwk_fingerprints: Vec<String>,
    cipher_suites: Vec<u16>,
    jwk_local_ca: String,
}

impl JwsValidator {
    pub fn new(alg: &str, jwk_url: impl Into<String>) -> GeneratorResult<Self> {
        Ok(Self {
            alg: alg.parse()?,
            jwk_url: jwk_url.into(),
            cache: false,
            cache_duration: 0,
            audience: Vec::new(),
            roles_key: String::new(),
            roles: Vec::new(),
            issuer: Vec::new(),
            cookie_key: String::new(),
            disable_jwk_security: false,
            jwk_fingerprints: Vec::new(),
            cipher_suites: Vec::new(),
            jwk_local_ca: String::new(),
        })
    }

    pub fn alg(&self) -> Algorithm {
        self.alg
    }

    pub fn jwk_url(&self) -> &str {
        &self.jwk_url
    }

    pub fn set_alg(&mut self, alg: &str) -> GeneratorResult<&mut Self> {
        self.alg = alg.parse()?;
        Ok(self)
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.jwk_url = url.into();
        self
    }

    /// Cache the key set for `duration` seconds instead of fetching it per request.
    pub fn set_cache(&mut self, duration: u64) -> &mut Self {
        self.cache = true;
        self.cache_duration = duration;
        self
    }

    /// Replace the roles authorized on every endpoint.
    pub fn default_roles<I, S>(&mut self, roles: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = collect(roles);
        self
    }

    pub fn set_audience<I, S>(&mut self, audience: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audience = collect(audience);
        self
    }

    pub fn set_issuer<I, S>(&mut self, issuer: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issuer = collect(issuer);
        self
    }

    /// Claim holding the user's roles.
    pub fn set_roles_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.roles_key = key.into();
        self
    }

    /// Read the token from this cookie instead of the Authorization header.
    pub fn set_cookie_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.cookie_key = key.into();
        self
    }

    /// Allow fetching the key set over plain HTTP.
    pub fn set_disable_jwk_security(&mut self, disable: bool) -> &mut Self {
        self.disable_jwk_security = disable;
        self
    }

    pub fn set_jwk_fingerprints<I, S>(&mut self, fingerprints: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.jwk_fingerprints = collect(fingerprints);
        self
    }

    pub fn set_cipher_suites(&mut self, suites: impl IntoIterator<Item = u16>) -> &mut Self {
        self.cipher_suites = suites.into_iter().collect();
        self
    }

    pub fn set_jwk_local_ca(&mut self, path: impl Into<String>) -> &mut Self {
        self.jwk_local_ca = path.into();
        self
    }

    /// Payload for the validator namespace. Call-site `roles` come first,
    /// followed by the default roles.
    pub fn export_with_roles<I, S>(&self, roles: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Map::new();
        out.insert("alg".to_string(), json!(self.alg));
        out.insert("jwk-url".to_string(), json!(self.jwk_url));
        out.insert("disable_jwk_security".to_string(), json!(self.disable_jwk_security));

        if self.cache {
            out.insert("cache".to_string(), json!(true));
        }
        if self.cache_duration != 0 {
            out.insert("cache_duration".to_string(), json!(self.cache_duration));
        }
        if !self.audience.is_empty() {
            out.insert("audience".to_string(), json!(self.audience));
        }
        if !self.roles_key.is_empty() {
            out.insert("roles_key".to_string(), json!(self.roles_key));
        }

        let mut all_roles = collect(roles);
        all_roles.extend(self.roles.iter().cloned());
        if !all_roles.is_empty() {
            out.insert("roles".to_string(), json!(all_roles));
        }

        if !self.issuer.is_empty() {
            out.insert("issuer".to_string(), json!(self.issuer));
        }
        if !self.cookie_key.is_empty() {
            out.insert("cookie_key".to_string(), json!(self.cookie_key));
        }
        if !self.jwk_fingerprints.is_empty() {
            out.insert("jwk_fingerprints".to_string(), json!(self.jwk_fingerprints));
        }
        if !self.cipher_suites.is_empty() {
            out.insert("cipher_suites".to_string(), json!(self.cipher_suites));
        }
        if !self.jwk_local_ca.is_empty() {
            out.insert("jwk_local_ca".to_string(), json!(self.jwk_local_ca));
        }
        Value::Object(out)
    }
}

fn collect<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::GeneratorError;

    const JWKS: &str = "https://auth.example.com/.well-known/jwks.json";

    #[test]
    fn test_rejects_unknown_algorithm() {
        let err = JwsValidator::new("none", JWKS).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidEnumeration { kind: "alg", .. }));

        let mut v = JwsValidator::new("EdDSA", JWKS).unwrap();
        assert!(v.set_alg("HS1").is_err());
        assert_eq!(v.alg(), Algorithm::EdDsa);
        v.set_alg("ES512").unwrap();
        assert_eq!(v.alg(), Algorithm::Es512);
    }

    #[test]
    fn test_minimal_export() {
        let v = JwsValidator::new("RS256", JWKS).unwrap();
        assert_eq!(
            v.export_with_roles(Vec::<String>::new()),
            json!({"alg": "RS256", "jwk-url": JWKS, "disable_jwk_security": false})
        );
    }

    #[test]
    fn test_call_roles_precede_default_roles() {
        let mut v = JwsValidator::new("RS256", JWKS).unwrap();
        v.default_roles(["admin"]);
        assert_eq!(v.export_with_roles(["user"])["roles"], json!(["user", "admin"]));
        assert_eq!(v.export_with_roles(Vec::<&str>::new())["roles"], json!(["admin"]));
    }

    #[test]
    fn test_full_export() {
        let mut v = JwsValidator::new("HS512", JWKS).unwrap();
        v.set_cache(900)
            .set_audience(["api"])
            .set_issuer(["https://auth.example.com"])
            .set_roles_key("realm_roles")
            .set_cookie_key("session")
            .set_disable_jwk_security(true)
            .set_jwk_fingerprints(["abc="])
            .set_cipher_suites([49199, 49200])
            .set_jwk_local_ca("/etc/ca.pem");

        assert_eq!(
            v.export_with_roles(["ops"]),
            json!({
                "alg": "HS512",
                "jwk-url": JWKS,
                "disable_jwk_security": true,
                "cache": true,
                "cache_duration": 900,
                "audience": ["api"],
                "roles_key": "realm_roles",
                "roles": ["ops"],
                "issuer": ["https://auth.example.com"],
                "cookie_key": "session",
                "jwk_fingerprints": ["abc="],
                "cipher_suites": [49199, 49200],
                "jwk_local_ca": "/etc/ca.pem"
            })
        );
    }
}

//! Blueprint validation.
//!
//! # Responsibilities
//! - Check methods, encodings and algorithms against their vocabularies
//! - Check that hosts and key set locations are absolute URLs
//! - Reject blacklist and whitelist on the same backend
//! - Reject more than one injected header per backend, since they share one modifier
//! - Reject rate limit tables matching no supported shape
//! - Detect duplicate routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: Blueprint → Result<(), Vec<ValidationError>>
//! - Runs before any model object is built

use std::collections::HashSet;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{BackendBlueprint, Blueprint, EndpointBlueprint};
use crate::model::{Algorithm, BackendEncoding, EndpointEncoding, Method};

/// A semantic problem in a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("endpoint {endpoint}: {kind} {value:?} is not supported")]
    Unsupported {
        endpoint: String,
        kind: &'static str,
        value: String,
    },

    #[error("endpoint {endpoint}: backend {index} has no host")]
    MissingHost { endpoint: String, index: usize },

    #[error("endpoint {endpoint}: host {host:?} is not an absolute URL")]
    InvalidHost { endpoint: String, host: String },

    #[error("endpoint {endpoint}: backend {index} sets both blacklist and whitelist")]
    ConflictingFilters { endpoint: String, index: usize },

    #[error("endpoint {endpoint}: backend {index} sets {sources} injected headers; headers, bearer_token and basic_auth allow one in total")]
    ConflictingHeaders {
        endpoint: String,
        index: usize,
        sources: usize,
    },

    #[error("endpoint {endpoint}: concurrent_calls must be more than 1")]
    InvalidConcurrency { endpoint: String },

    #[error("endpoint {endpoint}: rate_limit matches no supported combination")]
    InvalidRateLimit { endpoint: String },

    #[error("endpoint {endpoint}: jwk_url {url:?} is not an absolute URL")]
    InvalidJwkUrl { endpoint: String, url: String },

    #[error("endpoint {method} {endpoint} is defined more than once")]
    DuplicateEndpoint { endpoint: String, method: String },
}

/// Validate a whole blueprint.
pub fn validate_blueprint(blueprint: &Blueprint) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut routes = HashSet::new();

    for endpoint in &blueprint.endpoints {
        if !routes.insert((endpoint.endpoint.as_str(), endpoint.method.as_str())) {
            errors.push(ValidationError::DuplicateEndpoint {
                endpoint: endpoint.endpoint.clone(),
                method: endpoint.method.clone(),
            });
        }
        validate_endpoint(endpoint, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_endpoint(endpoint: &EndpointBlueprint, errors: &mut Vec<ValidationError>) {
    let name = endpoint.endpoint.as_str();
    check_member::<Method>(name, "method", &endpoint.method, errors);
    check_member::<EndpointEncoding>(name, "endpoint encoding", &endpoint.output_encoding, errors);

    if matches!(endpoint.concurrent_calls, Some(calls) if calls <= 1) {
        errors.push(ValidationError::InvalidConcurrency {
            endpoint: name.to_string(),
        });
    }

    if let Some(limit) = &endpoint.rate_limit {
        if limit.shape().is_none() {
            errors.push(ValidationError::InvalidRateLimit {
                endpoint: name.to_string(),
            });
        }
    }

    if let Some(auth) = &endpoint.auth {
        check_member::<Algorithm>(name, "alg", &auth.alg, errors);
        if !is_absolute_url(&auth.jwk_url) {
            errors.push(ValidationError::InvalidJwkUrl {
                endpoint: name.to_string(),
                url: auth.jwk_url.clone(),
            });
        }
    }

    for (index, backend) in endpoint.backend.iter().enumerate() {
        validate_backend(name, index, backend, errors);
    }
}

fn validate_backend(
    endpoint: &str,
    index: usize,
    backend: &BackendBlueprint,
    errors: &mut Vec<ValidationError>,
) {
    check_member::<Method>(endpoint, "method", &backend.method, errors);
    check_member::<BackendEncoding>(endpoint, "backend encoding", &backend.encoding, errors);

    if backend.host.is_empty() {
        errors.push(ValidationError::MissingHost {
            endpoint: endpoint.to_string(),
            index,
        });
    }
    for host in &backend.host {
        if !is_absolute_url(host) {
            errors.push(ValidationError::InvalidHost {
                endpoint: endpoint.to_string(),
                host: host.clone(),
            });
        }
    }

    let sources = backend.header_modifier_sources();
    if sources > 1 {
        errors.push(ValidationError::ConflictingHeaders {
            endpoint: endpoint.to_string(),
            index,
            sources,
        });
    }

    if !backend.blacklist.is_empty() && !backend.whitelist.is_empty() {
        errors.push(ValidationError::ConflictingFilters {
            endpoint: endpoint.to_string(),
            index,
        });
    }
}

fn check_member<T: FromStr>(endpoint: &str, kind: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<T>().is_err() {
        errors.push(ValidationError::Unsupported {
            endpoint: endpoint.to_string(),
            kind,
            value: value.to_string(),
        });
    }
}

fn is_absolute_url(value: &str) -> bool {
    Url::parse(value).map(|url| url.has_host()).unwrap_or(false)
}

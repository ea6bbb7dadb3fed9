//! Turns a validated blueprint into a gateway document.
//!
//! Every blueprint field is applied through the public builder operations,
//! in a fixed order: backend modifiers follow the order remove headers,
//! injected headers, bearer token, basic auth.

use crate::config::schema::{
    AuthBlueprint, BackendBlueprint, Blueprint, EndpointBlueprint, RateLimitShape,
};
use crate::model::{
    App, Backend, Endpoint, GeneratorError, GeneratorResult, JwsValidator, ModifierLayout,
};

/// Build the App described by `blueprint`.
pub fn build_app(blueprint: &Blueprint) -> GeneratorResult<App> {
    let section = &blueprint.app;
    let mut app = if section.defaults {
        App::default_gateway()
    } else {
        App::new()
    };

    app.set_version(section.version);
    if let Some(name) = &section.name {
        app.set_name(name.as_str());
    }
    if let Some(port) = section.port {
        app.set_port(port);
    }
    if let Some(timeout) = &section.timeout {
        app.set_timeout(timeout.as_str());
    }
    if let Some(cache_ttl) = &section.cache_ttl {
        app.set_cache_ttl(cache_ttl.as_str());
    }
    for (name, config) in &section.extra_config {
        app.set_config(name, config.clone());
    }

    let endpoints = blueprint
        .endpoints
        .iter()
        .map(build_endpoint)
        .collect::<GeneratorResult<Vec<_>>>()?;
    app.add_endpoints(&endpoints);

    tracing::debug!(endpoints = endpoints.len(), "Blueprint built");
    Ok(app)
}

fn build_endpoint(blueprint: &EndpointBlueprint) -> GeneratorResult<Endpoint> {
    let backends = blueprint
        .backend
        .iter()
        .map(build_backend)
        .collect::<GeneratorResult<Vec<_>>>()?;

    let mut endpoint = Endpoint::new(
        &blueprint.method,
        blueprint.endpoint.as_str(),
        &blueprint.output_encoding,
        &backends,
    )?;

    endpoint
        .pass_query_string(&blueprint.querystring_params)
        .pass_header(&blueprint.headers_to_pass);
    if blueprint.pass_all_query_strings {
        endpoint.pass_all_query_strings();
    }
    if blueprint.pass_all_headers {
        endpoint.pass_all_headers();
    }
    if let Some(calls) = blueprint.concurrent_calls {
        endpoint.set_concurrent(calls)?;
    }
    if blueprint.sequential {
        endpoint.requests_are_sequential();
    }

    if let Some(limit) = &blueprint.rate_limit {
        let shape = limit.shape().ok_or_else(|| {
            GeneratorError::InvalidArgument(format!(
                "endpoint {}: unsupported rate_limit combination",
                blueprint.endpoint
            ))
        })?;
        match shape {
            RateLimitShape::Global(max) => endpoint.rate_limit_global(max),
            RateLimitShape::ByIp(max) => endpoint.rate_limit_by_ip(max),
            RateLimitShape::ByHeader { header, max } => endpoint.rate_limit_by_header(&header, max),
            RateLimitShape::ByIpAndGlobal { client, global } => {
                endpoint.rate_limit_by_ip_and_global(client, global)
            }
            RateLimitShape::ByHeaderAndGlobal {
                header,
                client,
                global,
            } => endpoint.rate_limit_by_header_and_global(&header, client, global),
        };
    }

    if let Some(auth) = &blueprint.auth {
        let validator = build_validator(auth)?;
        endpoint.authenticate(&validator, &auth.roles);
    }

    for (name, config) in &blueprint.extra_config {
        endpoint.set_config(name, config.clone());
    }
    Ok(endpoint)
}

fn build_backend(blueprint: &BackendBlueprint) -> GeneratorResult<Backend> {
    let (first, rest) = match blueprint.host.split_first() {
        Some((first, rest)) => (first.as_str(), rest),
        None => {
            return Err(GeneratorError::InvalidArgument(format!(
                "backend {} has no host",
                blueprint.url_pattern
            )))
        }
    };

    let mut backend = Backend::new(
        &blueprint.method,
        first,
        blueprint.url_pattern.as_str(),
        &blueprint.encoding,
    )?;
    backend.add_host(rest);

    for (from, to) in &blueprint.mapping {
        backend.add_mapping(from.as_str(), to.as_str());
    }
    if !blueprint.blacklist.is_empty() {
        backend.set_blacklist(&blueprint.blacklist);
    }
    if !blueprint.whitelist.is_empty() {
        backend.set_whitelist(&blueprint.whitelist);
    }
    if let Some(group) = &blueprint.group {
        backend.set_group(group.as_str());
    }
    if let Some(target) = &blueprint.target {
        backend.set_target(target.as_str());
    }
    backend.set_collection(blueprint.is_collection);

    if blueprint.cache {
        backend.enable_cache();
    }
    if blueprint.shadow {
        backend.shadow_enabled();
    }
    if let Some(cb) = &blueprint.circuit_breaker {
        backend.circuit_breaker(cb.interval, cb.timeout, cb.max_errors, cb.log_status_change);
    }

    if blueprint.always_envelope_modifiers {
        backend.set_modifier_layout(ModifierLayout::AlwaysEnvelope);
    }
    if !blueprint.remove_response_headers.is_empty() {
        backend.remove_response_headers(&blueprint.remove_response_headers);
    }
    for header in &blueprint.headers {
        backend.inject_header(header.name.as_str(), header.value.as_str(), header.also_response);
    }
    if let Some(token) = &blueprint.bearer_token {
        backend.bearer_auth(token);
    }
    if let Some(basic) = &blueprint.basic_auth {
        backend.basic_auth(&basic.username, &basic.password);
    }

    for (name, config) in &blueprint.extra_config {
        backend.set_config(name, config.clone());
    }
    Ok(backend)
}

fn build_validator(auth: &AuthBlueprint) -> GeneratorResult<JwsValidator> {
    let mut validator = JwsValidator::new(&auth.alg, auth.jwk_url.as_str())?;
    if let Some(duration) = auth.cache_duration {
        validator.set_cache(duration);
    }
    validator
        .set_audience(&auth.audience)
        .set_issuer(&auth.issuer)
        .default_roles(&auth.default_roles)
        .set_disable_jwk_security(auth.disable_jwk_security)
        .set_jwk_fingerprints(&auth.jwk_fingerprints)
        .set_cipher_suites(auth.cipher_suites.iter().copied());
    if let Some(key) = &auth.roles_key {
        validator.set_roles_key(key.as_str());
    }
    if let Some(key) = &auth.cookie_key {
        validator.set_cookie_key(key.as_str());
    }
    if let Some(ca) = &auth.jwk_local_ca {
        validator.set_jwk_local_ca(ca.as_str());
    }
    Ok(validator)
}

//! End-to-end document generation tests.

use gateway_config::model::extension::namespace;
use gateway_config::{App, Backend, Endpoint, GeneratorError, JwsValidator};
use serde_json::json;

mod common;

#[test]
fn test_minimal_document() {
    let dir = tempfile::tempdir().unwrap();
    let (_, value) = common::generate_and_read(&common::minimal_app(), dir.path());

    assert_eq!(
        value,
        json!({
            "version": 0,
            "port": 0,
            "endpoints": [{
                "endpoint": "/v1/users/{id}",
                "method": "GET",
                "output_encoding": "json",
                "headers_to_pass": [
                    "Accept-Encoding", "Host", "User-Agent", "X-Forwarded-For",
                    "Content-Type", "Cache-Control", "Connection"
                ],
                "backend": [{
                    "url_pattern": "/users/{id}",
                    "method": "GET",
                    "encoding": "json",
                    "host": ["http://users:8000"]
                }]
            }]
        })
    );
}

#[test]
fn test_document_formatting() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = common::minimal_app();
    app.set_name("Users <public> & partners");

    let (text, _) = common::generate_and_read(&app, dir.path());
    assert!(text.starts_with("{\n  \"version\": 0,\n  \"name\""));
    assert!(text.contains("Users <public> & partners"));
    assert!(text.ends_with("}\n"));
}

#[test]
fn test_generate_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("krakend.json");
    std::fs::write(&path, "x".repeat(10_000)).unwrap();

    common::minimal_app().generate(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["endpoints"][0]["endpoint"], json!("/v1/users/{id}"));
}

#[test]
fn test_generate_reports_persistence_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("krakend.json");

    let err = common::minimal_app().generate(&path).unwrap_err();
    assert!(matches!(err, GeneratorError::Persistence { .. }));
}

#[test]
fn test_full_document_order_and_namespaces() {
    let mut users = Backend::json("GET", "http://users:8000", "/users/{id}").unwrap();
    users
        .add_mapping("id", "user_id")
        .set_whitelist(["id", "name"])
        .remove_response_headers(["X-Internal"])
        .basic_auth("svc", "secret");

    let mut feed = Backend::rss("GET", "http://feed:8000", "/feed").unwrap();
    feed.set_group("feed").set_collection(true).shadow_enabled();

    let mut validator = JwsValidator::new("RS256", "https://auth.local/jwks.json").unwrap();
    validator.default_roles(["admin"]).set_cache(600);

    let mut profile = Endpoint::json("GET", "/v1/profile/{id}", [&users]).unwrap();
    profile
        .add_backend([&feed])
        .pass_query_string(["lang"])
        .rate_limit_by_ip(10)
        .rate_limit_global(100)
        .authenticate(&validator, ["user"]);

    let mut health = Endpoint::no_op("GET", "/health", []).unwrap();
    health.pass_all_headers();

    let mut app = App::default_gateway();
    app.set_version(2);
    app.add_endpoints([&profile, &health]);

    let dir = tempfile::tempdir().unwrap();
    let (_, value) = common::generate_and_read(&app, dir.path());

    let endpoints = value["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), 2);
    assert_eq!(endpoints[0]["endpoint"], json!("/v1/profile/{id}"));
    assert_eq!(endpoints[1]["endpoint"], json!("/health"));
    assert_eq!(endpoints[1]["headers_to_pass"], json!(["*"]));
    assert_eq!(endpoints[1]["output_encoding"], json!("no-op"));

    let profile = &endpoints[0];
    assert_eq!(profile["querystring_params"], json!(["lang"]));
    assert_eq!(profile["extra_config"][namespace::RATE_LIMIT], json!({"maxRate": 100}));
    assert_eq!(
        profile["extra_config"][namespace::JOSE_VALIDATOR]["roles"],
        json!(["user", "admin"])
    );

    let backends = profile["backend"].as_array().unwrap();
    assert_eq!(backends[0]["host"], json!(["http://users:8000"]));
    assert_eq!(backends[1]["encoding"], json!("rss"));
    assert_eq!(backends[1]["is_collection"], json!(true));
    assert_eq!(backends[1]["group"], json!("feed"));

    let modifiers = &backends[0]["extra_config"][namespace::MARTIAN]["fifo.Group"]["modifiers"];
    assert_eq!(modifiers["header.Blacklist"]["names"], json!(["X-Internal"]));
    assert_eq!(modifiers["header.Modifier"]["value"], json!("Basic c3ZjOnNlY3JldA=="));

    assert_eq!(value["extra_config"][namespace::LOGSTASH], json!({"enabled": true}));
}

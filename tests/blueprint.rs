//! Blueprint file to document tests.

use gateway_config::config::{load_app, BlueprintError, ValidationError};
use serde_json::json;

const BLUEPRINT: &str = r#"
[app]
defaults = true
name = "Shop Gateway"

[app.extra_config."github_com/devopsfaith/krakend-metrics"]
listen_address = "9091"

[[endpoints]]
endpoint = "/v1/orders"
method = "POST"
sequential = true

[endpoints.rate_limit]
max_rate = 50
client_max_rate = 5
strategy = "header"
key = "X-Api-Key"

[[endpoints.backend]]
url_pattern = "/orders"
method = "POST"
host = ["http://orders:8000"]
bearer_token = "abc123"

[endpoints.backend.circuit_breaker]
interval = 60
timeout = 10
max_errors = 5

[[endpoints]]
endpoint = "/v1/catalog"
output_encoding = "negotiate"

[[endpoints.backend]]
url_pattern = "/catalog.xml"
encoding = "xml"
host = ["http://catalog:8000"]
target = "items"
"#;

#[test]
fn test_blueprint_to_document() {
    let dir = tempfile::tempdir().unwrap();
    let blueprint = dir.path().join("gateway.toml");
    std::fs::write(&blueprint, BLUEPRINT).unwrap();

    let app = load_app(&blueprint).unwrap();
    let output = dir.path().join("krakend.json");
    app.generate(&output).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();

    assert_eq!(value["name"], json!("Shop Gateway"));
    assert_eq!(value["version"], json!(2));
    assert_eq!(
        value["extra_config"]["github_com/devopsfaith/krakend-metrics"],
        json!({"listen_address": "9091"})
    );

    let orders = &value["endpoints"][0];
    assert_eq!(orders["method"], json!("POST"));
    assert_eq!(
        orders["extra_config"]["github.com/devopsfaith/krakend/proxy"],
        json!({"sequential": true})
    );
    assert_eq!(
        orders["extra_config"]["github.com/devopsfaith/krakend-ratelimit/juju/router"],
        json!({"clientMaxRate": 5, "maxRate": 50, "strategy": "header", "key": "X-Api-Key"})
    );
    let backend = &orders["backend"][0];
    assert_eq!(
        backend["extra_config"]["github.com/devopsfaith/krakend-martian"],
        json!({"header.Modifier": {"scope": ["request"], "name": "Authorization", "value": "Bearer abc123"}})
    );
    assert_eq!(
        backend["extra_config"]["github.com/devopsfaith/krakend-circuitbreaker/gobreaker"],
        json!({"interval": 60, "timeout": 10, "maxErrors": 5, "logStatusChange": false})
    );

    let catalog = &value["endpoints"][1];
    assert_eq!(catalog["output_encoding"], json!("negotiate"));
    assert_eq!(catalog["backend"][0]["target"], json!("items"));
    assert!(catalog.get("extra_config").is_none());
}

#[test]
fn test_invalid_blueprint_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let blueprint = dir.path().join("gateway.toml");
    std::fs::write(
        &blueprint,
        r#"
        [[endpoints]]
        endpoint = "/a"

        [[endpoints.backend]]
        url_pattern = "/a"
        host = ["http://a:1"]
        blacklist = ["x"]
        whitelist = ["y"]
        "#,
    )
    .unwrap();

    match load_app(&blueprint) {
        Err(BlueprintError::Validation(errors)) => {
            assert_eq!(
                errors,
                vec![ValidationError::ConflictingFilters {
                    endpoint: "/a".into(),
                    index: 0
                }]
            );
        }
        other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }
}

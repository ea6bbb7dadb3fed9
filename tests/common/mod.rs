//! Shared utilities for integration tests.

use std::path::Path;

use gateway_config::{App, Backend, Endpoint};
use serde_json::Value;

/// One endpoint with one backend, everything optional left at its default.
pub fn minimal_app() -> App {
    let backend = Backend::json("GET", "http://users:8000", "/users/{id}").unwrap();
    let endpoint = Endpoint::json("GET", "/v1/users/{id}", [&backend]).unwrap();

    let mut app = App::new();
    app.add_endpoints([&endpoint]);
    app
}

/// Generate `app` into `dir` and read it back as generic JSON.
pub fn generate_and_read(app: &App, dir: &Path) -> (String, Value) {
    let path = dir.join("krakend.json");
    app.generate(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let value = serde_json::from_str(&text).unwrap();
    (text, value)
}

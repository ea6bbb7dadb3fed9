//! KrakenD Gateway Configuration Generator Library
//!
//! Build a gateway document from backends, endpoints and plugin settings,
//! then write it as JSON:
//!
//! ```no_run
//! use gateway_config::{App, Backend, Endpoint};
//!
//! # fn main() -> Result<(), gateway_config::GeneratorError> {
//! let mut users = Backend::json("GET", "http://users:8000", "/users/{id}")?;
//! users.remove_response_headers(["X-Internal"]).circuit_breaker(10, 5, 3, true);
//!
//! let mut endpoint = Endpoint::json("GET", "/v1/users/{id}", [&users])?;
//! endpoint.set_concurrent(3)?.rate_limit_by_ip(10);
//!
//! let mut app = App::default_gateway();
//! app.add_endpoints([&endpoint]);
//! app.generate("krakend.json")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod model;
pub mod observability;
pub mod output;

pub use model::{
    Algorithm, App, Backend, BackendEncoding, Endpoint, EndpointEncoding, GeneratorError,
    GeneratorResult, JwsValidator, Method, ModifierLayout,
};

//! Rate limit settings for endpoints.
//!
//! Every helper writes the whole rate-limit namespace. Calling more than one
//! on the same endpoint leaves only the last call's settings.

use serde_json::json;

use crate::model::endpoint::Endpoint;
use crate::model::extension::namespace;

impl Endpoint {
    /// Limit all requests per second on the endpoint.
    pub fn rate_limit_global(&mut self, max: u64) -> &mut Self {
        self.set_config(namespace::RATE_LIMIT, json!({ "maxRate": max }))
    }

    /// Limit requests per second for each client, identified by IP.
    pub fn rate_limit_by_ip(&mut self, max: u64) -> &mut Self {
        self.set_config(
            namespace::RATE_LIMIT,
            json!({ "clientMaxRate": max, "strategy": "ip" }),
        )
    }

    /// Limit requests per second for each client, identified by `header`.
    pub fn rate_limit_by_header(&mut self, header: &str, max: u64) -> &mut Self {
        self.set_config(
            namespace::RATE_LIMIT,
            json!({ "clientMaxRate": max, "strategy": "header", "key": header }),
        )
    }

    pub fn rate_limit_by_ip_and_global(&mut self, client_max: u64, global_max: u64) -> &mut Self {
        self.set_config(
            namespace::RATE_LIMIT,
            json!({ "clientMaxRate": client_max, "maxRate": global_max, "strategy": "ip" }),
        )
    }

    pub fn rate_limit_by_header_and_global(
        &mut self,
        header: &str,
        client_max: u64,
        global_max: u64,
    ) -> &mut Self {
        self.set_config(
            namespace::RATE_LIMIT,
            json!({
                "clientMaxRate": client_max,
                "maxRate": global_max,
                "strategy": "header",
                "key": header,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Endpoint {
        Endpoint::json("GET", "/limited", []).unwrap()
    }

    #[test]
    fn test_last_call_wins() {
        let mut ep = endpoint();
        ep.rate_limit_by_ip(10).rate_limit_global(100);
        assert_eq!(ep.extra_config()[namespace::RATE_LIMIT], json!({"maxRate": 100}));
    }

    #[test]
    fn test_header_strategies() {
        let mut ep = endpoint();
        ep.rate_limit_by_header("X-Api-Key", 5);
        assert_eq!(
            ep.extra_config()[namespace::RATE_LIMIT],
            json!({"clientMaxRate": 5, "strategy": "header", "key": "X-Api-Key"})
        );

        ep.rate_limit_by_header_and_global("X-Api-Key", 5, 50);
        assert_eq!(
            ep.extra_config()[namespace::RATE_LIMIT],
            json!({"clientMaxRate": 5, "maxRate": 50, "strategy": "header", "key": "X-Api-Key"})
        );
    }

    #[test]
    fn test_ip_and_global() {
        let mut ep = endpoint();
        ep.rate_limit_by_ip_and_global(2, 20);
        assert_eq!(
            ep.extra_config()[namespace::RATE_LIMIT],
            json!({"clientMaxRate": 2, "maxRate": 20, "strategy": "ip"})
        );
        assert_eq!(ep.extra_config().len(), 1);
    }
}

use std::sync::Arc;

use httptest::{matchers::request, responders::json_encoded, Expectation, Server};
use serde_json::json;
use statsig_console::{provider::ProviderConfig, Client, ConsoleOptions, Provider};

pub const API_KEY: &str = "console-testkey123";

pub fn server_options(server: &Server) -> ConsoleOptions {
    ConsoleOptions {
        api_url: Some(format!("http://{}", server.addr())),
    }
}

pub fn create_client(server: &Server) -> Arc<Client> {
    Client::new(API_KEY, server_options(server)).expect("should be able to create console client")
}

pub fn create_provider(server: &Server) -> Provider {
    Provider::configure(
        &ProviderConfig {
            console_api_key: Some(API_KEY.to_string()),
        },
        server_options(server),
    )
    .expect("should be able to configure provider")
}

pub fn tags_fixture() -> serde_json::Value {
    json!({
        "message": "Tags listed successfully.",
        "data": [
            {"id": "6Ak1c2", "name": "billing", "description": "Billing team", "isCore": false},
            {"id": "1Rt0Ab", "name": "core", "description": "Core metrics", "isCore": true},
            {"id": "9Zz9Zz", "name": "growth", "description": "", "isCore": false}
        ]
    })
}

pub fn expect_list_tags(server: &Server, times: usize) {
    server.expect(
        Expectation::matching(request::method_path("GET", "/tags"))
            .times(times)
            .respond_with(json_encoded(tags_fixture())),
    );
}

pub fn dynamic_config_fixture() -> serde_json::Value {
    json!({
        "id": "checkout_copy",
        "name": "checkout_copy",
        "description": "copy shown on checkout",
        "idType": "userID",
        "lastModifierName": "Ana Lima",
        "lastModifierEmail": "ana@example.com",
        "creatorName": "Ana Lima",
        "creatorEmail": "ana@example.com",
        "targetApps": ["web"],
        "tags": ["checkout"],
        "team": "growth",
        "holdoutIDs": [],
        "isEnabled": true,
        "rules": [
            {
                "id": "5PvNs1",
                "baseID": "5PvNs1",
                "name": "employees",
                "passPercentage": 100,
                "conditions": [
                    {
                        "type": "user_field",
                        "operator": "any",
                        "targetValue": ["a@example.com", "b@example.com"],
                        "field": "email"
                    }
                ],
                "returnValue": {"title": "Hi team", "ttl": 30},
                "environments": ["production", "staging"]
            },
            {
                "id": "7QwEr2",
                "baseID": "7QwEr2",
                "name": "everyone",
                "passPercentage": 12.5,
                "conditions": [{"type": "public"}],
                "returnValue": {"title": "Hello!", "ttl": 60, "variants": [1, 2.5, "x", false]}
            }
        ],
        "defaultValue": {"title": "Hello", "ttl": 30}
    })
}

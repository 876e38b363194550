use std::collections::BTreeMap;

use reqwest::{
    header,
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, ClientBuilder, Method, Request, StatusCode,
};
use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use tracing::{event, Level};
use url::Url;

use crate::{
    error::{Error, Result},
    metadata::StatsigMetadata,
};

pub(crate) const API_URL: &str = "https://statsigapi.net/console/v1";

/// Every console call completes or fails within this window.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const API_KEY_HEADER: &str = "statsig-api-key";
const SDK_TYPE_HEADER: &str = "statsig-sdk-type";
const SDK_VERSION_HEADER: &str = "statsig-sdk-version";
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Query parameters appended to a request path. Keys are unique.
pub type QueryParams = BTreeMap<String, String>;

/// Error body returned by the console API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
    #[allow(dead_code)]
    status: Option<u16>,
}

fn create_http_connection_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    let client = ClientBuilder::new()
        .pool_idle_timeout(Some(Duration::from_secs(60)))
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .timeout(REQUEST_TIMEOUT)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Authenticated access to the console API. Holds no mutable state, so a
/// single instance can be shared across concurrent calls.
#[derive(Clone)]
pub struct StatsigHttpClient {
    base_url: String,
    identity: HeaderMap,
    http_client: Client,
}

impl StatsigHttpClient {
    pub fn new(api_key: &str, api_url: Option<String>) -> Result<Self> {
        let base_url = api_url
            .unwrap_or_else(|| API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Url::parse(&base_url)?;

        let metadata = StatsigMetadata::current();
        let mut api_key = HeaderValue::from_str(api_key).map_err(|_| {
            Error::Config("console api key contains invalid header characters".to_string())
        })?;
        api_key.set_sensitive(true);

        let mut identity = HeaderMap::new();
        identity.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        identity.insert(
            HeaderName::from_static(SDK_TYPE_HEADER),
            HeaderValue::from_str(&metadata.sdk_type)
                .map_err(|_| Error::Config("invalid sdk type".to_string()))?,
        );
        identity.insert(
            HeaderName::from_static(SDK_VERSION_HEADER),
            HeaderValue::from_str(&metadata.sdk_version)
                .map_err(|_| Error::Config("invalid sdk version".to_string()))?,
        );

        Ok(Self {
            base_url,
            identity,
            http_client: create_http_connection_client()?,
        })
    }

    pub async fn get(&self, path: &str, query: Option<&QueryParams>) -> Result<Vec<u8>> {
        self.do_request(Method::GET, path, None, query).await
    }

    /// Sends `body` as JSON. A missing body is sent as `{}`.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>> {
        let body = encode_body(body)?.unwrap_or_else(|| b"{}".to_vec());
        self.do_request(Method::POST, path, Some(body), None).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>> {
        let body = encode_body(body)?;
        self.do_request(Method::PATCH, path, body, None).await
    }

    pub async fn delete(&self, path: &str, query: Option<&QueryParams>) -> Result<Vec<u8>> {
        self.do_request(Method::DELETE, path, None, query).await
    }

    /// Builds the request for `path` relative to the base url, with the
    /// identity headers attached and the content type set for POST/PATCH.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        query: Option<&QueryParams>,
    ) -> Result<Request> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))?;
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        let mut headers = self.identity.clone();
        if method == Method::POST || method == Method::PATCH {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(JSON_CONTENT_TYPE),
            );
        }

        let mut builder = self.http_client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        Ok(builder.build()?)
    }

    async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        query: Option<&QueryParams>,
    ) -> Result<Vec<u8>> {
        let request = self.build_request(method, path, body, query)?;
        let url = request.url().to_string();
        event!(Level::DEBUG, "{} {}", request.method(), url);

        let response = self.http_client.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        classify(status, &url, &body)?;
        Ok(body.to_vec())
    }
}

fn encode_body<B: Serialize + ?Sized>(body: Option<&B>) -> Result<Option<Vec<u8>>> {
    Ok(match body {
        Some(body) => Some(serde_json::to_vec(body)?),
        None => None,
    })
}

/// Maps a response status onto the error taxonomy. Successful bodies are
/// left for the caller to decode.
fn classify(status: StatusCode, url: &str, body: &[u8]) -> Result<()> {
    if status == StatusCode::UNAUTHORIZED {
        event!(Level::ERROR, "unauthorized request to {}", url);
        return Err(Error::Unauthorized {
            url: url.to_string(),
        });
    }
    if status.is_success() {
        return Ok(());
    }

    event!(
        Level::ERROR,
        "statsig request to {} failed with status {}: {}",
        url,
        status,
        String::from_utf8_lossy(body)
    );
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(parsed) if !parsed.message.is_empty() => Err(Error::Api {
            status: status.as_u16(),
            message: parsed.message,
        }),
        _ => Err(Error::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use httptest::{
        all_of,
        matchers::{contains, eq, json_decoded, key, request, url_decoded},
        responders::{json_encoded, status_code},
        Expectation, Server,
    };
    use serde_json::json;

    fn client_for(server: &Server) -> StatsigHttpClient {
        StatsigHttpClient::new("console-abc123", Some(format!("http://{}", server.addr())))
            .expect("should build client")
    }

    #[test]
    fn test_build_request_headers() -> anyhow::Result<()> {
        let client = StatsigHttpClient::new("console-abc123", None)?;

        let req = client.build_request(Method::POST, "tags", Some(b"{}".to_vec()), None)?;
        assert_eq!(req.headers()[API_KEY_HEADER], "console-abc123");
        assert_eq!(req.headers()[SDK_TYPE_HEADER], "statsig-console-rs");
        assert_eq!(
            req.headers()[SDK_VERSION_HEADER],
            crate::metadata::SDK_VERSION
        );
        assert_eq!(req.headers()[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!("https://statsigapi.net/console/v1/tags", req.url().as_str());

        let req = client.build_request(Method::GET, "tags", None, Some(&QueryParams::new()))?;
        assert!(req.headers().contains_key(API_KEY_HEADER));
        assert!(req.headers().contains_key(SDK_TYPE_HEADER));
        assert!(req.headers().contains_key(SDK_VERSION_HEADER));
        assert!(!req.headers().contains_key(header::CONTENT_TYPE));
        assert_eq!("https://statsigapi.net/console/v1/tags", req.url().as_str());
        assert!(!req.url().as_str().ends_with('?'));

        Ok(())
    }

    #[test]
    fn test_build_request_query_params() -> anyhow::Result<()> {
        let client = StatsigHttpClient::new("console-abc123", None)?;
        let query = QueryParams::from([
            ("page".to_string(), "1".to_string()),
            ("name".to_string(), "a b&c".to_string()),
        ]);

        let req = client.build_request(Method::DELETE, "target_apps/x", None, Some(&query))?;
        let pairs: Vec<(String, String)> = req
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(2, pairs.len());
        assert!(pairs.contains(&("page".to_string(), "1".to_string())));
        assert!(pairs.contains(&("name".to_string(), "a b&c".to_string())));
        assert!(!req.headers().contains_key(header::CONTENT_TYPE));

        Ok(())
    }

    #[test]
    fn test_invalid_api_key_header() {
        let err = StatsigHttpClient::new("console-abc\n123", None)
            .err()
            .expect("should reject key");
        assert_eq!(ErrorKind::Config, err.kind());
    }

    #[tokio::test]
    async fn test_get_returns_raw_body() -> anyhow::Result<()> {
        let http_server = Server::run();
        http_server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/tags"),
                request::query(url_decoded(contains(("limit", "100")))),
                request::headers(contains(("statsig-api-key", "console-abc123"))),
                request::headers(contains(key("statsig-sdk-type"))),
                request::headers(contains(key("statsig-sdk-version"))),
            ])
            .respond_with(json_encoded(json!({"message": "ok", "data": []}))),
        );

        let client = client_for(&http_server);
        let query = QueryParams::from([("limit".to_string(), "100".to_string())]);
        let body = client.get("tags", Some(&query)).await?;
        let parsed: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(json!({"message": "ok", "data": []}), parsed);

        Ok(())
    }

    #[tokio::test]
    async fn test_post_without_body_sends_empty_object() -> anyhow::Result<()> {
        let http_server = Server::run();
        http_server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/tags"),
                request::headers(contains(("content-type", JSON_CONTENT_TYPE))),
                request::body(json_decoded::<serde_json::Value, _>(eq(json!({})))),
            ])
            .respond_with(json_encoded(json!({"message": "created", "data": {}}))),
        );

        let client = client_for(&http_server);
        client.post::<serde_json::Value>("tags", None).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_patch_sends_json_body() -> anyhow::Result<()> {
        let http_server = Server::run();
        http_server.expect(
            Expectation::matching(all_of![
                request::method_path("PATCH", "/dynamic_configs/my_config"),
                request::headers(contains(("content-type", JSON_CONTENT_TYPE))),
                request::body(json_decoded::<serde_json::Value, _>(eq(
                    json!({"isEnabled": false})
                ))),
            ])
            .respond_with(json_encoded(json!({"message": "updated", "data": {}}))),
        );

        let client = client_for(&http_server);
        client
            .patch("dynamic_configs/my_config", Some(&json!({"isEnabled": false})))
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_unauthorized_ignores_body() {
        let http_server = Server::run();
        http_server.expect(
            Expectation::matching(request::method_path("GET", "/tags")).respond_with(
                status_code(401).body(r#"{"message":"something else","status":500}"#),
            ),
        );

        let client = client_for(&http_server);
        let err = client.get("tags", None).await.err().expect("should fail");
        assert_eq!(ErrorKind::Unauthorized, err.kind());
        assert!(err.to_string().contains("/tags"));
    }

    #[tokio::test]
    async fn test_api_error_surfaces_message() {
        let http_server = Server::run();
        http_server.expect(
            Expectation::matching(request::method_path("DELETE", "/target_apps/app"))
                .respond_with(
                    status_code(500).body(r#"{"message":"internal error","status":500}"#),
                ),
        );

        let client = client_for(&http_server);
        let err = client
            .delete("target_apps/app", None)
            .await
            .err()
            .expect("should fail");
        assert_eq!(ErrorKind::Api, err.kind());
        assert!(err.to_string().contains("internal error"));
    }

    #[tokio::test]
    async fn test_api_error_without_message() {
        let http_server = Server::run();
        http_server.expect(
            Expectation::matching(request::method_path("GET", "/tags"))
                .respond_with(status_code(503).body("upstream unavailable")),
        );

        let client = client_for(&http_server);
        let err = client.get("tags", None).await.err().expect("should fail");
        assert_eq!(ErrorKind::Api, err.kind());
        assert!(err.to_string().contains("status 503"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() -> anyhow::Result<()> {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;
        let options = crate::client::ConsoleOptions {
            api_url: Some(format!("http://{}", addr)),
        };
        let client = crate::client::Client::new("console-abc123", options)?;

        let err = client
            .list::<crate::models::Tag>()
            .await
            .err()
            .expect("nothing listens on a closed port");
        assert_eq!(ErrorKind::Transport, err.kind());
        assert!(err
            .to_string()
            .starts_with("unable to list tags: failed to send request"));
        assert_eq!(Duration::from_secs(10), REQUEST_TIMEOUT);

        Ok(())
    }
}


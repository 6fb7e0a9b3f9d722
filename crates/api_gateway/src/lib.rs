use app_protocol::{ErrorInfo, ErrorKind};
use common::ApiConfig;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const API_PREFIX: &str = "api/v1";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("API Error {status}: {detail}")]
    Api { status: u16, detail: String },
    #[error("API Error: {status}")]
    Status { status: u16 },
    #[error("Invalid response body: {0}")]
    Decode(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED.as_u16()),
            ApiError::Api { status, .. } | ApiError::Status { status } => Some(*status),
            _ => None,
        }
    }

    /// The `detail` field of a structured error body.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Api { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Unauthorized => ErrorKind::Unauthorized,
            ApiError::Api { .. } => ErrorKind::Api,
            _ => ErrorKind::Unknown,
        }
    }

    pub fn to_info(&self) -> ErrorInfo {
        ErrorInfo {
            kind: self.kind(),
            status: self.status(),
            message: self.to_string(),
            detail: self.detail().map(str::to_string),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `<base>/api/v1/<resource>/` or `<base>/api/v1/<resource>/<id>/`.
    pub fn resource_url(&self, resource: &str, id: Option<i64>) -> String {
        match id {
            Some(id) => self.config.endpoint(&format!("{}/{}/{}/", API_PREFIX, resource, id)),
            None => self.config.endpoint(&format!("{}/{}/", API_PREFIX, resource)),
        }
    }

    pub async fn get_json<R>(&self, url: &str, token: Option<&str>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let req = self.request(Method::GET, url, token);
        Self::execute(req).await
    }

    pub async fn put_json<B, R>(
        &self,
        url: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let req = self.request(Method::PUT, url, token).json(body);
        Self::execute(req).await
    }

    fn request(&self, method: Method, url: &str, token: Option<&str>) -> RequestBuilder {
        log::debug!("{} {}", method, url);
        let req = self.client.request(method, url).header("Accept", "application/json");
        match token {
            Some(token) => req.header("Authorization", format!("JWT {}", token)),
            None => req,
        }
    }

    async fn execute<R>(req: RequestBuilder) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let res = req.send().await?;
        if !res.status().is_success() {
            return Err(Self::classify(res).await);
        }
        let bytes = res.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn classify(res: Response) -> ApiError {
        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }

        let body = res.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").cloned())
            .map(|d| match d {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });

        match detail {
            Some(detail) => ApiError::Api { status: status.as_u16(), detail },
            None => ApiError::Status { status: status.as_u16() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::{json, Value};

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(ApiConfig::new(server.url()).unwrap())
    }

    #[test]
    fn test_resource_url() {
        let client = ApiClient::new(ApiConfig::new("http://localhost:8000/").unwrap());
        assert_eq!(
            client.resource_url("profiles", Some(4)),
            "http://localhost:8000/api/v1/profiles/4/"
        );
        assert_eq!(client.resource_url("profiles", None), "http://localhost:8000/api/v1/profiles/");
    }

    #[tokio::test]
    async fn test_put_sends_jwt_header_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v1/profiles/4/")
            .match_header("authorization", "JWT secret")
            .match_body(Matcher::Json(json!({ "pronouns": "she" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"pronouns":"she"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let url = client.resource_url("profiles", Some(4));
        let res: Value = client
            .put_json(&url, &json!({ "pronouns": "she" }), Some("secret"))
            .await
            .unwrap();

        assert_eq!(res["pronouns"], "she");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_token_omits_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/profiles/4/")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server);
        let url = client.resource_url("profiles", Some(4));
        let _: Value = client.get_json(&url, None).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_classification() {
        let mut server = mockito::Server::new_async().await;
        let _unauthorized = server.mock("GET", "/a/").with_status(401).create_async().await;
        let _structured = server
            .mock("GET", "/b/")
            .with_status(400)
            .with_body(r#"{"detail":"Location is required."}"#)
            .create_async()
            .await;
        let _unstructured = server
            .mock("GET", "/c/")
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;
        let _garbled = server
            .mock("GET", "/d/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;
        let _no_detail = server
            .mock("GET", "/e/")
            .with_status(400)
            .with_body(r#"{"pronouns":["This field is required."]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let get = |path: &str| {
            let url = client.config().endpoint(path);
            let client = client.clone();
            async move { client.get_json::<Value>(&url, None).await }
        };

        assert!(matches!(get("/a/").await, Err(ApiError::Unauthorized)));
        match get("/b/").await {
            Err(ApiError::Api { status, detail }) => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Location is required.");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(get("/c/").await, Err(ApiError::Status { status: 500 })));
        assert!(matches!(get("/d/").await, Err(ApiError::Decode(_))));

        let err = get("/e/").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 400 }));
        assert_eq!(err.detail(), None);
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = ApiClient::new(ApiConfig::new("http://127.0.0.1:1").unwrap());
        let url = client.resource_url("profiles", Some(1));
        let err = client.get_json::<Value>(&url, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_error_info() {
        let info = ApiError::Api { status: 400, detail: "bad".into() }.to_info();
        assert_eq!(info.kind, ErrorKind::Api);
        assert_eq!(info.status, Some(400));
        assert_eq!(info.detail.as_deref(), Some("bad"));
    }
}

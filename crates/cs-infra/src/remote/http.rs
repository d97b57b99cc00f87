//! reqwest-backed client for the clipboard store API.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use cs_core::clipboard::{ClipboardEntry, NewClipboardEntry};
use cs_core::ports::{
    Credentials, IssuedTypingCommand, NewTypingCommand, RemoteAccountPort, RemoteClient,
    RemoteStoreError, RemoteStorePort, SessionGrant, SessionRequest,
};
use cs_core::settings::ServerSettings;
use cs_core::sync::ConnectionHealth;

const SESSION_PATH: &str = "/session";
const USERS_PATH: &str = "/users";
const ENTRIES_PATH: &str = "/clipboard-entries";
const LATEST_ENTRY_PATH: &str = "/clipboard-entries/latest";
const HEALTH_PATH: &str = "/health";
const CLIENTS_PATH: &str = "/clients";
const TYPING_COMMANDS_PATH: &str = "/typing-commands";

#[derive(Debug, Clone)]
pub struct HttpRemoteStoreConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
}

impl From<&ServerSettings> for HttpRemoteStoreConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            base_url: settings.url.clone(),
            request_timeout: settings.request_timeout(),
            probe_timeout: settings.probe_timeout(),
        }
    }
}

pub struct HttpRemoteStore {
    base_url: String,
    request_timeout: Duration,
    probe_timeout: Duration,
    http: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl HttpRemoteStore {
    pub fn new(config: HttpRemoteStoreConfig) -> Result<Self, RemoteStoreError> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RemoteStoreError::Transport(e.to_string()))?;

        Ok(Self {
            base_url,
            request_timeout: config.request_timeout.max(Duration::from_millis(250)),
            probe_timeout: config.probe_timeout.max(Duration::from_millis(250)),
            http,
            token: RwLock::new(None),
        })
    }

    pub fn with_token(self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    pub fn set_token(&self, token: Option<String>) {
        let token = token.filter(|t| !t.trim().is_empty());
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }

    pub fn has_token(&self) -> bool {
        self.current_token().is_some()
    }

    pub fn endpoint(&self, path: &str) -> String {
        let trimmed = path.trim();
        if trimmed.starts_with('/') {
            format!("{}{}", self.base_url, trimmed)
        } else {
            format!("{}/{}", self.base_url, trimmed)
        }
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn bearer(&self) -> Result<String, RemoteStoreError> {
        self.current_token()
            .map(|token| format!("Bearer {token}"))
            .ok_or(RemoteStoreError::NotConfigured)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, RemoteStoreError> {
        request
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(map_request_error)
    }

    async fn get_authed(&self, path: &str) -> Result<reqwest::Response, RemoteStoreError> {
        let request = self
            .http
            .get(self.endpoint(path))
            .header(reqwest::header::AUTHORIZATION, self.bearer()?);
        self.send(request).await
    }

    async fn post_json<Req>(
        &self,
        path: &str,
        body: &Req,
        authed: bool,
    ) -> Result<reqwest::Response, RemoteStoreError>
    where
        Req: Serialize + ?Sized,
    {
        let mut request = self.http.post(self.endpoint(path)).json(body);
        if authed {
            request = request.header(reqwest::header::AUTHORIZATION, self.bearer()?);
        }
        self.send(request).await
    }
}

#[async_trait]
impl RemoteStorePort for HttpRemoteStore {
    async fn push(&self, content: &str) -> Result<(), RemoteStoreError> {
        let body = NewClipboardEntry::text(content);
        let response = self.post_json(ENTRIES_PATH, &body, true).await?;
        ensure_success(response).await?;
        debug!(bytes = content.len(), "pushed clipboard entry");
        Ok(())
    }

    async fn pull_latest(&self) -> Result<Option<ClipboardEntry>, RemoteStoreError> {
        let response = self.get_authed(LATEST_ENTRY_PATH).await?;
        if matches!(
            response.status(),
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT
        ) {
            return Ok(None);
        }
        decode_json_response::<Option<ClipboardEntry>>(response).await
    }

    async fn probe(&self) -> ConnectionHealth {
        let result = self
            .http
            .get(self.endpoint(HEALTH_PATH))
            .timeout(self.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => ConnectionHealth::Healthy,
            Ok(response) => {
                warn!(status = %response.status(), "health probe rejected");
                ConnectionHealth::Degraded
            }
            Err(err) => {
                warn!(error = %err, "health probe failed");
                ConnectionHealth::Degraded
            }
        }
    }
}

#[async_trait]
impl RemoteAccountPort for HttpRemoteStore {
    async fn register(&self, credentials: &Credentials) -> Result<(), RemoteStoreError> {
        let response = self.post_json(USERS_PATH, credentials, false).await?;
        ensure_success(response).await
    }

    async fn create_session(
        &self,
        request: &SessionRequest,
    ) -> Result<SessionGrant, RemoteStoreError> {
        let response = self.post_json(SESSION_PATH, request, false).await?;
        let grant: SessionGrant = decode_json_response(response).await?;
        self.set_token(Some(grant.token.clone()));
        Ok(grant)
    }

    async fn list_clients(&self) -> Result<Vec<RemoteClient>, RemoteStoreError> {
        let response = self.get_authed(CLIENTS_PATH).await?;
        decode_json_response(response).await
    }

    async fn send_typing_command(
        &self,
        command: &NewTypingCommand,
    ) -> Result<IssuedTypingCommand, RemoteStoreError> {
        let response = self.post_json(TYPING_COMMANDS_PATH, command, true).await?;
        decode_json_response(response).await
    }
}

fn normalize_base_url(base_url: &str) -> Result<String, RemoteStoreError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(RemoteStoreError::Transport(
            "server url is empty".to_string(),
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn map_request_error(err: reqwest::Error) -> RemoteStoreError {
    if err.is_timeout() {
        RemoteStoreError::Timeout
    } else {
        RemoteStoreError::Transport(err.to_string())
    }
}

fn format_http_error(status: StatusCode, body: &[u8]) -> RemoteStoreError {
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return RemoteStoreError::Unauthorized;
    }
    let body = String::from_utf8_lossy(body).trim().to_string();
    RemoteStoreError::Http {
        status: status.as_u16(),
        body: if body.is_empty() {
            "<empty>".to_string()
        } else {
            body
        },
    }
}

async fn read_body(response: reqwest::Response) -> Result<(StatusCode, Vec<u8>), RemoteStoreError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(map_request_error)?;
    Ok((status, bytes.to_vec()))
}

async fn ensure_success(response: reqwest::Response) -> Result<(), RemoteStoreError> {
    let (status, bytes) = read_body(response).await?;
    if !status.is_success() {
        return Err(format_http_error(status, &bytes));
    }
    Ok(())
}

async fn decode_json_response<T>(response: reqwest::Response) -> Result<T, RemoteStoreError>
where
    T: DeserializeOwned,
{
    let (status, bytes) = read_body(response).await?;
    if !status.is_success() {
        return Err(format_http_error(status, &bytes));
    }
    serde_json::from_slice::<T>(&bytes).map_err(|e| RemoteStoreError::Protocol(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::clipboard::ContentType;
    use cs_core::ids::ClientId;
    use mockito::Matcher;

    fn store_for(server: &mockito::ServerGuard) -> HttpRemoteStore {
        HttpRemoteStore::new(HttpRemoteStoreConfig {
            base_url: format!("{}/api/", server.url()),
            request_timeout: Duration::from_secs(2),
            probe_timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[test]
    fn endpoint_builder_normalizes_paths() {
        let store = HttpRemoteStore::new(HttpRemoteStoreConfig {
            base_url: " http://localhost:5000/api/ ".to_string(),
            request_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(3),
        })
        .unwrap();

        assert_eq!(
            store.endpoint("/health"),
            "http://localhost:5000/api/health"
        );
        assert_eq!(
            store.endpoint("clients"),
            "http://localhost:5000/api/clients"
        );
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let result = HttpRemoteStore::new(HttpRemoteStoreConfig {
            base_url: "   ".to_string(),
            request_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(3),
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn push_posts_text_entry_with_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/clipboard-entries")
            .match_header("authorization", "Bearer tok-1")
            .match_body(Matcher::Json(serde_json::json!({
                "content": "hello",
                "content_type": "text"
            })))
            .with_status(201)
            .with_body(r#"{"id":1,"content":"hello","content_type":"text"}"#)
            .create_async()
            .await;

        let store = store_for(&server).with_token(Some("tok-1".into()));
        store.push("hello").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn push_without_token_is_not_configured() {
        let server = mockito::Server::new_async().await;
        let store = store_for(&server);

        let err = store.push("hello").await.unwrap_err();

        assert_eq!(err, RemoteStoreError::NotConfigured);
    }

    #[tokio::test]
    async fn pull_latest_decodes_entry() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/clipboard-entries/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":3,"content":"{\"action\":\"simulate_typing\",\"content\":\"x\",\"command_id\":\"c\"}","content_type":"typing_command","timestamp":"2024-01-01T10:00:00Z"}"#,
            )
            .create_async()
            .await;

        let store = store_for(&server).with_token(Some("tok".into()));
        let entry = store.pull_latest().await.unwrap().unwrap();

        assert_eq!(entry.content_type, ContentType::TypingCommand);
        assert_eq!(entry.typing_command().unwrap().command_id.as_str(), "c");
    }

    #[tokio::test]
    async fn pull_latest_maps_not_found_to_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/clipboard-entries/latest")
            .with_status(404)
            .with_body(r#"{"message":"no clipboard content"}"#)
            .create_async()
            .await;

        let store = store_for(&server).with_token(Some("tok".into()));

        assert_eq!(store.pull_latest().await.unwrap(), None);
    }

    #[tokio::test]
    async fn pull_latest_classifies_failures() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/clipboard-entries/latest")
            .with_status(200)
            .with_body("not json")
            .expect(1)
            .create_async()
            .await;

        let store = store_for(&server).with_token(Some("tok".into()));
        let err = store.pull_latest().await.unwrap_err();
        assert!(matches!(err, RemoteStoreError::Protocol(_)));
        assert!(!err.is_transport());

        server.reset_async().await;
        server
            .mock("GET", "/api/clipboard-entries/latest")
            .with_status(401)
            .create_async()
            .await;
        assert_eq!(
            store.pull_latest().await.unwrap_err(),
            RemoteStoreError::Unauthorized
        );

        server.reset_async().await;
        server
            .mock("GET", "/api/clipboard-entries/latest")
            .with_status(502)
            .with_body(" gateway failed ")
            .create_async()
            .await;
        assert_eq!(
            store.pull_latest().await.unwrap_err(),
            RemoteStoreError::Http {
                status: 502,
                body: "gateway failed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn probe_reports_health_without_auth() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/health")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        let store = store_for(&server);

        assert_eq!(store.probe().await, ConnectionHealth::Healthy);
    }

    #[tokio::test]
    async fn probe_against_closed_port_is_degraded() {
        let store = HttpRemoteStore::new(HttpRemoteStoreConfig {
            base_url: "http://127.0.0.1:1/api".to_string(),
            request_timeout: Duration::from_secs(1),
            probe_timeout: Duration::from_secs(1),
        })
        .unwrap()
        .with_token(Some("tok".into()));

        assert_eq!(store.probe().await, ConnectionHealth::Degraded);
        let err = store.pull_latest().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn create_session_installs_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/session")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "username": "alice",
                "client_id": "alice-1",
                "client_name": "laptop"
            })))
            .with_status(200)
            .with_body(r#"{"token":"tok-9","user_id":4}"#)
            .create_async()
            .await;
        let clients = server
            .mock("GET", "/api/clients")
            .match_header("authorization", "Bearer tok-9")
            .with_status(200)
            .with_body(r#"[{"client_id":"alice-1","client_name":"laptop"}]"#)
            .create_async()
            .await;

        let store = store_for(&server);
        let grant = store
            .create_session(&SessionRequest {
                username: "alice".into(),
                password: "secret".into(),
                client_id: ClientId::new("alice-1"),
                client_name: "laptop".into(),
            })
            .await
            .unwrap();

        assert_eq!(grant.token, "tok-9");
        assert_eq!(grant.user_id, Some(4));
        assert!(store.has_token());

        let listed = store.list_clients().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].client_id, ClientId::new("alice-1"));
        clients.assert_async().await;
    }

    #[tokio::test]
    async fn register_surfaces_conflict() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/users")
            .with_status(409)
            .with_body(r#"{"message":"username taken"}"#)
            .create_async()
            .await;

        let store = store_for(&server);
        let err = store
            .register(&Credentials {
                username: "alice".into(),
                password: "pw".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RemoteStoreError::Http { status: 409, .. }));
    }

    #[tokio::test]
    async fn send_typing_command_returns_issued_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/typing-commands")
            .match_body(Matcher::Json(serde_json::json!({
                "client_id": "bob-1",
                "content": "hi",
                "typing_speed": 80
            })))
            .with_status(201)
            .with_body(r#"{"command_id":"cmd-42"}"#)
            .create_async()
            .await;

        let store = store_for(&server).with_token(Some("tok".into()));
        let issued = store
            .send_typing_command(&NewTypingCommand {
                client_id: ClientId::new("bob-1"),
                content: "hi".into(),
                typing_speed: 80,
            })
            .await
            .unwrap();

        assert_eq!(issued.command_id.as_str(), "cmd-42");
    }
}
